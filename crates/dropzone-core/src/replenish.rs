#![forbid(unsafe_code)]

//! Source pool replenishment.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Hsl;
use crate::config::EngineConfig;
use crate::geometry::Size;
use crate::scene::{ElementId, Scene, ZoneRole};

#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

/// Keeps the Source zone at or above its configured floor.
#[derive(Debug, Clone)]
pub struct Replenisher {
    min_pool: usize,
    element_size: Size,
    saturation: u8,
    lightness: u8,
    rng: SmallRng,
}

impl Replenisher {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_pool: config.min_source_pool,
            element_size: config.element_size,
            saturation: config.saturation,
            lightness: config.lightness,
            rng: SmallRng::seed_from_u64(config.seed),
        }
    }

    /// Next random color: uniform hue, configured saturation and lightness.
    pub fn next_color(&mut self) -> Hsl {
        let hue = self.rng.random_range(0.0..360.0);
        Hsl::new(hue, self.saturation, self.lightness)
    }

    /// Create elements in Source until it holds `min_pool` children.
    ///
    /// Returns the ids created, in creation order. A no-op when Source is
    /// already at or above the floor; never removes anything.
    pub fn replenish(&mut self, scene: &mut Scene) -> Vec<ElementId> {
        let missing = self.min_pool.saturating_sub(scene.len(ZoneRole::Source));
        let mut created = Vec::with_capacity(missing);
        for _ in 0..missing {
            let color = self.next_color();
            let id = scene.create_element(color, self.element_size);
            scene.append(id, ZoneRole::Source);
            created.push(id);
        }
        if !created.is_empty() {
            debug!(
                created = created.len(),
                pool = scene.len(ZoneRole::Source),
                "source replenished"
            );
        }
        created
    }
}
