#![forbid(unsafe_code)]

//! Engine configuration.

use crate::geometry::Size;

/// Default replenishment floor for the Source zone.
pub const DEFAULT_MIN_SOURCE_POOL: usize = 5;
/// Default opacity of an element while it is being dragged.
pub const DEFAULT_DRAGGING_OPACITY: f64 = 0.4;
/// Default side length of freshly created elements, in pixels.
pub const DEFAULT_ELEMENT_SIDE: f64 = 50.0;
/// Default hue RNG seed.
pub const DEFAULT_SEED: u64 = 0x00D2_A9D2_0F0E;

/// Tunables for [`crate::engine::DragEngine`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineConfig {
    /// Source is refilled to at least this many elements.
    pub min_source_pool: usize,
    /// Opacity applied while dragged; restored to 1.0 afterwards.
    pub dragging_opacity: f64,
    /// Size of freshly created elements until a host reports otherwise.
    pub element_size: Size,
    /// HSL saturation for new colors.
    pub saturation: u8,
    /// HSL lightness for new colors.
    pub lightness: u8,
    /// Seed for the hue generator.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_source_pool: DEFAULT_MIN_SOURCE_POOL,
            dragging_opacity: DEFAULT_DRAGGING_OPACITY,
            element_size: Size::square(DEFAULT_ELEMENT_SIDE),
            saturation: 100,
            lightness: 70,
            seed: DEFAULT_SEED,
        }
    }
}

impl EngineConfig {
    /// Same config with a different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Same config with a different pool floor.
    #[must_use]
    pub fn with_min_source_pool(mut self, min_source_pool: usize) -> Self {
        self.min_source_pool = min_source_pool;
        self
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_source_pool == 0 {
            return Err(ConfigError::EmptySourcePool);
        }
        if !(self.dragging_opacity > 0.0 && self.dragging_opacity <= 1.0) {
            return Err(ConfigError::OpacityOutOfRange {
                opacity: self.dragging_opacity,
            });
        }
        let Size { width, height } = self.element_size;
        if self.element_size.is_empty() || !width.is_finite() || !height.is_finite() {
            return Err(ConfigError::InvalidElementSize { width, height });
        }
        if self.saturation > 100 {
            return Err(ConfigError::PercentageOutOfRange {
                field: "saturation",
                value: self.saturation,
            });
        }
        if self.lightness > 100 {
            return Err(ConfigError::PercentageOutOfRange {
                field: "lightness",
                value: self.lightness,
            });
        }
        Ok(())
    }
}

/// Invalid [`EngineConfig`] values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `min_source_pool` must be at least one.
    EmptySourcePool,
    /// `dragging_opacity` must lie in `(0, 1]`.
    OpacityOutOfRange { opacity: f64 },
    /// `element_size` must be finite and non-empty.
    InvalidElementSize { width: f64, height: f64 },
    /// HSL percentages must lie in `0..=100`.
    PercentageOutOfRange { field: &'static str, value: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptySourcePool => write!(f, "min_source_pool must be at least 1"),
            Self::OpacityOutOfRange { opacity } => {
                write!(f, "dragging_opacity {opacity} is outside (0, 1]")
            }
            Self::InvalidElementSize { width, height } => {
                write!(f, "invalid element size {width}x{height}")
            }
            Self::PercentageOutOfRange { field, value } => {
                write!(f, "{field} {value} is outside 0..=100")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use crate::geometry::Size;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.min_source_pool, 5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_pool_is_rejected() {
        let config = EngineConfig::default().with_min_source_pool(0);
        assert_eq!(config.validate(), Err(ConfigError::EmptySourcePool));
    }

    #[test]
    fn opacity_bounds() {
        let mut config = EngineConfig::default();
        config.dragging_opacity = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OpacityOutOfRange { .. })
        ));
        config.dragging_opacity = 1.0;
        assert_eq!(config.validate(), Ok(()));
        config.dragging_opacity = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn element_size_must_be_finite_and_positive() {
        let mut config = EngineConfig::default();
        config.element_size = Size::new(50.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidElementSize { .. })
        ));
        config.element_size = Size::new(50.0, f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn error_messages_name_the_field() {
        let mut config = EngineConfig::default();
        config.lightness = 120;
        let err = config.validate().expect_err("lightness 120 must be rejected");
        assert_eq!(err.to_string(), "lightness 120 is outside 0..=100");
    }
}
