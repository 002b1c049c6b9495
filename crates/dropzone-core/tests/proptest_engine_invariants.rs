//! Property-based invariant tests for the drag engine.
//!
//! These tests drive arbitrary gesture sequences (including out-of-order and
//! overlapping ones) and verify:
//!
//! 1. Whenever no session is active, Source holds at least the pool floor
//! 2. No element is ever detached from every zone
//! 3. Only the dragged element is dimmed, and only while a session is active
//! 4. Idle Grid children are in flow; idle Free children are absolute and in bounds
//! 5. Determinism: same seed and gestures yield the same scene

use dropzone_core::geometry::{Point, Rect};
use dropzone_core::scene::{Positioning, ZoneLayout, ZoneRole};
use dropzone_core::{DragEngine, EngineConfig};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    DragStart { pick: usize, grab: (f64, f64) },
    TouchStart { pick: usize, grab: (f64, f64) },
    TouchMove(f64, f64),
    Drop(f64, f64),
    TouchEnd(f64, f64),
    DragEnd,
    Cancel,
}

fn coord() -> impl Strategy<Value = f64> {
    -50.0f64..1000.0
}

fn grab() -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..50.0, 0.0f64..50.0)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..64, grab()).prop_map(|(pick, grab)| Op::DragStart { pick, grab }),
        (0usize..64, grab()).prop_map(|(pick, grab)| Op::TouchStart { pick, grab }),
        (coord(), coord()).prop_map(|(x, y)| Op::TouchMove(x, y)),
        (coord(), coord()).prop_map(|(x, y)| Op::Drop(x, y)),
        (coord(), coord()).prop_map(|(x, y)| Op::TouchEnd(x, y)),
        Just(Op::DragEnd),
        Just(Op::Cancel),
    ]
}

fn layout() -> ZoneLayout {
    ZoneLayout {
        source: Rect::new(0.0, 0.0, 120.0, 600.0),
        grid: Rect::new(200.0, 0.0, 300.0, 300.0),
        free: Rect::new(560.0, 40.0, 320.0, 280.0),
    }
}

fn attached(engine: &DragEngine) -> Vec<dropzone_core::ElementId> {
    ZoneRole::ALL
        .into_iter()
        .flat_map(|role| engine.scene().children(role).to_vec())
        .collect()
}

fn apply(engine: &mut DragEngine, op: &Op) {
    match *op {
        Op::DragStart { pick, grab } | Op::TouchStart { pick, grab } => {
            let ids = attached(engine);
            let id = ids[pick % ids.len()];
            let rect = engine
                .scene()
                .element_rect(id)
                .expect("attached elements are laid out");
            let at = rect.origin() + Point::new(grab.0, grab.1);
            if matches!(op, Op::DragStart { .. }) {
                engine.drag_start(Some(id), at, rect);
            } else {
                engine.touch_start(Some(id), at, rect);
            }
        }
        Op::TouchMove(x, y) => {
            engine.touch_move(Point::new(x, y));
        }
        Op::Drop(x, y) => {
            engine.drop(Point::new(x, y));
        }
        Op::TouchEnd(x, y) => {
            engine.touch_end(Point::new(x, y));
        }
        Op::DragEnd => {
            engine.drag_end();
        }
        Op::Cancel => {
            engine.cancel();
        }
    }
}

fn check_invariants(engine: &DragEngine) -> Result<(), TestCaseError> {
    let scene = engine.scene();
    let floor = engine.config().min_source_pool;

    prop_assert_eq!(
        scene.element_count(),
        attached(engine).len(),
        "every element must live in exactly one zone"
    );

    let dragged = engine.session().map(|session| session.element);
    for id in attached(engine) {
        let element = scene.element(id).expect("attached ids resolve");
        if Some(id) == dragged {
            prop_assert_eq!(element.opacity, engine.config().dragging_opacity);
        } else {
            prop_assert_eq!(element.opacity, 1.0, "{} is dimmed outside a session", id);
        }
    }

    if !engine.is_dragging() {
        prop_assert!(scene.len(ZoneRole::Source) >= floor);
        for &id in scene.children(ZoneRole::Grid) {
            let element = scene.element(id).expect("grid child resolves");
            prop_assert_eq!(element.positioning, Positioning::Flow);
        }
        let free = scene.zone_rect(ZoneRole::Free);
        for &id in scene.children(ZoneRole::Free) {
            let element = scene.element(id).expect("free child resolves");
            let Positioning::Absolute { x, y } = element.positioning else {
                return Err(TestCaseError::fail(format!(
                    "free child {id} is not absolute: {:?}",
                    element.positioning
                )));
            };
            prop_assert!(free.fits_at(Point::new(x, y), element.size));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_for_arbitrary_gestures(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let config = EngineConfig::default().with_seed(seed);
        let mut engine = DragEngine::new(config, layout()).expect("valid config");
        check_invariants(&engine)?;
        for op in &ops {
            apply(&mut engine, op);
            check_invariants(&engine)?;
        }
    }

    #[test]
    fn same_seed_same_gestures_same_scene(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let run = || {
            let config = EngineConfig::default().with_seed(seed);
            let mut engine = DragEngine::new(config, layout()).expect("valid config");
            for op in &ops {
                apply(&mut engine, op);
            }
            engine.scene().snapshot()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn pool_floor_is_configurable(floor in 1usize..12) {
        let config = EngineConfig::default().with_min_source_pool(floor);
        let mut engine = DragEngine::new(config, layout()).expect("valid config");
        prop_assert_eq!(engine.scene().len(ZoneRole::Source), floor);
        prop_assert!(engine.replenish().is_empty());
    }
}
