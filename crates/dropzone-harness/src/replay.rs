#![forbid(unsafe_code)]

//! Drive the engine through a trace and collect a report.

use dropzone_core::geometry::Rect;
use dropzone_core::scene::{ElementId, SceneEffect, SceneSnapshot};
use dropzone_core::{
    DispatchOutcome, DragDispatch, DragEngine, GesturePhase, IgnoredReason, PlacementDecision,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::trace::{ElementRef, Trace, TraceEvent};

/// CLI overrides applied on top of the trace's own config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    pub seed: Option<u64>,
    pub min_pool: Option<usize>,
    /// Keep the scene effect journal in the report.
    pub effects: bool,
}

/// One dispatch, flattened for JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRecord {
    /// Index of the trace event that produced this dispatch.
    pub event: usize,
    pub phase: GesturePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementId>,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<PlacementDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replenished: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IgnoredReason>,
    pub line: String,
}

impl DispatchRecord {
    fn new(event: usize, dispatch: &DragDispatch) -> Self {
        let (decision, replenished, reason) = match &dispatch.outcome {
            DispatchOutcome::Dropped {
                decision,
                replenished,
            } => (Some(*decision), Some(*replenished), None),
            DispatchOutcome::Abandoned { replenished } => (None, Some(*replenished), None),
            DispatchOutcome::Ignored(reason) => (None, None, Some(*reason)),
            DispatchOutcome::Started { .. } | DispatchOutcome::Followed { .. } => {
                (None, None, None)
            }
        };
        Self {
            event,
            phase: dispatch.phase,
            sequence: dispatch.sequence,
            element: dispatch.element,
            outcome: dispatch.outcome.label(),
            decision,
            replenished,
            reason,
            line: dispatch.log_line(),
        }
    }
}

/// Aggregate counts over a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub accepted: usize,
    pub ignored: usize,
    pub placed_grid: usize,
    pub placed_free: usize,
    pub kept: usize,
    pub discarded: usize,
    pub replenished: usize,
    /// A session was still open when the trace ended.
    pub dangling_session: bool,
}

impl ReplaySummary {
    fn record(&mut self, dispatch: &DragDispatch) {
        if !dispatch.accepted() {
            self.ignored += 1;
            return;
        }
        self.accepted += 1;
        match &dispatch.outcome {
            DispatchOutcome::Dropped {
                decision,
                replenished,
            } => {
                match decision {
                    PlacementDecision::Grid { .. } => self.placed_grid += 1,
                    PlacementDecision::Free { .. } => self.placed_free += 1,
                    PlacementDecision::Keep { .. } => self.kept += 1,
                    PlacementDecision::Discard { .. } => self.discarded += 1,
                }
                self.replenished += replenished;
            }
            DispatchOutcome::Abandoned { replenished } => self.replenished += replenished,
            _ => {}
        }
    }
}

/// Result of replaying one trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub seed: u64,
    pub min_source_pool: usize,
    pub summary: ReplaySummary,
    pub dispatches: Vec<DispatchRecord>,
    pub scene: SceneSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<SceneEffect>>,
}

/// Replay `trace` from a fresh engine.
pub fn replay(trace: &Trace, options: &ReplayOptions) -> Result<ReplayReport> {
    let mut config = trace.config.clone().unwrap_or_default();
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    if let Some(min_pool) = options.min_pool {
        config.min_source_pool = min_pool;
    }
    let mut engine = DragEngine::new(config, trace.layout)?;
    info!(
        events = trace.events.len(),
        seed = engine.config().seed,
        "replaying trace"
    );

    let mut journal = Vec::new();
    let mut keep_effects = |engine: &mut DragEngine| {
        let drained = engine.drain_effects();
        if options.effects {
            journal.extend(drained);
        }
    };
    keep_effects(&mut engine);

    let mut summary = ReplaySummary {
        events: trace.events.len(),
        ..ReplaySummary::default()
    };
    let mut dispatches = Vec::with_capacity(trace.events.len());
    for (index, event) in trace.events.iter().enumerate() {
        let dispatch = apply(&mut engine, event);
        debug!(event = index, kind = event.kind(), "{}", dispatch.log_line());
        summary.record(&dispatch);
        dispatches.push(DispatchRecord::new(index, &dispatch));
        keep_effects(&mut engine);
    }
    summary.dangling_session = engine.is_dragging();

    Ok(ReplayReport {
        seed: engine.config().seed,
        min_source_pool: engine.config().min_source_pool,
        summary,
        dispatches,
        scene: engine.scene().snapshot(),
        effects: options.effects.then_some(journal),
    })
}

/// Feed one trace event to the engine. Unresolvable element references are
/// passed through as a missing target so the engine records the rejection.
fn apply(engine: &mut DragEngine, event: &TraceEvent) -> DragDispatch {
    match *event {
        TraceEvent::DragStart { element, grab } => {
            let (target, rect) = locate(engine, element);
            engine.drag_start(target, rect.origin() + grab, rect)
        }
        TraceEvent::TouchStart { element, grab } => {
            let (target, rect) = locate(engine, element);
            engine.touch_start(target, rect.origin() + grab, rect)
        }
        TraceEvent::TouchMove { at } => engine.touch_move(at),
        TraceEvent::Drop { at } => engine.drop(at),
        TraceEvent::TouchEnd { at } => engine.touch_end(at),
        TraceEvent::DragEnd => engine.drag_end(),
        TraceEvent::Cancel => engine.cancel(),
    }
}

fn locate(engine: &DragEngine, element: ElementRef) -> (Option<ElementId>, Rect) {
    let scene = engine.scene();
    match element.resolve(scene) {
        Some(id) => (Some(id), scene.element_rect(id).unwrap_or_default()),
        None => (None, Rect::default()),
    }
}
