//! Harness entry points driven with trace files on disk.

use std::path::{Path, PathBuf};

use dropzone_harness::cli::{Cli, Commands, ReplayArgs, run};
use dropzone_harness::{HarnessError, Trace};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

const SCENARIO: &str = r#"{
  "layout": {
    "source": { "x": 20, "y": 80, "width": 60, "height": 400 },
    "grid":   { "x": 240, "y": 80, "width": 300, "height": 300 },
    "free":   { "x": 600, "y": 80, "width": 400, "height": 300 }
  },
  "events": [
    { "kind": "drag_start", "element": { "source": 2 }, "grab": { "x": 5, "y": 5 } },
    { "kind": "drop", "at": { "x": 280, "y": 100 } },
    { "kind": "drag_end" },
    { "kind": "drag_start", "element": { "source": 0 }, "grab": { "x": 5, "y": 5 } },
    { "kind": "drop", "at": { "x": 535, "y": 375 } },
    { "kind": "drag_end" }
  ]
}"#;

fn write_trace(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).expect("write trace fixture");
    path
}

fn replay_json(path: &Path, effects: bool) -> Value {
    let cli = Cli {
        verbose: false,
        command: Commands::Replay(ReplayArgs {
            trace: path.to_path_buf(),
            seed: Some(11),
            min_pool: None,
            effects,
        }),
    };
    let mut out = Vec::new();
    run(cli, &mut out).expect("replay succeeds");
    serde_json::from_slice(&out).expect("report is JSON")
}

fn zone<'a>(report: &'a Value, role: &str) -> &'a Value {
    report["scene"]["zones"]
        .as_array()
        .and_then(|zones| zones.iter().find(|zone| zone["role"] == role))
        .expect("zone present")
}

#[test]
fn grid_placement_then_overflow_discard() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_trace(&dir, "scenario.json", SCENARIO);

    let report = replay_json(&path, false);

    let dispatches = report["dispatches"].as_array().expect("dispatch list");
    assert_eq!(dispatches.len(), 6);
    assert_eq!(dispatches[1]["decision"]["decision"], "grid");
    assert_eq!(dispatches[1]["decision"]["offset"]["x"], 35.0);
    assert_eq!(dispatches[1]["decision"]["offset"]["y"], 15.0);
    assert_eq!(dispatches[2]["outcome"], "ignored");
    assert_eq!(dispatches[2]["reason"], "no_active_session");
    assert_eq!(dispatches[4]["decision"]["decision"], "discard");
    assert_eq!(dispatches[4]["decision"]["reason"], "overflow");

    assert_eq!(report["summary"]["placed_grid"], 1);
    assert_eq!(report["summary"]["discarded"], 1);
    assert_eq!(report["summary"]["replenished"], 2);
    assert_eq!(report["seed"], 11);

    let grid = zone(&report, "grid");
    assert_eq!(grid["elements"].as_array().map(Vec::len), Some(1));
    assert_eq!(grid["elements"][0]["positioning"]["mode"], "flow");
    assert_eq!(
        zone(&report, "source")["elements"].as_array().map(Vec::len),
        Some(5)
    );
    assert!(report.get("effects").is_none());
}

#[test]
fn effect_journal_is_opt_in() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_trace(&dir, "scenario.json", SCENARIO);

    let report = replay_json(&path, true);
    let effects = report["effects"].as_array().expect("journal present");
    let count = |kind: &str| {
        effects
            .iter()
            .filter(|effect| effect["effect"] == kind)
            .count()
    };
    // Five initial elements plus one refill per completed drop.
    assert_eq!(count("created"), 7);
    assert_eq!(count("removed"), 1);
}

#[test]
fn replay_is_deterministic_for_a_fixed_seed() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_trace(&dir, "scenario.json", SCENARIO);
    assert_eq!(replay_json(&path, true), replay_json(&path, true));
}

#[test]
fn init_output_replays_cleanly() {
    let dir = TempDir::new().expect("tempdir");
    let mut skeleton = Vec::new();
    run(
        Cli {
            verbose: false,
            command: Commands::Init,
        },
        &mut skeleton,
    )
    .expect("init succeeds");
    let path = dir.path().join("skeleton.json");
    std::fs::write(&path, &skeleton).expect("write skeleton");

    let report = replay_json(&path, false);
    assert_eq!(report["summary"]["dangling_session"], false);
    assert_eq!(
        zone(&report, "source")["elements"].as_array().map(Vec::len),
        Some(5)
    );
}

#[test]
fn malformed_trace_is_a_json_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_trace(&dir, "broken.json", "{ \"layout\": ");
    let error = Trace::load(&path).expect_err("truncated JSON");
    assert!(matches!(error, HarnessError::Json(_)));
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn zero_pool_in_trace_config_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let text = SCENARIO.replacen(
        "\"events\"",
        "\"config\": { \"min_source_pool\": 0 },\n  \"events\"",
        1,
    );
    let path = write_trace(&dir, "zero.json", &text);
    let cli = Cli {
        verbose: false,
        command: Commands::Replay(ReplayArgs {
            trace: path,
            seed: None,
            min_pool: None,
            effects: false,
        }),
    };
    let error = run(cli, &mut Vec::<u8>::new()).expect_err("empty pool");
    assert!(matches!(error, HarnessError::Config(_)));
}
