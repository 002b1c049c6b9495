#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::replay::{ReplayOptions, replay};
use crate::trace::Trace;

#[derive(Debug, Parser)]
#[command(
    name = "dropzone-harness",
    about = "Replay drag-and-drop gesture traces through the dropzone engine",
    version
)]
pub struct Cli {
    /// Log engine decisions to stderr (`RUST_LOG` takes precedence).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSON trace and print the report.
    Replay(ReplayArgs),

    /// Print a starter trace.
    Init,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Trace file to replay.
    pub trace: PathBuf,

    /// Override the hue RNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the Source pool floor.
    #[arg(long = "min-pool")]
    pub min_pool: Option<usize>,

    /// Include the scene effect journal in the report.
    #[arg(long)]
    pub effects: bool,
}

impl ReplayArgs {
    fn options(&self) -> ReplayOptions {
        ReplayOptions {
            seed: self.seed,
            min_pool: self.min_pool,
            effects: self.effects,
        }
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

/// Install a stderr subscriber. A second call (tests) is a no-op.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => {
            let trace = Trace::load(&args.trace)?;
            let report = replay(&trace, &args.options())?;
            serde_json::to_writer_pretty(&mut *out, &report)?;
        }
        Commands::Init => {
            serde_json::to_writer_pretty(&mut *out, &Trace::skeleton())?;
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::{Cli, Commands, run};
    use crate::error::HarnessError;

    #[test]
    fn parses_replay_flags() {
        let cli = Cli::try_parse_from([
            "dropzone-harness",
            "replay",
            "trace.json",
            "--seed",
            "9",
            "--min-pool",
            "3",
            "--effects",
            "--verbose",
        ])
        .expect("valid arguments");
        assert!(cli.verbose);
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.trace, PathBuf::from("trace.json"));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.min_pool, Some(3));
        assert!(args.effects);
    }

    #[test]
    fn init_prints_parseable_trace() {
        let mut out = Vec::new();
        run(
            Cli {
                verbose: false,
                command: Commands::Init,
            },
            &mut out,
        )
        .expect("init succeeds");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(crate::trace::Trace::from_json(&text).is_ok());
    }

    #[test]
    fn missing_trace_file_reports_path() {
        let cli = Cli::try_parse_from(["dropzone-harness", "replay", "/nonexistent/trace.json"])
            .expect("valid arguments");
        let error = run(cli, &mut Vec::<u8>::new()).expect_err("file is missing");
        assert!(matches!(error, HarnessError::ReadTrace { .. }));
        assert!(error.to_string().contains("/nonexistent/trace.json"));
    }
}
