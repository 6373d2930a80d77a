//! Verify CLI: classify a screenshot as a valid, non-blank UI render.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use env_logger::Env;

use snapcheck::{verify_screenshot, VerifyConfig};

/// Verify a screenshot, optionally against a baseline image
#[derive(Debug, Parser)]
#[command(name = "verify", version)]
struct Args {
    /// Screenshot to verify
    image: PathBuf,

    /// Baseline image to compare against
    #[arg(long)]
    baseline: Option<PathBuf>,
}

/// Only `--help` and `--version` terminate argument parsing without being
/// usage errors; everything else exits 1 per the tool contract.
fn exits_cleanly(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn report_parse_error(e: clap::Error) -> ExitCode {
    let clean = exits_cleanly(e.kind());
    let _ = e.print();
    if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => return report_parse_error(e),
    };

    let config = VerifyConfig::from_env();
    let verdict = verify_screenshot(&args.image, args.baseline.as_deref(), &config);

    let label = if verdict.passed { "PASS" } else { "FAIL" };
    println!("{}: {}", label, verdict.message);

    if verdict.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
