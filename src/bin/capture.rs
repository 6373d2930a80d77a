//! Capture CLI: render a page in headless Chrome and write one stable screenshot.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use env_logger::Env;

use snapcheck::{run_capture, CaptureConfig, CaptureRequest};

/// Capture a web page as a PNG once its rendering has stabilized
#[derive(Debug, Parser)]
#[command(name = "capture", version)]
struct Args {
    /// Page URL to capture
    url: String,

    /// Output path for the PNG screenshot
    output: PathBuf,

    /// Hard page-load timeout in seconds
    #[arg(value_name = "TIMEOUT_SECONDS", default_value_t = 30)]
    timeout: u64,

    /// Minimum dwell in seconds before stability is trusted
    #[arg(value_name = "MIN_WAIT_SECONDS", default_value_t = 0)]
    min_wait: u64,
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
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => return report_parse_error(e),
    };

    let request = match CaptureRequest::new(args.url, args.output, args.timeout, args.min_wait) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = CaptureConfig::from_env();
    match run_capture(&request, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arguments_are_usage_errors() {
        let err = Args::try_parse_from(["capture"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(!exits_cleanly(err.kind()));
    }

    #[test]
    fn test_help_and_version_exit_cleanly() {
        for flag in ["--help", "--version"] {
            let err = Args::try_parse_from(["capture", flag]).unwrap_err();
            assert!(exits_cleanly(err.kind()), "{} treated as usage error", flag);
        }
    }

    #[test]
    fn test_timeout_defaults() {
        let args = Args::try_parse_from(["capture", "http://a/", "out.png"]).unwrap();
        assert_eq!(args.timeout, 30);
        assert_eq!(args.min_wait, 0);
    }
}
