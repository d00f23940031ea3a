//! landgrab -- a territory-capture bot for the line-based grid protocol.
//!
//! Reads host messages from stdin and writes the bot name and one move line
//! per turn to stdout. Diagnostics go to an optional log file.

use std::env;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use landgrab::config::EngineConfig;
use landgrab::diag::init_logging;
use landgrab::engine::run;

fn print_usage() {
    eprintln!("Usage: landgrab [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE    JSON configuration (default: built-in tuning)");
    eprintln!("  --log FILE       Append diagnostics to FILE (filter: LANDGRAB_LOG)");
    eprintln!("  --help           Show this message");
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut config_path: Option<PathBuf> = None;
    let mut log_path: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "--log" if i + 1 >= args.len() => {
                eprintln!("{} needs a value", args[i]);
                print_usage();
                return ExitCode::FAILURE;
            }
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(&args[i]));
            }
            "--log" => {
                i += 1;
                log_path = Some(PathBuf::from(&args[i]));
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    if log_path.is_some() {
        config.log_file = log_path;
    }

    if let Some(path) = &config.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("{}", e);
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match run(stdin.lock(), &mut out, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "session ended with an error");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
