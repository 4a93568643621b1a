//! Beacon build dispatcher
//!
//! Resolves logical targets and drives the native build tool for the
//! host: xcodebuild per target on mac, a single make elsewhere.

use anyhow::Result;
use beacon_cli::output::{format_duration, Status};
use beacon_core::error::{exit_codes, ErrorCode};
use beacon_core::fsutil;
use beacon_dispatch::{default_jobs, BuildMode, BuildRequest, HostOs};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "beacon-build")]
#[command(about = "Build Beacon targets in Debug or Release mode")]
#[command(version)]
struct Cli {
    /// Logical target to build, or "all"
    #[arg(long, default_value = "all")]
    target: String,

    /// Build mode (Debug or Release)
    #[arg(long)]
    mode: BuildMode,

    /// Remove the build output directory first
    #[arg(long)]
    clobber: bool,

    /// Number of parallel jobs
    #[arg(short, long, default_value_t = default_jobs())]
    jobs: usize,

    /// Source tree to build in
    #[arg(long, default_value = ".")]
    src_root: PathBuf,

    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("beacon_core=debug,beacon_dispatch=debug")
            .init();
    }

    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let os = match HostOs::current() {
        Ok(os) => os,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::CONFIG_ERROR;
        }
    };

    let request = match BuildRequest::new(&cli.target, cli.mode, cli.jobs, &cli.src_root) {
        Ok(request) => request,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::CONFIG_ERROR;
        }
    };

    if cli.clobber {
        let dir = request.clobber_dir(os);
        Status::info(&format!("Clobbering {}", dir.display()));
        if let Err(e) = fsutil::clobber_dir(&dir) {
            Status::error(&e.to_string());
            return exit_codes::FAILURE;
        }
    }

    let start = Instant::now();
    let commands = request.commands(os);
    let total = commands.len();
    for (index, command) in commands.iter().enumerate() {
        Status::step(index + 1, total, &format!("Running {command}"));
        match command.run_streaming() {
            Ok(0) => {}
            Ok(status) => {
                Status::error(&format!("{} exited with status {status}", command.program()));
                return status;
            }
            Err(e) => {
                Status::error(&e.to_string());
                return match e.code {
                    ErrorCode::CommandNotFound => exit_codes::COMMAND_NOT_FOUND,
                    _ => exit_codes::FAILURE,
                };
            }
        }
    }

    Status::success(&format!(
        "Built {} target(s) in {} mode in {}",
        request.targets.len(),
        request.mode,
        format_duration(start.elapsed())
    ));
    exit_codes::SUCCESS
}
