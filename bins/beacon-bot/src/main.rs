//! Beacon buildbot step runner
//!
//! Reads the builder identity from the CI environment, runs the fixed
//! test and archive sequence, and exits with the combined status.

use anyhow::Result;
use beacon_cli::output::Status;
use beacon_core::config::Config;
use beacon_core::error::exit_codes;
use beacon_dispatch::HostOs;
use beacon_pipeline::{print_summary, BotRunner, BuildInfo};
use beacon_upload::Uploader;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "beacon-bot")]
#[command(about = "Run the buildbot test and archive sequence")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Source tree the bot operates on
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
            .with_env_filter(
                "beacon_core=debug,beacon_dispatch=debug,beacon_upload=debug,beacon_pipeline=debug",
            )
            .init();
    }

    let config = Config::load(cli.config.as_deref())?;

    std::process::exit(run(&cli, &config));
}

fn run(cli: &Cli, config: &Config) -> i32 {
    let os = match HostOs::current() {
        Ok(os) => os,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::CONFIG_ERROR;
        }
    };

    let info = BuildInfo::from_env();
    println!("{}", "Running bot steps...".bold());
    Status::info(&format!(
        "Builder {} version {} ({} {})",
        info.name, info.version, info.mode, info.arch
    ));
    println!();

    let uploader = Uploader::new(config.schema.upload.clone());
    let runner = BotRunner::new(info, os, &cli.src_root, uploader);
    let outcomes = runner.run();

    print_summary(&outcomes)
}
