//! Beacon APK installer
//!
//! Installs an APK over adb, skipping the install entirely when
//! neither the APK bytes nor the install command changed since the
//! last successful install to the same device.

use anyhow::Result;
use beacon_cli::output::{format_size, Status};
use beacon_cli::progress::{finish_error, finish_success, spinner};
use beacon_core::error::exit_codes;
use beacon_core::fsutil;
use beacon_core::process::CommandSpec;
use beacon_device::Adb;
use beacon_stamp::{record_path_for, StampChecker};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "beacon-install")]
#[command(about = "Install an APK over adb, skipping when nothing changed")]
#[command(version)]
struct Cli {
    /// SDK tools directory containing adb (default: adb from PATH)
    #[arg(long)]
    sdk_tools: Option<PathBuf>,

    /// APK to install
    #[arg(long)]
    apk_path: PathBuf,

    /// Marker file touched after a successful run
    #[arg(long)]
    stamp: Option<PathBuf>,

    /// Device serial (default: discovered via adb get-serialno)
    #[arg(long)]
    serial: Option<String>,

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
            .with_env_filter("beacon_core=debug,beacon_device=debug,beacon_stamp=debug")
            .init();
    }

    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let adb = match &cli.sdk_tools {
        Some(dir) => Adb::from_sdk_tools(dir),
        None => Adb::from_path(),
    };
    let adb = match adb {
        Ok(adb) => adb,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::COMMAND_NOT_FOUND;
        }
    };

    let serial = match &cli.serial {
        Some(serial) => serial.clone(),
        None => match adb.serial_number() {
            Ok(serial) => serial,
            Err(e) => {
                Status::error(&e.to_string());
                match adb.devices() {
                    Ok(devices) if devices.is_empty() => {
                        Status::warning("No devices attached");
                    }
                    Ok(devices) => {
                        Status::info(&format!("Attached devices: {}", devices.join(", ")));
                    }
                    Err(_) => {}
                }
                return exit_codes::DEVICE_ERROR;
            }
        },
    };

    let command = adb.install_command(&cli.apk_path);
    let record_path = record_path_for(&cli.apk_path, &serial);
    let checker = StampChecker::new(&record_path, vec![cli.apk_path.clone()], command.argv());

    if checker.is_stale() {
        let status = install(&cli.apk_path, &serial, &command);
        if status != exit_codes::SUCCESS {
            return status;
        }
        if let Err(e) = checker.write() {
            Status::error(&e.to_string());
            return exit_codes::FAILURE;
        }
    } else {
        Status::success(&format!(
            "{} unchanged on {}, skipping install",
            cli.apk_path.display(),
            serial
        ));
    }

    if let Some(stamp) = &cli.stamp {
        if let Err(e) = fsutil::touch(stamp) {
            Status::error(&e.to_string());
            return exit_codes::FAILURE;
        }
    }

    exit_codes::SUCCESS
}

fn install(apk: &Path, serial: &str, command: &CommandSpec) -> i32 {
    let size = std::fs::metadata(apk).map(|m| m.len()).unwrap_or(0);
    let pb = spinner(&format!(
        "Installing {} ({}) on {}",
        apk.display(),
        format_size(size),
        serial
    ));

    match command.run() {
        Ok(result) if result.success => {
            finish_success(&pb, &format!("Installed {} on {}", apk.display(), serial));
            exit_codes::SUCCESS
        }
        Ok(result) => {
            finish_error(
                &pb,
                &format!("adb install exited with status {}", result.exit_code),
            );
            let output = result.combined_output();
            if !output.is_empty() {
                eprintln!("{output}");
            }
            exit_codes::FAILURE
        }
        Err(e) => {
            finish_error(&pb, "Install failed");
            Status::error(&e.to_string());
            exit_codes::FAILURE
        }
    }
}
