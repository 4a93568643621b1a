//! The fixed bot step sequence
//!
//! Runs every gated step with progress display, collects one outcome
//! per step, and reduces them at the end. Test failures never
//! short-circuit later tests; only the closing archive step requires
//! everything before it to have passed.

use crate::annotate;
use crate::archive::{self, ProductArchive};
use crate::buildinfo::BuildInfo;
use crate::steps::{combined_status, StepOutcome, TestStep, TEST_STEPS};
use beacon_core::error::exit_codes;
use beacon_core::fsutil;
use beacon_dispatch::{out_dir, HostOs};
use beacon_upload::Uploader;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Drives one bot run end to end.
pub struct BotRunner {
    info: BuildInfo,
    os: HostOs,
    src_root: PathBuf,
    uploader: Uploader,
}

impl BotRunner {
    /// Runner for a build identity on a source tree.
    pub fn new(
        info: BuildInfo,
        os: HostOs,
        src_root: impl Into<PathBuf>,
        uploader: Uploader,
    ) -> Self {
        Self {
            info,
            os,
            src_root: src_root.into(),
            uploader,
        }
    }

    /// The build identity this runner executes for.
    #[must_use]
    pub fn info(&self) -> &BuildInfo {
        &self.info
    }

    /// Execute the whole sequence and collect every outcome.
    ///
    /// Trunk builders archive and upload before testing. Every test
    /// step whose gate passes runs regardless of earlier failures.
    /// Non-trunk archiving builders archive at the end, but only when
    /// everything before passed.
    pub fn run(&self) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();

        if self.info.is_trunk {
            outcomes.push(self.timed("archive_and_upload", || self.archive_and_upload()));
        }

        for step in TEST_STEPS {
            if !step.gate.should_run(self.info.mode, self.os) {
                tracing::debug!(step = %step.step_name(), "gated off for this mode/host");
                continue;
            }
            let name = step.step_name();
            outcomes.push(self.timed(&name, || self.run_test_step(step)));
        }

        if combined_status(&outcomes) == 0 && self.info.do_archive && !self.info.is_trunk {
            outcomes.push(self.timed("archive_and_upload", || self.archive_and_upload()));
        }

        outcomes
    }

    fn timed(&self, name: &str, step: impl FnOnce() -> i32) -> StepOutcome {
        let start = Instant::now();
        let status = step();
        let duration = start.elapsed();

        if status == 0 {
            println!(
                "  {} {} {}",
                "✓".green(),
                name,
                format!("({:.1}s)", duration.as_secs_f32()).dimmed()
            );
        } else {
            eprintln!(
                "  {} {} {}",
                "✗".red(),
                name.red(),
                format!("({:.1}s)", duration.as_secs_f32()).dimmed()
            );
        }

        StepOutcome {
            name: name.to_string(),
            status,
            duration,
        }
    }

    fn run_test_step(&self, step: &TestStep) -> i32 {
        annotate::build_step(&step.step_name());

        // Result trees from an earlier run must not pollute this one.
        let results_dir = out_dir(&self.src_root, self.info.mode).join("layout-test-results");
        if let Err(e) = fsutil::clobber_dir(&results_dir) {
            tracing::warn!(dir = %results_dir.display(), error = %e, "could not clear old results");
        }

        let command = step.command(&self.src_root, self.info.mode, self.info.arch);
        let status = match command.run_streaming() {
            Ok(status) => status,
            Err(e) => {
                eprintln!("{e}");
                1
            }
        };

        if status != 0 {
            annotate::step_failure();
            if step.is_layout() {
                self.upload_layout_results(step, &results_dir);
            }
        }
        status
    }

    /// Pack and upload a failed layout run's result tree. The test
    /// status is already settled; this only affects triage links, so
    /// its own failures never change the step outcome.
    fn upload_layout_results(&self, step: &TestStep, results_dir: &Path) {
        annotate::build_step(&format!(
            "archive {}_layout_{}_tests results",
            step.component,
            step.checked.as_flag()
        ));

        let Some(parent) = results_dir.parent() else {
            return;
        };
        let archive_path = parent.join("layout_test_results.tar.gz");
        if let Err(e) = archive::tar_gz_dir(results_dir, &archive_path) {
            eprintln!("{e}");
            annotate::step_failure();
            return;
        }

        let config = self.uploader.config();
        let object_name = format!(
            "{}-{}-{}.tar.gz",
            step.component,
            step.checked.as_flag(),
            self.info.version
        );
        let parts = [
            config.layout_results_prefix.as_str(),
            self.info.name.as_str(),
            object_name.as_str(),
        ];
        let uploaded = self.uploader.upload(&archive_path, &config.gs_url(&parts));

        if let Err(e) = std::fs::remove_file(&archive_path) {
            tracing::warn!(path = %archive_path.display(), error = %e, "could not remove local archive");
        }

        match uploaded {
            Ok(()) => annotate::step_link("download", &config.http_url(&parts)),
            Err(e) => {
                eprintln!("{e}");
                annotate::step_failure();
            }
        }
    }

    /// Pack every product and push the per-module uploads, stopping at
    /// the first module that fails.
    fn archive_and_upload(&self) -> i32 {
        annotate::build_step("beacon_generate_archive");

        let archives = match archive::create_archives(&self.src_root, self.info.mode, &self.info) {
            Ok(archives) => archives,
            Err(e) => {
                eprintln!("{e}");
                annotate::step_failure();
                return 1;
            }
        };

        let mut status = 0;
        for product in &archives {
            status = self.upload_module(product);
            if status != 0 {
                break;
            }
        }
        if status != 0 {
            annotate::step_failure();
        }
        status
    }

    fn upload_module(&self, product: &ProductArchive) -> i32 {
        let module = product.module;
        annotate::build_step(&format!("{module}_upload_archive"));

        let bucket = self.info.bucket(module);
        let status = self.push_module_objects(module, &bucket, &product.path);

        annotate::build_step(&format!("{module}_upload_archive is over (status = {status})"));
        status
    }

    /// Versioned archive, latest pointer, and (for incremental
    /// builders) the continuous pointer, in that order. A failed
    /// versioned upload skips the pointer updates: latest must never
    /// point at an archive whose versioned sibling is missing.
    fn push_module_objects(&self, module: &str, bucket: &str, archive_path: &Path) -> i32 {
        let config = self.uploader.config();
        let Some(file_name) = archive_path.file_name().and_then(|n| n.to_str()) else {
            eprintln!("no file name in {}", archive_path.display());
            return 1;
        };

        let object = [bucket, file_name];
        match self.uploader.upload(archive_path, &config.gs_url(&object)) {
            Ok(()) => annotate::step_link("download", &config.http_url(&object)),
            Err(e) => {
                eprintln!("{e}");
                return 1;
            }
        }

        annotate::build_step(&format!("{module}_upload_latest"));
        if let Err(e) = self.uploader.promote_latest(bucket, archive_path) {
            eprintln!("{e}");
            println!("Upload failed");
            return 1;
        }

        if self.info.is_incremental() {
            let name = self.info.continuous_name(module);
            if let Err(e) = self.uploader.push_continuous(&name, archive_path) {
                eprintln!("{e}");
                return 1;
            }
        }

        0
    }
}

/// Print the run summary and return the combined exit status.
pub fn print_summary(outcomes: &[StepOutcome]) -> i32 {
    println!();

    let passed = outcomes.iter().filter(|o| o.status == 0).count();
    let failed = outcomes.len() - passed;
    let total_time: Duration = outcomes.iter().map(|o| o.duration).sum();

    if failed == 0 {
        println!(
            "{} All steps passed ({} total) in {:.1}s",
            "✓".green().bold(),
            outcomes.len(),
            total_time.as_secs_f32()
        );
        exit_codes::SUCCESS
    } else {
        eprintln!(
            "{} {} step(s) failed ({} passed)",
            "✗".red().bold(),
            failed,
            passed
        );
        for outcome in outcomes.iter().filter(|o| o.status != 0) {
            eprintln!(
                "  {} {} (status = {})",
                "Failed:".red().bold(),
                outcome.name,
                outcome.status
            );
        }
        combined_status(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, status: i32) -> StepOutcome {
        StepOutcome {
            name: name.to_string(),
            status,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_summary_exit_status() {
        assert_eq!(print_summary(&[]), 0);
        assert_eq!(print_summary(&[outcome("a", 0)]), 0);
        assert_eq!(print_summary(&[outcome("a", 0), outcome("b", 4)]), 4);
    }

    #[cfg(unix)]
    mod fake_world {
        use super::*;
        use beacon_core::config::UploadConfig;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn executable(path: &Path, contents: &str) {
            fs::write(path, contents).unwrap();
            let mut perms = fs::metadata(path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(path, perms).unwrap();
        }

        /// Bot world on disk: a source root with a harness script,
        /// built product directories under out/Release, and a logging
        /// gsutil stand-in.
        fn world(
            dir: &TempDir,
            harness_body: &str,
            gsutil_body: &str,
        ) -> (PathBuf, Uploader, PathBuf, PathBuf) {
            let src_root = dir.path().join("src");
            fs::create_dir_all(src_root.join("tools")).unwrap();

            let harness_log = dir.path().join("harness.log");
            executable(
                &src_root.join("tools").join("run_tests"),
                &format!(
                    "#!/bin/sh\necho \"$@\" >> {}\n{harness_body}\n",
                    harness_log.display()
                ),
            );

            let out = src_root.join("out").join("Release");
            for module in archive::PRODUCTS {
                fs::create_dir_all(out.join(module)).unwrap();
                fs::write(out.join(module).join("marker"), b"x").unwrap();
            }

            let gsutil_log = dir.path().join("gsutil.log");
            let gsutil = dir.path().join("gsutil");
            executable(
                &gsutil,
                &format!(
                    "#!/bin/sh\necho \"$@\" >> {}\n{gsutil_body}\n",
                    gsutil_log.display()
                ),
            );

            let config = UploadConfig {
                gsutil: gsutil.to_str().unwrap().to_string(),
                ..UploadConfig::default()
            };
            (src_root, Uploader::new(config), harness_log, gsutil_log)
        }

        fn logged(log: &Path) -> Vec<String> {
            fs::read_to_string(log)
                .unwrap_or_default()
                .lines()
                .map(String::from)
                .collect()
        }

        #[test]
        fn test_green_run_tests_then_archives() {
            let dir = TempDir::new().unwrap();
            let (src_root, uploader, harness_log, gsutil_log) = world(&dir, "exit 0", "exit 0");
            let info = BuildInfo::from_parts("beacon-lucid64-full", "77");
            let runner = BotRunner::new(info, HostOs::Linux, &src_root, uploader);

            let outcomes = runner.run();
            let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
            assert_eq!(
                names,
                vec![
                    "shell_layout_unchecked_tests",
                    "shell_layout_checked_tests",
                    "shell_core_unchecked_tests",
                    "shell_core_checked_tests",
                    "archive_and_upload",
                ]
            );
            assert_eq!(combined_status(&outcomes), 0);

            let harness = logged(&harness_log);
            assert_eq!(harness.len(), 4);
            assert!(harness[0].contains("--mode=Release"));
            assert!(harness[0].contains("--arch=x64"));
            assert!(harness[0].contains("--component=shell"));
            assert!(harness[0].contains("--unchecked"));
            assert!(harness[1].contains("--checked"));

            let calls = logged(&gsutil_log);
            assert!(calls.iter().any(|c| c.starts_with("cp ")
                && c.contains("beacon-lucid64-full/beacon-lucid64-full-77.0.tar.gz")));
            assert!(calls
                .iter()
                .any(|c| c.contains("latest/webdriver-lucid64-full-77.0.tar.gz")));
        }

        #[test]
        fn test_failing_suite_blocks_final_archive() {
            let dir = TempDir::new().unwrap();
            let (src_root, uploader, _harness_log, gsutil_log) = world(&dir, "exit 3", "exit 0");
            let info = BuildInfo::from_parts("beacon-lucid64-full", "77");
            let runner = BotRunner::new(info, HostOs::Linux, &src_root, uploader);

            let outcomes = runner.run();
            // Every gated test still ran; no archive step followed.
            assert_eq!(outcomes.len(), 4);
            assert!(outcomes.iter().all(|o| o.status == 3));
            assert_eq!(combined_status(&outcomes), 3);
            let calls = logged(&gsutil_log);
            assert!(calls.iter().all(|c| !c.starts_with("cp ")));
        }

        #[test]
        fn test_layout_failure_uploads_results() {
            let dir = TempDir::new().unwrap();
            let body = "mkdir -p out/Release/layout-test-results\n\
                        echo boom > out/Release/layout-test-results/results.html\n\
                        exit 1";
            let (src_root, uploader, _harness_log, gsutil_log) = world(&dir, body, "exit 0");
            let info = BuildInfo::from_parts("beacon-lucid64-full", "88");
            let outcomes = BotRunner::new(info, HostOs::Linux, &src_root, uploader).run();
            assert_ne!(combined_status(&outcomes), 0);

            let calls = logged(&gsutil_log);
            assert!(calls.iter().any(|c| c.starts_with("cp ")
                && c.contains("layout-test-results/beacon-lucid64-full/shell-unchecked-88.0.tar.gz")));
            assert!(calls.iter().any(|c| c.contains("shell-checked-88.0.tar.gz")));
            // Local archive cleaned up after upload.
            assert!(!src_root
                .join("out")
                .join("Release")
                .join("layout_test_results.tar.gz")
                .exists());
        }

        #[test]
        fn test_trunk_archives_before_tests() {
            let dir = TempDir::new().unwrap();
            let (src_root, uploader, harness_log, _gsutil_log) = world(&dir, "exit 0", "exit 0");
            let info = BuildInfo::from_parts("beacon-lucid64-trunk", "9");
            let outcomes = BotRunner::new(info, HostOs::Linux, &src_root, uploader).run();

            assert_eq!(outcomes[0].name, "archive_and_upload");
            assert_eq!(outcomes[0].status, 0);
            // Trunk never re-archives at the end.
            let archive_steps = outcomes
                .iter()
                .filter(|o| o.name == "archive_and_upload")
                .count();
            assert_eq!(archive_steps, 1);
            assert_eq!(outcomes.len(), 5);
            assert_eq!(logged(&harness_log).len(), 4);
        }

        #[test]
        fn test_debug_mac_gates_off_all_suites() {
            let dir = TempDir::new().unwrap();
            let (src_root, uploader, harness_log, _gsutil_log) = world(&dir, "exit 0", "exit 0");
            let out = src_root.join("out").join("Debug");
            for module in archive::PRODUCTS {
                fs::create_dir_all(out.join(module)).unwrap();
            }
            let info = BuildInfo::from_parts("beacon-mac-debug", "5");
            let outcomes = BotRunner::new(info, HostOs::Mac, &src_root, uploader).run();

            assert!(logged(&harness_log).is_empty());
            let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
            assert_eq!(names, vec!["archive_and_upload"]);
        }

        #[test]
        fn test_incremental_builder_pushes_continuous() {
            let dir = TempDir::new().unwrap();
            let (src_root, uploader, _harness_log, gsutil_log) = world(&dir, "exit 0", "exit 0");
            let info = BuildInfo::from_parts("beacon-lucid64-inc", "12");
            let outcomes = BotRunner::new(info, HostOs::Linux, &src_root, uploader).run();
            assert_eq!(combined_status(&outcomes), 0);

            let calls = logged(&gsutil_log);
            assert!(calls
                .iter()
                .any(|c| c.contains("continuous/beacon-lucid64.tar.gz")));
            assert!(calls
                .iter()
                .any(|c| c.contains("continuous/shell-lucid64.tar.gz")));
            assert!(calls
                .iter()
                .any(|c| c.contains("continuous/webdriver-lucid64.tar.gz")));
        }

        #[test]
        fn test_upload_failure_short_circuits_modules() {
            let dir = TempDir::new().unwrap();
            let gsutil_body = "if [ \"$1\" = cp ]; then exit 1; fi\nexit 0";
            let (src_root, uploader, _harness_log, gsutil_log) =
                world(&dir, "exit 0", gsutil_body);
            let info = BuildInfo::from_parts("beacon-lucid64-full", "4");
            let outcomes = BotRunner::new(info, HostOs::Linux, &src_root, uploader).run();

            let last = outcomes.last().unwrap();
            assert_eq!(last.name, "archive_and_upload");
            assert_ne!(last.status, 0);

            let calls = logged(&gsutil_log);
            let copies: Vec<&String> = calls.iter().filter(|c| c.starts_with("cp ")).collect();
            // First module's versioned upload failed; later modules
            // were never attempted.
            assert_eq!(copies.len(), 1);
            assert!(copies[0].contains("beacon-lucid64-full-4.0.tar.gz"));
        }
    }
}
