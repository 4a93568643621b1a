//! gsutil invocations

use beacon_core::config::UploadConfig;
use beacon_core::process::CommandSpec;
use beacon_core::{Error, Result};
use std::path::Path;

/// Executes storage operations against the configured bucket layout.
#[derive(Debug, Clone)]
pub struct Uploader {
    config: UploadConfig,
}

impl Uploader {
    /// Uploader for a bucket configuration.
    #[must_use]
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// The bucket configuration in use.
    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    fn gsutil(&self) -> CommandSpec {
        CommandSpec::new(&self.config.gsutil)
    }

    /// Copy a local file to a storage object and apply the configured ACL.
    ///
    /// Both the copy and the ACL change must succeed; either failing is an
    /// upload error carrying the tool's stderr.
    pub fn upload(&self, source: &Path, target: &str) -> Result<()> {
        let copy = self
            .gsutil()
            .arg("cp")
            .arg(source.display().to_string())
            .arg(target);
        let result = copy.run()?;
        if !result.success {
            return Err(Error::upload(format!(
                "gsutil cp to {target} failed with exit code {}",
                result.exit_code
            ))
            .with_context(result.stderr.trim().to_string()));
        }
        tracing::debug!(object = target, "uploaded");

        if let Some(acl) = self.config.acl.as_deref().filter(|a| !a.is_empty()) {
            let result = self.gsutil().arg("setacl").arg(acl).arg(target).run()?;
            if !result.success {
                return Err(Error::upload(format!(
                    "gsutil setacl {acl} on {target} failed with exit code {}",
                    result.exit_code
                ))
                .with_context(result.stderr.trim().to_string()));
            }
        }

        Ok(())
    }

    /// Objects matching a storage pattern.
    ///
    /// Any failure, from a missing gsutil to a non-zero exit, yields an
    /// empty listing. Callers only use listings to find cleanup
    /// candidates, so "nothing to clean" is always safe.
    #[must_use]
    pub fn list(&self, pattern: &str) -> Vec<String> {
        let result = match self.gsutil().arg("ls").arg(pattern).run() {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "listing failed, treating as empty");
                return Vec::new();
            }
        };
        if !result.success {
            tracing::warn!(pattern, exit_code = result.exit_code, "listing failed, treating as empty");
            return Vec::new();
        }

        result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    /// Delete storage objects, best effort.
    ///
    /// Only names carrying the storage scheme prefix are touched.
    /// Failures are logged and swallowed; a leftover old object costs
    /// storage, not correctness.
    pub fn remove(&self, objects: &[String]) {
        for object in objects {
            let object = object.trim();
            if !object.starts_with(&self.config.site) {
                continue;
            }
            match self.gsutil().arg("rm").arg(object).run() {
                Ok(result) if result.success => {
                    tracing::debug!(object, "removed");
                }
                Ok(result) => {
                    tracing::warn!(object, exit_code = result.exit_code, "failed to remove");
                }
                Err(e) => {
                    tracing::warn!(object, error = %e, "failed to remove");
                }
            }
        }
    }

    /// Point `latest` at a new archive for a bucket.
    ///
    /// Lists the bucket's current latest objects, uploads the new one,
    /// then deletes every listed object that is not the new target.
    /// When the listing failed the upload still happens and nothing is
    /// deleted. Returns the target object name.
    pub fn promote_latest(&self, bucket: &str, source: &Path) -> Result<String> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::upload(format!("no file name in {}", source.display())))?;

        let old_pattern = self
            .config
            .gs_url(&[&self.config.latest_prefix, &format!("{bucket}-*")]);
        let old_objects = self.list(&old_pattern);

        let target = self.config.gs_url(&[&self.config.latest_prefix, &file_name]);
        self.upload(source, &target)?;

        let superseded: Vec<String> = old_objects
            .into_iter()
            .filter(|object| object != &target)
            .collect();
        self.remove(&superseded);

        Ok(target)
    }

    /// Overwrite the unversioned continuous object for a builder.
    ///
    /// Incremental builders publish under a fixed name so consumers can
    /// fetch "the newest build" without knowing version numbers. Returns
    /// the target object name.
    pub fn push_continuous(&self, name: &str, source: &Path) -> Result<String> {
        let target = self.config.gs_url(&[
            &self.config.continuous_prefix,
            &format!("{name}.tar.gz"),
        ]);
        self.upload(source, &target)?;
        Ok(target)
    }
}
