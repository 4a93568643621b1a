//! Staleness decisions and atomic record writes

use crate::record::{hash_file, Fingerprint, StampRecord};
use beacon_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Decides whether a side-effecting step needs to re-run.
///
/// A checker is a pure description: the record location, the declared
/// inputs in order, and the exact command the step will run. Construction
/// does no I/O.
#[derive(Debug, Clone)]
pub struct StampChecker {
    record_path: PathBuf,
    inputs: Vec<PathBuf>,
    command: Vec<String>,
}

impl StampChecker {
    /// Describe a step: its record file, ordered inputs, and command.
    pub fn new(
        record_path: impl Into<PathBuf>,
        inputs: Vec<PathBuf>,
        command: Vec<String>,
    ) -> Self {
        Self {
            record_path: record_path.into(),
            inputs,
            command,
        }
    }

    /// Where this checker's record lives.
    #[must_use]
    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    /// Whether the step needs to run.
    ///
    /// Fresh means: a record exists, parses, and matches both the current
    /// fingerprint sequence of every input and the command, bit for bit.
    /// Everything else is stale, including any I/O trouble along the way;
    /// this method has no side effects and never fails.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        let fresh = match self.fingerprint_inputs() {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::debug!(error = %e, "input not fingerprintable, treating as stale");
                return true;
            }
        };

        let Some(record) = StampRecord::load(&self.record_path) else {
            tracing::debug!(record = %self.record_path.display(), "no usable record, stale");
            return true;
        };

        if record.inputs != fresh {
            tracing::debug!(record = %self.record_path.display(), "input fingerprints changed");
            return true;
        }
        if record.command != self.command {
            tracing::debug!(record = %self.record_path.display(), "command changed");
            return true;
        }
        false
    }

    /// Persist a fresh record for this step.
    ///
    /// Fingerprints are recomputed at write time so the record describes
    /// exactly what the step consumed. The record is written to a
    /// temporary file in the same directory and renamed into place; a
    /// partially written record is never observable.
    pub fn write(&self) -> Result<()> {
        let record = StampRecord {
            inputs: self.fingerprint_inputs()?,
            command: self.command.clone(),
            written_at: chrono::Utc::now().to_rfc3339(),
        };

        let dir = self.record_path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            Error::stamp(format!(
                "failed to create temporary record in {}: {e}",
                dir.display()
            ))
        })?;

        serde_json::to_writer_pretty(&mut tmp, &record)
            .map_err(|e| Error::stamp(format!("failed to serialize record: {e}")))?;

        tmp.persist(&self.record_path).map_err(|e| {
            Error::stamp(format!(
                "failed to persist record {}: {e}",
                self.record_path.display()
            ))
        })?;

        tracing::debug!(record = %self.record_path.display(), "record written");
        Ok(())
    }

    fn fingerprint_inputs(&self) -> Result<Vec<Fingerprint>> {
        self.inputs
            .iter()
            .map(|path| {
                Ok(Fingerprint {
                    path: path.display().to_string(),
                    sha256: hash_file(path)?,
                })
            })
            .collect()
    }
}

/// Record path for an (artifact, destination) pair.
///
/// The record sits next to the artifact as
/// `<artifact file name>.<destination>.stamp`. Distinct destinations get
/// distinct records, so installing to one device never masks staleness
/// for another.
#[must_use]
pub fn record_path_for(artifact: &Path, destination: &str) -> PathBuf {
    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    artifact.with_file_name(format!("{file_name}.{destination}.stamp"))
}
