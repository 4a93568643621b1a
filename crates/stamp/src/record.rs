//! The persisted record format and input fingerprinting

use beacon_core::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Content fingerprint of a single input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Path the fingerprint was taken from
    pub path: String,
    /// SHA-256 of the file contents, hex encoded
    pub sha256: String,
}

/// A persisted staleness record: the fingerprint sequence of every input
/// plus the exact command that consumed them.
///
/// Input order is significant. `written_at` is informational only and
/// never participates in staleness decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampRecord {
    /// Ordered fingerprints, one per declared input
    pub inputs: Vec<Fingerprint>,
    /// The command this record certifies, as the full argument vector
    pub command: Vec<String>,
    /// When the record was written (RFC 3339)
    #[serde(default)]
    pub written_at: String,
}

impl StampRecord {
    /// Read a record from disk.
    ///
    /// Anything short of a well-formed record is `None`: a missing file,
    /// unreadable bytes, or unparseable JSON. Callers treat `None` as
    /// stale, so a damaged record costs one re-run, never a failure.
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), error = %e, "record unreadable");
                }
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "record unparseable");
                None
            }
        }
    }
}

/// SHA-256 of a file's contents, hex encoded.
///
/// Streams the file through the hasher, so large artifacts are fine.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path)
        } else {
            Error::io(format!("failed to open {}: {e}", path.display()))
        }
    })?;

    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .map_err(|e| Error::io(format!("failed to read {}: {e}", path.display())))?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_file_known_value() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("input");
        std::fs::write(&path, b"hello").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_hash_file_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_file_missing() {
        assert!(hash_file(Path::new("/no/such/input")).is_err());
    }

    #[test]
    fn test_load_missing_record() {
        assert!(StampRecord::load(Path::new("/no/such/record.stamp")).is_none());
    }

    #[test]
    fn test_load_garbage_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.stamp");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(StampRecord::load(&path).is_none());
    }

    #[test]
    fn test_load_tolerates_missing_written_at() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("old.stamp");
        std::fs::write(&path, r#"{"inputs": [], "command": ["true"]}"#).unwrap();
        let record = StampRecord::load(&path).unwrap();
        assert_eq!(record.command, vec!["true"]);
        assert!(record.written_at.is_empty());
    }
}
