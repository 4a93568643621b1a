//! Small filesystem helpers shared by the build tools

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::time::SystemTime;

/// Create `path` if it does not exist and bump its modification time.
///
/// Completion markers for build systems are plain empty files whose
/// mtime is the interesting part.
pub fn touch(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(format!("failed to touch {}: {e}", path.display())))?;

    file.set_modified(SystemTime::now())
        .map_err(|e| Error::io(format!("failed to touch {}: {e}", path.display())))?;
    Ok(())
}

/// Remove a build output directory and everything under it.
///
/// A directory that is already gone is not an error.
pub fn clobber_dir(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed output directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(format!(
            "failed to remove {}: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("install.stamp");
        assert!(!path.exists());
        touch(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_touch_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("install.stamp");
        std::fs::write(&path, "contents").unwrap();
        touch(&path).unwrap();
        // Touch must not truncate.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "contents");
    }

    #[test]
    fn test_clobber_dir_removes_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(out.join("Release/obj")).unwrap();
        std::fs::write(out.join("Release/obj/a.o"), "o").unwrap();
        clobber_dir(&out).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_clobber_dir_missing_is_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(clobber_dir(&dir.path().join("never-created")).is_ok());
    }
}
