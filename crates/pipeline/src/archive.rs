//! Product archive creation
//!
//! After a green build the bot packs each product directory under the
//! build output into a versioned `.tar.gz` next to it, ready for
//! upload.

use beacon_core::{Error, ErrorCode, Result};
use beacon_dispatch::{out_dir, BuildMode};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::buildinfo::BuildInfo;

/// Product directories that get archived, in upload order.
pub const PRODUCTS: &[&str] = &["beacon", "shell", "webdriver"];

/// A packed product, ready for upload.
#[derive(Debug, Clone)]
pub struct ProductArchive {
    /// Product module the archive holds
    pub module: &'static str,
    /// Local path of the `.tar.gz`
    pub path: PathBuf,
}

/// Pack a directory into a gzipped tarball at `dest`. Entries are
/// rooted at the directory's own name, so unpacking recreates the
/// directory rather than spilling its contents.
pub fn tar_gz_dir(dir: &Path, dest: &Path) -> Result<()> {
    let base = dir.file_name().ok_or_else(|| {
        Error::new(
            ErrorCode::InvalidPath,
            format!("Cannot archive '{}': no directory name", dir.display()),
        )
    })?;

    let file = File::create(dest)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(base, dir)?;
    let encoder = builder.into_inner()?;
    encoder.finish()?;

    tracing::debug!(dir = %dir.display(), dest = %dest.display(), "packed archive");
    Ok(())
}

/// Pack every product directory under the build output into versioned
/// tarballs. Fails on the first product whose directory is missing,
/// which means the build did not produce it.
pub fn create_archives(
    src_root: &Path,
    mode: BuildMode,
    info: &BuildInfo,
) -> Result<Vec<ProductArchive>> {
    let out = out_dir(src_root, mode);
    let mut archives = Vec::with_capacity(PRODUCTS.len());

    for &module in PRODUCTS {
        let dir = out.join(module);
        if !dir.is_dir() {
            return Err(Error::file_not_found(&dir)
                .with_context(format!("Product '{}' was not built", module)));
        }
        let dest = out.join(format!("{}.tar.gz", info.archive_name(module)));
        tar_gz_dir(&dir, &dest)?;
        archives.push(ProductArchive { module, path: dest });
    }

    Ok(archives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tar_gz_dir_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("beacon");
        fs::create_dir_all(src.join("bin")).unwrap();
        fs::write(src.join("bin").join("vm"), b"binary bits").unwrap();
        fs::write(src.join("VERSION"), b"1.0").unwrap();

        let dest = tmp.path().join("beacon.tar.gz");
        tar_gz_dir(&src, &dest).unwrap();
        assert!(dest.is_file());

        let unpack = tmp.path().join("unpacked");
        fs::create_dir_all(&unpack).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(File::open(&dest).unwrap()));
        archive.unpack(&unpack).unwrap();

        // Entries are rooted at the directory name.
        assert_eq!(
            fs::read(unpack.join("beacon").join("bin").join("vm")).unwrap(),
            b"binary bits"
        );
        assert_eq!(fs::read(unpack.join("beacon").join("VERSION")).unwrap(), b"1.0");
    }

    #[test]
    fn test_tar_gz_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let result = tar_gz_dir(&tmp.path().join("absent"), &tmp.path().join("a.tar.gz"));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_archives_names_and_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out").join("Release");
        for module in PRODUCTS {
            fs::create_dir_all(out.join(module)).unwrap();
            fs::write(out.join(module).join("marker"), module.as_bytes()).unwrap();
        }

        let info = BuildInfo::from_parts("beacon-mac-full", "123");
        let archives = create_archives(tmp.path(), BuildMode::Release, &info).unwrap();

        let names: Vec<String> = archives
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "beacon-mac-full-123.0.tar.gz",
                "shell-mac-full-123.0.tar.gz",
                "webdriver-mac-full-123.0.tar.gz",
            ]
        );
        for archive in &archives {
            assert!(archive.path.is_file());
        }
    }

    #[test]
    fn test_create_archives_missing_product_fails() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out").join("Debug");
        fs::create_dir_all(out.join("beacon")).unwrap();
        fs::create_dir_all(out.join("shell")).unwrap();
        // webdriver missing

        let info = BuildInfo::from_parts("beacon-lucid64-debug", "5");
        let err = create_archives(tmp.path(), BuildMode::Debug, &info).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.to_string().contains("webdriver"));
    }
}
