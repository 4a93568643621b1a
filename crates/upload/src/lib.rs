//! Archive uploads to the Beacon storage buckets.
//!
//! Wraps the `gsutil` tool for the operations the pipeline needs:
//! - Copying archives up and applying the configured ACL
//! - Maintaining the `latest` pointer set (upload new, delete superseded)
//! - The unversioned `continuous` pointer for incremental builders
//!
//! Listings and deletions are best effort: a storage hiccup while
//! cleaning up old objects must never fail a build that already
//! uploaded its archive.

#![warn(missing_docs)]

mod uploader;

pub use beacon_core::config::UploadConfig;
pub use uploader::Uploader;
