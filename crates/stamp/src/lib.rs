//! Content staleness records for side-effecting build steps.
//!
//! Steps like installing a package onto a device or uploading an archive
//! are expensive and not idempotent enough to re-run blindly. This crate
//! decides whether such a step needs to run at all by fingerprinting the
//! step's declared inputs and remembering the exact command that consumed
//! them:
//! - [`StampChecker::is_stale`] compares the current state of the world
//!   against the last persisted record, without side effects
//! - [`StampChecker::write`] persists a new record atomically after the
//!   step succeeded
//! - [`record_path_for`] namespaces records per destination, so the same
//!   artifact installed onto two devices is tracked independently
//!
//! Staleness is keyed on the full command, not just the input bytes:
//! changing how an artifact is produced or consumed (different flags,
//! different tool) forces re-execution even when the bytes are unchanged.

#![warn(missing_docs)]

mod checker;
mod record;

pub use checker::{record_path_for, StampChecker};
pub use record::{hash_file, Fingerprint, StampRecord};
