//! Configuration schema definitions
//!
//! Every value the pipeline used to hard-code lives here instead, with
//! the original constants kept as per-field defaults.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Archive upload settings
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Archive upload configuration
///
/// Bucket layout, tool path and access control for the archive store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Path to the gsutil binary
    #[serde(default = "default_gsutil")]
    pub gsutil: String,

    /// Storage scheme prefix for object names
    #[serde(default = "default_site")]
    pub site: String,

    /// HTTPS base for browsable download links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Root prefix all objects live under
    #[serde(default = "default_root")]
    pub root: String,

    /// Canned ACL applied to every uploaded object (empty disables)
    #[serde(default = "default_acl")]
    pub acl: Option<String>,

    /// Sub-prefix for the "latest" pointer set
    #[serde(default = "default_latest_prefix")]
    pub latest_prefix: String,

    /// Sub-prefix for unversioned continuous builds
    #[serde(default = "default_continuous_prefix")]
    pub continuous_prefix: String,

    /// Sub-prefix for archived layout test results
    #[serde(default = "default_layout_results_prefix")]
    pub layout_results_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            gsutil: default_gsutil(),
            site: default_site(),
            base_url: default_base_url(),
            root: default_root(),
            acl: default_acl(),
            latest_prefix: default_latest_prefix(),
            continuous_prefix: default_continuous_prefix(),
            layout_results_prefix: default_layout_results_prefix(),
        }
    }
}

impl UploadConfig {
    /// Object path under the root prefix: `<root>/<parts...>`
    #[must_use]
    pub fn object_path(&self, parts: &[&str]) -> String {
        let mut segments = Vec::with_capacity(1 + parts.len());
        segments.push(self.root.as_str());
        segments.extend_from_slice(parts);
        segments.join("/")
    }

    /// Full storage URL for an object: `gs://<root>/<parts...>`
    #[must_use]
    pub fn gs_url(&self, parts: &[&str]) -> String {
        format!("{}{}", self.site, self.object_path(parts))
    }

    /// Browsable HTTPS URL for an object
    #[must_use]
    pub fn http_url(&self, parts: &[&str]) -> String {
        format!("{}{}", self.base_url, self.object_path(parts))
    }
}

fn default_gsutil() -> String {
    if cfg!(windows) {
        "e:/b/build/scripts/slave/gsutil.bat".to_string()
    } else {
        "/b/build/scripts/slave/gsutil".to_string()
    }
}

fn default_site() -> String {
    "gs://".to_string()
}

fn default_base_url() -> String {
    "https://storage.googleapis.com/".to_string()
}

fn default_root() -> String {
    "beacon-archive".to_string()
}

fn default_acl() -> Option<String> {
    Some("public-read".to_string())
}

fn default_latest_prefix() -> String {
    "latest".to_string()
}

fn default_continuous_prefix() -> String {
    "continuous".to_string()
}

fn default_layout_results_prefix() -> String {
    "layout-test-results".to_string()
}
