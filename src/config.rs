use serde::{Deserialize, Serialize};

use crate::error::{MSG_SERVER_FALLBACK, PanelError};

/// Endpoint and message settings for the upload panel
///
/// Every field has a default, so an empty JSON object (or no configuration
/// at all) yields the paths the server exposes out of the box.
///
/// # Examples
/// ```
/// use deck_upload::config::PanelConfig;
///
/// let cfg = PanelConfig::from_json(r#"{"upload_url": "/api/upload/"}"#).unwrap();
/// assert_eq!(cfg.upload_url, "/api/upload/");
/// assert_eq!(cfg.download_prefix, "/download/");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Target of the multipart POST
    pub upload_url: String,

    /// Download links are `{download_prefix}{encoded name}/`
    pub download_prefix: String,

    /// Shown when the server reports a failure without an `error` field
    pub fallback_error: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            upload_url: "/upload/".to_string(),
            download_prefix: "/download/".to_string(),
            fallback_error: MSG_SERVER_FALLBACK.to_string(),
        }
    }
}

impl PanelConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(text: &str) -> Result<Self, PanelError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Download URL for one generated file
    pub fn download_url(&self, filename: &str) -> String {
        let prefix = if self.download_prefix.ends_with('/') {
            self.download_prefix.clone()
        } else {
            format!("{}/", self.download_prefix)
        };
        format!("{}{}/", prefix, urlencoding::encode(filename))
    }
}
