//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the controller and
//! the preference store. Binaries read the environment; nothing in this crate does.

use crate::constants::{DEFAULT_API_URL, DEFAULT_PREFERENCES_PATH};
use carelytics_api::Url;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API URL {value:?}: {reason}")]
    InvalidApiUrl { value: String, reason: String },
    #[error("API URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_base_url: Url,
    preferences_path: PathBuf,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    pub fn new(api_base_url: Url, preferences_path: PathBuf) -> Self {
        Self {
            api_base_url,
            preferences_path,
        }
    }

    /// Resolve a configuration from optional raw values (flag or environment).
    ///
    /// Blank values count as unset and fall back to the defaults.
    pub fn from_values(
        api_url: Option<String>,
        preferences_path: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            api_url_from_value(api_url)?,
            preferences_path_from_value(preferences_path),
        ))
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn preferences_path(&self) -> &Path {
        &self.preferences_path
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the patient server base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_API_URL`].
pub fn api_url_from_value(value: Option<String>) -> Result<Url, ConfigError> {
    let raw = non_blank(value).unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidApiUrl {
        value: raw.clone(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Resolve the preference file path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PREFERENCES_PATH`].
pub fn preferences_path_from_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_defaults_when_unset_or_blank() {
        let unset = api_url_from_value(None).unwrap();
        let blank = api_url_from_value(Some("   ".into())).unwrap();
        assert_eq!(unset.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(blank, unset);
    }

    #[test]
    fn test_api_url_accepts_https_with_path() {
        let url = api_url_from_value(Some(" https://ward.example/api ".into())).unwrap();
        assert_eq!(url.as_str(), "https://ward.example/api");
    }

    #[test]
    fn test_api_url_rejects_relative_value() {
        let err = api_url_from_value(Some("/view".into())).expect_err("relative URL");
        assert!(matches!(err, ConfigError::InvalidApiUrl { value, .. } if value == "/view"));
    }

    #[test]
    fn test_api_url_rejects_non_http_scheme() {
        let err = api_url_from_value(Some("ftp://ward.example".into())).expect_err("ftp");
        assert!(matches!(err, ConfigError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn test_preferences_path_defaults_when_blank() {
        assert_eq!(
            preferences_path_from_value(Some("".into())),
            PathBuf::from(DEFAULT_PREFERENCES_PATH)
        );
        assert_eq!(
            preferences_path_from_value(Some("/tmp/prefs.json".into())),
            PathBuf::from("/tmp/prefs.json")
        );
    }
}
