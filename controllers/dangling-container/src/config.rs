//! Configuration file handling.
//!
//! The configuration is a small YAML document mounted into the pod. It is read
//! once at startup; there is no hot reload.
//!
//! ```yaml
//! timing:
//!   check_interval: 90
//!   stop_timeout: 30
//! whitelist:
//!   images:
//!     - pause-amd64
//! ```

use crate::error::ControllerError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Seconds between two reconciliation passes when the file does not say otherwise
pub const DEFAULT_CHECK_INTERVAL_SECS: u32 = 90;

/// Grace period handed to the runtime stop call when the file does not say otherwise
pub const DEFAULT_STOP_TIMEOUT_SECS: u32 = 30;

/// Checker configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timing: Timing,
    pub whitelist: Whitelist,
}

/// Timing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Seconds to sleep after a pass before starting the next one
    pub check_interval: u32,
    /// Seconds a container gets to exit before the runtime kills it
    pub stop_timeout: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL_SECS,
            stop_timeout: DEFAULT_STOP_TIMEOUT_SECS,
        }
    }
}

/// Images exempt from dangling container detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Whitelist {
    /// Image reference substrings
    pub images: Vec<String>,
}

impl Config {
    /// Read and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ControllerError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ControllerError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a configuration document.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, ControllerError> {
        let config: Config = if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(contents)?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ControllerError> {
        if self.timing.check_interval == 0 {
            return Err(ControllerError::InvalidConfig(
                "timing.check_interval must be at least 1 second".to_string(),
            ));
        }
        if self.whitelist.images.iter().any(String::is_empty) {
            return Err(ControllerError::InvalidConfig(
                "whitelist.images must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Sleep between passes
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.timing.check_interval))
    }

    /// Grace period for stopping a dangling container
    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timing.stop_timeout))
    }

    /// Whether `image` contains any whitelisted substring.
    #[must_use]
    pub fn is_whitelisted(&self, image: &str) -> bool {
        self.whitelist
            .images
            .iter()
            .any(|rule| image.contains(rule.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.timing.check_interval, 90);
        assert_eq!(config.timing.stop_timeout, 30);
        assert!(config.whitelist.images.is_empty());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = Config::from_yaml("timing:\n  check_interval: 300\n").unwrap();
        assert_eq!(config.check_interval(), Duration::from_secs(300));
        assert_eq!(config.stop_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_full_document() {
        let yaml = r"
timing:
  check_interval: 60
  stop_timeout: 10
whitelist:
  images:
    - pause-amd64
    - kube-proxy
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.timing.check_interval, 60);
        assert_eq!(config.timing.stop_timeout, 10);
        assert_eq!(config.whitelist.images, vec!["pause-amd64", "kube-proxy"]);
    }

    #[test]
    fn test_zero_check_interval_is_rejected() {
        let result = Config::from_yaml("timing:\n  check_interval: 0\n");
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_whitelist_entry_is_rejected() {
        let result = Config::from_yaml("whitelist:\n  images:\n    - \"\"\n");
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let result = Config::from_yaml("timing: [not, a, map]");
        assert!(matches!(result, Err(ControllerError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Config::load(Path::new("/nonexistent/dangling/config.yaml"));
        assert!(matches!(result, Err(ControllerError::ConfigRead { .. })));
    }

    #[test]
    fn test_is_whitelisted_matches_substrings() {
        let mut config = Config::default();
        config.whitelist.images = vec!["pause-amd64".to_string()];

        assert!(config.is_whitelisted("gcr.io/google_containers/pause-amd64:3.0"));
        assert!(!config.is_whitelisted("nginx:latest"));
        assert!(!Config::default().is_whitelisted("anything"));
    }
}
