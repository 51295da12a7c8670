//! Engine Configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use wlan_common::WlanResult;
use wlan_recovery::WatchdogConfig;
use wlan_select::SelectionConfig;

/// Engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scoring and BSSID exclusion
    pub selection: SelectionConfig,
    /// Last-resort watchdog
    pub watchdog: WatchdogConfig,
}

impl EngineConfig {
    /// Load from a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> WlanResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> WlanResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate both sections
    pub fn validate(&self) -> WlanResult<()> {
        self.selection.validate()?;
        self.watchdog.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wlan_common::WlanError;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");

        let mut config = EngineConfig::default();
        config.watchdog.max_age = 4;
        config.selection.same_bssid_award = 30;
        config.save(&path).unwrap();

        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"watchdog": {"dhcp_threshold": 3}}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.watchdog.dhcp_threshold, 3);
        assert_eq!(config.watchdog.association_threshold, 7);
        assert_eq!(config.selection, SelectionConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = EngineConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(WlanError::Io(_))));

        let garbled = dir.path().join("garbled.json");
        std::fs::write(&garbled, "{ not json").unwrap();
        assert!(matches!(EngineConfig::load(&garbled), Err(WlanError::Json(_))));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{"watchdog": {"max_age": 0}}"#).unwrap();
        assert!(matches!(EngineConfig::load(&invalid), Err(WlanError::Config(_))));
    }
}
