//! Engine configuration loading
//!
//! Resolution priority order:
//! 1. Explicit path passed by the host application (highest priority)
//! 2. `VDJ_CONFIG` environment variable
//! 3. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Tunable session engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds a removed track stays restorable
    pub undo_window_secs: u64,
    /// Delay before a transition-suggested effect fires, in milliseconds,
    /// so it does not collide with the transition moment
    pub effect_delay_ms: u64,
    /// Fetch a suggestion every second successful skip
    pub auto_suggest: bool,
    /// Master enable for sound effects
    pub sound_effects: bool,
    /// Sound effect playback volume, clamped to [0.0, 1.0]
    pub effect_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            undo_window_secs: 5,
            effect_delay_ms: 500,
            auto_suggest: true,
            sound_effects: true,
            effect_volume: 1.0,
        }
    }
}

impl EngineConfig {
    /// Load configuration following the priority order above.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var("VDJ_CONFIG") {
            debug!("Using config path from VDJ_CONFIG: {}", path);
            return Self::from_file(&PathBuf::from(path));
        }

        debug!("No config source given, using compiled defaults");
        Ok(Self::default())
    }

    /// Parse configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.validate()
    }

    /// Clamp/validate loaded values.
    fn validate(mut self) -> Result<Self> {
        if self.undo_window_secs == 0 {
            return Err(Error::Config(
                "undo_window_secs must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.effect_volume) {
            warn!(
                "effect_volume {} out of range, clamping to [0, 1]",
                self.effect_volume
            );
            self.effect_volume = self.effect_volume.clamp(0.0, 1.0);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.undo_window_secs, 5);
        assert_eq!(config.effect_delay_ms, 500);
        assert!(config.auto_suggest);
        assert!(config.sound_effects);
        assert_eq!(config.effect_volume, 1.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "undo_window_secs = 8\neffect_volume = 1.5").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.undo_window_secs, 8);
        // Out-of-range volume is clamped, not rejected
        assert_eq!(config.effect_volume, 1.0);
        // Unspecified fields keep defaults
        assert_eq!(config.effect_delay_ms, 500);
    }

    #[test]
    fn test_zero_undo_window_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "undo_window_secs = 0").unwrap();
        assert!(EngineConfig::from_file(file.path()).is_err());
    }
}
