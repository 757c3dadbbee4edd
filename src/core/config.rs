//! Configuration for the idle reaper

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::exclusions::default_baseline;

/// Application directory name under the user's config dir
const APP_NAME: &str = "idle-reaper";

/// Errors raised while building the startup configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    Io { path: PathBuf, source: std::io::Error },
    /// Config file is not valid TOML for [`ReaperConfig`]
    Parse(String),
    /// Config could not be serialized
    Serialize(String),
    /// Idle threshold is not a non-negative integer
    InvalidThreshold(String),
    /// Any other out-of-range setting
    InvalidValue(String),
    /// The startup form could not talk to the console
    Console(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Config file {}: {}", path.display(), source)
            }
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Cannot serialize config: {}", msg),
            ConfigError::InvalidThreshold(raw) => {
                write!(f, "Idle time limit must be a whole number of seconds, got '{}'", raw)
            }
            ConfigError::InvalidValue(msg) => write!(f, "Invalid setting: {}", msg),
            ConfigError::Console(e) => write!(f, "Console I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Console(e) => Some(e),
            _ => None,
        }
    }
}

/// Main reaper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaperConfig {
    /// Seconds between two window inspections
    pub check_interval_secs: u64,

    /// Idle time limit pre-filled in the startup form (seconds)
    pub idle_threshold_secs: u64,

    /// Process names that are always excluded, before the form adds more
    pub baseline_exclusions: Vec<String>,

    /// Log kill decisions without terminating anything
    pub dry_run: bool,

    /// Clear the console before printing each tick
    pub clear_screen: bool,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 10,
            idle_threshold_secs: 600,
            baseline_exclusions: default_baseline(),
            dry_run: false,
            clear_screen: true,
        }
    }
}

impl ReaperConfig {
    /// Load config from TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// `<config_dir>/idle-reaper/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Load `explicit` if given (it must exist), else the default path if a
    /// file is there, else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "check_interval_secs must be at least 1".into(),
            ));
        }
        if self.check_interval_secs > i64::MAX as u64 {
            return Err(ConfigError::InvalidValue(
                "check_interval_secs is out of range".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReaperConfig::default();
        assert_eq!(config.check_interval_secs, 10);
        assert_eq!(config.idle_threshold_secs, 600);
        assert!(config.baseline_exclusions.iter().any(|n| n == "explorer.exe"));
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ReaperConfig = toml::from_str(
            r#"
            idle_threshold_secs = 120
            baseline_exclusions = ["dwm.exe"]
            "#,
        )
        .unwrap();

        assert_eq!(config.idle_threshold_secs, 120);
        assert_eq!(config.baseline_exclusions, vec!["dwm.exe".to_string()]);
        assert_eq!(config.check_interval_secs, 10);
        assert!(config.clear_screen);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = ReaperConfig {
            check_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("idle-reaper-test-{}.toml", std::process::id()));
        let config = ReaperConfig {
            idle_threshold_secs: 42,
            dry_run: true,
            ..Default::default()
        };

        config.save(&path).unwrap();
        let loaded = ReaperConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = Path::new("/definitely/not/here/idle-reaper.toml");
        let err = ReaperConfig::load_or_default(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = toml::from_str::<ReaperConfig>("check_interval_secs = \"ten\"")
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }
}
