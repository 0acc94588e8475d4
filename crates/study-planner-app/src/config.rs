use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use study_planner_store::validate_key;

const APP_DIR: &str = "study-planner";
const CONFIG_FILE: &str = "config.toml";

/// Slot key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "study_planner_v1";
/// Undo window used when none is configured.
pub const DEFAULT_UNDO_WINDOW_MS: u64 = 5000;
/// Longest accepted undo window (one hour).
pub const MAX_UNDO_WINDOW_MS: u64 = 60 * 60 * 1000;

/// Top-level planner configuration loaded from `config.toml` in the data directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Where tasks are persisted.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Undo-after-delete behavior.
    #[serde(default)]
    pub undo: UndoConfig,
    /// First-run sample data.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl PlannerConfig {
    /// Platform data directory for the planner, e.g. `~/.local/share/study-planner`.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR))
    }

    /// Load `config.toml` from `data_dir`; a missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.undo.validate()
    }

    /// Slot key holding the task list.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage.key
    }

    /// How long a deleted task stays restorable.
    #[must_use]
    pub const fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo.window_ms)
    }

    /// Whether a missing slot is populated with sample tasks.
    #[must_use]
    pub const fn seed_enabled(&self) -> bool {
        self.seed.enabled
    }
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Slot key; must be a plain file-name-safe token.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { key: default_key() }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            bail!("storage key must not be empty");
        }
        validate_key(&self.key).with_context(|| format!("storage key '{}' is not usable", self.key))?;
        Ok(())
    }
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_owned()
}

/// `[undo]` block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UndoConfig {
    /// Milliseconds a deleted task stays restorable.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_UNDO_WINDOW_MS,
        }
    }
}

impl UndoConfig {
    fn validate(&self) -> Result<()> {
        if self.window_ms == 0 {
            bail!("undo window_ms must be greater than zero");
        }
        if self.window_ms > MAX_UNDO_WINDOW_MS {
            bail!("undo window_ms must be at most {MAX_UNDO_WINDOW_MS}");
        }
        Ok(())
    }
}

const fn default_window_ms() -> u64 {
    DEFAULT_UNDO_WINDOW_MS
}

/// `[seed]` block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Seed a missing slot with sample tasks.
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

const fn default_seed_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &Path, body: &str) -> Result<()> {
        let mut file = fs::File::create(dir.join(CONFIG_FILE))?;
        writeln!(file, "{body}")?;
        Ok(())
    }

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = PlannerConfig::load(dir.path())?;
        assert_eq!(cfg.storage_key(), "study_planner_v1");
        assert_eq!(cfg.undo_window(), Duration::from_millis(5000));
        assert!(cfg.seed_enabled());
        Ok(())
    }

    #[test]
    fn partial_config_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[undo]\nwindow_ms = 1500\n\n[seed]\nenabled = false")?;

        let cfg = PlannerConfig::load(dir.path())?;
        assert_eq!(cfg.storage_key(), DEFAULT_STORAGE_KEY);
        assert_eq!(cfg.undo_window(), Duration::from_millis(1500));
        assert!(!cfg.seed_enabled());
        Ok(())
    }

    #[test]
    fn zero_undo_window_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[undo]\nwindow_ms = 0")?;

        let Err(err) = PlannerConfig::load(dir.path()) else {
            panic!("zero undo window should error");
        };
        assert!(format!("{err:#}").contains("undo window_ms must be greater than zero"));
        Ok(())
    }

    #[test]
    fn oversized_undo_window_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[undo]\nwindow_ms = 9223372036854775807")?;

        let Err(err) = PlannerConfig::load(dir.path()) else {
            panic!("oversized undo window should error");
        };
        assert!(format!("{err:#}").contains("undo window_ms must be at most 3600000"));

        write_config(dir.path(), "[undo]\nwindow_ms = 3600000")?;
        assert_eq!(PlannerConfig::load(dir.path())?.undo_window(), Duration::from_secs(3600));
        Ok(())
    }

    #[test]
    fn unsafe_storage_key_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[storage]\nkey = \"../elsewhere\"")?;

        let Err(err) = PlannerConfig::load(dir.path()) else {
            panic!("path-like key should error");
        };
        assert!(format!("{err:#}").contains("storage key '../elsewhere'"));
        Ok(())
    }

    #[test]
    fn unknown_fields_fail_to_parse() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[undo]\nwindow = 10")?;

        let Err(err) = PlannerConfig::load(dir.path()) else {
            panic!("typo should error");
        };
        assert!(err.to_string().contains("failed to parse"));
        Ok(())
    }
}
