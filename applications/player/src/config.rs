//! Player configuration

use crate::error::{PlayerError, Result};
use cadence_client::{ResolverConfig, DEFAULT_BASE_URL, DEFAULT_ENGINE, SEARCH_ENGINES};
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub resolver: ResolverSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub controls: ControlSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_engine")]
    pub default_engine: String,

    #[serde(default = "default_audio_route")]
    pub audio_route: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Keep preferences in memory only
    #[serde(default)]
    pub ephemeral: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default = "default_retention_hours")]
    pub retention_hours: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlSettings {
    #[serde(default = "default_volume_step")]
    pub volume_step: i32,

    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,

    #[serde(default = "default_volume")]
    pub default_volume: u8,

    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `cadence.toml` in the
    /// working directory is used when present. `CADENCE_*` variables override
    /// file values, with `__` separating sections (`CADENCE_RESOLVER__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlayerError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.resolver.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(PlayerError::Config(format!(
                "resolver.base_url must start with http:// or https:// (got {base_url:?})"
            )));
        }

        if !(5..=15).contains(&self.resolver.timeout_secs) {
            return Err(PlayerError::Config(format!(
                "resolver.timeout_secs must be between 5 and 15 (got {})",
                self.resolver.timeout_secs
            )));
        }

        if !SEARCH_ENGINES.contains(&self.resolver.default_engine.as_str()) {
            return Err(PlayerError::Config(format!(
                "resolver.default_engine must be one of {} (got {:?})",
                SEARCH_ENGINES.join(", "),
                self.resolver.default_engine
            )));
        }

        if self.cache.retention_hours <= 0 {
            return Err(PlayerError::Config(
                "cache.retention_hours must be positive".to_string(),
            ));
        }

        if !(1..=100).contains(&self.controls.volume_step) {
            return Err(PlayerError::Config(
                "controls.volume_step must be between 1 and 100".to_string(),
            ));
        }

        if !(self.controls.seek_step_secs.is_finite() && self.controls.seek_step_secs > 0.0) {
            return Err(PlayerError::Config(
                "controls.seek_step_secs must be positive".to_string(),
            ));
        }

        if self.controls.default_volume > 100 {
            return Err(PlayerError::Config(
                "controls.default_volume must be at most 100".to_string(),
            ));
        }

        if self.controls.max_queue_size == 0 {
            return Err(PlayerError::Config(
                "controls.max_queue_size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Per-call timeout for resolver requests
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.resolver.timeout_secs)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new(self.resolver.base_url.trim())
            .with_timeout(self.call_timeout())
            .with_audio_route(self.resolver.audio_route.clone())
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            initial_volume: self.controls.default_volume,
            max_queue_size: self.controls.max_queue_size,
            cache_retention: chrono::Duration::hours(self.cache.retention_hours),
            ..PlaybackConfig::default()
        }
    }
}

// Default values
impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_engine: default_engine(),
            audio_route: default_audio_route(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            ephemeral: false,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            retention_hours: default_retention_hours(),
        }
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            volume_step: default_volume_step(),
            seek_step_secs: default_seek_step_secs(),
            default_volume: default_volume(),
            max_queue_size: default_max_queue_size(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}

fn default_audio_route() -> String {
    "song".to_string()
}

fn default_database_url() -> String {
    "sqlite://cadence.db".to_string()
}

fn default_retention_hours() -> i64 {
    24
}

fn default_volume_step() -> i32 {
    10
}

fn default_seek_step_secs() -> f64 {
    10.0
}

fn default_volume() -> u8 {
    70
}

fn default_max_queue_size() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolver.base_url, "http://localhost:3000/api");
        assert_eq!(config.call_timeout(), Duration::from_secs(10));
        assert_eq!(config.playback_config().max_queue_size, 100);
    }

    #[test]
    fn timeout_bounds_enforced() {
        let mut config = PlayerConfig::default();
        config.resolver.timeout_secs = 30;
        assert!(matches!(config.validate(), Err(PlayerError::Config(_))));

        config.resolver.timeout_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_engine_rejected() {
        let mut config = PlayerConfig::default();
        config.resolver.default_engine = "napster".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cadence.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[resolver]\nbase_url = \"http://relay.local/api\"\ndefault_engine = \"wynk\"\n\n[controls]\nvolume_step = 5"
        )
        .unwrap();

        let config = PlayerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.resolver.base_url, "http://relay.local/api");
        assert_eq!(config.resolver.default_engine, "wynk");
        assert_eq!(config.resolver.timeout_secs, 10);
        assert_eq!(config.controls.volume_step, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = PlayerConfig::load(Some(Path::new("/nonexistent/cadence.toml")));
        assert!(matches!(result, Err(PlayerError::Config(_))));
    }
}
