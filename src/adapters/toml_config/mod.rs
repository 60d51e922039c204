// TOML config adapter - Configuration management using TOML files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::info;

use crate::error::{MediaProbeError, MediaProbeResult};
use crate::utils::logging::LoggingConfig;

/// Default cache namespace, the first component of every cache key
pub const DEFAULT_NAMESPACE: &str = "media_parser";

/// Complete tool configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub mediaprobe: AnalyzerSettings,
    pub cache: CacheSettings,
    pub logging: LoggingConfig,
}

/// `[mediaprobe]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// ffmpeg binary, a bare name is looked up on `PATH`
    pub ffmpeg_path: PathBuf,
    /// Kill the analyzer after this many seconds
    pub timeout_secs: Option<u64>,
}

/// `[cache]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub backend: CacheBackend,
    /// Filesystem cache root; the platform cache directory when unset
    pub directory: Option<PathBuf>,
    pub namespace: String,
}

/// Where cached entries live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process lifetime only
    Memory,
    /// One file per entry, memoized in process
    Filesystem,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout_secs: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::Filesystem,
            directory: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl AnalyzerSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ProbeConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> MediaProbeResult<()> {
        let namespace = &self.cache.namespace;
        if namespace.trim().is_empty() {
            return Err(MediaProbeError::InvalidConfig {
                message: "cache.namespace cannot be empty".to_string(),
            });
        }
        if namespace.contains('/') {
            return Err(MediaProbeError::InvalidConfig {
                message: format!("cache.namespace cannot contain '/': {}", namespace),
            });
        }
        if self.mediaprobe.timeout_secs == Some(0) {
            return Err(MediaProbeError::InvalidConfig {
                message: "mediaprobe.timeout_secs must be greater than zero".to_string(),
            });
        }
        if self.mediaprobe.ffmpeg_path.as_os_str().is_empty() {
            return Err(MediaProbeError::InvalidConfig {
                message: "mediaprobe.ffmpeg_path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: Arc<RwLock<ProbeConfig>>,
    config_file_path: Arc<RwLock<Option<PathBuf>>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the defaults
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(ProbeConfig::default())),
            config_file_path: Arc::new(RwLock::new(None)),
        }
    }

    /// Platform config file, e.g. `~/.config/mediaprobe/config.toml` on Linux
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mediaprobe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> ProbeConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply an in-place change, e.g. an environment or CLI override
    pub fn update(&self, apply: impl FnOnce(&mut ProbeConfig)) {
        match self.config.write() {
            Ok(mut config) => apply(&mut *config),
            Err(poisoned) => {
                let mut config = poisoned.into_inner();
                apply(&mut *config)
            }
        }
    }

    /// File the configuration was loaded from, if any
    pub fn config_file_path(&self) -> Option<PathBuf> {
        self.config_file_path
            .read()
            .ok()
            .and_then(|path| path.clone())
    }

    /// Replace the configuration with the contents of a TOML string
    pub fn load_str(&self, toml_content: &str, origin: &Path) -> MediaProbeResult<()> {
        let parsed: ProbeConfig =
            toml::from_str(toml_content).map_err(|source| MediaProbeError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })?;
        self.update(|config| *config = parsed);
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_config(&self, path: &Path) -> MediaProbeResult<()> {
        let content = std::fs::read_to_string(path).map_err(|source| MediaProbeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&content, path)?;

        if let Ok(mut config_path) = self.config_file_path.write() {
            *config_path = Some(path.to_path_buf());
        }
        info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Write the current configuration as TOML
    pub fn save_config(&self, path: &Path) -> MediaProbeResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.config()).map_err(|e| MediaProbeError::InvalidConfig {
            message: format!("Failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the current configuration
    pub fn validate_config(&self) -> MediaProbeResult<()> {
        self.config().validate()
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::{LogFormat, LogLevel};

    const SAMPLE: &str = r#"
[mediaprobe]
ffmpeg_path = "/usr/local/bin/ffmpeg"
timeout_secs = 30

[cache]
backend = "memory"
namespace = "probe_test"

[logging]
level = "debug"
format = "json"
"#;

    #[test]
    fn test_defaults() {
        let config = TomlConfigAdapter::new().config();
        assert_eq!(config.mediaprobe.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.mediaprobe.timeout(), None);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.backend, CacheBackend::Filesystem);
        assert_eq!(config.cache.namespace, DEFAULT_NAMESPACE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let adapter = TomlConfigAdapter::new();
        adapter.load_str(SAMPLE, Path::new("sample.toml")).unwrap();
        let config = adapter.config();

        assert_eq!(config.mediaprobe.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.mediaprobe.timeout(), Some(Duration::from_secs(30)));
        assert!(config.cache.enabled);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.namespace, "probe_test");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_bad_values() {
        let adapter = TomlConfigAdapter::new();
        assert!(adapter
            .load_str("[logging]\nlevel = \"loud\"", Path::new("x.toml"))
            .is_err());

        adapter.update(|config| config.cache.namespace = "a/b".to_string());
        assert!(adapter.validate_config().is_err());

        adapter.update(|config| {
            config.cache.namespace = DEFAULT_NAMESPACE.to_string();
            config.mediaprobe.timeout_secs = Some(0);
        });
        assert!(adapter.validate_config().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let adapter = TomlConfigAdapter::new();
        adapter.load_str(SAMPLE, Path::new("sample.toml")).unwrap();
        adapter.save_config(&path).unwrap();

        let reloaded = TomlConfigAdapter::new();
        reloaded.load_config(&path).unwrap();
        assert_eq!(reloaded.config(), adapter.config());
        assert_eq!(reloaded.config_file_path(), Some(path));
    }
}
