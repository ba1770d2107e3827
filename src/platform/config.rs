// LasQC - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LasQC data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/lasqc/ or %APPDATA%\LasQC\config\)
    pub config_dir: PathBuf,

    /// User catalog looked up when no catalog path is configured.
    pub user_catalog: PathBuf,

    /// Data directory; the default archive lives under it.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let user_catalog = config_dir.join(constants::CATALOG_FILE_NAME);
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                catalog = %user_catalog.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                user_catalog,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                user_catalog: fallback.join(constants::CATALOG_FILE_NAME),
                data_dir: fallback,
            }
        }
    }

    /// Archive root used when neither the CLI nor config.toml names one.
    pub fn default_archive_root(&self) -> PathBuf {
        self.data_dir.join(constants::ARCHIVE_DIR_NAME)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[catalog]` section.
    pub catalog: CatalogSection,
    /// `[archive]` section.
    pub archive: ArchiveSection,
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[catalog]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// QC catalog file replacing the built-in one.
    pub path: Option<String>,
}

/// `[archive]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ArchiveSection {
    /// Root directory for approved copies.
    pub root: Option<String>,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Services validated when none are given on the command line.
    pub services: Option<Vec<String>>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub catalog_path: Option<PathBuf>,
    pub archive_root: Option<PathBuf>,
    /// Default requested services (empty = every catalog service).
    pub services: Vec<String>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Parse config.toml content.
pub fn parse_config(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Validate a parsed config, accumulating a warning per rejected value.
pub fn validate_config(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    config.catalog_path = non_empty(raw.catalog.path.as_ref()).map(PathBuf::from);
    config.archive_root = non_empty(raw.archive.root.as_ref()).map(PathBuf::from);

    // -- Analysis: services --
    if let Some(services) = raw.analysis.services {
        for name in services {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                warnings.push(
                    ConfigError::ValueOutOfRange {
                        field: "[analysis] services".to_string(),
                        value: name.clone(),
                        expected: "a non-empty service name".to_string(),
                    }
                    .to_string(),
                );
            } else if !config.services.iter().any(|s| s == trimmed) {
                config.services.push(trimmed.to_string());
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "{}. Using default ({}).",
                ConfigError::ValueOutOfRange {
                    field: "[logging] level".to_string(),
                    value: level.clone(),
                    expected: constants::VALID_LOG_LEVELS.join(", "),
                },
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    // -- Logging: file --
    config.log_file = non_empty(raw.logging.file.as_ref()).map(PathBuf::from);

    (config, warnings)
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    let parsed = std::fs::read_to_string(config_path)
        .map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })
        .and_then(|content| parse_config(&content, config_path));

    match parsed {
        Ok(raw) => validate_config(raw),
        Err(e) => (AppConfig::default(), vec![format!("{e}. Using defaults.")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert!(config.catalog_path.is_none());
        assert!(config.services.is_empty());
    }

    #[test]
    fn test_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[catalog]
path = "/etc/lasqc/catalog.toml"

[archive]
root = "/srv/verified"

[analysis]
services = ["COMBO BASICO", "SONICO", "COMBO BASICO"]

[logging]
level = "DEBUG"
file = ""

[future]
unknown = 1
"#,
        )
        .unwrap();

        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/lasqc/catalog.toml"))
        );
        assert_eq!(config.archive_root, Some(PathBuf::from("/srv/verified")));
        assert_eq!(config.services, vec!["COMBO BASICO", "SONICO"]);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_invalid_values_warn_and_fall_back() {
        let raw = parse_config(
            "[logging]\nlevel = \"loud\"\n[analysis]\nservices = [\" \"]\n",
            Path::new("config.toml"),
        )
        .unwrap();
        let (config, warnings) = validate_config(raw);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("[logging] level")));
        assert!(config.log_level.is_none());
        assert!(config.services.is_empty());
    }

    #[test]
    fn test_unparseable_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging\nlevel = ").unwrap();
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 1);
        assert!(config.log_level.is_none());
    }
}
