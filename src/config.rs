use crate::error::{AnalysisError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How outlier scores are computed.
#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// `(x - mean) / std`
    #[default]
    ZScore,
    /// `0.6745 * (x - median) / MAD`, robust on small or heavy-tailed samples
    ModifiedZScore,
}

impl OutlierMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZScore => "z-score",
            Self::ModifiedZScore => "modified z-score",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Scores with magnitude above this are outliers (default: 3.0)
    pub outlier_z_threshold: f64,
    pub outlier_method: OutlierMethod,
    /// Components used when a caller does not ask for a specific number (default: 2)
    pub default_pca_components: usize,
    /// Upper bound of the automatic seasonal period (default: 12)
    pub max_seasonal_period: usize,
    /// Fixed seasonal period; when unset the period is `min(max_seasonal_period, rows / 2)`
    pub seasonal_period: Option<usize>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            outlier_z_threshold: 3.0,
            outlier_method: OutlierMethod::ZScore,
            default_pca_components: 2,
            max_seasonal_period: 12,
            seasonal_period: None,
        }
    }
}

impl AnalysisSettings {
    /// # Errors
    ///
    /// [`AnalysisError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !self.outlier_z_threshold.is_finite() || self.outlier_z_threshold <= 0.0 {
            return Err(AnalysisError::Config(format!(
                "outlier_z_threshold must be a positive number, got {}",
                self.outlier_z_threshold
            )));
        }
        if self.default_pca_components == 0 {
            return Err(AnalysisError::Config(
                "default_pca_components must be at least 1".to_owned(),
            ));
        }
        if self.max_seasonal_period < 2 {
            return Err(AnalysisError::Config(
                "max_seasonal_period must be at least 2".to_owned(),
            ));
        }
        if let Some(period) = self.seasonal_period
            && period < 2
        {
            return Err(AnalysisError::Config(format!(
                "seasonal_period must be at least 2, got {period}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    /// Also write daily rolling log files under the data directory
    pub file_logging: bool,
    /// Rotated files kept per log (default: 10)
    pub max_log_files: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file_logging: false,
            max_log_files: 10,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

pub fn get_config_path() -> PathBuf {
    crate::utils::standard_paths().base_dir.join("config.json")
}

/// Loads the config from the standard location, falling back to defaults when
/// it is missing or unreadable.
///
/// Runs before logging is set up, so a config that could not be used comes
/// back as a warning for the caller to log.
pub fn load_app_config() -> (AppConfig, Option<String>) {
    load_or_default(&get_config_path())
}

pub fn load_or_default(path: &Path) -> (AppConfig, Option<String>) {
    if !path.exists() {
        return (AppConfig::default(), None);
    }
    match load_config_from(path) {
        Ok(config) => (config, None),
        Err(e) => (
            AppConfig::default(),
            Some(format!("Ignoring config at {}: {e}", path.display())),
        ),
    }
}

/// # Errors
///
/// I/O and JSON errors, or [`AnalysisError::Config`] when the settings are invalid.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.analysis.validate()?;
    Ok(config)
}

/// # Errors
///
/// I/O errors creating the directory or writing the file.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// # Errors
///
/// See [`save_config_to`].
pub fn save_app_config(config: &AppConfig) -> Result<()> {
    save_config_to(config, &get_config_path())
}
