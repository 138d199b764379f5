use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SettingsError;

pub const DEFAULT_SHARE_BASE_URL: &str = "https://zeypay.com/card";

/// 面额限制
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmountLimits {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 10_000.0,
            default: 50.0,
            step: 5.0,
        }
    }
}

impl AmountLimits {
    pub fn contains(&self, amount: f64) -> bool {
        amount.is_finite() && amount > 0.0 && amount >= self.min && amount <= self.max
    }

    /// 按步长调整金额，结果限制在 [min, max] 内
    pub fn step_by(&self, amount: f64, steps: i32) -> f64 {
        (amount + self.step * f64::from(steps)).clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub share_base_url: String,
    pub amount: AmountLimits,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            amount: AmountLimits::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// 从TOML文件加载配置，文件不存在时使用默认值
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::from_toml(&content).map_err(|e| match e {
            SettingsError::Parse { source, .. } => SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let amount = &self.amount;
        if !(amount.min > 0.0 && amount.min <= amount.max) {
            return Err(SettingsError::Invalid(format!(
                "amount bounds must satisfy 0 < min <= max (min = {}, max = {})",
                amount.min, amount.max
            )));
        }
        if !(amount.min..=amount.max).contains(&amount.default) {
            return Err(SettingsError::Invalid(format!(
                "default amount {} is outside {}..={}",
                amount.default, amount.min, amount.max
            )));
        }
        if amount.step <= 0.0 || !amount.step.is_finite() {
            return Err(SettingsError::Invalid(format!(
                "amount step must be positive (got {})",
                amount.step
            )));
        }
        if self.share_base_url.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "share_base_url must not be empty".to_string(),
            ));
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(SettingsError::Invalid(format!(
                "unknown log level: {}",
                self.logging.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("zeypay-settings-does-not-exist.toml");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.amount.min, 5.0);
        assert_eq!(settings.amount.max, 10_000.0);
    }

    #[test]
    fn test_load_partial_file() {
        let path = std::env::temp_dir().join(format!("zeypay-settings-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            "share_base_url = \"https://example.test/gift\"\n[amount]\nmax = 500.0\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.share_base_url, "https://example.test/gift");
        assert_eq!(settings.amount.max, 500.0);
        assert_eq!(settings.amount.min, 5.0);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let result = Settings::from_toml("[amount]\nmin = 0.0\n");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));

        let result = Settings::from_toml("[amount]\nmin = 100.0\nmax = 10.0\n");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));

        let result = Settings::from_toml("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_reports_parse_error() {
        let result = Settings::from_toml("share_base_url = ");
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn test_step_by_clamps() {
        let limits = AmountLimits::default();
        assert_eq!(limits.step_by(50.0, 1), 55.0);
        assert_eq!(limits.step_by(5.0, -1), 5.0);
        assert_eq!(limits.step_by(9_998.0, 1), 10_000.0);
        assert!(limits.contains(5.0));
        assert!(limits.contains(10_000.0));
        assert!(!limits.contains(0.0));
        assert!(!limits.contains(f64::NAN));
    }
}
