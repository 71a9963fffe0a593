use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which figure represents a stated pay band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeResolution {
    /// The ceiling of the band, the conventionally advertised figure.
    #[default]
    Upper,
    Lower,
    Midpoint,
}

impl RangeResolution {
    pub fn resolve(self, a: Decimal, b: Decimal) -> Decimal {
        match self {
            RangeResolution::Upper => a.max(b),
            RangeResolution::Lower => a.min(b),
            RangeResolution::Midpoint => (a + b) / Decimal::TWO,
        }
    }
}

/// Heuristics used to turn a pay figure into a typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayPolicy {
    /// Bare figures above this are annual salaries, the rest hourly rates.
    pub threshold: Decimal,
    /// When false, only figures with an explicit unit are reported.
    pub classify_unit: bool,
    pub range: RangeResolution,
}

impl Default for PayPolicy {
    fn default() -> Self {
        Self {
            threshold: Decimal::from(400),
            classify_unit: true,
            range: RangeResolution::Upper,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub language: String,
    /// Tessdata directory; the engine's compiled-in default when absent.
    pub data_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { language: "eng".to_string(), data_path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub screenshots_dir: PathBuf,
    pub csv: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { screenshots_dir: PathBuf::from("screenshots"), csv: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pay: PayPolicy,
    pub ocr: OcrConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pay.threshold <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "pay.threshold must be positive, got {}",
                self.pay.threshold
            )));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(ConfigError::Invalid("ocr.language must not be empty".into()));
        }
        Ok(())
    }
}
