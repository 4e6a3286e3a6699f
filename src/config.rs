//! YAML configuration file support.
//!
//! All stage configurations (normalization, shingling, duplicate matching)
//! plus the record field names live in a single YAML file. Every section is
//! optional and falls back to the defaults of its stage.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "survey dedup"
//!
//! normalize:
//!   version: 1
//!   lowercase: true
//!   punctuation: "ascii"
//!   normalize_unicode: false
//!
//! shingle:
//!   version: 1
//!   shingle_size: 5
//!   use_parallel: true
//!
//! matcher:
//!   version: 1
//!   strategy: "lsh"
//!   bands: 16
//!   rows_per_band: 8
//!   seed: 17297687000019483309
//!   threshold: 0.8
//!   use_parallel: false
//!
//! fields:
//!   id_field: "survey_response_id"
//!   text_field: "answer"
//! ```

use std::fs;
use std::path::Path;

use canonical::{NormalizeConfig, PunctuationClass};
use matcher::{MatchConfig, MatchStrategy};
use perceptual::{ShingleConfig, DEFAULT_SHINGLE_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::IndexBuilder;
use crate::PipelineError;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ShinglefpConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalize: NormalizeYamlConfig,

    #[serde(default)]
    pub shingle: ShingleYamlConfig,

    #[serde(default)]
    pub matcher: MatchYamlConfig,

    /// Names of the id and text fields in input records
    #[serde(default)]
    pub fields: FieldsConfig,
}

impl ShinglefpConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ShinglefpConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.normalize_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("normalize: {err}")))?;
        self.shingle_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("shingle: {err}")))?;
        self.match_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))?;
        self.fields.validate()?;

        Ok(())
    }

    pub fn normalize_config(&self) -> NormalizeConfig {
        let n = &self.normalize;
        NormalizeConfig {
            version: n.version,
            lowercase: n.lowercase,
            punctuation: n.punctuation,
            normalize_unicode: n.normalize_unicode,
        }
    }

    pub fn shingle_config(&self) -> ShingleConfig {
        let s = &self.shingle;
        ShingleConfig {
            version: s.version,
            shingle_size: s.shingle_size,
            use_parallel: s.use_parallel,
        }
    }

    pub fn match_config(&self) -> MatchConfig {
        let m = &self.matcher;
        MatchConfig {
            version: m.version,
            strategy: m.strategy,
            bands: m.bands,
            rows_per_band: m.rows_per_band,
            seed: m.seed,
            threshold: m.threshold,
            use_parallel: m.use_parallel,
        }
    }

    /// Index builder for the configured normalization and shingle size.
    pub fn index_builder(&self) -> Result<IndexBuilder, PipelineError> {
        IndexBuilder::with_configs(self.normalize_config(), self.shingle_config())
    }
}

impl Default for ShinglefpConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalize: NormalizeYamlConfig::default(),
            shingle: ShingleYamlConfig::default(),
            matcher: MatchYamlConfig::default(),
            fields: FieldsConfig::default(),
        }
    }
}

/// Normalization YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub lowercase: bool,

    #[serde(default)]
    pub punctuation: PunctuationClass,

    #[serde(default)]
    pub normalize_unicode: bool,
}

impl Default for NormalizeYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            lowercase: true,
            punctuation: PunctuationClass::Ascii,
            normalize_unicode: false,
        }
    }
}

/// Shingle YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShingleYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_shingle_size")]
    pub shingle_size: usize,

    #[serde(default)]
    pub use_parallel: bool,
}

impl Default for ShingleYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            shingle_size: DEFAULT_SHINGLE_SIZE,
            use_parallel: false,
        }
    }
}

/// Duplicate matching YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub strategy: MatchStrategy,

    #[serde(default = "default_bands")]
    pub bands: usize,

    #[serde(default = "default_rows_per_band")]
    pub rows_per_band: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub use_parallel: bool,
}

impl Default for MatchYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            strategy: MatchStrategy::Lsh,
            bands: default_bands(),
            rows_per_band: default_rows_per_band(),
            seed: default_seed(),
            threshold: default_threshold(),
            use_parallel: false,
        }
    }
}

/// Field names used when reading records. Naming only; the fingerprint does
/// not depend on them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldsConfig {
    #[serde(default = "default_id_field")]
    pub id_field: String,

    #[serde(default = "default_text_field")]
    pub text_field: String,
}

impl FieldsConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.id_field.is_empty() || self.text_field.is_empty() {
            return Err(ConfigLoadError::Validation(
                "fields.id_field and fields.text_field must be non-empty".to_string(),
            ));
        }
        if self.id_field == self.text_field {
            return Err(ConfigLoadError::Validation(format!(
                "fields.id_field and fields.text_field must differ (both {:?})",
                self.id_field
            )));
        }
        Ok(())
    }
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            text_field: default_text_field(),
        }
    }
}

fn default_version() -> u32 {
    1
}
fn true_value() -> bool {
    true
}
fn default_shingle_size() -> usize {
    DEFAULT_SHINGLE_SIZE
}
fn default_bands() -> usize {
    16
}
fn default_rows_per_band() -> usize {
    8
}
fn default_seed() -> u64 {
    0xF00D_BAAD_F00D_BAAD
}
fn default_threshold() -> f64 {
    0.8
}
fn default_id_field() -> String {
    "survey_response_id".to_string()
}
fn default_text_field() -> String {
    "answer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
shingle:
  shingle_size: 3
normalize:
  punctuation: "unicode"
"#;

        let config = ShinglefpConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.shingle_config().shingle_size, 3);
        assert_eq!(config.shingle_config().window_width(), 2);
        assert_eq!(
            config.normalize_config().punctuation,
            PunctuationClass::Unicode
        );
        assert!(config.normalize_config().lowercase);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
fields:
  id_field: "id"
  text_field: "body"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = ShinglefpConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.fields.id_field, "id");
        assert_eq!(config.fields.text_field, "body");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ShinglefpConfig::from_file(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_default_config() {
        let config = ShinglefpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shingle_config(), ShingleConfig::default());
        assert_eq!(config.normalize_config(), NormalizeConfig::default());
        assert_eq!(config.match_config(), MatchConfig::default());
        assert_eq!(config.fields.id_field, "survey_response_id");
        assert_eq!(config.fields.text_field, "answer");
    }

    #[test]
    fn test_unsupported_version() {
        let result = ShinglefpConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_shingle_validation() {
        let yaml = r#"
version: "1.0"
shingle:
  shingle_size: 1
"#;

        let result = ShinglefpConfig::from_yaml(yaml);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("shingle size must be >= 2"), "{err}");
    }

    #[test]
    fn test_matcher_validation() {
        let yaml = r#"
version: "1.0"
matcher:
  threshold: 0.0
"#;

        let err = ShinglefpConfig::from_yaml(yaml).unwrap_err().to_string();
        assert!(err.contains("threshold"), "{err}");
    }

    #[test]
    fn test_fields_validation() {
        let yaml = r#"
version: "1.0"
fields:
  id_field: "answer"
"#;

        let err = ShinglefpConfig::from_yaml(yaml).unwrap_err().to_string();
        assert!(err.contains("must differ"), "{err}");
    }

    #[test]
    fn test_malformed_yaml() {
        let result = ShinglefpConfig::from_yaml("version: [unclosed");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }

    #[test]
    fn test_full_yaml_roundtrip() {
        let yaml = r#"
version: "1.0"
name: "production"
normalize:
  version: 1
  lowercase: true
  punctuation: "ascii"
  normalize_unicode: true
shingle:
  version: 1
  shingle_size: 4
  use_parallel: true
matcher:
  version: 1
  strategy: "exhaustive"
  bands: 32
  rows_per_band: 4
  seed: 42
  threshold: 0.6
  use_parallel: true
fields:
  id_field: "survey_response_id"
  text_field: "answer"
"#;

        let config = ShinglefpConfig::from_yaml(yaml).unwrap();
        assert!(config.normalize_config().normalize_unicode);
        assert!(config.shingle_config().use_parallel);

        let m = config.match_config();
        assert_eq!(m.strategy, MatchStrategy::Exhaustive);
        assert_eq!(m.signature_len(), Ok(128));
        assert_eq!(m.seed, 42);
        assert_eq!(m.threshold, 0.6);

        let dumped = serde_yaml::to_string(&config).unwrap();
        assert_eq!(ShinglefpConfig::from_yaml(&dumped).unwrap(), config);

        let builder = config.index_builder().unwrap();
        assert_eq!(builder.shingle_config().shingle_size, 4);
    }
}
