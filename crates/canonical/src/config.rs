//! Configuration types for the normalizer.
//!
//! This module defines [`NormalizeConfig`], which controls how raw text is
//! folded into the tokenizable form consumed by the shingle stage.
//!
//! # Versioning
//!
//! Any change to normalization behavior that can change a fingerprint must be
//! accompanied by a version bump, so that shingle sets produced under
//! different versions are never compared by accident.
//!
//! # Examples
//!
//! ```rust
//! use canonical::{NormalizeConfig, PunctuationClass};
//!
//! let config = NormalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.lowercase);
//! assert_eq!(config.punctuation, PunctuationClass::Ascii);
//! assert!(!config.normalize_unicode);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Which characters count as punctuation and are replaced by a space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationClass {
    /// The 32 ASCII punctuation characters ``!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~``.
    ///
    /// This is the fingerprint-compatible default.
    #[default]
    Ascii,
    /// Every character in a Unicode punctuation category (`Pc`, `Pd`, `Ps`,
    /// `Pe`, `Pi`, `Pf`, `Po`) plus the ASCII symbols of the `Ascii` class.
    Unicode,
}

/// Configuration for the normalizer.
///
/// Cheap to clone and serializable so it can live inside a YAML config file.
///
/// ```json
/// {
///   "version": 1,
///   "lowercase": true,
///   "punctuation": "ascii",
///   "normalize_unicode": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Semantic version of the normalization scheme. Must be >= 1.
    pub version: u32,

    /// Apply locale-free Unicode lowercasing to the whole text.
    ///
    /// Context-sensitive mappings apply: a capital sigma at the end of a
    /// word lowercases to the final form `ς`.
    pub lowercase: bool,

    /// Characters replaced by a single space before whitespace collapsing.
    pub punctuation: PunctuationClass,

    /// Apply Unicode NFKC normalization before any other transform.
    ///
    /// Off by default: enabling it changes the shingle text, and therefore
    /// the hashes, of any document containing compatibility characters.
    pub normalize_unicode: bool,
}

impl NormalizeConfig {
    /// Create a configuration with the default, fingerprint-compatible scheme.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_punctuation(mut self, punctuation: PunctuationClass) -> Self {
        self.punctuation = punctuation;
        self
    }

    pub fn with_unicode_normalization(mut self, normalize_unicode: bool) -> Self {
        self.normalize_unicode = normalize_unicode;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "normalize config version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            lowercase: true,
            punctuation: PunctuationClass::Ascii,
            normalize_unicode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(NormalizeConfig::default().validate().is_ok());
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = NormalizeConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(CanonicalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builder_chain() {
        let cfg = NormalizeConfig::new()
            .with_lowercase(false)
            .with_punctuation(PunctuationClass::Unicode)
            .with_unicode_normalization(true);
        assert!(!cfg.lowercase);
        assert_eq!(cfg.punctuation, PunctuationClass::Unicode);
        assert!(cfg.normalize_unicode);
    }
}
