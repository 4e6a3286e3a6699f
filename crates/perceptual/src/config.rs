//! Configuration and error types for shingle extraction.
//!
//! The shingle stage is a pure function of `(normalized_text, config)`; this
//! module holds the whole configuration surface and nothing that touches I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted shingle size. `k = 2` yields one-token-wide shingles.
pub const MIN_SHINGLE_SIZE: usize = 2;

/// Default shingle size, giving four-token-wide shingles.
pub const DEFAULT_SHINGLE_SIZE: usize = 5;

/// Configuration for the shingle generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShingleConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect a shingle set must bump this
    /// version so old fingerprints are never compared against new ones.
    pub version: u32,
    /// Shingle size `k`.
    ///
    /// The sliding window is `k - 1` tokens wide. This offset is part of the
    /// fingerprint scheme: changing it changes every hash.
    pub shingle_size: usize,
    /// Fingerprint documents on the rayon pool when building a corpus index.
    pub use_parallel: bool,
}

impl ShingleConfig {
    /// Create a new configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shingle size (`k`). Must be >= 2.
    pub fn with_shingle_size(mut self, k: usize) -> Self {
        self.shingle_size = k;
        self
    }

    /// Enable or disable parallel corpus fingerprinting.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Number of tokens per shingle, `k - 1`.
    pub fn window_width(&self) -> usize {
        self.shingle_size.saturating_sub(1)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ShingleError> {
        if self.version < 1 {
            return Err(ShingleError::InvalidConfigVersion {
                version: self.version,
            });
        }
        validate_shingle_size(self.shingle_size)
    }
}

impl Default for ShingleConfig {
    fn default() -> Self {
        Self {
            version: 1,
            shingle_size: DEFAULT_SHINGLE_SIZE,
            use_parallel: false,
        }
    }
}

/// Rejects shingle sizes below [`MIN_SHINGLE_SIZE`].
pub fn validate_shingle_size(k: usize) -> Result<(), ShingleError> {
    if k < MIN_SHINGLE_SIZE {
        return Err(ShingleError::InvalidShingleSize { k });
    }
    Ok(())
}

/// Errors returned by the shingle stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShingleError {
    #[error("invalid config: shingle size must be >= 2 (got {k})")]
    InvalidShingleSize { k: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
