//! Normalizer for shingle fingerprinting.
//!
//! This crate canonicalizes raw free text into the form the shingle stage
//! tokenizes: lowercase, punctuation replaced by spaces, whitespace collapsed
//! to single spaces with no leading or trailing space.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence. The same text and config
//! give the same output on any machine, from any thread.
//!
//! ## Invariants worth knowing
//!
//! - Normalization is idempotent: `normalize(normalize(t)) == normalize(t)`
//!   for the default configuration.
//! - Absent text is the caller's concern; this crate only sees `&str`.
//! - [`tokenize`] over normalized text never yields an empty token.

mod config;
mod error;
mod normalize;
mod token;
mod whitespace;

pub use crate::config::{NormalizeConfig, PunctuationClass};
pub use crate::error::CanonicalError;
pub use crate::normalize::{is_punctuation, normalize, normalize_text};
pub use crate::token::tokenize;
pub use crate::whitespace::collapse_whitespace;
