//! Shared leaf types for the boardkit workspace.
//!
//! Provides clock frequencies and the content digest used to
//! fingerprint build artifacts before they are handed to a programmer.

#![warn(missing_docs)]

pub mod frequency;
pub mod hash;

pub use frequency::{Frequency, FrequencyError};
pub use hash::ContentHash;
