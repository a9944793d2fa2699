//! Canonical normalization for dashboard configurations
//!
//! Turns a user-authored dashboard body, or the body the remote service hands
//! back, into a comparison-ready form:
//!
//! - **Input resolution**: raw text is parsed once into a [`ConfigInput`]
//! - **Strip rules**: server-managed fields are removed by composable [`StripRule`]s
//! - **Canonical text**: keys sorted at every level, integral numbers printed as integers
//! - **Digests**: optional SHA-256 of the canonical text, see [`StorageMode`]
//!
//! # Example
//!
//! ```
//! use dashsync_content::normalize_config;
//!
//! let canonical = normalize_config(r#"{"uid":"a","title":"T","version":3}"#).unwrap();
//! assert_eq!(canonical, r#"{"title":"T","uid":"a"}"#);
//! ```

pub mod digest;
pub mod error;
pub mod input;
pub mod normalize;
pub mod rules;

pub use digest::{StorageMode, StoredFormat, compute_digest};
pub use error::{Error, Result};
pub use input::ConfigInput;
pub use normalize::{CanonicalForm, Normalizer, normalize_config};
pub use rules::{LibraryPanelRefs, ServerManagedFields, StripRule};
