//! SHA-256 digests of canonical forms
//!
//! In hashing mode the persisted comparison value is the lowercase hex
//! SHA-256 of the canonical JSON text: exactly 64 characters, no prefix.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// How the canonical form is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Store the canonical JSON text
    #[default]
    Json,
    /// Store the SHA-256 digest of the canonical JSON text
    Sha256,
}

impl StorageMode {
    pub fn from_flag(store_sha256: bool) -> Self {
        if store_sha256 { Self::Sha256 } else { Self::Json }
    }

    /// The stored format this mode produces
    pub fn format(self) -> StoredFormat {
        match self {
            Self::Json => StoredFormat::Json,
            Self::Sha256 => StoredFormat::Digest,
        }
    }
}

/// Format of an already persisted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredFormat {
    Json,
    Digest,
}

impl StoredFormat {
    /// Classify a persisted value
    ///
    /// Canonical JSON of a dashboard always starts with `{`, so a bare
    /// 64-character lowercase hex string can only be a digest.
    pub fn of(stored: &str) -> Self {
        if stored.len() == DIGEST_HEX_LEN
            && stored
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            Self::Digest
        } else {
            Self::Json
        }
    }

    /// The storage mode that produces this format
    pub fn mode(self) -> StorageMode {
        match self {
            Self::Json => StorageMode::Json,
            Self::Digest => StorageMode::Sha256,
        }
    }
}

/// Compute the hex SHA-256 digest of canonical text
pub fn compute_digest(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
