//! Magnet link value objects.

use std::fmt;

/// Prefix of every canonical magnet URI produced by the bot.
pub const MAGNET_PREFIX: &str = "magnet:?xt=urn:btih:";

/// Upper-cased BitTorrent info-hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InfoHash(String);

impl InfoHash {
    const MIN_LENGTH: usize = 32;
    const MAX_LENGTH: usize = 40;

    /// Creates an info-hash from 32 to 40 ASCII alphanumerics.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        let value = value.trim();

        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&value.len()) {
            return None;
        }

        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        Some(Self(value.to_ascii_uppercase()))
    }

    /// Returns the hash text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical `magnet:?xt=urn:btih:<HASH>` link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MagnetLink {
    hash: InfoHash,
}

impl MagnetLink {
    /// Builds the canonical link for a hash.
    #[must_use]
    pub const fn new(hash: InfoHash) -> Self {
        Self { hash }
    }

    /// Returns the info-hash.
    #[must_use]
    pub const fn hash(&self) -> &InfoHash {
        &self.hash
    }

    /// Returns the full magnet URI.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("{MAGNET_PREFIX}{}", self.hash)
    }
}

impl fmt::Display for MagnetLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MAGNET_PREFIX}{}", self.hash)
    }
}
