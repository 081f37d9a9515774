//! Magnet link detection in free text.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::domain::entities::{InfoHash, MagnetLink};

static MAGNET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"magnet:\?xt=urn:btih:([a-zA-Z0-9]{32,40})").unwrap());

static BARE_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-fA-F0-9]{40})\b").unwrap());

/// Finds magnet URIs and bare info hashes.
pub struct MagnetExtractor;

impl MagnetExtractor {
    /// Extracts every distinct magnet link from `text`.
    ///
    /// Magnet URIs come first, then bare 40-hex hashes, each in order of
    /// appearance. Hashes compare case-insensitively.
    #[must_use]
    pub fn extract_all(text: &str) -> Vec<MagnetLink> {
        let mut seen: HashSet<InfoHash> = HashSet::new();
        let mut links = Vec::new();

        let magnets = MAGNET_RE.captures_iter(text);
        let bare = BARE_HASH_RE.captures_iter(text);

        for cap in magnets.chain(bare) {
            let Some(hash) = cap.get(1).and_then(|m| InfoHash::new(m.as_str())) else {
                continue;
            };
            if seen.insert(hash.clone()) {
                links.push(MagnetLink::new(hash));
            }
        }

        links
    }

    /// Returns true when `text` holds anything that looks like a link.
    #[must_use]
    pub fn contains_candidate(text: &str) -> bool {
        MAGNET_RE.is_match(text) || BARE_HASH_RE.is_match(text)
    }
}
