//! Character-safe text chunking.

/// Maximum characters per forward node.
pub const FORWARD_NODE_MAX_CHARS: usize = 4000;

/// Splits `text` into consecutive chunks of at most `max_chars` characters.
///
/// Chunks never cut through a character. Empty input yields no chunks.
#[must_use]
pub fn split_by_length(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
