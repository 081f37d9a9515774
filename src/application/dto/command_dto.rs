//! Chat command DTOs.

/// Words that invoke the magnet command.
pub const COMMAND_NAMES: [&str; 2] = ["磁链", "磁力"];

/// Prefix that may precede a command word.
pub const COMMAND_PREFIX: char = '/';

/// Argument given to the magnet command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArgument {
    /// No argument.
    None,
    /// 1-based position of the link to preview.
    Index(usize),
    /// Text to search for links.
    Text(String),
}

/// Parsed `磁链` / `磁力` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnetCommand {
    /// Command argument.
    pub argument: CommandArgument,
}

impl MagnetCommand {
    /// Parses a message as a magnet command.
    ///
    /// The command word must be followed by whitespace or the end of the
    /// text; everything after it is the argument.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let body = text.strip_prefix(COMMAND_PREFIX).unwrap_or(text);

        let rest = COMMAND_NAMES
            .iter()
            .find_map(|name| body.strip_prefix(name))?;

        if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
            return None;
        }

        let arg = rest.trim();
        let argument = if arg.is_empty() {
            CommandArgument::None
        } else if arg.chars().all(|c| c.is_ascii_digit()) {
            // Digits that overflow usize are still an index request, just an
            // unreachable one.
            CommandArgument::Index(arg.parse().unwrap_or(usize::MAX))
        } else {
            CommandArgument::Text(arg.to_string())
        };

        Some(Self { argument })
    }

    /// Returns the requested index, if any.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self.argument {
            CommandArgument::Index(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the inline text argument, if any.
    #[must_use]
    pub fn inline_text(&self) -> Option<&str> {
        match &self.argument {
            CommandArgument::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Returns true when `text` starts with a command word, with or without the
/// prefix. Such messages are never auto-parsed.
#[must_use]
pub fn starts_with_command(text: &str) -> bool {
    let text = text.trim_start();
    let body = text.strip_prefix(COMMAND_PREFIX).unwrap_or(text);
    COMMAND_NAMES.iter().any(|name| body.starts_with(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("磁链", CommandArgument::None ; "bare_command")]
    #[test_case("/磁力", CommandArgument::None ; "prefixed_alias")]
    #[test_case("磁链 2", CommandArgument::Index(2) ; "index_argument")]
    #[test_case("/磁链   0 ", CommandArgument::Index(0) ; "zero_index")]
    #[test_case("磁链 magnet:?xt=urn:btih:abc", CommandArgument::Text("magnet:?xt=urn:btih:abc".to_string()) ; "inline_link")]
    #[test_case("磁力 a b", CommandArgument::Text("a b".to_string()) ; "multi_word_text")]
    fn test_parse_command(text: &str, expected: CommandArgument) {
        let command = MagnetCommand::parse(text).unwrap();
        assert_eq!(command.argument, expected);
    }

    #[test_case("磁链abc" ; "glued_word")]
    #[test_case("hello 磁链" ; "not_leading")]
    #[test_case("//磁链" ; "double_prefix")]
    fn test_not_a_command(text: &str) {
        assert!(MagnetCommand::parse(text).is_none());
    }

    #[test]
    fn test_accessors() {
        let command = MagnetCommand::parse("磁链 3").unwrap();
        assert_eq!(command.index(), Some(3));
        assert_eq!(command.inline_text(), None);
    }

    #[test]
    fn test_starts_with_command() {
        assert!(starts_with_command("磁链abc"));
        assert!(starts_with_command("/磁力 x"));
        assert!(starts_with_command(" 磁链x"));
        assert!(!starts_with_command("magnet"));
    }
}
