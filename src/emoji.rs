// Emoji reference list and wire encoding.

use std::collections::HashSet;
use std::path::Path;

/// Emoji list shipped with the binary, one glyph per line.
pub const BUNDLED_EMOJIS: &str = include_str!("../assets/emojis.txt");

/// Parse a newline-delimited emoji list. Blank lines and `#` comments are
/// skipped, several glyphs on one line are split on whitespace, and
/// duplicates are dropped keeping the first occurrence.
pub fn parse_emoji_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .filter(|glyph| seen.insert(*glyph))
        .map(str::to_string)
        .collect()
}

pub fn bundled_emojis() -> Vec<String> {
    parse_emoji_list(BUNDLED_EMOJIS)
}

/// Load the candidate list from `path`, or the bundled list when no path is
/// given. An unreadable or empty file falls back to the bundled list.
pub fn load_emojis(path: Option<&Path>) -> Vec<String> {
    let Some(path) = path else {
        return bundled_emojis();
    };
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let emojis = parse_emoji_list(&text);
            if emojis.is_empty() {
                tracing::warn!(path = %path.display(), "emoji file is empty, using bundled list");
                return bundled_emojis();
            }
            tracing::info!(path = %path.display(), count = emojis.len(), "loaded emoji list");
            emojis
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read emoji file, using bundled list");
            bundled_emojis()
        }
    }
}

/// Encode a glyph as the API expects it: each code point as `U+XXXX`,
/// joined with `-` for multi-code-point glyphs (flags, ZWJ sequences,
/// variation selectors).
pub fn to_unicode_codepoints(emoji: &str) -> String {
    emoji
        .chars()
        .map(|c| format!("U+{:X}", c as u32))
        .collect::<Vec<_>>()
        .join("-")
}
