// Turning a menu choice into the concrete list of emojis to send.

use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// How the emoji list is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmojiMode {
    /// Every candidate, in source order.
    All,
    /// `n` distinct candidates in random draw order.
    Random(usize),
    /// Whitespace-separated tokens typed by the user, passed through as-is.
    Custom(String),
}

impl EmojiMode {
    /// Map a numbered menu choice (1 = all, 2 = random, 3 = custom) and its
    /// typed parameter to a mode.
    pub fn from_menu(choice: usize, param: &str) -> Result<Self> {
        match choice {
            1 => Ok(EmojiMode::All),
            2 => param
                .trim()
                .parse()
                .map(EmojiMode::Random)
                .map_err(|_| Error::InvalidSelection(format!("'{}' is not a number", param.trim()))),
            3 => Ok(EmojiMode::Custom(param.to_string())),
            other => Err(Error::InvalidSelection(format!("unknown menu choice {other}"))),
        }
    }
}

impl FromStr for EmojiMode {
    type Err = Error;

    /// Accepts `all`, `random:N` and `custom:<glyphs>`.
    fn from_str(s: &str) -> Result<Self> {
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (s, None),
        };
        match (kind.trim().to_ascii_lowercase().as_str(), rest) {
            ("all", None) => Ok(EmojiMode::All),
            ("random", Some(n)) => EmojiMode::from_menu(2, n),
            ("custom", Some(list)) => Ok(EmojiMode::Custom(list.to_string())),
            _ => Err(Error::InvalidSelection(format!(
                "'{s}' is not one of all, random:N, custom:<emojis>"
            ))),
        }
    }
}

impl fmt::Display for EmojiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmojiMode::All => write!(f, "all"),
            EmojiMode::Random(n) => write!(f, "random:{n}"),
            EmojiMode::Custom(list) => write!(f, "custom:{list}"),
        }
    }
}

/// Build the emoji sequence for `mode` from `source`, using the thread RNG.
pub fn select_emojis(source: &[String], mode: &EmojiMode) -> Result<Vec<String>> {
    select_emojis_with(source, mode, &mut rand::rng())
}

/// Like [`select_emojis`] with an explicit RNG. Validation happens before
/// anything is drawn.
pub fn select_emojis_with<R: Rng + ?Sized>(
    source: &[String],
    mode: &EmojiMode,
    rng: &mut R,
) -> Result<Vec<String>> {
    match mode {
        EmojiMode::All => {
            if source.is_empty() {
                return Err(Error::InvalidSelection("emoji list is empty".into()));
            }
            Ok(source.to_vec())
        }
        EmojiMode::Random(n) => {
            let n = *n;
            if n < 1 || n > source.len() {
                return Err(Error::InvalidSelection(format!(
                    "random count must be between 1 and {}, got {n}",
                    source.len()
                )));
            }
            let mut pool = source.to_vec();
            let (drawn, _) = pool.partial_shuffle(rng, n);
            Ok(drawn.to_vec())
        }
        EmojiMode::Custom(input) => {
            let tokens: Vec<String> = input.split_whitespace().map(str::to_string).collect();
            if tokens.is_empty() {
                return Err(Error::InvalidSelection("no emojis entered".into()));
            }
            Ok(tokens)
        }
    }
}

/// Space-separated preview of the first `max` emojis, with `...` when the
/// list is longer.
pub fn preview(emojis: &[String], max: usize) -> String {
    let mut text = emojis.iter().take(max).cloned().collect::<Vec<_>>().join(" ");
    if emojis.len() > max {
        text.push_str(" ...");
    }
    text
}
