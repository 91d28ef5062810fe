// Access token handling. The token is produced by an external OAuth run and
// stored in an env-style file; this module reads it once at startup and can
// write back a token the user pasted at the prompt.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Key under which the token is stored in the env file and the environment.
pub const TOKEN_KEY: &str = "ZOOM_ACCESS_TOKEN";

/// Bearer credential. Held for the whole process lifetime and never
/// refreshed in-process; `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Returns `None` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(AccessToken(trimmed.to_string()))
        }
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Short preview safe to print, e.g. `abcd…wxyz`.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.masked()).finish()
    }
}

/// Default env file: `./.env` when present, otherwise a dotfile in the
/// user's home directory.
pub fn default_env_file() -> PathBuf {
    let local = PathBuf::from(".env");
    if local.exists() {
        return local;
    }
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(".emoji-sender.env")
}

/// Read the token from an env-style file. A missing file or missing key is
/// not an error; malformed files are.
pub fn load_token(path: &Path) -> Result<Option<AccessToken>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "token env file not found");
        return Ok(None);
    }
    let entries = dotenvy::from_path_iter(path)
        .map_err(|e| Error::Decode(format!("{}: {e}", path.display())))?;
    for entry in entries {
        let (key, value) = entry.map_err(|e| Error::Decode(format!("{}: {e}", path.display())))?;
        if key == TOKEN_KEY {
            return Ok(AccessToken::new(value));
        }
    }
    Ok(None)
}

/// Write (or replace) the token line in the env file, keeping other lines.
pub fn save_token(path: &Path, token: &AccessToken) -> Result<()> {
    let existing = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    let prefix = format!("{TOKEN_KEY}=");
    let mut lines: Vec<String> = existing
        .lines()
        .filter(|line| !line.trim_start().starts_with(&prefix))
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        lines.push("# Chat API OAuth access token".to_string());
    }
    lines.push(format!("{prefix}{}", token.secret()));
    std::fs::write(path, lines.join("\n") + "\n")?;
    tracing::info!(path = %path.display(), "saved access token");
    Ok(())
}
