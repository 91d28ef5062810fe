// Command-line and environment configuration.

use crate::api::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use crate::selection::EmojiMode;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "emoji-sender",
    version,
    about = "Add a burst of emoji reactions to a chat message"
)]
pub struct Cli {
    /// Base URL of the chat REST API.
    #[arg(long, env = "EMOJI_SENDER_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Env-style file holding ZOOM_ACCESS_TOKEN (default: ./.env, else ~/.emoji-sender.env).
    #[arg(long, env = "EMOJI_SENDER_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Access token; takes precedence over the env file.
    #[arg(long, env = "ZOOM_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Seconds to wait between reaction requests (at most one hour).
    #[arg(long, default_value = "1.0", value_parser = parse_delay)]
    pub delay: Duration,

    /// Records requested per page when listing channels and messages.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// How many days back to look for messages (0-3650).
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(0..=MAX_LOOKBACK_DAYS))]
    pub lookback_days: u32,

    /// Maximum number of messages shown in the all-chats view.
    #[arg(long, default_value_t = 20)]
    pub recent_limit: usize,

    /// Target message id; skips the message picker.
    #[arg(long)]
    pub message_id: Option<String>,

    /// Channel the target message belongs to.
    #[arg(long)]
    pub channel_id: Option<String>,

    /// Contact (email or user id) of a 1:1 chat the target message belongs to.
    #[arg(long)]
    pub contact: Option<String>,

    /// Emoji selection: all, random:N or custom:<emojis>.
    #[arg(long)]
    pub emojis: Option<EmojiMode>,

    /// Newline-delimited emoji list to use instead of the bundled one.
    #[arg(long)]
    pub emoji_file: Option<PathBuf>,

    /// Send without asking for confirmation.
    #[arg(short, long, default_value_t = false)]
    pub yes: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG overrides it.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

const MAX_DELAY: Duration = Duration::from_secs(3600);
const MAX_LOOKBACK_DAYS: i64 = 3650;

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    // try_from_secs_f64 rejects negative, NaN and overflowing values
    let delay = Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("delay must be a non-negative number of seconds, got {raw}"))?;
    if delay > MAX_DELAY {
        return Err(format!(
            "delay must be at most {} seconds, got {raw}",
            MAX_DELAY.as_secs()
        ));
    }
    Ok(delay)
}

impl Cli {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn env_file(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(crate::token::default_env_file)
    }
}
