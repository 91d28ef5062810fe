// Data shapes returned by the chat API. Everything here is read-only:
// records are fetched, displayed and used to pick a target, never mutated.

use serde::{Deserialize, Serialize};

/// Response of `GET /users/me`. Only the id is needed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Channel {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub sender: Option<String>,
    /// ISO-8601 timestamp as sent by the API. Lexicographic order matches
    /// chronological order for this format.
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default, rename = "message")]
    pub body: String,
}

/// A message tagged with the channel it was fetched from, so a reaction can
/// be scoped to that channel later.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    pub channel_id: String,
    pub message: Message,
}

/// One page of a paginated listing. Channel and message listings share the
/// same shape apart from the name of the record array.
#[derive(Deserialize, Debug)]
pub struct Page<R> {
    #[serde(default = "Vec::new", alias = "channels", alias = "messages")]
    pub records: Vec<R>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl<R> Page<R> {
    /// Cursor for the following page; an empty token ends pagination the
    /// same way a missing one does.
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}
