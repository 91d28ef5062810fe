// Error taxonomy shared by the library modules. Remote failures are
// categorised by HTTP status only; the API's own status code and message
// text are always kept so they can be shown to the user verbatim.

use thiserror::Error;

/// OAuth scopes the app needs for listing chats and adding reactions.
pub const REQUIRED_SCOPES: [&str; 4] = [
    "team_chat:read:list_user_messages",
    "team_chat:update:message_emoji",
    "team_chat:read:list_user_channels",
    "user:read:user",
];

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication failed (401): {message}")]
    Authentication { message: String },

    #[error(
        "Not authorized (403): {message}. Check that the app has the scopes: {}",
        REQUIRED_SCOPES.join(", ")
    )]
    Authorization { message: String },

    #[error("Not found (404): {message}")]
    NotFound { message: String },

    #[error("Remote API error {status}: {message}")]
    RemoteApi { status: u16, message: String },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Failed to send HTTP request: {0}")]
    Transport(String),

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("No access token available")]
    MissingToken,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Categorise a non-2xx response by its status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Error::Authentication { message },
            403 => Error::Authorization { message },
            404 => Error::NotFound { message },
            _ => Error::RemoteApi { status, message },
        }
    }

    /// HTTP status carried by a remote error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { .. } => Some(401),
            Error::Authorization { .. } => Some(403),
            Error::NotFound { .. } => Some(404),
            Error::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Decode(error.to_string())
    }
}
