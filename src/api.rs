// API client module: a small blocking HTTP client for the chat REST API.
//
// The HTTP layer sits behind the `Transport` trait so that the pagination
// and dispatch logic can be driven by a fake in tests. Every remote reply is
// reduced to a `RawResponse` and then to `Ok(payload)` or a categorised
// `Error`.

use crate::emoji::to_unicode_codepoints;
use crate::error::{Error, Result};
use crate::token::AccessToken;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://api.zoom.us/v2";
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Status code and body of a reply, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }

    /// Any 2xx, including 204 No Content.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The API's `message` field when the body is a JSON error, otherwise the
    /// raw body text.
    pub fn error_message(&self) -> String {
        if let Ok(ErrorBody { message: Some(m) }) = serde_json::from_str(&self.body) {
            return m;
        }
        let text = self.body.trim();
        if text.is_empty() {
            "Unknown error".to_string()
        } else {
            text.to_string()
        }
    }

    /// Success yields the body; anything else becomes a categorised error.
    pub fn into_result(self) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            let message = self.error_message();
            Err(Error::from_status(self.status, message))
        }
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.into_result()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Minimal HTTP surface the client needs. Paths are relative to the API
/// base URL and start with `/`.
pub trait Transport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse>;
    fn patch(&self, path: &str, body: &Value) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        (**self).get(path, query)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<RawResponse> {
        (**self).patch(path, body)
    }
}

/// reqwest-backed transport. The token is fixed at construction and sent as
/// a bearer credential on every call. No timeout beyond reqwest's default.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, token: &AccessToken) -> Result<Self> {
        let client = Client::builder()
            .default_headers(Self::auth_headers(token)?)
            .build()?;
        Ok(HttpTransport {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn auth_headers(token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.secret()))
            .map_err(|_| Error::Authentication {
                message: "access token contains characters not allowed in a header".into(),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn read(res: Response) -> Result<RawResponse> {
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok(RawResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        tracing::debug!(path, "GET");
        let res = self.client.get(self.url(path)).query(query).send()?;
        Self::read(res)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<RawResponse> {
        tracing::debug!(path, "PATCH");
        let res = self.client.patch(self.url(path)).json(body).send()?;
        Self::read(res)
    }
}

/// Message a reaction is added to, plus the chat it lives in. The API
/// needs the channel or contact to locate the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionTarget {
    pub user_id: String,
    pub message_id: String,
    pub to_channel: Option<String>,
    pub to_contact: Option<String>,
}

impl ReactionTarget {
    pub fn new(user_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        ReactionTarget {
            user_id: user_id.into(),
            message_id: message_id.into(),
            to_channel: None,
            to_contact: None,
        }
    }

    pub fn in_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.to_channel = Some(channel_id.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.to_contact = Some(contact.into());
        self
    }

    pub fn path(&self) -> String {
        format!(
            "/chat/users/{}/messages/{}/emoji_reactions",
            self.user_id, self.message_id
        )
    }

    /// Request body adding `emoji` to the target message.
    pub fn add_body(&self, emoji: &str) -> Value {
        let mut body = json!({
            "action": "add",
            "emoji": to_unicode_codepoints(emoji),
        });
        if let Some(channel) = &self.to_channel {
            body["to_channel"] = Value::String(channel.clone());
        }
        if let Some(contact) = &self.to_contact {
            body["to_contact"] = Value::String(contact.clone());
        }
        body
    }
}

/// API client over a transport. Listing operations live in `fetch`, bulk
/// reactions in `dispatch`.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    page_size: u32,
}

impl ApiClient<HttpTransport> {
    /// Build a client talking HTTP to `base_url` with `token`.
    pub fn connect(base_url: &str, token: &AccessToken) -> Result<Self> {
        Ok(ApiClient::new(HttpTransport::new(base_url, token)?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        ApiClient {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Identifier of the user the token belongs to.
    pub fn current_user_id(&self) -> Result<String> {
        let user: crate::models::User = self.transport.get("/users/me", &[])?.json()?;
        Ok(user.id)
    }

    /// Add a single reaction. Issues exactly one PATCH, no retry.
    pub fn add_reaction(&self, target: &ReactionTarget, emoji: &str) -> Result<()> {
        let res = self.transport.patch(&target.path(), &target.add_body(emoji))?;
        res.into_result().map(|_| ())
    }
}
