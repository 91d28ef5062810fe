// Paginated listing of channels and messages.

use crate::api::{ApiClient, Transport};
use crate::error::Result;
use crate::models::{Channel, ChannelMessage, Message, Page};
use chrono::{Days, NaiveDate};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Paginated collections owned by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Channels,
    Messages,
}

impl Resource {
    pub fn path(self, user_id: &str) -> String {
        match self {
            Resource::Channels => format!("/chat/users/{user_id}/channels"),
            Resource::Messages => format!("/chat/users/{user_id}/messages"),
        }
    }
}

/// Optional narrowing of a message listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub to_channel: Option<String>,
    pub to_contact: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl MessageFilter {
    /// Messages sent since `days` days before `today`. A span reaching past
    /// the earliest representable date clamps to that date.
    pub fn since(today: NaiveDate, days: u32) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        MessageFilter {
            from: Some(from),
            ..Default::default()
        }
    }

    pub fn in_channel(&self, channel_id: impl Into<String>) -> Self {
        MessageFilter {
            to_channel: Some(channel_id.into()),
            ..self.clone()
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(channel) = &self.to_channel {
            query.push(("to_channel", channel.clone()));
        }
        if let Some(contact) = &self.to_contact {
            query.push(("to_contact", contact.clone()));
        }
        if let Some(from) = self.from {
            query.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        query
    }
}

impl<T: Transport> ApiClient<T> {
    /// Follow the page cursor of `resource` until a page comes back without
    /// a (non-empty) `next_page_token`, concatenating records in the order
    /// received. The first failing page aborts the whole fetch and nothing
    /// collected so far is returned.
    pub fn fetch_all<R: DeserializeOwned>(
        &self,
        resource: Resource,
        user_id: &str,
        extra: &[(&str, String)],
    ) -> Result<Vec<R>> {
        let path = resource.path(user_id);
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            // page_size first, then the caller's filters, then the cursor
            let mut query: Vec<(&str, String)> = Vec::with_capacity(extra.len() + 2);
            query.push(("page_size", self.page_size().to_string()));
            query.extend(extra.iter().map(|(k, v)| (*k, v.clone())));
            if let Some(token) = &cursor {
                query.push(("next_page_token", token.clone()));
            }

            let page: Page<R> = self.transport().get(&path, &query)?.json()?;
            pages += 1;
            debug!(?resource, page = pages, records = page.records.len(), "fetched page");

            // An empty token ends the listing just like a missing one.
            cursor = page.next_token().map(str::to_string);
            records.extend(page.records);
            if cursor.is_none() {
                break;
            }
        }

        info!(?resource, pages, total = records.len(), "fetch complete");
        Ok(records)
    }

    pub fn list_channels(&self, user_id: &str) -> Result<Vec<Channel>> {
        self.fetch_all(Resource::Channels, user_id, &[])
    }

    pub fn list_messages(&self, user_id: &str, filter: &MessageFilter) -> Result<Vec<Message>> {
        self.fetch_all(Resource::Messages, user_id, &filter.query())
    }

    /// Recent messages across `channels`, newest first, at most `limit`.
    ///
    /// A channel whose listing fails is skipped with a warning, except for
    /// authentication failures which would fail for every channel and are
    /// returned immediately.
    pub fn recent_messages(
        &self,
        user_id: &str,
        channels: &[Channel],
        filter: &MessageFilter,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>> {
        let mut collected = Vec::new();
        for channel in channels {
            match self.list_messages(user_id, &filter.in_channel(&channel.id)) {
                Ok(messages) => collected.extend(messages.into_iter().map(|message| {
                    ChannelMessage {
                        channel_id: channel.id.clone(),
                        message,
                    }
                })),
                Err(e) if e.is_authentication() => return Err(e),
                Err(e) => {
                    warn!(channel = channel.display_name(), error = %e, "skipping channel");
                }
            }
        }

        collected.sort_by(|a, b| b.message.date_time.cmp(&a.message.date_time));
        collected.truncate(limit);
        Ok(collected)
    }
}
