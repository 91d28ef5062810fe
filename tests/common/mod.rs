#![allow(dead_code)]

use emoji_sender::api::{RawResponse, Transport};
use emoji_sender::dispatch::Sleeper;
use emoji_sender::{Error, Result};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        path: String,
        query: Vec<(String, String)>,
    },
    Patch {
        path: String,
        body: Value,
    },
}

impl Call {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        match self {
            Call::Get { query, .. } => query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Call::Patch { .. } => None,
        }
    }
}

/// Transport replaying scripted replies in order and recording each call.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Result<RawResponse>>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub fn reply_json(self, status: u16, body: Value) -> Self {
        self.reply(status, body.to_string())
    }

    pub fn fail(self, error: Error) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn next(&self) -> Result<RawResponse> {
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("request issued after the scripted replies ran out")
    }
}

impl Transport for FakeTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        self.calls.borrow_mut().push(Call::Get {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        self.next()
    }

    fn patch(&self, path: &str, body: &Value) -> Result<RawResponse> {
        self.calls.borrow_mut().push(Call::Patch {
            path: path.to_string(),
            body: body.clone(),
        });
        self.next()
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

pub fn message_page(start: usize, count: usize, next: Option<&str>) -> Value {
    let messages: Vec<Value> = (start..start + count)
        .map(|i| {
            json!({
                "id": format!("m{i}"),
                "sender": "ada@example.com",
                "date_time": format!("2024-05-01T10:{:02}:00Z", i % 60),
                "message": format!("message {i}"),
            })
        })
        .collect();
    let mut page = json!({ "messages": messages, "page_size": count });
    if let Some(token) = next {
        page["next_page_token"] = Value::String(token.to_string());
    }
    page
}

pub fn emojis(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
