use emoji_sender::api::{ApiClient, ReactionTarget};
use emoji_sender::dispatch::Dispatcher;
use emoji_sender::token::AccessToken;
use emoji_sender::Error;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn client(server: &mockito::Server) -> ApiClient {
    let token = AccessToken::new("test-token").unwrap();
    ApiClient::connect(&server.url(), &token).unwrap()
}

#[test]
fn test_bearer_token_is_sent() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/users/me")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": "u-1", "email": "ada@example.com"}).to_string())
        .create();

    assert_eq!(client(&server).current_user_id().unwrap(), "u-1");
    mock.assert();
}

#[test]
fn test_pagination_over_http() {
    let mut server = mockito::Server::new();
    let first = server
        .mock("GET", "/chat/users/u-1/channels")
        .match_query(Matcher::Exact("page_size=2".into()))
        .with_status(200)
        .with_body(
            json!({
                "channels": [{"id": "c1", "name": "one"}, {"id": "c2", "name": "two"}],
                "next_page_token": "abc"
            })
            .to_string(),
        )
        .create();
    let second = server
        .mock("GET", "/chat/users/u-1/channels")
        .match_query(Matcher::Exact("page_size=2&next_page_token=abc".into()))
        .with_status(200)
        .with_body(json!({"channels": [{"id": "c3"}], "next_page_token": ""}).to_string())
        .create();

    let channels = client(&server).with_page_size(2).list_channels("u-1").unwrap();

    let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    first.assert();
    second.assert();
}

#[test]
fn test_error_body_message_is_kept() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/users/me")
        .with_status(401)
        .with_body(json!({"code": 124, "message": "Invalid access token."}).to_string())
        .create();

    match client(&server).current_user_id() {
        Err(Error::Authentication { message }) => assert_eq!(message, "Invalid access token."),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_reactions_over_http() {
    let mut server = mockito::Server::new();
    let path = "/chat/users/me/messages/m-1/emoji_reactions";
    let ok = server
        .mock("PATCH", path)
        .match_body(Matcher::PartialJson(json!({
            "action": "add",
            "emoji": "U+1F44D",
            "to_channel": "c-1"
        })))
        .with_status(204)
        .create();
    let rejected = server
        .mock("PATCH", path)
        .match_body(Matcher::PartialJson(json!({"emoji": "U+78"})))
        .with_status(400)
        .with_body(json!({"code": 300, "message": "Invalid emoji"}).to_string())
        .create();

    let api = client(&server);
    let target = ReactionTarget::new("me", "m-1").in_channel("c-1");
    let summary = Dispatcher::new(&api, Duration::ZERO)
        .dispatch(&target, &["👍".to_string(), "x".to_string()]);

    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.succeeded(), 1);
    assert!(!summary.outcomes[1].is_sent());
    ok.assert();
    rejected.assert();
}
