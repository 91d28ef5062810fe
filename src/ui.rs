// UI layer: interactive prompts using `dialoguer`, progress with `indicatif`.
// This is the only place doing console I/O; everything it decides is handed
// to the library as plain values (a target message, an emoji list, a yes/no).

use crate::api::{ApiClient, HttpTransport, ReactionTarget};
use crate::config::Cli;
use crate::dispatch::{
    estimated_duration, DispatchSummary, Dispatcher, ReactionStatus, DAILY_REQUEST_LIMIT,
};
use crate::emoji::load_emojis;
use crate::error::Error;
use crate::fetch::MessageFilter;
use crate::models::Message;
use crate::selection::{preview, select_emojis, EmojiMode};
use crate::token::{load_token, save_token, AccessToken};
use anyhow::{bail, Context, Result};
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const RULE_WIDTH: usize = 80;
const BODY_PREVIEW_CHARS: usize = 100;

/// Run one full session: authenticate, pick a message, pick emojis,
/// confirm and send.
pub fn run(cli: &Cli) -> Result<()> {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("EMOJI SENDER");
    println!("{}", "=".repeat(RULE_WIDTH));

    // The emoji list is local, so a mode passed with `--emojis` is checked
    // here, before any request goes out.
    let source = load_emojis(cli.emoji_file.as_deref());
    let preselected = preselect_emojis(cli, &source)?;

    // Authenticate and learn who we are; `connect` re-prompts on a 401.
    let (api, user_id) = connect(cli)?;
    println!("User ID: {user_id}");

    let Some(target) = choose_target(cli, &api, &user_id)? else {
        return Ok(());
    };

    // No `--emojis`: fall back to the interactive menu.
    let emojis = match preselected {
        Some(emojis) => emojis,
        None => choose_emojis(&source)?,
    };

    if !confirm_send(cli, &target, &emojis)? {
        println!("Cancelled.");
        return Ok(());
    }

    // From here on reactions land on the remote message; there is no undo.
    let summary = send(&api, cli.delay(), &target, &emojis)?;
    print_summary(&summary);
    Ok(())
}

/// Resolve `--emojis` against the local source list. `None` means the
/// choice is left to the interactive menu.
pub fn preselect_emojis(cli: &Cli, source: &[String]) -> Result<Option<Vec<String>>> {
    let Some(mode) = &cli.emojis else {
        return Ok(None);
    };
    tracing::info!(%mode, "emoji mode from command line");
    let emojis =
        select_emojis(source, mode).with_context(|| format!("Selecting emojis ({mode})"))?;
    Ok(Some(emojis))
}

/// Resolve a token and look up the current user. A rejected token leads to
/// a prompt for a new one instead of exiting.
fn connect(cli: &Cli) -> Result<(ApiClient<HttpTransport>, String)> {
    let env_file = cli.env_file();
    // Command line / environment first, then the env file, then ask.
    let mut token = match cli.token.as_deref().and_then(AccessToken::new) {
        Some(token) => token,
        None => match load_token(&env_file).context("Reading access token file")? {
            Some(token) => token,
            None => {
                println!("\nNo access token found in {}.", env_file.display());
                prompt_token(&env_file)?
            }
        },
    };

    loop {
        // A fresh client per attempt: the token is fixed at construction.
        let api = ApiClient::connect(&cli.api_url, &token)
            .context("Failed to build HTTP client")?
            .with_page_size(cli.page_size);

        let busy = spinner("Fetching user information...")?;
        let result = api.current_user_id();
        busy.finish_and_clear();

        match result {
            Ok(user_id) => return Ok((api, user_id)),
            Err(e @ Error::Authentication { .. }) => {
                println!("\n{e}");
                println!("The token may have expired. Run the OAuth helper again or paste a new token.");
                token = prompt_token(&env_file)?;
            }
            Err(e) => return Err(e).context("Looking up current user"),
        }
    }
}

fn prompt_token(env_file: &std::path::Path) -> Result<AccessToken> {
    // `Password` keeps the token off the screen.
    let raw: String = Password::new()
        .with_prompt("Access token")
        .interact()?;
    let Some(token) = AccessToken::new(raw) else {
        bail!(Error::MissingToken);
    };
    let save = Confirm::new()
        .with_prompt(format!("Save token to {}?", env_file.display()))
        .default(false)
        .interact()?;
    if save {
        save_token(env_file, &token).context("Saving access token")?;
    }
    Ok(token)
}

/// Pick the message to react to. Returns `None` when there is nothing to
/// choose from.
fn choose_target(
    cli: &Cli,
    api: &ApiClient<HttpTransport>,
    user_id: &str,
) -> Result<Option<ReactionTarget>> {
    // A message id on the command line skips the whole picker.
    if let Some(message_id) = &cli.message_id {
        return Ok(Some(scoped_target(cli, user_id, message_id, cli.channel_id.clone())));
    }

    let today = chrono::Local::now().date_naive();
    let filter = MessageFilter::since(today, cli.lookback_days);

    loop {
        let items = [
            "Recent messages from all chats",
            "Messages from one channel",
            "Enter a message ID",
        ];
        let choice = Select::new()
            .with_prompt("Where is the message?")
            .items(&items)
            .default(0)
            .interact()?;

        let picked = match choice {
            0 => pick_from_all_chats(cli, api, user_id, &filter),
            1 => pick_from_channel(cli, api, user_id, &filter),
            _ => {
                let id: String = Input::new().with_prompt("Message ID").interact_text()?;
                let id = id.trim().to_string();
                if id.is_empty() {
                    println!("No message ID provided.");
                    return Ok(None);
                }
                Ok(Some(scoped_target(cli, user_id, &id, cli.channel_id.clone())))
            }
        };

        match picked {
            Err(e) if restarts_selection(&e) => {
                // The channel or message vanished; show the menu again.
                println!("\n{e}");
            }
            other => return other,
        }
    }
}

/// Whether a failed pick sends the user back to the source menu. Only a
/// 404 does; every other failure ends the session.
fn restarts_selection(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<Error>(), Some(Error::NotFound { .. }))
}

fn scoped_target(
    cli: &Cli,
    user_id: &str,
    message_id: &str,
    channel: Option<String>,
) -> ReactionTarget {
    let mut target = ReactionTarget::new(user_id, message_id);
    if let Some(channel) = channel {
        target = target.in_channel(channel);
    }
    if let Some(contact) = &cli.contact {
        target = target.with_contact(contact.clone());
    }
    target
}

fn pick_from_all_chats(
    cli: &Cli,
    api: &ApiClient<HttpTransport>,
    user_id: &str,
    filter: &MessageFilter,
) -> Result<Option<ReactionTarget>> {
    let busy = spinner("Fetching channels...")?;
    let channels = api.list_channels(user_id);
    busy.finish_and_clear();
    let channels = channels.context("Listing channels")?;
    if channels.is_empty() {
        println!("No channels found!");
        return Ok(None);
    }

    let busy = spinner(&format!("Fetching recent messages from {} channels...", channels.len()))?;
    let recent = api.recent_messages(user_id, &channels, filter, cli.recent_limit);
    busy.finish_and_clear();
    let recent = recent.context("Listing recent messages")?;
    if recent.is_empty() {
        println!("No recent messages found!");
        return Ok(None);
    }

    // Remember which channel each message came from so the reaction can be
    // scoped to it.
    let messages: Vec<&Message> = recent.iter().map(|m| &m.message).collect();
    print_messages(&messages);
    let Some(index) = pick_index("Message number", messages.len())? else {
        return Ok(None);
    };
    let picked = &recent[index];
    Ok(Some(scoped_target(
        cli,
        user_id,
        &picked.message.id,
        Some(picked.channel_id.clone()),
    )))
}

fn pick_from_channel(
    cli: &Cli,
    api: &ApiClient<HttpTransport>,
    user_id: &str,
    filter: &MessageFilter,
) -> Result<Option<ReactionTarget>> {
    let busy = spinner("Fetching channels...")?;
    let channels = api.list_channels(user_id);
    busy.finish_and_clear();
    let channels = channels.context("Listing channels")?;
    if channels.is_empty() {
        println!("No channels found!");
        return Ok(None);
    }

    let labels: Vec<String> = channels
        .iter()
        .map(|c| format!("{} (ID: {})", c.display_name(), c.id))
        .collect();
    let index = Select::new()
        .with_prompt("Channel")
        .items(&labels)
        .default(0)
        .interact()?;
    let channel = &channels[index];

    let busy = spinner("Fetching messages from channel...")?;
    let messages = api.list_messages(user_id, &filter.in_channel(&channel.id));
    busy.finish_and_clear();
    let messages = messages.with_context(|| format!("Listing messages of {}", channel.display_name()))?;
    if messages.is_empty() {
        println!("No messages found in this channel!");
        return Ok(None);
    }

    let refs: Vec<&Message> = messages.iter().collect();
    print_messages(&refs);
    let Some(index) = pick_index("Message number", messages.len())? else {
        return Ok(None);
    };
    Ok(Some(scoped_target(
        cli,
        user_id,
        &messages[index].id,
        Some(channel.id.clone()),
    )))
}

/// Ask for a 1-based number and return the 0-based index.
fn pick_index(prompt: &str, len: usize) -> Result<Option<usize>> {
    let raw: String = Input::new()
        .with_prompt(format!("{prompt} (1-{len})"))
        .interact_text()?;
    match raw.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(Some(n - 1)),
        _ => {
            println!("Invalid number!");
            Ok(None)
        }
    }
}

fn print_messages(messages: &[&Message]) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("RECENT MESSAGES");
    println!("{}", "=".repeat(RULE_WIDTH));
    for (idx, message) in messages.iter().enumerate() {
        println!("\n{}", format_message(idx + 1, message));
    }
    println!("\n{}", "=".repeat(RULE_WIDTH));
}

/// Numbered block for one message, body cut to a fixed preview length.
pub fn format_message(number: usize, message: &Message) -> String {
    let mut body: String = message.body.chars().take(BODY_PREVIEW_CHARS).collect();
    if message.body.chars().count() > BODY_PREVIEW_CHARS {
        body.push_str("\n    ...");
    }
    format!(
        "[{number}] ID: {}\n    From: {}\n    Time: {}\n    Message: {body}",
        message.id,
        message.sender.as_deref().unwrap_or("Unknown"),
        message.date_time.as_deref().unwrap_or(""),
    )
}

fn choose_emojis(source: &[String]) -> Result<Vec<String>> {
    let all_label = format!("Use all supported emojis ({})", source.len());
    let items = [all_label.as_str(), "Random selection", "Enter custom emojis"];
    let choice = Select::new()
        .with_prompt("Emojis")
        .items(&items)
        .default(1)
        .interact()?;

    // Keep asking until the typed count or list is usable.
    loop {
        let param: String = match choice {
            0 => String::new(),
            1 => Input::new()
                .with_prompt(format!("How many random emojis? (1-{})", source.len()))
                .interact_text()?,
            _ => Input::new()
                .with_prompt("Emojis separated by spaces (e.g. 😀 👍 ❤️)")
                .interact_text()?,
        };

        let selected = EmojiMode::from_menu(choice + 1, &param)
            .and_then(|mode| select_emojis(source, &mode));
        match selected {
            Ok(emojis) => {
                match choice {
                    0 => println!("\nUsing all {} supported emojis!", emojis.len()),
                    1 => {
                        println!("\nRandomly selected {} emojis!", emojis.len());
                        println!("Sample: {}", preview(&emojis, 20));
                    }
                    _ => {}
                }
                return Ok(emojis);
            }
            Err(e @ Error::InvalidSelection(_)) if choice != 0 => println!("{e}"),
            Err(e) => return Err(e).context("Selecting emojis"),
        }
    }
}

fn confirm_send(cli: &Cli, target: &ReactionTarget, emojis: &[String]) -> Result<bool> {
    println!(
        "\nAbout to send {} emoji reactions to message ID: {}",
        emojis.len(),
        target.message_id
    );
    println!("Sample emojis: {}", preview(emojis, 10));

    if emojis.len() > DAILY_REQUEST_LIMIT {
        println!("\n⚠️  WARNING: You're trying to send {} reactions.", emojis.len());
        println!("    Daily rate limit is {DAILY_REQUEST_LIMIT} requests/day. This will exceed the limit!");
        println!("    Consider reducing the number of emojis.");
    }

    let estimate = estimated_duration(emojis.len(), cli.delay());
    println!(
        "\nEstimated time: {:.1} minutes ({:.1}s between requests)",
        estimate.as_secs_f64() / 60.0,
        cli.delay().as_secs_f64()
    );

    if cli.yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt("Proceed?").default(false).interact()?)
}

fn send(
    api: &ApiClient<HttpTransport>,
    delay: Duration,
    target: &ReactionTarget,
    emojis: &[String],
) -> Result<DispatchSummary> {
    println!("\nSending {} emoji reactions...", emojis.len());
    let progress = ProgressBar::new(emojis.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} {msg}",
    )?);

    // Print each outcome above the bar so the bar stays on the last line.
    let dispatcher = Dispatcher::new(api, delay);
    let summary = dispatcher.dispatch_with(target, emojis, |_, outcome| {
        match &outcome.status {
            ReactionStatus::Sent => progress.println(format!("✓ Added {}", outcome.emoji)),
            ReactionStatus::Failed { reason, .. } => {
                progress.println(format!("✗ Failed to add {}: {reason}", outcome.emoji))
            }
        }
        progress.inc(1);
    });
    progress.finish_and_clear();
    Ok(summary)
}

fn print_summary(summary: &DispatchSummary) {
    println!("{}", "-".repeat(RULE_WIDTH));
    println!(
        "\n✓ Successfully sent {}/{} emoji reactions!",
        summary.succeeded(),
        summary.attempted()
    );
    if summary.failed() > 0 {
        println!("✗ Failed to send {} reactions", summary.failed());
    }
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> Message {
        Message {
            id: "m-1".into(),
            sender: Some("ada@example.com".into()),
            date_time: Some("2024-05-01T10:00:00Z".into()),
            body: body.into(),
        }
    }

    #[test]
    fn short_message_is_shown_whole() {
        let text = format_message(3, &message("hello"));
        assert!(text.starts_with("[3] ID: m-1"));
        assert!(text.contains("From: ada@example.com"));
        assert!(text.ends_with("Message: hello"));
    }

    #[test]
    fn not_found_restarts_selection() {
        let err = anyhow::Error::from(Error::from_status(404, "Channel does not exist"))
            .context("Listing channels");
        assert!(restarts_selection(&err));
    }

    #[test]
    fn other_failures_end_selection() {
        let forbidden = anyhow::Error::from(Error::from_status(403, "No permission"))
            .context("Listing channels");
        assert!(!restarts_selection(&forbidden));

        let expired = anyhow::Error::from(Error::from_status(401, "Access token is expired"));
        assert!(!restarts_selection(&expired));

        assert!(!restarts_selection(&anyhow::anyhow!("prompt closed")));
    }

    fn cli(args: &[&str]) -> Cli {
        use clap::Parser;
        let mut argv = vec!["emoji-sender"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn target_uses_channel_and_contact() {
        let target = scoped_target(
            &cli(&["--contact", "ada@example.com"]),
            "me",
            "m-1",
            Some("c-1".into()),
        );
        let expected = ReactionTarget::new("me", "m-1")
            .in_channel("c-1")
            .with_contact("ada@example.com");
        assert_eq!(target, expected);

        let target = scoped_target(&cli(&[]), "me", "m-2", None);
        assert_eq!(target, ReactionTarget::new("me", "m-2"));
    }

    #[test]
    fn preselection_follows_command_line() {
        let source: Vec<String> = ["🔥", "🎉", "👍"].iter().map(|s| s.to_string()).collect();

        assert!(preselect_emojis(&cli(&[]), &source).unwrap().is_none());

        let picked = preselect_emojis(&cli(&["--emojis", "custom:🔥 🔥"]), &source).unwrap();
        assert_eq!(picked, Some(vec!["🔥".to_string(), "🔥".to_string()]));

        let err = preselect_emojis(&cli(&["--emojis", "random:4"]), &source).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidSelection(_))));
        assert!(err.to_string().contains("random:4"));
    }

    #[test]
    fn long_message_is_truncated() {
        let body = "é".repeat(150);
        let text = format_message(1, &message(&body));
        assert!(text.contains(&"é".repeat(100)));
        assert!(!text.contains(&"é".repeat(101)));
        assert!(text.ends_with("..."));
    }
}
