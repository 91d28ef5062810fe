// Library root
// -----------
// This crate exposes the pieces the `emoji-sender` binary is built from.
// The binary (`main.rs`) parses the command line, loads the access token
// and hands control to the interactive shell in `ui`.
//
// Module responsibilities:
// - `api`: HTTP transport seam, response interpretation and the client
//   used for user lookup and single reaction calls.
// - `fetch`: cursor-following listing of channels and messages.
// - `dispatch`: sequential, paced sending of many reactions to one message.
// - `selection`: turning a menu choice into the list of emojis to send.
// - `emoji`: the bundled emoji list and the API's code point encoding.
// - `token`: reading and saving the access token file.
// - `config`: command-line options.
// - `ui`: terminal prompts; the only module doing console I/O.
pub mod api;
pub mod config;
pub mod dispatch;
pub mod emoji;
pub mod error;
pub mod fetch;
pub mod models;
pub mod selection;
pub mod token;
pub mod ui;

pub use error::{Error, Result};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr log subscriber. `RUST_LOG` wins over `level`.
/// Safe to call more than once; later calls are ignored.
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init();
}
