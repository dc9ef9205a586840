//! Storefront - shopper-facing helpers for the Harbor & Pine web shop.
//!
//! This crate contains two independent pieces:
//! 1. A chat relay Lambda that forwards a shopper's message to an
//!    OpenAI-compatible completion API behind a fixed assistant persona
//! 2. A "recent purchase" notification presenter that cycles canned
//!    purchase records on a randomized timer
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda (behind API Gateway) for the chat relay endpoint
//! - reqwest for the single upstream completion call
//! - openai-api-rs message types for conversation assembly
//! - Tokio for async runtime and presenter timers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront::ai::{ChatRelay, HttpCompletionClient};
//! use storefront::core::config::RelayConfig;
//! use storefront::presenter::{Presenter, PresenterTiming, RandomSamples, TokioScheduler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Set up structured logging
//!     storefront::setup_logging();
//!
//!     let config = RelayConfig {
//!         api_base_url: "https://api.openai.com/v1".to_string(),
//!         api_key: "dummy_key".to_string(),
//!         request_timeout: std::time::Duration::from_secs(30),
//!     };
//!     let relay = ChatRelay::new(HttpCompletionClient::new(&config)?);
//!     println!("{}", relay.relay("Do you ship to Canada?").await?);
//!
//!     // Show purchase notifications until the presenter is dropped
//!     let presenter = Presenter::mount(
//!         Arc::new(TokioScheduler::current()?),
//!         Arc::new(RandomSamples::default()),
//!         PresenterTiming::default(),
//!     );
//!     let mut feed = presenter.subscribe();
//!     while feed.changed().await.is_ok() {
//!         if let Some(record) = *feed.borrow() {
//!             println!("{record}");
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod presenter;

pub use errors::RelayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`). It
/// should be called at the start of each binary; later calls are no-ops.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// storefront::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
