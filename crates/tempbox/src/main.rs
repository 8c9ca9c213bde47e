//! `tempbox` - terminal client for disposable inboxes
//!
//! Follows an inbox as new mail arrives and prints individual messages.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod route;
mod screen;
mod settings;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tempbox_api::ApiClient;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route::Route;
use screen::ScreenOptions;
use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "tempbox", version, about = "Browse disposable inboxes from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL, including the mail host (e.g. `https://api.example.com/mails/example.com`)
    #[arg(long, global = true, env = "TEMPBOX_API_URL")]
    api_url: Option<String>,

    /// Create inboxes that do not exist yet instead of reporting them missing
    #[arg(long, global = true)]
    auto_create: bool,

    /// Inbox refresh period in milliseconds (minimum 1000)
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Print the first inbox result and exit
    #[arg(long, global = true)]
    once: bool,

    /// Settings file to read instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow an inbox and print new messages as they arrive
    Inbox {
        /// Inbox address (local part)
        address: String,
    },

    /// Print one message
    Message {
        /// Message id
        id: String,
    },

    /// Open a web-style path: `/`, `/{address}` or `/messages/{id}`
    Open {
        /// Path to open
        #[arg(default_value = "/")]
        path: String,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            auto_create: self.auto_create,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the rendered screen
    let default_filter = if cli.verbose {
        "tempbox=debug,tempbox_core=debug,tempbox_api=debug"
    } else {
        "tempbox=info,tempbox_core=info,tempbox_api=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings_path = cli.config.clone().unwrap_or_else(settings::default_path);
    let mut settings = settings::load(&settings_path).await?;
    settings.apply(cli.overrides());
    settings.validate()?;

    let route = match cli.command {
        Command::Inbox { address } => Route::inbox(&address),
        Command::Message { id } => Route::Message { id },
        Command::Open { path } => Route::parse(&path),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }
    };

    let config = settings
        .api_config()
        .with_context(|| format!("invalid api_url {:?}", settings.api_url))?;
    info!(base_url = %config.base_url, lookup = ?config.inbox_lookup, "Starting tempbox");
    let api = Arc::new(ApiClient::new(config)?);

    screen::run(api, route, &settings, ScreenOptions { once: cli.once }).await
}
