//! Screen runners: wire a controller to the terminal until the screen ends.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tempbox_api::MailApi;
use tempbox_core::{Inbox, InboxSynchronizer, MessageAggregator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::route::Route;
use crate::settings::Settings;
use crate::view;

/// Options shared by all screens.
#[derive(Debug, Clone, Copy)]
pub struct ScreenOptions {
    /// Render the first inbox result and return instead of following it.
    pub once: bool,
}

/// Runs the screen for `route`.
pub async fn run<A: MailApi>(
    api: Arc<A>,
    route: Route,
    settings: &Settings,
    options: ScreenOptions,
) -> anyhow::Result<()> {
    info!(%route, "opening screen");
    let route = match route {
        Route::Index => match index().await? {
            Some(next) if next != Route::Index => next,
            _ => return Ok(()),
        },
        other => other,
    };

    let mut stdout = std::io::stdout();
    match route {
        Route::Index => Ok(()),
        Route::Inbox { address } => {
            let sync = InboxSynchronizer::new(api).with_poll_interval(settings.poll_interval());
            follow_inbox(sync, &address, options.once, &mut stdout, interrupted()).await
        }
        Route::Message { id } => {
            let aggregator = MessageAggregator::new(api).with_retry(settings.body_retry());
            show_message(aggregator, &id, &mut stdout, interrupted()).await
        }
    }
}

async fn interrupted() {
    let _ = tokio::signal::ctrl_c().await;
    info!("interrupted");
}

/// Prompts for an address and returns the inbox route, or `None` on EOF.
async fn index() -> anyhow::Result<Option<Route>> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}\naddress: ", view::INDEX_PROMPT)?;
    stdout.flush()?;

    let mut line = String::new();
    let read = BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(Route::inbox(&line)))
}

/// Follows one inbox until `shutdown` resolves, re-rendering to `out`
/// whenever a different inbox is published.
///
/// The notification sent by `start` itself is skipped, so nothing is
/// written before the first fetch completes. With `once`, returns after
/// that first render.
async fn follow_inbox<A: MailApi, W: Write>(
    mut sync: InboxSynchronizer<A>,
    address: &str,
    once: bool,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let mut changes = sync.subscribe();
    sync.start(address);
    tokio::pin!(shutdown);

    let mut shown: Option<Option<Arc<Inbox>>> = None;
    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = changes.borrow_and_update().clone();
                if state.completed_polls() == 0 {
                    continue;
                }

                let current = state.inbox().cloned();
                if shown.as_ref() != Some(&current) {
                    write!(out, "{}", view::inbox::render(current.as_deref()))?;
                    if let Some(line) = view::inbox::status_line(state.last_success_at(), state.is_stale()) {
                        writeln!(out, "{line}")?;
                    }
                    out.flush()?;
                    shown = Some(current);
                } else {
                    debug!(%address, "inbox unchanged");
                }

                if once {
                    break;
                }
            }
            () = &mut shutdown => break,
        }
    }

    sync.stop();
    Ok(())
}

/// Loads one message and writes it to `out`, unless `shutdown` resolves first.
async fn show_message<A: MailApi, W: Write>(
    mut aggregator: MessageAggregator<A>,
    id: &str,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    aggregator.start(id);

    let phase = tokio::select! {
        phase = aggregator.wait() => phase,
        () = shutdown => return Ok(()),
    };

    write!(out, "{}", view::message::render(phase.message().map(Arc::as_ref)))?;
    out.flush()?;
    Ok(())
}
