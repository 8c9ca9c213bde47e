//! Inbox screen.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use tempbox_core::{Inbox, MessageSummary};

use super::{html_to_text, one_line};

const PREVIEW_WIDTH: usize = 72;

/// Renders the inbox heading and message list. The heading is always the
/// address; a display name, if any, goes on the line below it.
///
/// `None` means no fetch has succeeded for this address.
pub fn render(inbox: Option<&Inbox>) -> String {
    let mut out = String::new();

    let Some(inbox) = inbox else {
        out.push_str("Inbox not found\n");
        return out;
    };

    let _ = writeln!(out, "{}", inbox.address);
    if !inbox.display_name.is_empty() {
        let _ = writeln!(out, "({})", inbox.display_name);
    }
    if inbox.is_empty() {
        out.push_str("No Messages\n");
        return out;
    }

    for (n, message) in inbox.messages.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}  [/messages/{}]", n + 1, message.subject, message.id);
        let preview = preview(message);
        if !preview.is_empty() {
            let _ = writeln!(out, "     {preview}");
        }
    }
    out
}

/// Renders the freshness line printed under the list.
pub fn status_line(updated: Option<DateTime<Utc>>, stale: bool) -> Option<String> {
    let updated = updated?.with_timezone(&Local).format("%H:%M:%S");
    Some(if stale {
        format!("(last refresh failed; showing results from {updated})")
    } else {
        format!("(updated {updated})")
    })
}

/// The plain-text body, or the HTML body converted to text.
fn preview(message: &MessageSummary) -> String {
    match (message.text.as_deref(), message.html.as_deref()) {
        (Some(text), _) if !text.trim().is_empty() => one_line(text, PREVIEW_WIDTH),
        (_, Some(html)) if !html.trim().is_empty() => one_line(&html_to_text(html), PREVIEW_WIDTH),
        _ => String::new(),
    }
}
