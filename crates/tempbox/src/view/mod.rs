//! Plain-text rendering of the three screens.
//!
//! Renderers are pure: they take the controller's current value and return
//! the text to print, so they can be tested without a runtime.

pub mod inbox;
pub mod message;

/// Text shown on the search screen.
pub const INDEX_PROMPT: &str = "Search for any inbox";

/// Converts an HTML body to readable text.
///
/// Falls back to the raw markup if conversion fails.
pub fn html_to_text(html: &str) -> String {
    htmd::convert(html).unwrap_or_else(|e| {
        tracing::debug!("HTML conversion failed: {e}");
        html.to_string()
    })
}

/// Collapses whitespace and cuts `text` to at most `max` characters.
fn one_line(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
