//! User-facing texts

use postledger_domain::{LedgerStats, Record, Status};

/// Reply to a message without a post link
pub const NO_LINK_FOUND: &str = "❌ I couldn't find a valid Telegram post link in your message.\n\n\
Send a link, forward a post with a comment, or send media with a caption containing a link.";

/// Reply when a button refers to a link the session no longer holds
pub const LINK_NOT_FOUND: &str = "❌ Error: link not found. Send the link again.";

/// Reply to an unrecognized button payload
pub const UNKNOWN_COMMAND: &str = "❌ Unknown command. Try again.";

/// Reply to a blank citation
pub const EMPTY_CITATION: &str = "❌ Channel name can't be empty. Send the channel name.";

/// Reply after any failure the user cannot fix by rephrasing
pub const GENERIC_FAILURE: &str = "❌ Something went wrong. Try again.";

/// Prompt for a replacement status
pub const PICK_NEW_STATUS: &str = "✏️ Pick the new publication time:";

/// Prompt for citation text
pub const ASK_CITATION: &str = "📢 Send the name of the channel that cited the post:";

/// Reply to the new-link button
pub const READY_FOR_LINK: &str = "✅ Ready for a new link. Send it here.";

/// Reply to the cancel button
pub const CANCELLED: &str = "↩️ Action cancelled. Send a new link.";

/// Reply to an export request without a ledger
pub const LEDGER_EMPTY: &str = "❌ Your ledger is empty. Add at least one post.";

/// Reply to a stats request without a ledger
pub const STATS_EMPTY: &str = "📊 Your ledger is empty.";

/// Label of the `edit_status` button
pub const BUTTON_EDIT_STATUS: &str = "✏️ Change publication time";
/// Label of the `add_citation` button
pub const BUTTON_ADD_CITATION: &str = "📢 Add citation";
/// Label of the `cancel` button
pub const BUTTON_CANCEL: &str = "↩️ Cancel";
/// Label of the `new_link` button
pub const BUTTON_NEW_LINK: &str = "Send a new link";
/// Label of the `export_db` button
pub const BUTTON_EXPORT: &str = "Send the current ledger";

/// Greeting for `/start`
pub fn greeting(first_name: &str) -> String {
    format!(
        "👋 Hi, {}! I keep track of your posts.\n\n\
         Just forward me a Telegram post or send its link.\n\n\
         Commands:\n\
         /export - download your ledger as a table\n\
         /stats - statistics for your posts",
        first_name
    )
}

/// Prompt after a new link
pub fn post_received(link: &str) -> String {
    format!(
        "📌 Post received!\n\nLink: {}\n\nPick when it was published using the buttons below",
        link
    )
}

/// Summary shown when the link is already in the ledger
pub fn already_tracked(record: &Record) -> String {
    format!(
        "📌 This post is already in your ledger!\n\n\
         Post #{}\n\
         Status: {}\n\
         Cited by: {}\n\n\
         What do you want to change?",
        record.number,
        status_label(record.status),
        record.citations_display()
    )
}

/// Confirmation after an append
pub fn post_added(number: u32, link: &str, status: Status) -> String {
    format!(
        "✅ Post #{} added to your ledger!\n\nLink: {}\nStatus: {}",
        number,
        link,
        status_label(status)
    )
}

/// Confirmation after a status change
pub fn status_updated(status: Status) -> String {
    format!("✅ Status updated!\n\nNew status: {}", status_label(status))
}

/// Confirmation after a citation
pub fn citation_added(channel: &str) -> String {
    format!("✅ Citation added!\n\nChannel: {}", channel)
}

/// Rendered aggregate for `/stats`
pub fn stats(stats: &LedgerStats) -> String {
    let mut message = format!(
        "📊 Statistics for your posts:\n\nTotal posts: {}\nTimes cited: {}\n",
        stats.total_count, stats.total_citation_count
    );

    if !stats.status_histogram.is_empty() {
        message.push_str("\nBy status:\n");
        for (status, count) in &stats.status_histogram {
            message.push_str(&format!("• {}: {}\n", status.label(), count));
        }
    }

    message
}

fn status_label(status: Status) -> &'static str {
    if status.is_set() {
        status.label()
    } else {
        "Not set"
    }
}
