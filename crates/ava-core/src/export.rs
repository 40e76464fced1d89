//! Plain-text export of a single conversation.
//!
//! Pure string formatting; the platform layer turns the result into a
//! client-side download.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use ava_types::conversation::ConversationSummary;

pub const BANNER_TITLE: &str = "AVA BOT CONVERSATION";
pub const USER_HEADING: &str = "👤 USER MESSAGE:";
pub const ASSISTANT_HEADING: &str = "🤖 AVA RESPONSE:";
pub const FOOTER: &str = "Exported from AVA Dashboard\nConversation Management System";
pub const MIME_TYPE: &str = "text/plain;charset=utf-8";

const BOX_WIDTH: usize = 62;
const RULE_WIDTH: usize = 66;

/// A rendered export, ready to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationExport {
    pub file_name: String,
    pub body: String,
}

impl ConversationExport {
    /// The banner shows `exported_at` in its own zone; the app passes local time
    pub fn new<Tz>(conversation: &ConversationSummary, exported_at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            file_name: export_file_name(&conversation.user_id, exported_at.clone()),
            body: render_export(
                &conversation.user_id,
                &conversation.content,
                &conversation.response,
                exported_at,
            ),
        }
    }
}

/// `AVA_Conversation_<user>_<YYYY-MM-DD>.txt`; the first `@` becomes `_`
/// and the date is the UTC calendar day.
pub fn export_file_name<Tz: TimeZone>(user_id: &str, exported_at: DateTime<Tz>) -> String {
    format!(
        "AVA_Conversation_{}_{}.txt",
        user_id.replacen('@', "_", 1),
        exported_at.with_timezone(&Utc).format("%Y-%m-%d")
    )
}

/// Fixed banner template; content and response are copied verbatim.
pub fn render_export<Tz>(
    user_id: &str,
    content: &str,
    response: &str,
    exported_at: DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let rule = "━".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("╔{}╗\n", "═".repeat(BOX_WIDTH)));
    out.push_str(&format!("║{:^width$}║\n", BANNER_TITLE, width = BOX_WIDTH));
    out.push_str(&format!("╚{}╝\n\n", "═".repeat(BOX_WIDTH)));

    out.push_str(&format!("User: {}\n", user_id));
    out.push_str(&format!(
        "Export date: {}\n",
        exported_at.format("%d/%m/%Y, %H:%M:%S")
    ));
    out.push_str(&rule);
    out.push_str("\n\n");

    out.push_str(USER_HEADING);
    out.push('\n');
    out.push_str(content);
    out.push_str("\n\n");

    out.push_str(ASSISTANT_HEADING);
    out.push('\n');
    out.push_str(response);
    out.push_str("\n\n");

    out.push_str(&rule);
    out.push('\n');
    out.push_str(FOOTER);
    out.push('\n');
    out
}
