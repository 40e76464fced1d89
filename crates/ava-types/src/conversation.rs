use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::api::ConversationRecord;

pub const ANONYMOUS_USER: &str = "Anonymous user";
const CONTENT_PREVIEW_CHARS: usize = 50;
const RESPONSE_PREVIEW_CHARS: usize = 30;

/// One stored exchange as listed by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Backend row id, used for the full-detail page
    pub id: i64,
    pub user_id: String,
    pub content: String,
    pub response: String,
    pub timestamp: Option<String>,
}

impl ConversationSummary {
    pub fn content_preview(&self) -> String {
        preview(&self.content, CONTENT_PREVIEW_CHARS)
    }

    pub fn response_preview(&self) -> String {
        preview(&self.response, RESPONSE_PREVIEW_CHARS)
    }

    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(self.timestamp.as_deref())
    }
}

impl From<ConversationRecord> for ConversationSummary {
    fn from(record: ConversationRecord) -> Self {
        Self {
            id: record.rowid,
            user_id: record
                .user_id
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            content: record.content.unwrap_or_default(),
            response: record.response.unwrap_or_default(),
            timestamp: record.timestamp,
        }
    }
}

/// Time window offered by the dashboard filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::All => "all",
            TimeFilter::Today => "today",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
        }
    }

    /// Unknown values fall back to `All`
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "today" => TimeFilter::Today,
            "week" => TimeFilter::Week,
            "month" => TimeFilter::Month,
            _ => TimeFilter::All,
        }
    }

    pub fn all() -> &'static [TimeFilter] {
        &[TimeFilter::All, TimeFilter::Today, TimeFilter::Week, TimeFilter::Month]
    }

    pub fn label(&self) -> &str {
        match self {
            TimeFilter::All => "All",
            TimeFilter::Today => "Today",
            TimeFilter::Week => "This week",
            TimeFilter::Month => "This month",
        }
    }
}

/// Parameters of one list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub filter: TimeFilter,
    pub search: String,
}

impl PageQuery {
    /// Page numbers start at 1; search text is trimmed.
    pub fn new(page: u32, filter: TimeFilter, search: &str) -> Self {
        Self {
            page: page.max(1),
            filter,
            search: search.trim().to_string(),
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self::new(page, self.filter, &self.search)
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("page", self.page.to_string()),
            ("filter", self.filter.as_str().to_string()),
            ("search", self.search.clone()),
        ]
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, TimeFilter::All, "")
    }
}

/// A fetched page of rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPage {
    pub page: u32,
    pub total: u64,
    pub rows: Vec<ConversationSummary>,
}

/// Pagination control state for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.page_size as u64)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64) * (self.page_size as u64) < self.total
    }

    pub fn label(&self) -> String {
        format!(
            "Page {} of {} ({} conversations)",
            self.page,
            self.total_pages(),
            self.total
        )
    }
}

/// Render a backend timestamp as `dd/mm/yyyy, HH:MM`.
/// Missing values show as `N/A`; values that do not parse are shown verbatim.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return "N/A".to_string(),
    };

    parse_timestamp(raw)
        .map(|dt| dt.format("%d/%m/%Y, %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
