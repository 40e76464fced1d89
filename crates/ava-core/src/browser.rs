//! Conversation browser: state behind the dashboard table.
//!
//! Every load replaces the whole row set. Loads are single-flight: a call
//! made while another is in flight is dropped, not queued.

use std::cell::RefCell;

use ava_types::{
    TransportError,
    conversation::{ConversationPage, ConversationSummary, PageQuery, Pagination, TimeFilter},
};
use crate::ports::{ConversationSource, StatusPort};

pub const NO_CONVERSATIONS: &str = "No conversations found";
pub const CONNECTION_ERROR: &str = "Connection error. Check your connection and try again.";

/// What the table body currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    NotLoaded,
    Loading,
    Rows(ConversationPage),
    Empty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Unknown,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Another load was in flight
    Dropped,
    Failed(TransportError),
}

#[derive(Debug, Clone)]
struct BrowserState {
    loading: bool,
    access: Access,
    query: PageQuery,
    view: TableView,
}

pub struct ConversationBrowser {
    page_size: u32,
    state: RefCell<BrowserState>,
}

impl ConversationBrowser {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            state: RefCell::new(BrowserState {
                loading: false,
                access: Access::Unknown,
                query: PageQuery::default(),
                view: TableView::NotLoaded,
            }),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn access(&self) -> Access {
        self.state.borrow().access
    }

    pub fn query(&self) -> PageQuery {
        self.state.borrow().query.clone()
    }

    pub fn view(&self) -> TableView {
        self.state.borrow().view.clone()
    }

    /// Control state for the rows on screen; `None` unless rows are shown
    pub fn pagination(&self) -> Option<Pagination> {
        match &self.state.borrow().view {
            TableView::Rows(page) => Some(Pagination::new(page.page, self.page_size, page.total)),
            _ => None,
        }
    }

    pub fn find(&self, id: i64) -> Option<ConversationSummary> {
        match &self.state.borrow().view {
            TableView::Rows(page) => page.rows.iter().find(|row| row.id == id).cloned(),
            _ => None,
        }
    }

    /// Query for the "previous" button, when enabled
    pub fn previous_query(&self) -> Option<PageQuery> {
        let pagination = self.pagination()?;
        (pagination.has_previous() && !self.is_loading())
            .then(|| self.query().with_page(pagination.page - 1))
    }

    /// Query for the "next" button, when enabled
    pub fn next_query(&self) -> Option<PageQuery> {
        let pagination = self.pagination()?;
        (pagination.has_next() && !self.is_loading())
            .then(|| self.query().with_page(pagination.page + 1))
    }

    /// A new search or filter always starts from the first page
    pub fn search_query(filter: TimeFilter, search: &str) -> PageQuery {
        PageQuery::new(1, filter, search)
    }

    /// Verify the dashboard session once via the status endpoint.
    pub async fn check_access<S>(&self, port: &S) -> Result<(), TransportError>
    where
        S: StatusPort + ?Sized,
    {
        if self.access() == Access::Granted {
            return Ok(());
        }

        let result = port.check_status().await;
        let mut state = self.state.borrow_mut();
        match result {
            Ok(_) => {
                state.access = Access::Granted;
                Ok(())
            }
            Err(e) => {
                state.access = if e.is_unauthenticated() {
                    log::warn!("Dashboard session not authenticated");
                    Access::Denied
                } else {
                    log::error!("Access check failed: {}", e);
                    Access::Unknown
                };
                Err(e)
            }
        }
    }

    /// Fetch and show one page. Dropped when a load is already in flight.
    pub async fn load<S>(&self, source: &S, query: PageQuery) -> LoadOutcome
    where
        S: ConversationSource + ?Sized,
    {
        {
            let mut state = self.state.borrow_mut();
            if state.loading {
                log::debug!("Load of page {} dropped: another load in flight", query.page);
                return LoadOutcome::Dropped;
            }
            state.loading = true;
            state.query = query.clone();
            state.view = TableView::Loading;
        }

        log::info!(
            "Loading conversations page={} filter={} search={:?}",
            query.page,
            query.filter.as_str(),
            query.search
        );
        let result = source.list_conversations(&query).await;

        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(page) if page.rows.is_empty() => {
                state.view = TableView::Empty(NO_CONVERSATIONS.to_string());
                LoadOutcome::Applied
            }
            Ok(page) => {
                log::info!("Loaded {} of {} conversations", page.rows.len(), page.total);
                state.view = TableView::Rows(page);
                LoadOutcome::Applied
            }
            Err(e) => {
                log::error!("Loading conversations failed: {}", e);
                let message = match &e {
                    TransportError::Application(message) => message.clone(),
                    _ => CONNECTION_ERROR.to_string(),
                };
                state.view = TableView::Empty(message);
                LoadOutcome::Failed(e)
            }
        }
    }
}
