//! Thread renderer: the displayed side of a chat session.
//!
//! A projection of session state, updated by draining the EventBus. Each
//! event becomes zero or more `ThreadPatch`es that the app applies to the
//! DOM. The renderer never initiates network calls.

use ava_types::event::ChatEvent;
use ava_types::message::Message;
use crate::views::chat::{entry_dom_id, message_node, pending_node, status_node};

/// A displayed entry. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    pub id: u64,
    pub message: Message,
}

/// One DOM change, already rendered to escaped markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadPatch {
    /// Insert at the end of the message list and scroll `anchor_id` into view
    Append { html: String, anchor_id: String },
    /// Remove every pending placeholder
    RemovePending,
    /// Replace the availability indicator
    Status { html: String },
    SetOpen(bool),
    SetBusy(bool),
}

#[derive(Debug, Default)]
pub struct Thread {
    entries: Vec<ThreadEntry>,
    next_id: u64,
    pending: bool,
    busy: bool,
    open: bool,
    online: Option<bool>,
}

impl Thread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn online(&self) -> Option<bool> {
        self.online
    }

    /// Id of the newest entry, the auto-scroll target
    pub fn latest_entry_id(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.id)
    }

    /// Append a message; returns its patch
    pub fn append(&mut self, message: Message) -> ThreadPatch {
        let entry = ThreadEntry {
            id: self.next_id,
            message,
        };
        self.next_id += 1;
        let patch = ThreadPatch::Append {
            html: message_node(&entry).render(),
            anchor_id: entry_dom_id(entry.id),
        };
        log::debug!("Thread entry {} appended ({:?})", entry.id, entry.message.sender);
        self.entries.push(entry);
        patch
    }

    /// Show the placeholder unless one is already visible
    pub fn show_pending(&mut self) -> Option<ThreadPatch> {
        if self.pending {
            return None;
        }
        self.pending = true;
        log::debug!("Pending placeholder shown");
        Some(ThreadPatch::Append {
            html: pending_node().render(),
            anchor_id: String::new(),
        })
    }

    /// Always safe to call; removes every placeholder
    pub fn clear_pending(&mut self) -> ThreadPatch {
        if self.pending {
            log::debug!("Pending placeholder cleared");
        }
        self.pending = false;
        ThreadPatch::RemovePending
    }

    /// Process events from the EventBus and collect the DOM changes
    pub fn process_events(&mut self, events: Vec<ChatEvent>) -> Vec<ThreadPatch> {
        let mut patches = Vec::new();
        for event in events {
            match event {
                ChatEvent::Opened => {
                    self.open = true;
                    patches.push(ThreadPatch::SetOpen(true));
                }
                ChatEvent::Closed => {
                    self.open = false;
                    patches.push(ThreadPatch::SetOpen(false));
                }
                ChatEvent::Appended(message) => {
                    // A reply replaces the placeholder
                    if self.pending {
                        patches.push(self.clear_pending());
                    }
                    patches.push(self.append(message));
                }
                ChatEvent::PendingStarted => {
                    self.busy = true;
                    patches.push(ThreadPatch::SetBusy(true));
                    patches.extend(self.show_pending());
                }
                ChatEvent::PendingFinished => {
                    self.busy = false;
                    patches.push(self.clear_pending());
                    patches.push(ThreadPatch::SetBusy(false));
                }
                ChatEvent::AvailabilityChanged { online } => {
                    self.online = Some(online);
                    patches.push(ThreadPatch::Status {
                        html: status_node(Some(online)).render(),
                    });
                }
            }
        }
        patches
    }

    /// Full message list markup, for an initial mount
    pub fn render(&self) -> String {
        let mut html: String = self
            .entries
            .iter()
            .map(|entry| message_node(entry).render())
            .collect();
        if self.pending {
            html.push_str(&pending_node().render());
        }
        html
    }
}
