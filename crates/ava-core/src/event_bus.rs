//! Outbox of `ChatEvent`s from a `ChatSession` to the widget's thread.
//!
//! A send or status check pushes events here while it runs; the widget
//! takes them as one batch on its next repaint. Within a batch only the
//! newest availability change survives, since the indicator shows a
//! single state.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use ava_types::event::ChatEvent;

/// Cloned handles share one queue.
#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<ChatEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: ChatEvent) {
        let mut queue = self.queue.borrow_mut();
        if matches!(event, ChatEvent::AvailabilityChanged { .. }) {
            queue.retain(|queued| !matches!(queued, ChatEvent::AvailabilityChanged { .. }));
        }
        queue.push_back(event);
    }

    /// Everything emitted since the last drain, oldest first
    pub fn drain(&self) -> Vec<ChatEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Like `drain`, but `None` when there is nothing to repaint
    pub fn take_batch(&self) -> Option<Vec<ChatEvent>> {
        let mut queue = self.queue.borrow_mut();
        if queue.is_empty() {
            return None;
        }
        Some(queue.drain(..).collect())
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}
