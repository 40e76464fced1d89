use serde::{Deserialize, Serialize};
use crate::message::Message;

/// Events emitted by the chat session.
/// The thread renderer drains these to update the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// Panel became visible
    Opened,

    /// Panel was hidden
    Closed,

    /// A message joins the end of the thread
    Appended(Message),

    /// An exchange is in flight; show the composing placeholder
    PendingStarted,

    /// The exchange settled; remove the composing placeholder
    PendingFinished,

    /// Result of a status poll that changed availability
    AvailabilityChanged { online: bool },
}
