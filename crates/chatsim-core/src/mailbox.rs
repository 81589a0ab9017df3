//! Mailbox — per-user message storage.
//!
//! Two-state machine (Online / Offline) driven only by login and logout.
//! Lines recorded while online go straight to history; lines recorded while
//! offline wait in a FIFO pending queue until the next login flushes them.
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Whether a user currently has an active session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    Online,
    #[default]
    Offline,
}

/// Where a recorded line ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryTarget {
    /// Appended to history; visible immediately.
    History,
    /// Queued until the recipient's next login.
    Pending,
}

/// A user's delivered history plus the queue of lines received offline.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    presence: Presence,
    /// Delivered lines, chronological, append-only.
    history: Vec<String>,
    /// Lines received while offline, oldest first.
    pending: VecDeque<String>,
}

impl Mailbox {
    /// A fresh, offline, empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn is_online(&self) -> bool {
        self.presence == Presence::Online
    }

    /// Record an incoming line according to the current presence.
    pub fn record(&mut self, line: String) -> DeliveryTarget {
        match self.presence {
            Presence::Online => {
                self.history.push(line);
                DeliveryTarget::History
            }
            Presence::Offline => {
                self.pending.push_back(line);
                DeliveryTarget::Pending
            }
        }
    }

    /// Append the sender's own copy of an outgoing message.
    ///
    /// Own copies always go to history, whatever the presence.
    pub fn append_own(&mut self, line: String) {
        self.history.push(line);
    }

    /// Go online and flush pending into history.
    ///
    /// Returns the flushed batch, which is the tail of history. `&mut self`
    /// keeps any `record` from landing inside the batch.
    pub fn on_login(&mut self) -> &[String] {
        self.presence = Presence::Online;
        let start = self.history.len();
        self.history.extend(self.pending.drain(..));
        &self.history[start..]
    }

    /// Go offline. History and pending are left as they are.
    pub fn on_logout(&mut self) {
        self.presence = Presence::Offline;
    }

    /// Delivered history. Pending lines are not included.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
