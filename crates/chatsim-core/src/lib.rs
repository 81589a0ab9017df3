//! chatsim core.
//!
//! In-memory social graph and message routing for a multi-user messaging
//! simulator: symmetric friendships, owned broadcast groups, and per-user
//! mailboxes that queue messages while their owner is offline and flush
//! them, in order, on the next login.
//!
//! Everything hangs off an explicit context object, [`ChatCore`]. The
//! component operations ([`friends`], [`group`], [`MailRouter`]) can also be
//! driven directly against a [`Directory`].

pub mod chat;
pub mod config;
pub mod directory;
pub mod error;
pub mod friends;
pub mod group;
pub mod line;
pub mod mailbox;
pub mod router;
pub mod types;

pub use chat::ChatCore;
pub use config::ChatConfig;
pub use directory::{Directory, User, UserSummary};
pub use error::{ChatError, Result};
pub use group::Group;
pub use mailbox::{DeliveryTarget, Mailbox, Presence};
pub use router::{Delivery, MailRouter, RouterStats, SendReport};
pub use types::UserId;
