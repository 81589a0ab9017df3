//! Message line formats.
//!
//! A line is built once, at send time, and stored verbatim in every mailbox
//! it reaches. Nothing downstream parses it back.

/// Sender's own copy of a direct message.
pub fn direct_outgoing(to: &str, body: &str) -> String {
    format!("You -> {to}: {body}")
}

/// Recipient's copy of a direct message.
pub fn direct_incoming(from: &str, body: &str) -> String {
    format!("{from} -> You: {body}")
}

/// Sender's own copy of a group message.
pub fn group_outgoing(group: &str, body: &str) -> String {
    format!("[{group}] You -> group: {body}")
}

/// A member's copy of a group message.
pub fn group_incoming(group: &str, from: &str, body: &str) -> String {
    format!("[{group}] {from} -> You: {body}")
}
