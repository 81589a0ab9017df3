use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ChatError, Result};

/// Registration handle for a user.
///
/// Issued by [`Directory::register`](crate::Directory::register) in
/// registration order. Users are never deleted, so an id stays valid for
/// the lifetime of the directory that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub(crate) usize);

impl UserId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

/// Check a user or group name.
///
/// Input trimming belongs to the session layer; here a name is rejected when
/// it is blank or longer than `max_len` bytes.
pub(crate) fn validate_name(name: &str, max_len: usize) -> Result<()> {
    if name.trim().is_empty() || name.len() > max_len {
        return Err(ChatError::InvalidName { name: name.into() });
    }
    Ok(())
}

/// Check a message body against the configured maximum.
pub(crate) fn validate_body(body: &str, max_len: usize) -> Result<()> {
    if body.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if body.len() > max_len {
        return Err(ChatError::MessageTooLarge {
            size: body.len(),
            max: max_len,
        });
    }
    Ok(())
}
