//! FriendGraph — the symmetric friendship relation.
//!
//! Operates on the friend sets stored inside [`Directory`] users. Every
//! mutation resolves both endpoints before touching either set, so an edge
//! is always added or removed on both sides or not at all.
use std::collections::BTreeSet;

use tracing::debug;

use crate::directory::Directory;
use crate::error::{ChatError, Result};

/// Make `a` and `b` friends.
///
/// Returns `true` if a new edge was created, `false` if they already were
/// friends.
pub fn add_friend(dir: &mut Directory, a: &str, b: &str) -> Result<bool> {
    if a == b {
        return Err(ChatError::SelfFriend { name: a.into() });
    }
    let a_id = dir.find(a)?;
    let b_id = dir.find(b)?;

    let Some((ua, ub)) = dir.pair_mut(a_id, b_id) else {
        return Err(ChatError::SelfFriend { name: a.into() });
    };
    if ua.is_friend(b) {
        return Ok(false);
    }
    ua.friends_mut().insert(b.to_string());
    ub.friends_mut().insert(a.to_string());
    debug!("friends: {a} <-> {b}");
    Ok(true)
}

/// Remove the friendship between `a` and `b`.
pub fn remove_friend(dir: &mut Directory, a: &str, b: &str) -> Result<()> {
    if a == b {
        return Err(ChatError::SelfFriend { name: a.into() });
    }
    let a_id = dir.find(a)?;
    let b_id = dir.find(b)?;

    let Some((ua, ub)) = dir.pair_mut(a_id, b_id) else {
        return Err(ChatError::SelfFriend { name: a.into() });
    };
    if !ua.is_friend(b) {
        return Err(ChatError::NotFriends {
            from: a.into(),
            to: b.into(),
        });
    }
    ua.friends_mut().remove(b);
    ub.friends_mut().remove(a);
    debug!("friends: {a} -/- {b}");
    Ok(())
}

/// Whether `a` and `b` are friends. Unknown names are never friends.
pub fn is_friend(dir: &Directory, a: &str, b: &str) -> bool {
    dir.get(a).map(|u| u.is_friend(b)).unwrap_or(false)
}

/// Friend set of `user`.
pub fn friends_of<'a>(dir: &'a Directory, user: &str) -> Result<&'a BTreeSet<String>> {
    dir.get(user).map(|u| u.friends())
}
