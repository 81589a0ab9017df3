/// Group lifecycle and membership operations.
///
/// Rules: the creator becomes owner and first member; joining twice is a
/// no-op; the owner can never leave, only delete the group.
use std::collections::BTreeSet;

use tracing::debug;

use crate::directory::Directory;
use crate::error::{ChatError, Result};
use crate::group::types::Group;
use crate::types::validate_name;

/// Create group `name` owned by `owner`.
pub fn create_group(dir: &mut Directory, name: &str, owner: &str) -> Result<()> {
    validate_name(name, dir.max_name_len())?;
    if !dir.contains_user(owner) {
        return Err(ChatError::unknown_user(owner));
    }
    dir.insert_group(Group::new(name, owner))?;
    debug!("group {name}: created by {owner}");
    Ok(())
}

/// Add `user` to `group`. Returns `false` if already a member.
pub fn join(dir: &mut Directory, group: &str, user: &str) -> Result<bool> {
    if !dir.contains_group(group) {
        return Err(ChatError::unknown_group(group));
    }
    if !dir.contains_user(user) {
        return Err(ChatError::unknown_user(user));
    }
    let joined = dir.group_mut(group)?.add_member(user);
    if joined {
        debug!("group {group}: {user} joined");
    }
    Ok(joined)
}

/// Remove `user` from `group`.
pub fn leave(dir: &mut Directory, group: &str, user: &str) -> Result<()> {
    let g = dir.group_mut(group)?;
    if !g.is_member(user) {
        return Err(ChatError::not_member(group, user));
    }
    if g.is_owner(user) {
        return Err(ChatError::OwnerCannotLeave {
            group: group.into(),
            user: user.into(),
        });
    }
    g.remove_member(user);
    debug!("group {group}: {user} left");
    Ok(())
}

/// Delete `group`. Only its owner may do this.
pub fn delete_group(dir: &mut Directory, group: &str, requester: &str) -> Result<Group> {
    let g = dir.group(group)?;
    if !g.is_owner(requester) {
        return Err(ChatError::NotOwner {
            group: group.into(),
            user: requester.into(),
        });
    }
    let removed = dir.remove_group(group)?;
    debug!("group {group}: deleted by {requester}");
    Ok(removed)
}

/// Members of `group`, owner included.
pub fn members_of<'a>(dir: &'a Directory, group: &str) -> Result<&'a BTreeSet<String>> {
    dir.group(group).map(|g| g.members())
}

/// Whether `user` belongs to `group`. Unknown groups have no members.
pub fn is_member(dir: &Directory, group: &str, user: &str) -> bool {
    dir.group(group).map(|g| g.is_member(user)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;

    fn directory(names: &[&str]) -> Directory {
        let mut dir = Directory::new(&ChatConfig::defaults());
        for name in names {
            dir.register(name).unwrap();
        }
        dir
    }

    fn members(dir: &Directory, group: &str) -> Vec<String> {
        members_of(dir, group).unwrap().iter().cloned().collect()
    }

    #[test]
    fn create_makes_owner_sole_member() {
        let mut dir = directory(&["alice"]);
        create_group(&mut dir, "g", "alice").unwrap();
        assert_eq!(members(&dir, "g"), ["alice"]);
        assert_eq!(dir.group("g").unwrap().owner(), "alice");
    }

    #[test]
    fn create_rejects_duplicate_and_unknown_owner() {
        let mut dir = directory(&["alice", "bob"]);
        create_group(&mut dir, "g", "alice").unwrap();
        assert_eq!(
            create_group(&mut dir, "g", "bob"),
            Err(ChatError::DuplicateGroup { name: "g".into() })
        );
        assert!(matches!(
            create_group(&mut dir, "h", "ghost"),
            Err(ChatError::UnknownUser { .. })
        ));
        assert!(matches!(
            create_group(&mut dir, " ", "alice"),
            Err(ChatError::InvalidName { .. })
        ));
        assert_eq!(dir.group_count(), 1);
    }

    #[test]
    fn join_is_idempotent() {
        let mut dir = directory(&["alice", "bob"]);
        create_group(&mut dir, "g", "alice").unwrap();
        assert_eq!(join(&mut dir, "g", "bob"), Ok(true));
        assert_eq!(join(&mut dir, "g", "bob"), Ok(false));
        assert_eq!(join(&mut dir, "g", "alice"), Ok(false));
        assert_eq!(members(&dir, "g"), ["alice", "bob"]);
    }

    #[test]
    fn join_errors() {
        let mut dir = directory(&["alice"]);
        create_group(&mut dir, "g", "alice").unwrap();
        assert!(matches!(
            join(&mut dir, "nope", "ghost"),
            Err(ChatError::UnknownGroup { .. })
        ));
        assert!(matches!(
            join(&mut dir, "g", "ghost"),
            Err(ChatError::UnknownUser { .. })
        ));
    }

    #[test]
    fn owner_cannot_leave() {
        let mut dir = directory(&["alice"]);
        create_group(&mut dir, "g", "alice").unwrap();
        assert_eq!(
            leave(&mut dir, "g", "alice"),
            Err(ChatError::OwnerCannotLeave {
                group: "g".into(),
                user: "alice".into()
            })
        );
        assert!(is_member(&dir, "g", "alice"));
    }

    #[test]
    fn leave_error_precedence() {
        let mut dir = directory(&["alice", "bob"]);
        create_group(&mut dir, "g", "alice").unwrap();
        assert!(matches!(
            leave(&mut dir, "x", "bob"),
            Err(ChatError::UnknownGroup { .. })
        ));
        assert!(matches!(
            leave(&mut dir, "g", "bob"),
            Err(ChatError::NotMember { .. })
        ));

        join(&mut dir, "g", "bob").unwrap();
        leave(&mut dir, "g", "bob").unwrap();
        assert!(!is_member(&dir, "g", "bob"));
    }

    #[test]
    fn delete_requires_owner() {
        let mut dir = directory(&["alice", "bob"]);
        create_group(&mut dir, "g", "alice").unwrap();
        join(&mut dir, "g", "bob").unwrap();

        assert!(matches!(
            delete_group(&mut dir, "g", "bob"),
            Err(ChatError::NotOwner { .. })
        ));
        assert!(dir.contains_group("g"));

        let deleted = delete_group(&mut dir, "g", "alice").unwrap();
        assert_eq!(deleted.member_count(), 2);
        assert!(!dir.contains_group("g"));
        assert!(!is_member(&dir, "g", "alice"));

        // The name is free again.
        create_group(&mut dir, "g", "bob").unwrap();
        assert_eq!(dir.group("g").unwrap().owner(), "bob");
    }
}
