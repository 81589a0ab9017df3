//! Directory — the single owner of every user and group record.
//!
//! Friendship and membership operations in [`friends`](crate::friends) and
//! [`group`](crate::group) mutate relations inside these records; there is no
//! second copy anywhere.
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::group::Group;
use crate::mailbox::Mailbox;
use crate::types::{validate_name, UserId};

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    name: String,
    /// Friend names. Never contains `name`; kept symmetric by `friends`.
    friends: BTreeSet<String>,
    mailbox: Mailbox,
}

impl User {
    fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            friends: BTreeSet::new(),
            mailbox: Mailbox::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn friends(&self) -> &BTreeSet<String> {
        &self.friends
    }

    pub fn is_friend(&self, other: &str) -> bool {
        self.friends.contains(other)
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn is_online(&self) -> bool {
        self.mailbox.is_online()
    }

    pub(crate) fn friends_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.friends
    }

    pub(crate) fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.clone(),
            online: self.is_online(),
            friends: self.friends.len(),
            pending: self.mailbox.pending_len(),
        }
    }
}

/// Read-only view of a user for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub name: String,
    pub online: bool,
    pub friends: usize,
    pub pending: usize,
}

/// Registry of users and groups keyed by unique name.
#[derive(Debug, Clone)]
pub struct Directory {
    /// Users in registration order; `UserId` indexes this.
    users: Vec<User>,
    user_index: HashMap<String, UserId>,
    /// Groups in creation order.
    groups: Vec<Group>,
    max_users: usize,
    max_groups: usize,
    max_name_len: usize,
}

impl Directory {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            users: Vec::new(),
            user_index: HashMap::new(),
            groups: Vec::new(),
            max_users: config.max_users,
            max_groups: config.max_groups,
            max_name_len: config.max_name_len,
        }
    }

    // ── Users ────────────────────────────────────────────────────────────

    /// Register a new user, offline and with no friends or messages.
    pub fn register(&mut self, name: &str) -> Result<UserId> {
        validate_name(name, self.max_name_len)?;
        if self.user_index.contains_key(name) {
            return Err(ChatError::DuplicateName { name: name.into() });
        }
        if self.users.len() >= self.max_users {
            return Err(ChatError::CapacityExceeded {
                what: "users",
                limit: self.max_users,
            });
        }

        let id = UserId(self.users.len());
        self.users.push(User::new(name));
        self.user_index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look up a user by exact name.
    pub fn find(&self, name: &str) -> Result<UserId> {
        self.user_index
            .get(name)
            .copied()
            .ok_or_else(|| ChatError::unknown_user(name))
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.user_index.contains_key(name)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id.0)
    }

    /// Look up a user record by name.
    pub fn get(&self, name: &str) -> Result<&User> {
        let id = self.find(name)?;
        Ok(&self.users[id.0])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut User> {
        let id = self.find(name)?;
        Ok(&mut self.users[id.0])
    }

    pub(crate) fn user_mut(&mut self, id: UserId) -> &mut User {
        &mut self.users[id.0]
    }

    /// Borrow two distinct users mutably at once. `None` if `a == b`.
    pub(crate) fn pair_mut(&mut self, a: UserId, b: UserId) -> Option<(&mut User, &mut User)> {
        if a == b {
            return None;
        }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.users.split_at_mut(hi);
        let (low, high) = (&mut head[lo], &mut tail[0]);
        if a.0 < b.0 {
            Some((low, high))
        } else {
            Some((high, low))
        }
    }

    /// All users in registration order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // ── Groups ───────────────────────────────────────────────────────────

    pub fn group(&self, name: &str) -> Result<&Group> {
        self.groups
            .iter()
            .find(|g| g.name() == name)
            .ok_or_else(|| ChatError::unknown_group(name))
    }

    pub(crate) fn group_mut(&mut self, name: &str) -> Result<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.name() == name)
            .ok_or_else(|| ChatError::unknown_group(name))
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name() == name)
    }

    /// Store a new group. Name validity and owner existence are the
    /// caller's checks; uniqueness and capacity are enforced here.
    pub(crate) fn insert_group(&mut self, group: Group) -> Result<()> {
        if self.contains_group(group.name()) {
            return Err(ChatError::DuplicateGroup {
                name: group.name().into(),
            });
        }
        if self.groups.len() >= self.max_groups {
            return Err(ChatError::CapacityExceeded {
                what: "groups",
                limit: self.max_groups,
            });
        }
        self.groups.push(group);
        Ok(())
    }

    pub(crate) fn remove_group(&mut self, name: &str) -> Result<Group> {
        let pos = self
            .groups
            .iter()
            .position(|g| g.name() == name)
            .ok_or_else(|| ChatError::unknown_group(name))?;
        Ok(self.groups.remove(pos))
    }

    /// All groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn max_name_len(&self) -> usize {
        self.max_name_len
    }
}
