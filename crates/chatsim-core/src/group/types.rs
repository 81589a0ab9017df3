/// Group record.
///
/// One owner, fixed at creation, and an ordered member set that always
/// contains the owner.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named broadcast group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    name: String,
    owner: String,
    /// Member names, owner included. Ordered so fan-out is deterministic.
    members: BTreeSet<String>,
}

impl Group {
    /// New group whose only member is its owner.
    pub(crate) fn new(name: &str, owner: &str) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            members: BTreeSet::from([owner.to_string()]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn is_member(&self, user: &str) -> bool {
        self.members.contains(user)
    }

    pub fn is_owner(&self, user: &str) -> bool {
        self.owner == user
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Insert a member. Returns `false` if already present.
    pub(crate) fn add_member(&mut self, user: &str) -> bool {
        self.members.insert(user.to_string())
    }

    /// Remove a non-owner member. The owner is never removed here.
    pub(crate) fn remove_member(&mut self, user: &str) -> bool {
        if self.is_owner(user) {
            return false;
        }
        self.members.remove(user)
    }
}
