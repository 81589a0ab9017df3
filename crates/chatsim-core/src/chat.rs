/// ChatCore — the context object a session layer drives.
///
/// Owns the [`Directory`] and the [`MailRouter`] and exposes the full
/// operation surface by name. Nothing is global: two `ChatCore`s are two
/// independent worlds.
use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::ChatConfig;
use crate::directory::{Directory, UserSummary};
use crate::error::Result;
use crate::friends;
use crate::group::{self, Group};
use crate::router::{MailRouter, RouterStats, SendReport};
use crate::types::UserId;

pub struct ChatCore {
    directory: Directory,
    router: MailRouter,
}

impl Default for ChatCore {
    fn default() -> Self {
        Self::new(ChatConfig::new())
    }
}

impl ChatCore {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            directory: Directory::new(&config),
            router: MailRouter::new(&config),
        }
    }

    /// Read access to the underlying records.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    // ── Directory ────────────────────────────────────────────────────────

    pub fn register(&mut self, name: &str) -> Result<UserId> {
        let id = self.directory.register(name)?;
        info!("registered {name} as {id}");
        Ok(id)
    }

    pub fn find(&self, name: &str) -> Result<UserId> {
        self.directory.find(name)
    }

    /// Every user in registration order with presence and queue depth.
    pub fn list_users(&self) -> Vec<UserSummary> {
        self.directory.users().map(|u| u.summary()).collect()
    }

    // ── Friends ──────────────────────────────────────────────────────────

    /// Returns `true` if a new friendship was created.
    pub fn add_friend(&mut self, a: &str, b: &str) -> Result<bool> {
        friends::add_friend(&mut self.directory, a, b)
    }

    pub fn remove_friend(&mut self, a: &str, b: &str) -> Result<()> {
        friends::remove_friend(&mut self.directory, a, b)
    }

    pub fn is_friend(&self, a: &str, b: &str) -> bool {
        friends::is_friend(&self.directory, a, b)
    }

    pub fn friends_of(&self, user: &str) -> Result<&BTreeSet<String>> {
        friends::friends_of(&self.directory, user)
    }

    // ── Groups ───────────────────────────────────────────────────────────

    pub fn create_group(&mut self, name: &str, owner: &str) -> Result<()> {
        group::create_group(&mut self.directory, name, owner)?;
        info!("group {name} created by {owner}");
        Ok(())
    }

    /// Returns `true` if `user` was not already a member.
    pub fn join(&mut self, group: &str, user: &str) -> Result<bool> {
        group::join(&mut self.directory, group, user)
    }

    pub fn leave(&mut self, group: &str, user: &str) -> Result<()> {
        group::leave(&mut self.directory, group, user)
    }

    pub fn delete_group(&mut self, group: &str, requester: &str) -> Result<Group> {
        let removed = group::delete_group(&mut self.directory, group, requester)?;
        info!("group {group} deleted by {requester}");
        Ok(removed)
    }

    pub fn members_of(&self, group: &str) -> Result<&BTreeSet<String>> {
        group::members_of(&self.directory, group)
    }

    pub fn is_member(&self, group: &str, user: &str) -> bool {
        group::is_member(&self.directory, group, user)
    }

    /// Every group in creation order.
    pub fn list_groups(&self) -> Vec<&Group> {
        self.directory.groups().collect()
    }

    // ── Messaging ────────────────────────────────────────────────────────

    pub fn send_direct(&mut self, from: &str, to: &str, body: &str) -> Result<SendReport> {
        self.router.send_direct(&mut self.directory, from, to, body)
    }

    pub fn send_group(&mut self, from: &str, group: &str, body: &str) -> Result<SendReport> {
        self.router.send_group(&mut self.directory, from, group, body)
    }

    // ── Presence ─────────────────────────────────────────────────────────

    /// Bring `user` online and flush their pending queue into history.
    ///
    /// Returns the lines that were waiting, oldest first.
    pub fn on_login(&mut self, user: &str) -> Result<&[String]> {
        let flushed = self.directory.get_mut(user)?.mailbox_mut().on_login();
        self.router.record_flush(flushed.len());
        info!("{user} logged in, {} offline messages", flushed.len());
        Ok(flushed)
    }

    pub fn on_logout(&mut self, user: &str) -> Result<()> {
        self.directory.get_mut(user)?.mailbox_mut().on_logout();
        info!("{user} logged out");
        Ok(())
    }

    pub fn is_online(&self, user: &str) -> Result<bool> {
        self.directory.get(user).map(|u| u.is_online())
    }

    /// Delivered history of `user`; pending lines stay hidden until login.
    pub fn view_history(&self, user: &str) -> Result<&[String]> {
        let history = self.directory.get(user)?.mailbox().history();
        debug!("{user}: {} history lines", history.len());
        Ok(history)
    }

    pub fn has_pending(&self, user: &str) -> Result<bool> {
        self.directory.get(user).map(|u| u.mailbox().has_pending())
    }

    pub fn stats(&self) -> &RouterStats {
        self.router.stats()
    }
}
