/// MailRouter — decides where each copy of a message goes.
///
/// Pure decision logic over the [`Directory`]: validate the send, write the
/// sender's own copy to history, then hand each recipient copy to that
/// recipient's mailbox, which files it under history (online) or pending
/// (offline). All checks run before the first write.
use serde::{Deserialize, Serialize};
use tracing::debug;

use chatsim_metrics::Counter;

use crate::config::ChatConfig;
use crate::directory::Directory;
use crate::error::{ChatError, Result};
use crate::line;
use crate::mailbox::DeliveryTarget;
use crate::types::{validate_body, UserId};

// ── Reports ────────────────────────────────────────────────────────────

/// One recipient copy and where it landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub recipient: String,
    pub target: DeliveryTarget,
}

/// Outcome of a successful send, one entry per recipient.
///
/// The sender's own copy is not listed; it always goes to history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReport {
    pub deliveries: Vec<Delivery>,
}

impl SendReport {
    /// Recipients whose copy is visible now.
    pub fn live(&self) -> usize {
        self.count(DeliveryTarget::History)
    }

    /// Recipients whose copy waits for their next login.
    pub fn queued(&self) -> usize {
        self.count(DeliveryTarget::Pending)
    }

    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.deliveries.iter().map(|d| d.recipient.as_str())
    }

    fn count(&self, target: DeliveryTarget) -> usize {
        self.deliveries.iter().filter(|d| d.target == target).count()
    }
}

/// Running delivery statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterStats {
    /// Direct messages accepted.
    pub direct_sent: Counter,
    /// Group messages accepted.
    pub group_sent: Counter,
    /// Recipient copies appended straight to history.
    pub delivered_live: Counter,
    /// Recipient copies queued as pending.
    pub queued_offline: Counter,
    /// Pending copies moved into history by a login flush.
    pub flushed: Counter,
}

// ── Router ─────────────────────────────────────────────────────────────

/// Routes direct and group messages into mailboxes.
pub struct MailRouter {
    max_message_len: usize,
    stats: RouterStats,
}

impl MailRouter {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            max_message_len: config.max_message_len,
            stats: RouterStats::default(),
        }
    }

    pub fn stats(&self) -> &RouterStats {
        &self.stats
    }

    /// Send `body` from `from` to their friend `to`.
    pub fn send_direct(
        &self,
        dir: &mut Directory,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<SendReport> {
        let from_id = dir.find(from)?;
        let to_id = dir.find(to)?;
        let not_friends = || ChatError::NotFriends {
            from: from.into(),
            to: to.into(),
        };
        if !dir.get(from)?.is_friend(to) {
            return Err(not_friends());
        }
        validate_body(body, self.max_message_len)?;

        // Friend sets never contain their owner, so the ids differ here.
        let (sender, recipient) = dir.pair_mut(from_id, to_id).ok_or_else(not_friends)?;
        sender
            .mailbox_mut()
            .append_own(line::direct_outgoing(to, body));
        let target = recipient
            .mailbox_mut()
            .record(line::direct_incoming(from, body));

        self.stats.direct_sent.inc();
        self.count(target);
        debug!("direct {from} -> {to}: {target:?}");

        Ok(SendReport {
            deliveries: vec![Delivery {
                recipient: to.into(),
                target,
            }],
        })
    }

    /// Broadcast `body` from member `from` to every other member of `group`.
    pub fn send_group(
        &self,
        dir: &mut Directory,
        from: &str,
        group: &str,
        body: &str,
    ) -> Result<SendReport> {
        let g = dir.group(group)?;
        if !g.is_member(from) {
            return Err(ChatError::not_member(group, from));
        }
        validate_body(body, self.max_message_len)?;

        let sender_id = dir.find(from)?;
        let recipients: Vec<(UserId, String)> = g
            .members()
            .iter()
            .filter(|m| m.as_str() != from)
            .map(|m| dir.find(m).map(|id| (id, m.clone())))
            .collect::<Result<_>>()?;

        dir.user_mut(sender_id)
            .mailbox_mut()
            .append_own(line::group_outgoing(group, body));

        let incoming = line::group_incoming(group, from, body);
        let mut deliveries = Vec::with_capacity(recipients.len());
        for (id, name) in recipients {
            let target = dir.user_mut(id).mailbox_mut().record(incoming.clone());
            self.count(target);
            deliveries.push(Delivery {
                recipient: name,
                target,
            });
        }

        self.stats.group_sent.inc();
        debug!(
            "group {group}: {from} fanned out to {} members",
            deliveries.len()
        );

        Ok(SendReport { deliveries })
    }

    /// Note `n` pending copies flushed by a login.
    pub fn record_flush(&self, n: usize) {
        self.stats.flushed.inc_by(n as u64);
    }

    fn count(&self, target: DeliveryTarget) {
        match target {
            DeliveryTarget::History => self.stats.delivered_live.inc(),
            DeliveryTarget::Pending => self.stats.queued_offline.inc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{friends, group};

    struct Fixture {
        dir: Directory,
        router: MailRouter,
    }

    fn fixture(names: &[&str]) -> Fixture {
        let config = ChatConfig::defaults();
        let mut dir = Directory::new(&config);
        for name in names {
            dir.register(name).unwrap();
        }
        Fixture {
            dir,
            router: MailRouter::new(&config),
        }
    }

    fn history(dir: &Directory, user: &str) -> Vec<String> {
        dir.get(user).unwrap().mailbox().history().to_vec()
    }

    fn login(dir: &mut Directory, user: &str) {
        dir.get_mut(user).unwrap().mailbox_mut().on_login();
    }

    #[test]
    fn direct_to_online_friend() {
        let mut f = fixture(&["alice", "bob"]);
        friends::add_friend(&mut f.dir, "alice", "bob").unwrap();
        login(&mut f.dir, "bob");

        let report = f.router.send_direct(&mut f.dir, "alice", "bob", "hi").unwrap();
        assert_eq!(report.live(), 1);
        assert_eq!(report.queued(), 0);
        assert_eq!(history(&f.dir, "alice"), ["You -> bob: hi"]);
        assert_eq!(history(&f.dir, "bob"), ["alice -> You: hi"]);
        assert_eq!(f.router.stats().delivered_live, 1);
    }

    #[test]
    fn direct_to_offline_friend_is_queued() {
        let mut f = fixture(&["alice", "bob"]);
        friends::add_friend(&mut f.dir, "alice", "bob").unwrap();

        let report = f.router.send_direct(&mut f.dir, "alice", "bob", "hi").unwrap();
        assert_eq!(
            report.deliveries,
            [Delivery {
                recipient: "bob".into(),
                target: DeliveryTarget::Pending
            }]
        );
        assert!(history(&f.dir, "bob").is_empty());
        assert!(f.dir.get("bob").unwrap().mailbox().has_pending());
        // The sender copy lands even though alice is offline too.
        assert_eq!(history(&f.dir, "alice"), ["You -> bob: hi"]);
        assert_eq!(f.router.stats().queued_offline, 1);
    }

    #[test]
    fn direct_to_stranger_mutates_nothing() {
        let mut f = fixture(&["alice", "bob"]);
        let err = f
            .router
            .send_direct(&mut f.dir, "alice", "bob", "hi")
            .unwrap_err();
        assert_eq!(
            err,
            ChatError::NotFriends {
                from: "alice".into(),
                to: "bob".into()
            }
        );
        assert!(history(&f.dir, "alice").is_empty());
        assert!(!f.dir.get("bob").unwrap().mailbox().has_pending());
        assert_eq!(f.router.stats().direct_sent, 0);
    }

    #[test]
    fn direct_error_order() {
        let mut f = fixture(&["alice", "bob"]);
        assert!(matches!(
            f.router.send_direct(&mut f.dir, "alice", "ghost", ""),
            Err(ChatError::UnknownUser { .. })
        ));
        assert!(matches!(
            f.router.send_direct(&mut f.dir, "alice", "bob", ""),
            Err(ChatError::NotFriends { .. })
        ));
        friends::add_friend(&mut f.dir, "alice", "bob").unwrap();
        assert_eq!(
            f.router.send_direct(&mut f.dir, "alice", "bob", "  "),
            Err(ChatError::EmptyMessage)
        );
        assert!(history(&f.dir, "alice").is_empty());
    }

    #[test]
    fn direct_to_self_is_not_friends() {
        let mut f = fixture(&["alice"]);
        assert!(matches!(
            f.router.send_direct(&mut f.dir, "alice", "alice", "hi"),
            Err(ChatError::NotFriends { .. })
        ));
    }

    #[test]
    fn oversized_body_rejected() {
        let config = ChatConfig::defaults().max_message_len(4);
        let mut dir = Directory::new(&config);
        dir.register("alice").unwrap();
        dir.register("bob").unwrap();
        friends::add_friend(&mut dir, "alice", "bob").unwrap();
        let router = MailRouter::new(&config);

        assert_eq!(
            router.send_direct(&mut dir, "alice", "bob", "hello"),
            Err(ChatError::MessageTooLarge { size: 5, max: 4 })
        );
        assert!(router.send_direct(&mut dir, "alice", "bob", "hey!").is_ok());
    }

    #[test]
    fn group_fanout_skips_sender() {
        let mut f = fixture(&["alice", "bob", "carol"]);
        group::create_group(&mut f.dir, "g", "alice").unwrap();
        group::join(&mut f.dir, "g", "bob").unwrap();
        group::join(&mut f.dir, "g", "carol").unwrap();
        login(&mut f.dir, "bob");

        let report = f.router.send_group(&mut f.dir, "alice", "g", "yo").unwrap();
        assert_eq!(report.recipients().collect::<Vec<_>>(), ["bob", "carol"]);
        assert_eq!(report.live(), 1);
        assert_eq!(report.queued(), 1);

        assert_eq!(history(&f.dir, "alice"), ["[g] You -> group: yo"]);
        assert_eq!(history(&f.dir, "bob"), ["[g] alice -> You: yo"]);
        login(&mut f.dir, "carol");
        assert_eq!(history(&f.dir, "carol"), ["[g] alice -> You: yo"]);
        assert_eq!(f.router.stats().group_sent, 1);
    }

    #[test]
    fn group_send_requires_membership() {
        let mut f = fixture(&["alice", "bob"]);
        group::create_group(&mut f.dir, "g", "alice").unwrap();

        assert!(matches!(
            f.router.send_group(&mut f.dir, "bob", "g", "hi"),
            Err(ChatError::NotMember { .. })
        ));
        assert!(matches!(
            f.router.send_group(&mut f.dir, "bob", "nope", "hi"),
            Err(ChatError::UnknownGroup { .. })
        ));
        assert!(history(&f.dir, "bob").is_empty());
        assert!(history(&f.dir, "alice").is_empty());
    }

    #[test]
    fn group_of_one_only_stores_own_copy() {
        let mut f = fixture(&["alice"]);
        group::create_group(&mut f.dir, "solo", "alice").unwrap();
        let report = f.router.send_group(&mut f.dir, "alice", "solo", "echo").unwrap();
        assert!(report.deliveries.is_empty());
        assert_eq!(history(&f.dir, "alice"), ["[solo] You -> group: echo"]);
    }

    #[test]
    fn flush_counter() {
        let f = fixture(&[]);
        f.router.record_flush(3);
        assert_eq!(f.router.stats().flushed, 3);
    }
}
