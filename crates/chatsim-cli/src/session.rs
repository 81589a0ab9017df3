use anyhow::{anyhow, Context};
use chatsim_core::ChatCore;
use tracing::debug;

use crate::command::Command;
use crate::events::Event;

/// Single-session driver over a [`ChatCore`].
///
/// At most one user is logged in at a time. Logging in as someone else
/// first logs the current user out.
pub struct Session {
    core: ChatCore,
    current: Option<String>,
}

impl Session {
    pub fn new(core: ChatCore) -> Self {
        Self {
            core,
            current: None,
        }
    }

    pub fn core(&self) -> &ChatCore {
        &self.core
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Run one command. Failures become [`Event::Error`]; the session
    /// stays usable.
    pub fn execute(&mut self, command: Command) -> Event {
        debug!(?command, "execute");
        self.apply(command).unwrap_or_else(|e| Event::Error {
            message: format!("{e:#}"),
        })
    }

    fn me(&self) -> anyhow::Result<String> {
        self.current
            .clone()
            .ok_or_else(|| anyhow!("not logged in"))
    }

    fn apply(&mut self, command: Command) -> anyhow::Result<Event> {
        let event = match command {
            Command::Register(name) => {
                self.core.register(&name)?;
                Event::Registered { name }
            }
            Command::Login(name) => {
                self.core
                    .find(&name)
                    .with_context(|| format!("no user {name}, please register"))?;
                if let Some(previous) = self.current.take() {
                    self.core.on_logout(&previous)?;
                }
                let offline_messages = self.core.on_login(&name)?.to_vec();
                self.current = Some(name.clone());
                Event::LoggedIn {
                    name,
                    offline_messages,
                }
            }
            Command::Logout => {
                let name = self.me()?;
                self.core.on_logout(&name)?;
                self.current = None;
                Event::LoggedOut { name }
            }
            Command::Users => Event::Users {
                users: self.core.list_users(),
            },
            Command::Friends => {
                let name = self.me()?;
                let friends = self.core.friends_of(&name)?.iter().cloned().collect();
                Event::Friends { name, friends }
            }
            Command::AddFriend(friend) => {
                let name = self.me()?;
                let created = self.core.add_friend(&name, &friend)?;
                Event::FriendAdded {
                    name,
                    friend,
                    created,
                }
            }
            Command::Unfriend(friend) => {
                let name = self.me()?;
                self.core.remove_friend(&name, &friend)?;
                Event::FriendRemoved { name, friend }
            }
            Command::Send { to, body } => {
                let from = self.me()?;
                let report = self.core.send_direct(&from, &to, &body)?;
                Event::Sent { from, report }
            }
            Command::History => {
                let name = self.me()?;
                let lines = self.core.view_history(&name)?.to_vec();
                Event::History { name, lines }
            }
            Command::CreateGroup(group) => {
                let owner = self.me()?;
                self.core.create_group(&group, &owner)?;
                Event::GroupCreated { group, owner }
            }
            Command::Join(group) => {
                let name = self.me()?;
                let created = self.core.join(&group, &name)?;
                Event::Joined {
                    group,
                    name,
                    created,
                }
            }
            Command::Leave(group) => {
                let name = self.me()?;
                self.core.leave(&group, &name)?;
                Event::Left { group, name }
            }
            Command::DeleteGroup(group) => {
                let name = self.me()?;
                self.core.delete_group(&group, &name)?;
                Event::GroupDeleted { group }
            }
            Command::Groups => Event::Groups {
                groups: self.core.list_groups().into_iter().cloned().collect(),
            },
            Command::SendGroup { group, body } => {
                let from = self.me()?;
                let report = self.core.send_group(&from, &group, &body)?;
                Event::GroupSent {
                    from,
                    group,
                    report,
                }
            }
            Command::Stats => Event::Stats {
                stats: self.core.stats().clone(),
            },
        };
        Ok(event)
    }
}
