use std::fmt;
use std::io::{self, Write};

use chatsim_core::{Group, RouterStats, SendReport, UserSummary};
use serde::Serialize;

/// Output format for session events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable lines, close to the classic menu output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Result of one session command.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Registered { name: String },
    LoggedIn { name: String, offline_messages: Vec<String> },
    LoggedOut { name: String },
    Users { users: Vec<UserSummary> },
    Friends { name: String, friends: Vec<String> },
    FriendAdded { name: String, friend: String, created: bool },
    FriendRemoved { name: String, friend: String },
    Sent { from: String, report: SendReport },
    GroupSent { from: String, group: String, report: SendReport },
    History { name: String, lines: Vec<String> },
    GroupCreated { group: String, owner: String },
    Joined { group: String, name: String, created: bool },
    Left { group: String, name: String },
    GroupDeleted { group: String },
    Groups { groups: Vec<Group> },
    Stats { stats: RouterStats },
    Error { message: String },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Registered { name } => write!(f, "Registered '{name}'"),
            Event::LoggedIn {
                name,
                offline_messages,
            } => {
                write!(f, "Welcome, {name}")?;
                if !offline_messages.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "+------ Offline messages ------+")?;
                    for line in offline_messages {
                        writeln!(f, "{line}")?;
                    }
                    write!(f, "+-----------------------------+")?;
                }
                Ok(())
            }
            Event::LoggedOut { name } => write!(f, "Logged out {name}"),
            Event::Users { users } => {
                if users.is_empty() {
                    return write!(f, "(no users)");
                }
                let lines: Vec<String> = users
                    .iter()
                    .map(|u| {
                        let online = if u.online { " (online)" } else { "" };
                        format!(" - {}{online}", u.name)
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Event::Friends { name, friends } => {
                if friends.is_empty() {
                    return write!(f, "(no friends)");
                }
                write!(f, "Friends of {name}: {}", friends.join(", "))
            }
            Event::FriendAdded {
                name,
                friend,
                created,
            } => {
                if *created {
                    write!(f, "Now friends: {name} <-> {friend}")
                } else {
                    write!(f, "Already friend")
                }
            }
            Event::FriendRemoved { name, friend } => {
                write!(f, "No longer friends: {name} <-> {friend}")
            }
            Event::Sent { report, .. } => {
                if report.queued() > 0 {
                    write!(f, "Sent. (recipient offline, queued)")
                } else {
                    write!(f, "Sent.")
                }
            }
            Event::GroupSent { report, .. } => write!(
                f,
                "Group message sent ({} live, {} queued)",
                report.live(),
                report.queued()
            ),
            Event::History { lines, .. } => {
                if lines.is_empty() {
                    return write!(f, "(no history)");
                }
                write!(f, "{}", lines.join("\n"))
            }
            Event::GroupCreated { group, .. } => write!(f, "Created #{group}"),
            Event::Joined { group, created, .. } => {
                if *created {
                    write!(f, "Joined #{group}")
                } else {
                    write!(f, "Already member")
                }
            }
            Event::Left { group, .. } => write!(f, "Left #{group}"),
            Event::GroupDeleted { group } => write!(f, "Deleted #{group}"),
            Event::Groups { groups } => {
                if groups.is_empty() {
                    return write!(f, "(no groups)");
                }
                let lines: Vec<String> = groups
                    .iter()
                    .map(|g| {
                        let members: Vec<&str> = g.members().iter().map(String::as_str).collect();
                        format!(
                            " #{} (owner:{}) members: {}",
                            g.name(),
                            g.owner(),
                            members.join(", ")
                        )
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Event::Stats { stats } => write!(
                f,
                "direct={} group={} live={} queued={} flushed={}",
                stats.direct_sent,
                stats.group_sent,
                stats.delivered_live,
                stats.queued_offline,
                stats.flushed
            ),
            Event::Error { message } => write!(f, "error: {message}"),
        }
    }
}

/// Write one event to `out` in the requested format, flushed immediately
/// for piped output.
pub fn emit<W: Write>(out: &mut W, event: &Event, format: Format) -> io::Result<()> {
    match format {
        Format::Text => writeln!(out, "{event}")?,
        Format::Json => {
            let json = serde_json::to_string(event).map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_tagged() {
        let mut out = Vec::new();
        emit(
            &mut out,
            &Event::Registered {
                name: "alice".into(),
            },
            Format::Json,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"event\":\"registered\",\"name\":\"alice\"}\n");
    }

    #[test]
    fn text_login_banner() {
        let event = Event::LoggedIn {
            name: "bob".into(),
            offline_messages: vec!["alice -> You: hi".into()],
        };
        let text = event.to_string();
        assert!(text.starts_with("Welcome, bob\n"));
        assert!(text.contains("Offline messages"));
        assert!(text.contains("alice -> You: hi"));
    }

    #[test]
    fn text_empty_listings() {
        assert_eq!(Event::Groups { groups: vec![] }.to_string(), "(no groups)");
        assert_eq!(Event::Users { users: vec![] }.to_string(), "(no users)");
        assert_eq!(
            Event::History {
                name: "a".into(),
                lines: vec![]
            }
            .to_string(),
            "(no history)"
        );
    }
}
