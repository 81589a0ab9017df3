/// Errors returned by the chatsim core.
///
/// Every variant is reported to the immediate caller. No operation that
/// returns one of these has mutated any user, group or mailbox.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("unknown user: {name}")]
    UnknownUser { name: String },

    #[error("unknown group: {name}")]
    UnknownGroup { name: String },

    #[error("user already exists: {name}")]
    DuplicateName { name: String },

    #[error("group already exists: {name}")]
    DuplicateGroup { name: String },

    #[error("invalid name: {name:?}")]
    InvalidName { name: String },

    #[error("{name} cannot befriend themselves")]
    SelfFriend { name: String },

    #[error("{from} and {to} are not friends")]
    NotFriends { from: String, to: String },

    #[error("{user} is not a member of {group}")]
    NotMember { group: String, user: String },

    #[error("owner {user} cannot leave {group}; delete the group instead")]
    OwnerCannotLeave { group: String, user: String },

    #[error("only the owner can delete {group} ({user} is not)")]
    NotOwner { group: String, user: String },

    #[error("capacity exceeded: at most {limit} {what}")]
    CapacityExceeded { what: &'static str, limit: usize },

    #[error("message is empty")]
    EmptyMessage,

    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    pub(crate) fn unknown_user(name: &str) -> Self {
        ChatError::UnknownUser { name: name.into() }
    }

    pub(crate) fn unknown_group(name: &str) -> Self {
        ChatError::UnknownGroup { name: name.into() }
    }

    pub(crate) fn not_member(group: &str, user: &str) -> Self {
        ChatError::NotMember {
            group: group.into(),
            user: user.into(),
        }
    }
}
