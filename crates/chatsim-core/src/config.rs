/// Limits for a [`ChatCore`](crate::ChatCore).
///
/// Defaults mirror the classic simulator: 200 users, 50 groups, names up to
/// 49 bytes and message bodies up to 1023 bytes. Use the builder pattern:
///
/// ```rust
/// use chatsim_core::ChatConfig;
///
/// let config = ChatConfig::new()
///     .max_users(10)
///     .max_groups(2);
/// ```
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Maximum number of registered users.
    pub(crate) max_users: usize,
    /// Maximum number of live groups.
    pub(crate) max_groups: usize,
    /// Maximum user or group name length in bytes.
    pub(crate) max_name_len: usize,
    /// Maximum message body length in bytes.
    pub(crate) max_message_len: usize,
}

pub const DEFAULT_MAX_USERS: usize = 200;
pub const DEFAULT_MAX_GROUPS: usize = 50;
pub const DEFAULT_MAX_NAME_LEN: usize = 49;
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 1023;

/// Environment override for [`ChatConfig::max_users`].
pub const ENV_MAX_USERS: &str = "CHATSIM_MAX_USERS";
/// Environment override for [`ChatConfig::max_groups`].
pub const ENV_MAX_GROUPS: &str = "CHATSIM_MAX_GROUPS";

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatConfig {
    /// Create a config with defaults.
    ///
    /// If `CHATSIM_MAX_USERS` or `CHATSIM_MAX_GROUPS` hold a valid number,
    /// they replace the default limits. Unparseable values are ignored. The
    /// builder methods override both.
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a config with defaults and no environment overrides.
    pub fn defaults() -> Self {
        Self {
            max_users: DEFAULT_MAX_USERS,
            max_groups: DEFAULT_MAX_GROUPS,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str, default: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            max_users: parse(ENV_MAX_USERS, DEFAULT_MAX_USERS),
            max_groups: parse(ENV_MAX_GROUPS, DEFAULT_MAX_GROUPS),
            ..Self::defaults()
        }
    }

    /// Set the maximum number of registered users (default: 200).
    pub fn max_users(mut self, limit: usize) -> Self {
        self.max_users = limit;
        self
    }

    /// Set the maximum number of groups (default: 50).
    pub fn max_groups(mut self, limit: usize) -> Self {
        self.max_groups = limit;
        self
    }

    /// Set the maximum name length in bytes (default: 49).
    pub fn max_name_len(mut self, bytes: usize) -> Self {
        self.max_name_len = bytes;
        self
    }

    /// Set the maximum message body length in bytes (default: 1023).
    pub fn max_message_len(mut self, bytes: usize) -> Self {
        self.max_message_len = bytes;
        self
    }
}
