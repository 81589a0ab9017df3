/// GroupRegistry — named broadcast groups.
///
/// Group records live in the [`Directory`](crate::Directory); the
/// operations here enforce ownership and membership rules on them.
pub mod registry;
pub mod types;

pub use registry::{create_group, delete_group, is_member, join, leave, members_of};
pub use types::Group;
