//! List error codes

/// Structural errors reported by list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// The link is already a member of a list.
    #[error("link is already a member of a list")]
    AlreadyLinked,

    /// The sentinel was passed as the node to insert into its own list.
    #[error("sentinel cannot be inserted into its own list")]
    SentinelInsert,

    /// A walk from the sentinel found a broken `next`/`prev` pair.
    #[error("ring is corrupted after {visited} links")]
    Corrupted { visited: usize },
}
