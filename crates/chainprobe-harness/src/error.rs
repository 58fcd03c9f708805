//! Caller-visible harness errors.

/// Errors surfaced to the invoker of [`Harness`](crate::Harness) entry
/// points.
///
/// Everything that originates inside a scenario runner is captured and
/// converted into stored outcome state instead; only these variants ever
/// cross the harness boundary.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum HarnessError {
    /// The caller referenced an unregistered scenario id. This is a
    /// programming error (a stale trigger), not a runtime condition to
    /// recover from.
    #[error("unknown scenario id: {0}")]
    NotFound(String),

    /// Another scenario run is already in flight. The caller should
    /// disable its trigger while [`Harness::is_busy`](crate::Harness::is_busy)
    /// reports true rather than retry.
    #[error("a scenario run is already in flight")]
    Busy,

    /// Two scenarios with the same id were registered.
    #[error("duplicate scenario id: {0}")]
    DuplicateId(String),
}
