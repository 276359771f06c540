//! Crate-wide error type.

/// Failures reported by the identity containers and the table engine.
///
/// Engine invariant violations (for example resizing below the live entry
/// count) are not represented here; they panic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The identity lookup missed.
    #[error("key not found")]
    KeyNotFound,
    /// A `Memoizer` was built without a computation function, or with a
    /// named option it does not accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A detached cursor was advanced after the table it walks was resized.
    #[error("cursor created at table generation {created} used at generation {current}")]
    StaleCursor { created: u64, current: u64 },
    /// A cursor or slot index was used on a table other than the one that
    /// issued it.
    #[error("cursor or slot index used on a table that did not issue it")]
    ForeignCursor,
}

pub type Result<T> = core::result::Result<T, Error>;
