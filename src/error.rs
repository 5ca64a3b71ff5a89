use thiserror::Error;

/// Errors reported by this crate.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
pub enum Error {
    /// The text is not in the canonical 8-4-4-4-12 hexadecimal form. Carries the rejected input.
    #[error("invalid UUID string: {0:?}")]
    InvalidFormat(String),

    /// The host data needed to derive the default node identity could not be collected.
    #[error("node identity unavailable: {reason}")]
    NodeIdentityUnavailable {
        /// Description of the underlying failure.
        reason: String,
    },
}
