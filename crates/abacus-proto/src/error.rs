//! Error types shared across Abacus crates.

/// Errors raised by the bridge and tutorial plumbing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A roll name could not be parsed.
    #[error("unknown roll `{0}` (expected unit, ten, hundred or thousand)")]
    UnknownRoll(String),

    /// The tutorial task is gone and can no longer receive input.
    #[error("tutorial mailbox is closed")]
    MailboxClosed,
}

/// Convenience alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
