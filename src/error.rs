use thiserror::Error;

/// Errors surfaced by the resume hashing pipeline.
///
/// Every variant is decided from public metadata only (input lengths or the
/// caller's use of the streaming API), never from the value of secret bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The raw reference is longer than the configured maximum.
    #[error("malformed reference: {len} bytes exceeds the maximum of {max}")]
    MalformedReference {
        /// Length supplied by the caller.
        len: usize,
        /// Configured bound.
        max: usize,
    },
    /// The context is longer than the configured maximum.
    #[error("context too long: {len} bytes exceeds the maximum of {max}")]
    ContextTooLong {
        /// Length supplied by the caller.
        len: usize,
        /// Configured bound.
        max: usize,
    },
    /// A hashing state was used after it was finalized.
    ///
    /// This is a programming error. It is only ever raised as a panic.
    #[error("state misuse: {0}")]
    StateMisuse(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn messages_carry_lengths() {
        let e = Error::MalformedReference { len: 300, max: 256 };
        assert_eq!(
            e.to_string(),
            "malformed reference: 300 bytes exceeds the maximum of 256"
        );

        let e = Error::ContextTooLong { len: 65, max: 64 };
        assert_eq!(
            e.to_string(),
            "context too long: 65 bytes exceeds the maximum of 64"
        );

        let e = Error::StateMisuse("update after finalize");
        assert_eq!(e.to_string(), "state misuse: update after finalize");
    }
}
