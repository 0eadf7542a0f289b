//! Error type shared by every container in the crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A size or capacity argument was rejected (currently: zero capacity).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A positional accessor was given an index past the end.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A strict lookup did not find the key.
    #[error("key not found")]
    NotFound,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            Error::InvalidArgument("capacity must be greater than 0").to_string(),
            "invalid argument: capacity must be greater than 0"
        );
        assert_eq!(
            Error::OutOfRange { index: 9, len: 8 }.to_string(),
            "index 9 out of range for length 8"
        );
        assert_eq!(Error::NotFound.to_string(), "key not found");
    }
}
