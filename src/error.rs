//! Errors returned by the driver, generic over the transport's own error type.

use core::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error<E: Debug> {
    /// The transport could not be opened or addressed.
    #[error("could not connect to display: {0:?}")]
    Connection(E),
    /// The transport reported a failure while writing or closing.
    #[error("transport error: {0:?}")]
    Transport(E),
    /// A write was only partially accepted.
    #[error("short write: sent {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
    /// The session has been closed.
    #[error("display session is closed")]
    Closed,
}

impl<E: Debug> Error<E> {
    /// True for failures that happened on the wire, after which the controller state should be
    /// considered unknown until the next `reset`.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::ShortWrite { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_kinds() {
        assert!(Error::Transport("nack").is_transport());
        assert!(Error::<&str>::ShortWrite {
            written: 1,
            expected: 2
        }
        .is_transport());
        assert!(!Error::Connection("no bus").is_transport());
        assert!(!Error::<&str>::Closed.is_transport());
    }

    #[test]
    fn messages() {
        let e: Error<&str> = Error::ShortWrite {
            written: 1,
            expected: 17,
        };
        assert_eq!(e.to_string(), "short write: sent 1 of 17 bytes");
        assert_eq!(
            Error::Connection("busy").to_string(),
            "could not connect to display: \"busy\""
        );
    }
}
