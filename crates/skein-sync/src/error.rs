//! Error types for queues and their configuration.

use std::error::Error;
use std::fmt;

/// Invalid [`QueueConfig`](crate::QueueConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The worker thread name is empty.
    EmptyThreadName,
    /// The worker thread name contains a NUL byte.
    InvalidThreadName {
        /// The rejected name.
        name: String,
    },
    /// A stack size of zero was requested.
    ZeroStackSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyThreadName => write!(f, "worker thread name is empty"),
            Self::InvalidThreadName { name } => {
                write!(f, "worker thread name {name:?} contains a NUL byte")
            }
            Self::ZeroStackSize => write!(f, "worker stack size must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

/// A submission the queue refused.
///
/// The rejected item is handed back so the caller keeps ownership.
#[derive(Clone, PartialEq, Eq)]
pub enum QueueError<T> {
    /// The queue was closed before the item was accepted.
    Closed(T),
}

impl<T> QueueError<T> {
    /// Recover the rejected item.
    pub fn into_inner(self) -> T {
        match self {
            Self::Closed(item) => item,
        }
    }
}

impl<T> fmt::Debug for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> fmt::Display for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(_) => write!(f, "queue is closed"),
        }
    }
}

impl<T> Error for QueueError<T> {}
