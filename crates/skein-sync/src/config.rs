//! Worker thread configuration for queues and streams.

use crate::error::ConfigError;

/// Default name given to queue worker threads.
pub const DEFAULT_THREAD_NAME: &str = "skein-queue";

/// Configuration for the worker thread behind an [`UnboundedQueue`].
///
/// An [`EventStream`] applies the same configuration to every subscriber
/// queue it creates.
///
/// [`UnboundedQueue`]: crate::UnboundedQueue
/// [`EventStream`]: crate::EventStream
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Worker thread name. Must be non-empty and free of NUL bytes.
    pub thread_name: String,
    /// Worker stack size in bytes. `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl QueueConfig {
    /// Set the worker thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the worker stack size.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Check the configuration for values a worker cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_name.is_empty() {
            return Err(ConfigError::EmptyThreadName);
        }
        if self.thread_name.contains('\0') {
            return Err(ConfigError::InvalidThreadName {
                name: self.thread_name.clone(),
            });
        }
        if self.stack_size == Some(0) {
            return Err(ConfigError::ZeroStackSize);
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}
