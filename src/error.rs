//! Error type shared by every operation of the crate.

use aws_sdk_dynamodb::error::{BuildError, ProvideErrorMetadata};
use std::fmt;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the facade.
///
/// Whatever the storage client throws is normalized into [`Error::Backing`], so callers
/// only ever have to look at one message-bearing shape for remote failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A condition operator is unknown or not allowed where it was used.
    #[error("invalid condition operator: {0}")]
    InvalidOperator(String),
    /// A condition was assembled with the wrong number of values.
    #[error("invalid condition on `{field}`: {reason}")]
    InvalidCondition {
        /// Attribute the condition targets.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The storage client failed.
    #[error("{operation} failed: {message}")]
    Backing {
        /// Name of the storage operation that failed.
        operation: &'static str,
        /// Message extracted from the underlying cause.
        message: String,
    },
    /// A batch still had unprocessed units once the retry ceiling was reached.
    #[error("{remaining} unprocessed request(s) left for table `{table}` after retries")]
    UnprocessedRemaining {
        /// Table the batch targeted.
        table: String,
        /// Units left behind.
        remaining: usize,
    },
    /// A record could not be converted to or from the wire format.
    #[error(transparent)]
    Serialization(#[from] serde_dynamo::Error),
    /// The SDK rejected the shape of a request.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl Error {
    /// Normalize a storage client failure.
    ///
    /// Uses the service message when one is attached, otherwise the display form of the cause.
    pub fn backing<E>(operation: &'static str, cause: E) -> Self
    where
        E: ProvideErrorMetadata + fmt::Display,
    {
        let message = match cause.message() {
            Some(message) => message.to_string(),
            None => cause.to_string(),
        };
        Self::Backing { operation, message }
    }

    /// Normalize a failure that carries no structured metadata.
    pub fn backing_message(operation: &'static str, cause: impl fmt::Display) -> Self {
        Self::Backing {
            operation,
            message: cause.to_string(),
        }
    }
}
