//! Queue error types.

/// Error returned by a single queue request.
///
/// Both kinds are ordinary, expected outcomes the caller must branch on. A
/// rejected request never leaves the queue in a partially updated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Push rejected: the relevant capacity is exhausted.
    #[error("queue overflow: {len} items (max {capacity})")]
    Overflow {
        /// Number of items held when the push was rejected.
        len: usize,
        /// Capacity that was hit.
        capacity: usize,
    },

    /// Pop or peek rejected: nothing to serve.
    #[error("queue underflow")]
    Underflow,
}

impl QueueError {
    /// Returns true if this is an overflow.
    #[must_use]
    pub const fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }

    /// Returns true if this is an underflow.
    #[must_use]
    pub const fn is_underflow(&self) -> bool {
        matches!(self, Self::Underflow)
    }
}

/// Error returned when a queue cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },
}

/// Result type for queue requests.
pub type QueueResult<T> = Result<T, QueueError>;

/// Result type for queue construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueueError::Overflow {
            len: 20,
            capacity: 20,
        };
        assert_eq!(format!("{err}"), "queue overflow: 20 items (max 20)");
        assert_eq!(format!("{}", QueueError::Underflow), "queue underflow");
    }

    #[test]
    fn test_error_kind_predicates() {
        let overflow = QueueError::Overflow {
            len: 1,
            capacity: 1,
        };
        assert!(overflow.is_overflow());
        assert!(!overflow.is_underflow());
        assert!(QueueError::Underflow.is_underflow());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidConfig {
            message: "flow_capacity must be positive".to_string(),
        };
        assert!(format!("{err}").contains("flow_capacity"));
    }
}
