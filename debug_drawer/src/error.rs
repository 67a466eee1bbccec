//! Debug draw error types.

use std::fmt;

/// Errors reported by the debug draw core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugDrawError {
    /// A push received input of the wrong shape, e.g. 3 corner colors.
    ContractViolation {
        /// What was malformed.
        what: &'static str,
        /// Accepted lengths.
        expected: &'static str,
        /// Length that was passed.
        got: usize,
    },
    /// Growing a buffer overflowed the capacity arithmetic, the index range,
    /// or the allocator.
    CapacityExhausted {
        /// Vertices the buffer had to hold.
        requested_vertices: usize,
        /// Indices the buffer had to hold.
        requested_indices: usize,
    },
    /// The configuration cannot be used.
    InvalidConfig(String),
}

impl fmt::Display for DebugDrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractViolation {
                what,
                expected,
                got,
            } => write!(f, "contract violation: {what} expects {expected} entries, got {got}"),
            Self::CapacityExhausted {
                requested_vertices,
                requested_indices,
            } => write!(
                f,
                "capacity exhausted: cannot hold {requested_vertices} vertices / \
                 {requested_indices} indices"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for DebugDrawError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DebugDrawError::ContractViolation {
            what: "quad corners",
            expected: "4",
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "contract violation: quad corners expects 4 entries, got 3"
        );

        let err = DebugDrawError::InvalidConfig("initial_capacity must be non-zero".to_string());
        assert_eq!(
            err.to_string(),
            "invalid config: initial_capacity must be non-zero"
        );
    }
}
