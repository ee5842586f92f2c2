//! # Domain Errors
//!
//! Error types for the policy manager.

use thiserror::Error;

/// Virtual device identifier (one per wireless role instance).
pub type VdevId = u8;

/// Physical radio chain identifier (0 or 1).
pub type MacId = u8;

/// Channel center frequency in MHz.
pub type FreqMhz = u32;

/// Policy manager error types.
///
/// `InvalidContext` and `CapacityExceeded` are recoverable: the caller
/// refuses the requested connection. `InvariantViolation` is a forensic
/// event reported through the diagnostic sink and never aborts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A collaborator handle is missing.
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    /// Connection table is full.
    #[error("Connection table full: {count}/{max}")]
    CapacityExceeded {
        /// Connections currently in the table
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// No table entry for the vdev.
    #[error("vdev {0} not found in connection table")]
    NotFound(VdevId),

    /// The vdev already owns a table entry.
    #[error("vdev {0} already present in connection table")]
    DuplicateVdev(VdevId),

    /// Table validation failed.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Firmware hardware-mode word or index could not be used.
    #[error("Invalid hw mode: {0}")]
    InvalidHwMode(String),

    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for policy manager operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
