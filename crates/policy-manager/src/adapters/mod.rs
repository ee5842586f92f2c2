//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for the Policy Manager.

mod tracing_diagnostics;

pub use tracing_diagnostics::TracingDiagnostics;
