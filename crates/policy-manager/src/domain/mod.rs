//! # Domain Module
//!
//! Core domain types for the Policy Manager: connection entries, the
//! connection table, the hardware-mode catalog and configuration.

pub mod config;
pub mod connection_table;
pub mod entities;
pub mod errors;
pub mod frequency;
pub mod hw_mode;
pub mod invariants;
pub mod value_objects;

pub use config::*;
pub use connection_table::*;
pub use entities::*;
pub use errors::*;
pub use hw_mode::*;
pub use invariants::*;
pub use value_objects::*;
