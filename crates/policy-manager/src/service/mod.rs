//! # Service Layer
//!
//! The lock-owning Policy Manager and the CSA eviction guard.

mod csa_guard;
mod policy_manager;

pub use csa_guard::CsaEviction;
pub use policy_manager::{PolicyManager, PolicyManagerBuilder};
