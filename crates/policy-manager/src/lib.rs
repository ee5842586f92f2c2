//! # WLAN Concurrency Policy Manager
//!
//! Admission control and hardware-mode bookkeeping for a multi-radio WiFi
//! control plane.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide whether a new or changing connection (STA, SAP, P2P client/GO,
//! NAN discovery, NDI) may run alongside the connections already active,
//! given what the radio hardware supports:
//! - Connection table of at most four active vdevs
//! - Hardware-mode catalog decoded from firmware (single MAC, DBS, SBS)
//! - Ordered admission rules (band, DFS, MCC/SCC, 6 GHz, STA+STA, WAPI)
//! - Session lifecycle with PCL, DFS-master and datapath recomputation
//!
//! ## Module Structure
//!
//! ```text
//! policy-manager/
//! ├── domain/          # Entries, table, hw-mode catalog, config, errors
//! ├── algorithms/      # Classifier, admission rules, PCL builder
//! ├── ports/           # API trait + collaborator traits (and mocks)
//! ├── service/         # PolicyManager, CSA eviction guard
//! └── adapters/        # Tracing-backed diagnostic sink
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use policy_manager::*;
//!
//! let pm = PolicyManager::builder(PolicyManagerConfig::default())
//!     .regulatory(Arc::new(MockRegulatory::default()))
//!     .firmware(Arc::new(MockFirmware::dbs()))
//!     .security(Arc::new(MockSecurity::default()))
//!     .pcl_notifier(Arc::new(RecordingPclNotifier::default()))
//!     .datapath(Arc::new(RecordingDatapath::default()))
//!     .build()?;
//!
//! if pm.allow_concurrency(ConnectionMode::Sap, 5180, ChannelWidth::Width80) {
//!     // bring the SAP up, then
//!     pm.on_session_start(SessionStart { /* ... */ })?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::TracingDiagnostics;
pub use algorithms::{
    build_pcl, freqs_on_same_mac, AdmissionContext, RejectReason, Verdict, WEIGHT_GROUP1,
    WEIGHT_GROUP2, WEIGHT_GROUP3, WEIGHT_NON_PCL,
};
pub use domain::{
    Band, ChannelFlags, ChannelState, ChannelWidth, ConcurrencyCaps, ConnectionEntry,
    ConnectionMode, ConnectionTable, CsaReason, DbsNss, FreqMhz, HwModeBandwidth, HwModeCatalog,
    HwModeEntry, HwModeQuery, MacBandCap, MacId, MccToSccSwitch, PolicyError, PolicyManagerConfig,
    PolicyManagerConfigBuilder, PreferredChannelList, SessionStart, StaSapDfsPolicy, VdevId,
    MAX_NUMBER_OF_CONC_CONNECTIONS,
};
pub use ports::{
    DatapathNotifier, DiagnosticSink, FirmwareCapabilities, MockFirmware, MockRegulatory,
    MockSecurity, PclNotifier, PolicyManagerApi, RecordingDatapath, RecordingDiagnostics,
    RecordingPclNotifier, RegulatoryProvider, SecurityProvider,
};
pub use service::{CsaEviction, PolicyManager, PolicyManagerBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
