//! # Ports Module
//!
//! Inbound API and outbound collaborator traits.

pub mod inbound;
pub mod outbound;

pub use inbound::PolicyManagerApi;
pub use outbound::{
    DatapathNotifier, DiagnosticSink, FirmwareCapabilities, MockFirmware, MockRegulatory,
    MockSecurity, PclNotifier, RecordingDatapath, RecordingDiagnostics, RecordingPclNotifier,
    RegulatoryProvider, SecurityProvider,
};
