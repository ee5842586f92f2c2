//! # Inbound Ports
//!
//! API trait defining what the Policy Manager offers to the session layer,
//! the channel-switch logic and firmware event handlers.

use crate::domain::{
    ChannelWidth, ConnectionEntry, ConnectionMode, CsaReason, DbsNss, FreqMhz, HwModeQuery,
    MacId, PreferredChannelList, Result, SessionStart, VdevId,
};

/// Policy Manager API - inbound port.
pub trait PolicyManagerApi: Send + Sync {
    // Admission

    /// Whether a connection of `mode` on `freq` may join the active set.
    /// `freq == 0` means the channel is not yet known.
    fn is_concurrency_allowed(&self, mode: ConnectionMode, freq: FreqMhz, bandwidth: ChannelWidth)
        -> bool;

    /// [`is_concurrency_allowed`](Self::is_concurrency_allowed) plus the
    /// fourth-connection rule.
    fn allow_concurrency(&self, mode: ConnectionMode, freq: FreqMhz, bandwidth: ChannelWidth) -> bool;

    /// Admission check for moving `vdev_id` to a new channel.
    fn allow_concurrency_csa(
        &self,
        mode: ConnectionMode,
        freq: FreqMhz,
        bandwidth: ChannelWidth,
        vdev_id: VdevId,
        forced: bool,
        reason: CsaReason,
    ) -> bool;

    // Session lifecycle

    /// Register a newly active vdev.
    fn on_session_start(&self, start: SessionStart) -> Result<()>;

    /// Remove a vdev that went down.
    fn on_session_stop(&self, mode: ConnectionMode, vdev_id: VdevId) -> Result<()>;

    /// Record a completed channel change.
    fn update_connection(
        &self,
        vdev_id: VdevId,
        freq: FreqMhz,
        bandwidth: ChannelWidth,
        mac_id: MacId,
    ) -> Result<()>;

    // Classification

    /// All connections share one channel.
    fn is_scc(&self) -> bool;

    /// Connections time-share a MAC across channels.
    fn is_mcc(&self) -> bool;

    /// Two different 2.4 GHz channels in use.
    fn is_mcc_in_24ghz(&self) -> bool;

    /// A STA or P2P client is on a DFS channel.
    fn is_sta_present_on_dfs_channel(&self) -> bool;

    /// Frequency of a SAP or P2P-GO operating on a DFS channel.
    fn is_any_dfs_beaconing_session_present(&self) -> Option<FreqMhz>;

    /// The active hardware mode is DBS.
    fn is_current_hwmode_dbs(&self) -> bool;

    // Hardware modes

    /// DBS usable.
    fn is_dbs_capable(&self) -> bool;

    /// SBS usable.
    fn is_sbs_capable(&self) -> bool;

    /// Best stream split among DBS modes.
    fn get_hw_dbs_nss(&self) -> DbsNss;

    /// Catalog index of an exact hardware configuration.
    fn find_hw_mode_index(&self, query: &HwModeQuery) -> Option<usize>;

    /// Replace the catalog from a firmware capability event.
    fn update_hw_mode_catalog(&self, raw: &[u32]) -> Result<()>;

    /// Record a firmware hardware-mode switch.
    fn update_hw_mode_index(&self, index: usize) -> Result<()>;

    // Queries

    /// Number of active connections.
    fn connection_count(&self) -> u32;

    /// Number of active connections in `mode`.
    fn mode_count(&self, mode: ConnectionMode) -> u32;

    /// Bitmask of modes with active sessions.
    fn concurrency_mode_mask(&self) -> u32;

    /// Copy of the in-use table entries.
    fn connections(&self) -> Vec<ConnectionEntry>;

    /// Preferred channels for a vdev of `mode`.
    fn get_pcl(&self, mode: ConnectionMode, vdev_id: Option<VdevId>) -> PreferredChannelList;

    /// Whether a beaconing vdev may act as DFS master right now.
    fn get_dfs_master_dynamic_enabled(&self, vdev_id: VdevId) -> bool;

    /// Whether a SAP may move to 6 GHz.
    fn is_ap_6ghz_capable(&self, vdev_id: VdevId) -> bool;

    /// Read and clear the unsafe-channel recheck request.
    fn take_unsafe_channel_recheck(&self) -> bool;

    // Diagnostics

    /// Check table invariants, alerting on violation.
    fn validate(&self) -> Result<()>;

    /// Trace the table contents.
    fn dump_connections(&self);
}
