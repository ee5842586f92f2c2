//! # Outbound Ports
//!
//! Collaborators the Policy Manager consults (regulatory database, firmware
//! capabilities, security state) and notifies (PCL, datapath, diagnostics).
//!
//! All calls are synchronous. Notifications are issued after the Policy
//! Manager lock is released, so implementations may call back into it.

use parking_lot::Mutex;

use crate::domain::{
    Band, ChannelState, ChannelWidth, ConnectionMode, FreqMhz, PreferredChannelList, VdevId,
};

/// Channel regulatory database - outbound port.
pub trait RegulatoryProvider: Send + Sync {
    /// Regulatory state of a channel at the given width.
    fn channel_state(&self, freq: FreqMhz, bandwidth: ChannelWidth) -> ChannelState;

    /// Channels of the current country, in preference order.
    fn valid_channels(&self) -> Vec<FreqMhz>;
}

/// Firmware capability bits - outbound port.
pub trait FirmwareCapabilities: Send + Sync {
    /// DBS service advertised.
    fn dbs_supported(&self) -> bool;

    /// SBS service advertised.
    fn sbs_supported(&self) -> bool;

    /// Two beaconing vdevs on one channel.
    fn dual_beacon_same_channel_supported(&self) -> bool;

    /// Two beaconing vdevs on different channels of one MAC.
    ///
    /// Reported at startup only: beaconing MCC on one MAC is never admitted.
    fn dual_beacon_diff_channel_supported(&self) -> bool;

    /// Two concurrent STA connections.
    fn sta_plus_sta_supported(&self) -> bool;

    /// WAPI together with other connections.
    fn wapi_concurrency_supported(&self) -> bool;

    /// MCC across bands on one MAC.
    fn interband_mcc_supported(&self) -> bool;

    /// Spatial streams configured for a band.
    fn nss_for_band(&self, band: Band) -> u8;
}

/// Security association state - outbound port.
pub trait SecurityProvider: Send + Sync {
    /// The vdev is associated with WAPI security.
    fn is_wapi_authenticated(&self, vdev_id: VdevId) -> bool;
}

/// Preferred channel list consumer - outbound port.
pub trait PclNotifier: Send + Sync {
    /// Push a new PCL for a vdev to firmware.
    fn set_pcl(&self, mode: ConnectionMode, vdev_id: VdevId, pcl: &PreferredChannelList);
}

/// Datapath tuning knobs - outbound port.
pub trait DatapathNotifier: Send + Sync {
    /// Enable or disable RX offload (LRO/GRO).
    fn set_rx_offload(&self, enable: bool);

    /// Enable or disable receive packet steering.
    fn set_rps(&self, enable: bool);
}

/// Diagnostic alert sink - outbound port.
pub trait DiagnosticSink: Send + Sync {
    /// Report an internal inconsistency. Never changes control flow.
    fn raise_alert(&self, description: &str);

    /// Verbose table dumps wanted.
    fn verbose_enabled(&self) -> bool {
        true
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock regulatory database.
///
/// Every listed channel is enabled unless it appears in `dfs_channels` or
/// `disabled_channels`.
#[derive(Clone, Debug)]
pub struct MockRegulatory {
    /// Valid channels.
    pub channels: Vec<FreqMhz>,
    /// Radar channels.
    pub dfs_channels: Vec<FreqMhz>,
    /// Channels not usable in the current country.
    pub disabled_channels: Vec<FreqMhz>,
}

impl Default for MockRegulatory {
    fn default() -> Self {
        Self {
            channels: vec![
                2412, 2437, 2462, 5180, 5200, 5220, 5240, 5260, 5280, 5300, 5320, 5500, 5520,
                5540, 5745, 5765, 5785, 5805, 5955, 6035,
            ],
            dfs_channels: vec![5260, 5280, 5300, 5320, 5500, 5520, 5540],
            disabled_channels: Vec::new(),
        }
    }
}

impl MockRegulatory {
    /// Mark a channel as disabled.
    pub fn with_disabled(mut self, freq: FreqMhz) -> Self {
        self.disabled_channels.push(freq);
        self
    }

    /// Replace the channel list.
    pub fn with_channels(mut self, channels: Vec<FreqMhz>) -> Self {
        self.channels = channels;
        self
    }
}

impl RegulatoryProvider for MockRegulatory {
    fn channel_state(&self, freq: FreqMhz, _bandwidth: ChannelWidth) -> ChannelState {
        if self.disabled_channels.contains(&freq) {
            ChannelState::Disabled
        } else if self.dfs_channels.contains(&freq) {
            ChannelState::Dfs
        } else {
            ChannelState::Enabled
        }
    }

    fn valid_channels(&self) -> Vec<FreqMhz> {
        self.channels.clone()
    }
}

/// Mock firmware capabilities.
#[derive(Clone, Debug)]
pub struct MockFirmware {
    /// DBS service bit.
    pub dbs: bool,
    /// SBS service bit.
    pub sbs: bool,
    /// Dual beacon on one channel.
    pub dual_beacon_same_channel: bool,
    /// Dual beacon on different channels.
    pub dual_beacon_diff_channel: bool,
    /// STA+STA.
    pub sta_plus_sta: bool,
    /// WAPI concurrency.
    pub wapi_concurrency: bool,
    /// Interband MCC.
    pub interband_mcc: bool,
    /// NSS on 2.4 GHz.
    pub nss_2g: u8,
    /// NSS on 5 and 6 GHz.
    pub nss_5g: u8,
}

impl Default for MockFirmware {
    fn default() -> Self {
        Self {
            dbs: false,
            sbs: false,
            dual_beacon_same_channel: false,
            dual_beacon_diff_channel: false,
            sta_plus_sta: false,
            wapi_concurrency: false,
            interband_mcc: true,
            nss_2g: 2,
            nss_5g: 2,
        }
    }
}

impl MockFirmware {
    /// Firmware advertising DBS with dual-beacon and STA+STA support.
    pub fn dbs() -> Self {
        Self {
            dbs: true,
            dual_beacon_same_channel: true,
            sta_plus_sta: true,
            ..Self::default()
        }
    }
}

impl FirmwareCapabilities for MockFirmware {
    fn dbs_supported(&self) -> bool {
        self.dbs
    }

    fn sbs_supported(&self) -> bool {
        self.sbs
    }

    fn dual_beacon_same_channel_supported(&self) -> bool {
        self.dual_beacon_same_channel
    }

    fn dual_beacon_diff_channel_supported(&self) -> bool {
        self.dual_beacon_diff_channel
    }

    fn sta_plus_sta_supported(&self) -> bool {
        self.sta_plus_sta
    }

    fn wapi_concurrency_supported(&self) -> bool {
        self.wapi_concurrency
    }

    fn interband_mcc_supported(&self) -> bool {
        self.interband_mcc
    }

    fn nss_for_band(&self, band: Band) -> u8 {
        match band {
            Band::Band2G => self.nss_2g,
            Band::Band5G | Band::Band6G => self.nss_5g,
        }
    }
}

/// Mock security state.
#[derive(Debug, Default)]
pub struct MockSecurity {
    wapi_vdevs: Mutex<Vec<VdevId>>,
}

impl MockSecurity {
    /// Mark a vdev as WAPI-associated.
    pub fn set_wapi(&self, vdev_id: VdevId) {
        self.wapi_vdevs.lock().push(vdev_id);
    }
}

impl SecurityProvider for MockSecurity {
    fn is_wapi_authenticated(&self, vdev_id: VdevId) -> bool {
        self.wapi_vdevs.lock().contains(&vdev_id)
    }
}

/// PCL notifier that records every update.
#[derive(Debug, Default)]
pub struct RecordingPclNotifier {
    calls: Mutex<Vec<(ConnectionMode, VdevId, PreferredChannelList)>>,
}

impl RecordingPclNotifier {
    /// Updates received so far.
    pub fn calls(&self) -> Vec<(ConnectionMode, VdevId, PreferredChannelList)> {
        self.calls.lock().clone()
    }
}

impl PclNotifier for RecordingPclNotifier {
    fn set_pcl(&self, mode: ConnectionMode, vdev_id: VdevId, pcl: &PreferredChannelList) {
        self.calls.lock().push((mode, vdev_id, pcl.clone()));
    }
}

/// Datapath notifier that records every toggle.
#[derive(Debug, Default)]
pub struct RecordingDatapath {
    rx_offload: Mutex<Vec<bool>>,
    rps: Mutex<Vec<bool>>,
}

impl RecordingDatapath {
    /// RX offload toggles in order.
    pub fn rx_offload_calls(&self) -> Vec<bool> {
        self.rx_offload.lock().clone()
    }

    /// RPS toggles in order.
    pub fn rps_calls(&self) -> Vec<bool> {
        self.rps.lock().clone()
    }
}

impl DatapathNotifier for RecordingDatapath {
    fn set_rx_offload(&self, enable: bool) {
        self.rx_offload.lock().push(enable);
    }

    fn set_rps(&self, enable: bool) {
        self.rps.lock().push(enable);
    }
}

/// Diagnostic sink that records alerts.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    alerts: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    /// Alerts raised so far.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn raise_alert(&self, description: &str) {
        self.alerts.lock().push(description.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_regulatory_states() {
        let reg = MockRegulatory::default().with_disabled(5745);
        assert_eq!(reg.channel_state(2412, ChannelWidth::Width20), ChannelState::Enabled);
        assert_eq!(reg.channel_state(5260, ChannelWidth::Width80), ChannelState::Dfs);
        assert_eq!(reg.channel_state(5745, ChannelWidth::Width20), ChannelState::Disabled);
        assert!(reg.valid_channels().contains(&5180));
    }

    #[test]
    fn test_mock_firmware_nss_per_band() {
        let fw = MockFirmware {
            nss_2g: 1,
            ..MockFirmware::dbs()
        };
        assert!(fw.dbs_supported());
        assert_eq!(fw.nss_for_band(Band::Band2G), 1);
        assert_eq!(fw.nss_for_band(Band::Band6G), 2);
    }

    #[test]
    fn test_mock_security() {
        let sec = MockSecurity::default();
        assert!(!sec.is_wapi_authenticated(1));
        sec.set_wapi(1);
        assert!(sec.is_wapi_authenticated(1));
    }

    #[test]
    fn test_recording_notifiers() {
        let pcl = RecordingPclNotifier::default();
        pcl.set_pcl(ConnectionMode::Sta, 0, &PreferredChannelList::default());
        assert_eq!(pcl.calls().len(), 1);

        let dp = RecordingDatapath::default();
        dp.set_rx_offload(false);
        dp.set_rps(true);
        assert_eq!(dp.rx_offload_calls(), vec![false]);
        assert_eq!(dp.rps_calls(), vec![true]);

        let diag = RecordingDiagnostics::default();
        diag.raise_alert("boom");
        assert_eq!(diag.alerts(), vec!["boom".to_string()]);
        assert!(diag.verbose_enabled());
    }
}
