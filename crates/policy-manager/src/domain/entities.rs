//! # Domain Entities
//!
//! Connection table entries and the session-start description handed in by
//! the session layer.

use serde::{Deserialize, Serialize};

use super::errors::{FreqMhz, MacId, VdevId};
use super::frequency;
use super::value_objects::{Band, ChannelFlags, ChannelWidth, ConnectionMode};

/// One active vdev in the concurrency table.
///
/// `Default` is the zeroed, unused slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    /// Interface instance.
    pub vdev_id: VdevId,
    /// Operating mode.
    pub mode: ConnectionMode,
    /// Radio chain serving the connection.
    pub mac_id: MacId,
    /// Operating channel center frequency.
    pub freq: FreqMhz,
    /// Channel width.
    pub bandwidth: ChannelWidth,
    /// Chains in use.
    pub chain_mask: u8,
    /// Spatial streams in use.
    pub nss: u8,
    /// DFS / 6 GHz attributes of the channel.
    pub channel_flags: ChannelFlags,
    /// Slot occupied.
    pub in_use: bool,
}

impl ConnectionEntry {
    /// Create an in-use entry.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vdev_id: VdevId,
        mode: ConnectionMode,
        mac_id: MacId,
        freq: FreqMhz,
        bandwidth: ChannelWidth,
        chain_mask: u8,
        nss: u8,
        channel_flags: ChannelFlags,
    ) -> Self {
        Self {
            vdev_id,
            mode,
            mac_id,
            freq,
            bandwidth,
            chain_mask,
            nss,
            channel_flags,
            in_use: true,
        }
    }

    /// Band of the operating channel.
    pub fn band(&self) -> Option<Band> {
        frequency::band_of(self.freq)
    }

    /// DFS channel, or a 5 GHz 160 MHz channel that necessarily spans DFS
    /// sub-channels.
    pub fn is_on_dfs(&self) -> bool {
        self.channel_flags.is_dfs()
            || (frequency::is_5ghz(self.freq)
                && matches!(
                    self.bandwidth,
                    ChannelWidth::Width160 | ChannelWidth::Width80P80
                ))
    }
}

/// Parameters supplied by the session layer when a vdev becomes active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStart {
    /// Interface instance.
    pub vdev_id: VdevId,
    /// Operating mode.
    pub mode: ConnectionMode,
    /// Operating channel.
    pub freq: FreqMhz,
    /// Channel width.
    pub bandwidth: ChannelWidth,
    /// Radio chain.
    pub mac_id: MacId,
    /// Chains in use; 0 lets the manager derive it from the per-band NSS.
    pub chain_mask: u8,
}

/// Weighted preferred channel list, `freqs[i]` carries `weights[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredChannelList {
    /// Channels, most preferred first.
    pub freqs: Vec<FreqMhz>,
    /// Weight of each channel.
    pub weights: Vec<u8>,
}

impl PreferredChannelList {
    /// Append a channel unless already listed.
    pub fn push(&mut self, freq: FreqMhz, weight: u8) {
        if !self.contains(freq) {
            self.freqs.push(freq);
            self.weights.push(weight);
        }
    }

    /// Channel is listed.
    pub fn contains(&self, freq: FreqMhz) -> bool {
        self.freqs.contains(&freq)
    }

    /// Weight of a listed channel.
    pub fn weight_of(&self, freq: FreqMhz) -> Option<u8> {
        self.freqs
            .iter()
            .position(|f| *f == freq)
            .map(|i| self.weights[i])
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    /// True when no channel is listed.
    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }
}

/// Effective hardware/firmware concurrency capabilities.
///
/// `dbs` and `sbs` already fold in the catalog contents and the
/// `dual_mac_disabled` switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyCaps {
    /// Dual-band simultaneous operation.
    pub dbs: bool,
    /// Single-band simultaneous operation.
    pub sbs: bool,
    /// Two beaconing entities may share one channel.
    pub dual_beacon_same_channel: bool,
    /// Two STA connections.
    pub sta_plus_sta: bool,
    /// WAPI alongside other connections.
    pub wapi_concurrency: bool,
    /// MCC across bands on one MAC; without it a single-MAC radio stays
    /// on one band.
    pub interband_mcc: bool,
}
