//! # Preferred Channel List
//!
//! Weighted channel preference for a new or existing vdev, given the other
//! active connections.
//!
//! | Group | Weight | Channels |
//! |-------|--------|----------|
//! | 1     | 255    | channels already in use (SCC) |
//! | 2     | 240    | channels on the other MAC (DBS) |
//! | 3     | 225    | everything else (MCC) |
//!
//! Channels outside the list carry [`WEIGHT_NON_PCL`].

use super::admission::AdmissionContext;
use super::classifier::freqs_on_same_mac;
use crate::domain::frequency::is_6ghz;
use crate::domain::{
    ChannelState, ChannelWidth, ConnectionEntry, ConnectionMode, ConnectionTable, FreqMhz,
    MccToSccSwitch, PreferredChannelList, VdevId,
};

/// Weight of channels shared with existing connections.
pub const WEIGHT_GROUP1: u8 = 255;
/// Weight of channels on a free MAC.
pub const WEIGHT_GROUP2: u8 = 240;
/// Weight of MCC channels.
pub const WEIGHT_GROUP3: u8 = 225;
/// Weight of channels missing from the list.
pub const WEIGHT_NON_PCL: u8 = 1;

/// Build the PCL for a vdev of `mode`, ignoring `exclude_vdev` (the vdev
/// itself when it is already in the table).
pub fn build_pcl(
    mode: ConnectionMode,
    table: &ConnectionTable,
    exclude_vdev: Option<VdevId>,
    valid_freqs: &[FreqMhz],
    ctx: &AdmissionContext<'_>,
) -> PreferredChannelList {
    let usable: Vec<(FreqMhz, bool)> = valid_freqs
        .iter()
        .filter(|f| mode.is_6ghz_eligible() || !is_6ghz(**f))
        .filter_map(|&f| match ctx.regulatory.channel_state(f, ChannelWidth::Width20) {
            ChannelState::Disabled => None,
            ChannelState::Dfs => Some((f, true)),
            ChannelState::Enabled => Some((f, false)),
        })
        .collect();

    let others: Vec<&ConnectionEntry> = table
        .entries()
        .iter()
        .filter(|e| Some(e.vdev_id) != exclude_vdev)
        .collect();

    let mut pcl = PreferredChannelList::default();

    if others.is_empty() {
        for (freq, _) in &usable {
            pcl.push(*freq, WEIGHT_GROUP1);
        }
        return pcl;
    }

    for entry in &others {
        if usable.iter().any(|(f, _)| *f == entry.freq) {
            pcl.push(entry.freq, WEIGHT_GROUP1);
        }
    }

    let skip_dfs = mode.is_beaconing();
    let caps = ctx.caps;

    if caps.dbs {
        for &(freq, dfs) in &usable {
            if skip_dfs && dfs {
                continue;
            }
            if others
                .iter()
                .all(|e| !freqs_on_same_mac(freq, e.freq, caps.dbs, caps.sbs))
            {
                pcl.push(freq, WEIGHT_GROUP2);
            }
        }
    }

    let scc_only = mode.is_beaconing()
        && ctx.config.mcc_to_scc_switch != MccToSccSwitch::Disabled
        && others.iter().any(|e| e.mode.is_sta_like());

    if !scc_only {
        for &(freq, dfs) in &usable {
            if skip_dfs && dfs {
                continue;
            }
            pcl.push(freq, WEIGHT_GROUP3);
        }
    }

    pcl
}

/// Weight of `freq` in `pcl`, [`WEIGHT_NON_PCL`] when absent.
pub fn channel_weight(pcl: &PreferredChannelList, freq: FreqMhz) -> u8 {
    pcl.weight_of(freq).unwrap_or(WEIGHT_NON_PCL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelFlags, ConcurrencyCaps, PolicyManagerConfig};
    use crate::ports::{MockRegulatory, MockSecurity, RegulatoryProvider};

    fn entry(vdev_id: VdevId, mode: ConnectionMode, freq: FreqMhz) -> ConnectionEntry {
        ConnectionEntry::new(
            vdev_id,
            mode,
            0,
            freq,
            ChannelWidth::Width20,
            1,
            1,
            ChannelFlags::empty(),
        )
    }

    fn pcl_for(
        mode: ConnectionMode,
        table: &ConnectionTable,
        exclude: Option<VdevId>,
        config: &PolicyManagerConfig,
        caps: ConcurrencyCaps,
    ) -> PreferredChannelList {
        let regulatory = MockRegulatory::default().with_disabled(5320);
        let security = MockSecurity::default();
        let ctx = AdmissionContext {
            config,
            caps,
            regulatory: &regulatory,
            security: &security,
        };
        build_pcl(mode, table, exclude, &regulatory.valid_channels(), &ctx)
    }

    #[test]
    fn test_no_connections_lists_all_usable() {
        let table = ConnectionTable::new(3).unwrap();
        let config = PolicyManagerConfig::default();
        let pcl = pcl_for(ConnectionMode::Sta, &table, None, &config, ConcurrencyCaps::default());

        assert!(pcl.weights.iter().all(|w| *w == WEIGHT_GROUP1));
        assert!(!pcl.contains(5320));
        assert!(pcl.contains(5955));
        assert_eq!(pcl.freqs[0], 2412);
    }

    #[test]
    fn test_ineligible_mode_drops_6ghz() {
        let table = ConnectionTable::new(3).unwrap();
        let config = PolicyManagerConfig::default();
        let pcl = pcl_for(ConnectionMode::NanDisc, &table, None, &config, ConcurrencyCaps::default());
        assert!(!pcl.contains(5955));
        assert!(!pcl.contains(6035));
    }

    #[test]
    fn test_groups_with_dbs() {
        let mut table = ConnectionTable::new(3).unwrap();
        table.add(entry(0, ConnectionMode::Sta, 5180)).unwrap();
        let config = PolicyManagerConfig::default();
        let caps = ConcurrencyCaps {
            dbs: true,
            ..ConcurrencyCaps::default()
        };
        let pcl = pcl_for(ConnectionMode::Sap, &table, None, &config, caps);

        assert_eq!(pcl.freqs[0], 5180);
        assert_eq!(channel_weight(&pcl, 5180), WEIGHT_GROUP1);
        assert_eq!(channel_weight(&pcl, 2412), WEIGHT_GROUP2);
        assert_eq!(channel_weight(&pcl, 5745), WEIGHT_GROUP3);
        assert_eq!(channel_weight(&pcl, 5260), WEIGHT_NON_PCL);
    }

    #[test]
    fn test_sap_scc_only_with_mcc_to_scc() {
        let mut table = ConnectionTable::new(3).unwrap();
        table.add(entry(0, ConnectionMode::Sta, 5180)).unwrap();
        let config =
            PolicyManagerConfig::default().with_mcc_to_scc_switch(MccToSccSwitch::WithFavoriteChannel);
        let pcl = pcl_for(ConnectionMode::Sap, &table, None, &config, ConcurrencyCaps::default());
        assert_eq!(pcl.freqs, vec![5180]);
        assert_eq!(pcl.weights, vec![WEIGHT_GROUP1]);
    }

    #[test]
    fn test_excluded_vdev_is_ignored() {
        let mut table = ConnectionTable::new(3).unwrap();
        table.add(entry(0, ConnectionMode::Sta, 5180)).unwrap();
        let config = PolicyManagerConfig::default();
        let pcl = pcl_for(ConnectionMode::Sta, &table, Some(0), &config, ConcurrencyCaps::default());
        assert!(pcl.weights.iter().all(|w| *w == WEIGHT_GROUP1));
    }

    #[test]
    fn test_sta_keeps_dfs_channels() {
        let mut table = ConnectionTable::new(3).unwrap();
        table.add(entry(0, ConnectionMode::Sap, 2412)).unwrap();
        let config = PolicyManagerConfig::default();
        let pcl = pcl_for(ConnectionMode::Sta, &table, None, &config, ConcurrencyCaps::default());
        assert_eq!(channel_weight(&pcl, 2412), WEIGHT_GROUP1);
        assert_eq!(channel_weight(&pcl, 5260), WEIGHT_GROUP3);
    }
}
