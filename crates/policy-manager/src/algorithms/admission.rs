//! # Admission Rules
//!
//! Decides whether a connection may join the active set. Rules run in a
//! fixed short-circuit order and the first failing rule names the verdict:
//!
//! 1. sub-20 MHz operation forbids any concurrency
//! 2. table full
//! 3. channel rules (skipped when the channel is not yet known):
//!    third home channel on a MAC, cross-band MCC without firmware
//!    support, DFS MCC with a STA, DFS beaconing
//!    channel mismatch, 6 GHz exposure, DFS beaconing with 2.4 GHz on a
//!    single MAC
//! 4. STA+STA limits
//! 5. SAP/P2P-GO pairing
//! 6. two P2P-GOs on one band
//! 7. WAPI exclusivity
//!
//! The fourth-connection rule is layered on top by
//! [`check_allow_concurrency`].

use std::fmt;

use tracing::debug;

use super::classifier::{all_pairs, freqs_on_same_mac, is_any_dfs_beaconing_session_present};
use super::pcl::build_pcl;
use crate::domain::frequency::{is_24ghz, is_5ghz, is_6ghz, same_band};
use crate::domain::{
    ChannelState, ChannelWidth, ConcurrencyCaps, ConnectionMode, ConnectionTable, FreqMhz,
    MccToSccSwitch, PolicyManagerConfig, StaSapDfsPolicy,
};
use crate::ports::{RegulatoryProvider, SecurityProvider};

/// Everything the rules consult besides the table.
#[derive(Clone, Copy)]
pub struct AdmissionContext<'a> {
    /// Active configuration.
    pub config: &'a PolicyManagerConfig,
    /// Effective hardware capabilities.
    pub caps: ConcurrencyCaps,
    /// Channel regulatory database.
    pub regulatory: &'a dyn RegulatoryProvider,
    /// Security association state.
    pub security: &'a dyn SecurityProvider,
}

/// Why a connection was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Sub-20 MHz operation is configured.
    Sub20Mhz,
    /// `max_conc_cxns` connections already active.
    TableFull,
    /// A MAC would serve a third channel.
    ThirdHomeChannel,
    /// A MAC would time-slice across bands without firmware support.
    InterbandMcc,
    /// DFS channel in MCC with a 5 GHz STA.
    DfsMcc,
    /// A beaconing vdev already owns a DFS channel.
    DfsBeaconingChannelMismatch,
    /// Mode cannot operate on 6 GHz.
    SixGhzIneligibleMode,
    /// A beaconing vdev runs on a 5 GHz DFS channel.
    SixGhzWithDfsBeaconing,
    /// DFS beaconing plus 2.4 GHz on single-MAC hardware.
    DfsBeaconingOn24Ghz,
    /// Two STAs already active.
    StaLimit,
    /// Firmware lacks STA+STA support.
    StaPlusStaUnsupported,
    /// Beaconing vdevs cannot coexist.
    SapGoConcurrency,
    /// Another P2P-GO on the same band.
    P2pGoSameBand,
    /// A WAPI STA is active.
    WapiActive,
    /// Fourth connection without MCC to SCC switching.
    FourthConnectionNoScc,
    /// Fourth connection on a channel outside the PCL.
    FourthConnectionNotInPcl,
    /// Fourth connection with beaconing not allowed by the SCC policies.
    FourthConnectionBeaconingPolicy,
    /// Channel switch requested for an unknown vdev.
    CsaVdevNotFound,
}

impl RejectReason {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sub20Mhz => "sub_20_mhz",
            Self::TableFull => "table_full",
            Self::ThirdHomeChannel => "third_home_channel",
            Self::InterbandMcc => "interband_mcc",
            Self::DfsMcc => "dfs_mcc",
            Self::DfsBeaconingChannelMismatch => "dfs_beaconing_channel_mismatch",
            Self::SixGhzIneligibleMode => "six_ghz_ineligible_mode",
            Self::SixGhzWithDfsBeaconing => "six_ghz_with_dfs_beaconing",
            Self::DfsBeaconingOn24Ghz => "dfs_beaconing_on_24ghz",
            Self::StaLimit => "sta_limit",
            Self::StaPlusStaUnsupported => "sta_plus_sta_unsupported",
            Self::SapGoConcurrency => "sap_go_concurrency",
            Self::P2pGoSameBand => "p2p_go_same_band",
            Self::WapiActive => "wapi_active",
            Self::FourthConnectionNoScc => "fourth_connection_no_scc",
            Self::FourthConnectionNotInPcl => "fourth_connection_not_in_pcl",
            Self::FourthConnectionBeaconingPolicy => "fourth_connection_beaconing_policy",
            Self::CsaVdevNotFound => "csa_vdev_not_found",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the admission rules.
pub type Verdict = std::result::Result<(), RejectReason>;

/// Run admission rules 1 to 7.
pub fn check_concurrency(
    table: &ConnectionTable,
    mode: ConnectionMode,
    freq: FreqMhz,
    bandwidth: ChannelWidth,
    ctx: &AdmissionContext<'_>,
) -> Verdict {
    let count = table.count() as usize;

    if count > 0 && ctx.config.sub_20_mhz_enabled {
        return Err(RejectReason::Sub20Mhz);
    }

    if count >= table.max_conc_cxns() {
        return Err(RejectReason::TableFull);
    }

    if freq != 0 {
        check_channel_rules(table, mode, freq, bandwidth, ctx)?;
    }

    check_sta_limit(table, mode, &ctx.caps)?;

    if !allow_sap_go_concurrency(table, mode, freq, &ctx.caps) {
        return Err(RejectReason::SapGoConcurrency);
    }

    if freq != 0
        && mode == ConnectionMode::P2pGo
        && table
            .entries()
            .iter()
            .any(|e| e.mode == ConnectionMode::P2pGo && same_band(e.freq, freq))
    {
        return Err(RejectReason::P2pGoSameBand);
    }

    if !ctx.caps.wapi_concurrency
        && table
            .entries()
            .iter()
            .any(|e| e.mode == ConnectionMode::Sta && ctx.security.is_wapi_authenticated(e.vdev_id))
    {
        return Err(RejectReason::WapiActive);
    }

    Ok(())
}

fn check_channel_rules(
    table: &ConnectionTable,
    mode: ConnectionMode,
    freq: FreqMhz,
    bandwidth: ChannelWidth,
    ctx: &AdmissionContext<'_>,
) -> Verdict {
    let entries = table.entries();
    let ConcurrencyCaps { dbs, sbs, .. } = ctx.caps;
    let is_dfs = ctx.regulatory.channel_state(freq, bandwidth) == ChannelState::Dfs;

    for (a, b) in all_pairs(entries) {
        let shared_mac = !dbs || a.mac_id == b.mac_id;
        if a.freq != b.freq
            && shared_mac
            && freq != a.freq
            && freq != b.freq
            && freqs_on_same_mac(freq, a.freq, dbs, sbs)
        {
            debug!(
                "[pm] {} on {} would be a third channel next to {} and {}",
                mode, freq, a.freq, b.freq
            );
            return Err(RejectReason::ThirdHomeChannel);
        }
    }

    if !ctx.caps.interband_mcc {
        if let Some(other) = entries.iter().find(|e| {
            e.freq != 0 && !same_band(e.freq, freq) && freqs_on_same_mac(freq, e.freq, dbs, sbs)
        }) {
            debug!(
                "[pm] {} on {} would be inter-band MCC with vdev {} on {}",
                mode, freq, other.vdev_id, other.freq
            );
            return Err(RejectReason::InterbandMcc);
        }
    }

    if is_dfs {
        if let Some(sta) = entries.iter().find(|e| {
            e.mode == ConnectionMode::Sta
                && is_5ghz(e.freq)
                && e.freq != freq
                && freqs_on_same_mac(freq, e.freq, dbs, sbs)
        }) {
            debug!("[pm] DFS {} in MCC with STA on {}", freq, sta.freq);
            return Err(RejectReason::DfsMcc);
        }
    }

    if mode.is_beaconing()
        && entries
            .iter()
            .any(|e| e.mode.is_beaconing() && e.is_on_dfs() && e.freq != freq)
    {
        return Err(RejectReason::DfsBeaconingChannelMismatch);
    }

    if is_6ghz(freq) {
        if !mode.is_6ghz_eligible() {
            return Err(RejectReason::SixGhzIneligibleMode);
        }
        if entries
            .iter()
            .any(|e| e.mode.is_beaconing() && is_5ghz(e.freq) && e.is_on_dfs() && e.freq != freq)
        {
            return Err(RejectReason::SixGhzWithDfsBeaconing);
        }
    }

    if !dbs && is_24ghz(freq) && is_any_dfs_beaconing_session_present(table).is_some() {
        return Err(RejectReason::DfsBeaconingOn24Ghz);
    }

    Ok(())
}

fn check_sta_limit(table: &ConnectionTable, mode: ConnectionMode, caps: &ConcurrencyCaps) -> Verdict {
    if mode != ConnectionMode::Sta {
        return Ok(());
    }
    match table.count_for_mode(ConnectionMode::Sta).0 {
        0 => Ok(()),
        1 if caps.sta_plus_sta => Ok(()),
        1 => Err(RejectReason::StaPlusStaUnsupported),
        _ => Err(RejectReason::StaLimit),
    }
}

/// Whether a new beaconing vdev can coexist with the existing ones.
///
/// Non-beaconing modes always pass. Two beaconing vdevs on one MAC are
/// only admitted on the same channel with dual-beacon support; beaconing
/// MCC is never admitted. With `freq == 0` only the single-MAC dual-beacon
/// check applies.
pub fn allow_sap_go_concurrency(
    table: &ConnectionTable,
    mode: ConnectionMode,
    freq: FreqMhz,
    caps: &ConcurrencyCaps,
) -> bool {
    if !mode.is_beaconing() {
        return true;
    }

    for existing in table.entries().iter().filter(|e| e.mode.is_beaconing()) {
        if freq == 0 {
            if !caps.dbs && !caps.dual_beacon_same_channel {
                debug!("[pm] second beaconing vdev needs DBS or dual beacon");
                return false;
            }
            continue;
        }

        if existing.freq == freq && caps.dual_beacon_same_channel {
            continue;
        }

        if !caps.dbs {
            debug!(
                "[pm] {} on {} next to beaconing vdev {} on {} without DBS",
                mode, freq, existing.vdev_id, existing.freq
            );
            return false;
        }

        if freqs_on_same_mac(existing.freq, freq, caps.dbs, caps.sbs) {
            debug!(
                "[pm] {} on {} shares a MAC with beaconing vdev {} on {}",
                mode, freq, existing.vdev_id, existing.freq
            );
            return false;
        }
    }

    true
}

/// Extra conditions for a connection joining three active ones.
pub fn check_fourth_connection(
    table: &ConnectionTable,
    mode: ConnectionMode,
    freq: FreqMhz,
    ctx: &AdmissionContext<'_>,
) -> Verdict {
    if table.count() != 3 {
        return Ok(());
    }

    if ctx.config.mcc_to_scc_switch == MccToSccSwitch::Disabled {
        return Err(RejectReason::FourthConnectionNoScc);
    }

    let valid = ctx.regulatory.valid_channels();
    let pcl = build_pcl(mode, table, None, &valid, ctx);
    if !pcl.contains(freq) {
        return Err(RejectReason::FourthConnectionNotInPcl);
    }

    let beaconing = mode.is_beaconing() || table.entries().iter().any(|e| e.mode.is_beaconing());
    if beaconing
        && (ctx.config.sta_sap_scc_on_dfs_chan == StaSapDfsPolicy::Disabled
            || !ctx.config.sta_sap_scc_on_lte_coex_chan)
    {
        return Err(RejectReason::FourthConnectionBeaconingPolicy);
    }

    Ok(())
}

/// Rules 1 to 7 followed by the fourth-connection rule.
pub fn check_allow_concurrency(
    table: &ConnectionTable,
    mode: ConnectionMode,
    freq: FreqMhz,
    bandwidth: ChannelWidth,
    ctx: &AdmissionContext<'_>,
) -> Verdict {
    check_concurrency(table, mode, freq, bandwidth, ctx)?;
    check_fourth_connection(table, mode, freq, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelFlags, ConnectionEntry, MacId, VdevId};
    use crate::ports::{MockRegulatory, MockSecurity};

    struct Fixture {
        config: PolicyManagerConfig,
        caps: ConcurrencyCaps,
        regulatory: MockRegulatory,
        security: MockSecurity,
        table: ConnectionTable,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                config: PolicyManagerConfig::default(),
                caps: ConcurrencyCaps {
                    interband_mcc: true,
                    ..ConcurrencyCaps::default()
                },
                regulatory: MockRegulatory::default(),
                security: MockSecurity::default(),
                table: ConnectionTable::new(3).unwrap(),
            }
        }

        fn dbs() -> Self {
            Self {
                caps: ConcurrencyCaps {
                    dbs: true,
                    interband_mcc: true,
                    ..ConcurrencyCaps::default()
                },
                ..Self::new()
            }
        }

        fn add(&mut self, vdev_id: VdevId, mode: ConnectionMode, mac_id: MacId, freq: FreqMhz) {
            let mut flags = ChannelFlags::empty();
            if self.regulatory.dfs_channels.contains(&freq) {
                flags.insert(ChannelFlags::DFS);
            }
            let entry = ConnectionEntry::new(
                vdev_id,
                mode,
                mac_id,
                freq,
                ChannelWidth::Width20,
                1,
                1,
                flags,
            );
            self.table.add(entry).unwrap();
            self.table.incr_active_session(mode);
        }

        fn check(&self, mode: ConnectionMode, freq: FreqMhz) -> Verdict {
            let ctx = AdmissionContext {
                config: &self.config,
                caps: self.caps,
                regulatory: &self.regulatory,
                security: &self.security,
            };
            check_allow_concurrency(&self.table, mode, freq, ChannelWidth::Width20, &ctx)
        }
    }

    #[test]
    fn test_empty_table_allows_anything() {
        let fx = Fixture::new();
        assert_eq!(fx.check(ConnectionMode::Sap, 5260), Ok(()));
        assert_eq!(fx.check(ConnectionMode::Sta, 0), Ok(()));
    }

    #[test]
    fn test_sub_20_mhz_blocks_concurrency() {
        let mut fx = Fixture::new();
        fx.config.sub_20_mhz_enabled = true;
        assert_eq!(fx.check(ConnectionMode::Sta, 2412), Ok(()));
        fx.add(0, ConnectionMode::Sta, 0, 2412);
        assert_eq!(fx.check(ConnectionMode::Sap, 2412), Err(RejectReason::Sub20Mhz));
    }

    #[test]
    fn test_table_full() {
        let mut fx = Fixture::dbs();
        fx.caps.dual_beacon_same_channel = true;
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        fx.add(1, ConnectionMode::Sap, 0, 5180);
        fx.add(2, ConnectionMode::P2pClient, 0, 5180);
        assert_eq!(fx.check(ConnectionMode::Ndi, 5180), Err(RejectReason::TableFull));
    }

    #[test]
    fn test_third_home_channel_rejected() {
        let mut fx = Fixture::new();
        fx.add(0, ConnectionMode::Sta, 0, 2412);
        fx.add(1, ConnectionMode::P2pClient, 0, 2437);
        assert_eq!(
            fx.check(ConnectionMode::NanDisc, 2462),
            Err(RejectReason::ThirdHomeChannel)
        );
        assert_eq!(fx.check(ConnectionMode::NanDisc, 2437), Ok(()));
    }

    #[test]
    fn test_third_channel_on_other_mac_allowed_with_dbs() {
        let mut fx = Fixture::dbs();
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        fx.add(1, ConnectionMode::P2pClient, 0, 5745);
        assert_eq!(fx.check(ConnectionMode::NanDisc, 2412), Ok(()));
        assert_eq!(
            fx.check(ConnectionMode::NanDisc, 5200),
            Err(RejectReason::ThirdHomeChannel)
        );
    }

    #[test]
    fn test_dfs_mcc_with_sta_rejected() {
        let mut fx = Fixture::new();
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        assert_eq!(fx.check(ConnectionMode::Sap, 5260), Err(RejectReason::DfsMcc));
    }

    #[test]
    fn test_dfs_beaconing_channel_mismatch() {
        let mut fx = Fixture::dbs();
        fx.caps.dual_beacon_same_channel = true;
        fx.add(0, ConnectionMode::Sap, 0, 5260);
        assert_eq!(
            fx.check(ConnectionMode::P2pGo, 5745),
            Err(RejectReason::DfsBeaconingChannelMismatch)
        );
        assert_eq!(fx.check(ConnectionMode::P2pGo, 5260), Ok(()));
    }

    #[test]
    fn test_six_ghz_rules() {
        let mut fx = Fixture::dbs();
        assert_eq!(
            fx.check(ConnectionMode::NanDisc, 5955),
            Err(RejectReason::SixGhzIneligibleMode)
        );

        fx.add(0, ConnectionMode::Sap, 0, 5260);
        assert_eq!(
            fx.check(ConnectionMode::Sta, 5955),
            Err(RejectReason::SixGhzWithDfsBeaconing)
        );
    }

    #[test]
    fn test_dbs_admission_without_dbs_modes() {
        // A SAP on 5180 reported as DFS and a second SAP on 2.4 GHz
        let mut fx = Fixture::new();
        fx.regulatory.dfs_channels.push(5180);
        fx.add(0, ConnectionMode::Sap, 0, 5180);
        assert!(fx.check(ConnectionMode::Sap, 2412).is_err());
        assert_eq!(
            fx.check(ConnectionMode::Sta, 2412),
            Err(RejectReason::DfsBeaconingOn24Ghz)
        );
    }

    #[test]
    fn test_third_sta_always_rejected() {
        let mut fx = Fixture::dbs();
        fx.table = ConnectionTable::new(4).unwrap();
        fx.caps.sta_plus_sta = true;
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        fx.add(1, ConnectionMode::Sta, 1, 2412);
        for freq in [0, 2412, 5180, 5745] {
            assert_eq!(fx.check(ConnectionMode::Sta, freq), Err(RejectReason::StaLimit));
        }
    }

    #[test]
    fn test_second_sta_needs_firmware_support() {
        let mut fx = Fixture::dbs();
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        assert_eq!(
            fx.check(ConnectionMode::Sta, 2412),
            Err(RejectReason::StaPlusStaUnsupported)
        );
        fx.caps.sta_plus_sta = true;
        assert_eq!(fx.check(ConnectionMode::Sta, 2412), Ok(()));
    }

    #[test]
    fn test_sap_go_same_channel_needs_dual_beacon() {
        let mut fx = Fixture::new();
        fx.add(0, ConnectionMode::Sap, 0, 5180);
        assert_eq!(
            fx.check(ConnectionMode::P2pGo, 5180),
            Err(RejectReason::SapGoConcurrency)
        );
        fx.caps.dual_beacon_same_channel = true;
        assert_eq!(fx.check(ConnectionMode::P2pGo, 5180), Ok(()));
    }

    #[test]
    fn test_sap_go_unknown_channel() {
        let mut fx = Fixture::new();
        fx.add(0, ConnectionMode::Sap, 0, 5180);
        assert_eq!(
            fx.check(ConnectionMode::Sap, 0),
            Err(RejectReason::SapGoConcurrency)
        );
        fx.caps.dual_beacon_same_channel = true;
        assert_eq!(fx.check(ConnectionMode::Sap, 0), Ok(()));
    }

    #[test]
    fn test_sap_go_on_dbs_hardware() {
        let mut fx = Fixture::dbs();
        fx.add(0, ConnectionMode::Sap, 0, 5180);
        assert_eq!(fx.check(ConnectionMode::Sap, 2412), Ok(()));
        assert_eq!(
            fx.check(ConnectionMode::Sap, 5745),
            Err(RejectReason::SapGoConcurrency)
        );
        fx.caps.dual_beacon_same_channel = true;
        assert_eq!(
            fx.check(ConnectionMode::Sap, 5745),
            Err(RejectReason::SapGoConcurrency)
        );
        assert_eq!(fx.check(ConnectionMode::Sap, 5180), Ok(()));
    }

    #[test]
    fn test_sap_go_mcc_rejected_regardless_of_dbs() {
        for dbs in [false, true] {
            let mut fx = if dbs { Fixture::dbs() } else { Fixture::new() };
            fx.add(0, ConnectionMode::Sap, 0, 5180);
            assert_eq!(
                fx.check(ConnectionMode::Sap, 5745),
                Err(RejectReason::SapGoConcurrency),
                "dbs = {}",
                dbs
            );
        }
    }

    #[test]
    fn test_interband_mcc_needs_firmware_support() {
        let mut fx = Fixture::new();
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        assert_eq!(fx.check(ConnectionMode::P2pClient, 2412), Ok(()));

        fx.caps.interband_mcc = false;
        assert_eq!(
            fx.check(ConnectionMode::P2pClient, 2412),
            Err(RejectReason::InterbandMcc)
        );
        assert_eq!(fx.check(ConnectionMode::P2pClient, 5180), Ok(()));
        assert_eq!(fx.check(ConnectionMode::P2pClient, 5745), Ok(()));
    }

    #[test]
    fn test_interband_mcc_irrelevant_with_dbs() {
        let mut fx = Fixture::dbs();
        fx.caps.interband_mcc = false;
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        assert_eq!(fx.check(ConnectionMode::P2pClient, 2412), Ok(()));
    }

    #[test]
    fn test_two_p2p_go_same_band() {
        // SBS puts 5180 and 5745 on different MACs
        let mut fx = Fixture::dbs();
        fx.caps.sbs = true;
        fx.add(0, ConnectionMode::P2pGo, 0, 5180);
        assert_eq!(
            fx.check(ConnectionMode::P2pGo, 5745),
            Err(RejectReason::P2pGoSameBand)
        );
        assert_eq!(fx.check(ConnectionMode::P2pGo, 2412), Ok(()));
    }

    #[test]
    fn test_wapi_blocks_concurrency() {
        let mut fx = Fixture::dbs();
        fx.add(3, ConnectionMode::Sta, 0, 2412);
        fx.security.set_wapi(3);
        assert_eq!(fx.check(ConnectionMode::Sap, 2412), Err(RejectReason::WapiActive));
        fx.caps.wapi_concurrency = true;
        assert_eq!(fx.check(ConnectionMode::Sap, 2412), Ok(()));
    }

    #[test]
    fn test_fourth_connection_rule() {
        let mut fx = Fixture::dbs();
        fx.table = ConnectionTable::new(4).unwrap();
        fx.caps.sta_plus_sta = true;
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        fx.add(1, ConnectionMode::Sta, 1, 2412);
        fx.add(2, ConnectionMode::NanDisc, 1, 2412);

        assert_eq!(
            fx.check(ConnectionMode::P2pClient, 5180),
            Err(RejectReason::FourthConnectionNoScc)
        );

        fx.config.mcc_to_scc_switch = MccToSccSwitch::WithFavoriteChannel;
        assert_eq!(fx.check(ConnectionMode::P2pClient, 5180), Ok(()));

        fx.regulatory = fx.regulatory.clone().with_disabled(5180);
        assert_eq!(
            fx.check(ConnectionMode::P2pClient, 5180),
            Err(RejectReason::FourthConnectionNotInPcl)
        );
    }

    #[test]
    fn test_fourth_connection_beaconing_policies() {
        let mut fx = Fixture::dbs();
        fx.table = ConnectionTable::new(4).unwrap();
        fx.caps.sta_plus_sta = true;
        fx.caps.dual_beacon_same_channel = true;
        fx.config.mcc_to_scc_switch = MccToSccSwitch::ForceWithoutDisconnection;
        fx.add(0, ConnectionMode::Sta, 0, 5180);
        fx.add(1, ConnectionMode::Sta, 1, 2412);
        fx.add(2, ConnectionMode::NanDisc, 1, 2412);

        assert_eq!(
            fx.check(ConnectionMode::Sap, 5180),
            Err(RejectReason::FourthConnectionBeaconingPolicy)
        );

        fx.config.sta_sap_scc_on_dfs_chan = StaSapDfsPolicy::Enabled;
        assert_eq!(fx.check(ConnectionMode::Sap, 5180), Ok(()));

        fx.config.sta_sap_scc_on_lte_coex_chan = false;
        assert_eq!(
            fx.check(ConnectionMode::Sap, 5180),
            Err(RejectReason::FourthConnectionBeaconingPolicy)
        );
    }

    #[test]
    fn test_reject_reason_labels() {
        assert_eq!(RejectReason::TableFull.to_string(), "table_full");
        assert_eq!(RejectReason::DfsMcc.as_str(), "dfs_mcc");
    }
}
