//! Policy Manager Service
//!
//! Owns the connection table, the hardware-mode catalog and the derived
//! flags behind one mutex, and implements `PolicyManagerApi` on top of the
//! pure classifier, admission and PCL functions.
//!
//! Collaborator notifications (PCL updates, datapath toggles, alerts) are
//! collected while the lock is held and dispatched after it is released.
//! Datapath toggles are reconciled against the latest state under their
//! own lock, so racing start/stop calls cannot deliver them out of order.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use pm_telemetry::{
    log_vdev_event, metric_inc, time_histogram, ACTIVE_CONNECTIONS, ADMISSION_DECISIONS,
    ADMISSION_DURATION, CSA_CHECKS, INVARIANT_VIOLATIONS, SESSION_EVENTS,
};
use tracing::{debug, error, info, warn};

use super::csa_guard::CsaEviction;
use crate::adapters::TracingDiagnostics;
use crate::algorithms::{
    build_pcl, check_allow_concurrency, check_concurrency, classifier, AdmissionContext,
    RejectReason, Verdict,
};
use crate::domain::frequency::{band_of, is_5ghz, is_6ghz};
use crate::domain::{
    ChannelFlags, ChannelState, ChannelWidth, ConcurrencyCaps, ConnectionEntry, ConnectionMode,
    ConnectionTable, CsaReason, DbsNss, FreqMhz, HwModeCatalog, HwModeQuery, MacId, PolicyError,
    PolicyManagerConfig, PreferredChannelList, Result, SessionStart, StaSapDfsPolicy, VdevId,
};
use crate::ports::{
    DatapathNotifier, DiagnosticSink, FirmwareCapabilities, PclNotifier, PolicyManagerApi,
    RegulatoryProvider, SecurityProvider,
};

/// State guarded by the Policy Manager lock.
#[derive(Debug)]
struct PolicyState {
    table: ConnectionTable,
    catalog: HwModeCatalog,
    /// Dynamic DFS-master suppression under the flex STA+SAP policy.
    dfs_master_disabled: bool,
    /// Per-SAP permission to move to 6 GHz.
    sap_6ghz_capable: HashMap<VdevId, bool>,
    rx_offload_enabled: bool,
    rps_enabled: bool,
    unsafe_channel_recheck: bool,
}

/// Datapath knob values last handed to the datapath notifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DatapathState {
    rx_offload: bool,
    rps: bool,
}

impl Default for DatapathState {
    fn default() -> Self {
        Self {
            rx_offload: true,
            rps: false,
        }
    }
}

/// PCL updates to hand out once the lock is dropped.
type PclUpdates = Vec<(ConnectionMode, VdevId, PreferredChannelList)>;

/// The WLAN concurrency Policy Manager.
pub struct PolicyManager {
    config: PolicyManagerConfig,
    state: Mutex<PolicyState>,
    /// Serializes datapath notifications; re-entrant for callbacks that
    /// start or stop sessions.
    datapath_sent: ReentrantMutex<Cell<DatapathState>>,
    regulatory: Arc<dyn RegulatoryProvider>,
    firmware: Arc<dyn FirmwareCapabilities>,
    security: Arc<dyn SecurityProvider>,
    pcl_notifier: Arc<dyn PclNotifier>,
    datapath: Arc<dyn DatapathNotifier>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl PolicyManager {
    /// Start building a Policy Manager.
    pub fn builder(config: PolicyManagerConfig) -> PolicyManagerBuilder {
        PolicyManagerBuilder::new(config)
    }

    /// Active configuration.
    pub fn config(&self) -> &PolicyManagerConfig {
        &self.config
    }

    /// Raw firmware capability bits; queried before taking the lock.
    fn firmware_caps(&self) -> ConcurrencyCaps {
        ConcurrencyCaps {
            dbs: self.firmware.dbs_supported(),
            sbs: self.firmware.sbs_supported(),
            dual_beacon_same_channel: self.firmware.dual_beacon_same_channel_supported(),
            sta_plus_sta: self.firmware.sta_plus_sta_supported(),
            wapi_concurrency: self.firmware.wapi_concurrency_supported(),
            interband_mcc: self.firmware.interband_mcc_supported(),
        }
    }

    /// Fold the catalog and the dual-MAC switch into the firmware bits.
    fn effective_caps(&self, firmware: ConcurrencyCaps, catalog: &HwModeCatalog) -> ConcurrencyCaps {
        let dual_mac = !self.config.dual_mac_disabled;
        ConcurrencyCaps {
            dbs: dual_mac && catalog.is_dbs_capable(firmware.dbs),
            sbs: dual_mac && catalog.is_sbs_capable(firmware.sbs),
            ..firmware
        }
    }

    fn ctx(&self, caps: ConcurrencyCaps) -> AdmissionContext<'_> {
        AdmissionContext {
            config: &self.config,
            caps,
            regulatory: &*self.regulatory,
            security: &*self.security,
        }
    }

    fn channel_flags(&self, freq: FreqMhz, bandwidth: ChannelWidth) -> ChannelFlags {
        let mut flags = ChannelFlags::empty();
        if freq != 0 && self.regulatory.channel_state(freq, bandwidth) == ChannelState::Dfs {
            flags.insert(ChannelFlags::DFS);
        }
        if is_6ghz(freq) {
            flags.insert(ChannelFlags::SIX_GHZ);
        }
        flags
    }

    fn build_entry(&self, start: &SessionStart) -> ConnectionEntry {
        let fw_nss = band_of(start.freq)
            .map(|band| self.firmware.nss_for_band(band))
            .unwrap_or(1)
            .clamp(1, 8);

        let (chain_mask, nss) = if start.chain_mask == 0 {
            (((1u16 << fw_nss) - 1) as u8, fw_nss)
        } else {
            (
                start.chain_mask,
                fw_nss.min(start.chain_mask.count_ones() as u8),
            )
        };

        ConnectionEntry::new(
            start.vdev_id,
            start.mode,
            start.mac_id,
            start.freq,
            start.bandwidth,
            chain_mask,
            nss,
            self.channel_flags(start.freq, start.bandwidth),
        )
    }

    /// PCL for every STA, each computed without the STA itself.
    fn sta_pcls(&self, state: &PolicyState, caps: ConcurrencyCaps, valid: &[FreqMhz]) -> PclUpdates {
        let ctx = self.ctx(caps);
        state
            .table
            .entries()
            .iter()
            .filter(|e| e.mode == ConnectionMode::Sta)
            .map(|e| {
                let pcl = build_pcl(ConnectionMode::Sta, &state.table, Some(e.vdev_id), valid, &ctx);
                (ConnectionMode::Sta, e.vdev_id, pcl)
            })
            .collect()
    }

    /// Recompute the DFS-master flag and per-SAP 6 GHz capability.
    fn refresh_derived(&self, state: &mut PolicyState) {
        let entries = state.table.entries();

        let disabled = self.config.sta_sap_scc_on_dfs_chan == StaSapDfsPolicy::Flex
            && entries.iter().any(|e| e.mode.is_sta_like() && is_5ghz(e.freq))
            && entries.iter().any(|e| e.mode.is_beaconing() && is_5ghz(e.freq));

        let sap_6ghz: HashMap<VdevId, bool> = entries
            .iter()
            .filter(|e| e.mode == ConnectionMode::Sap)
            .map(|sap| {
                let blocked = entries.iter().any(|o| {
                    o.vdev_id != sap.vdev_id
                        && o.mode.is_beaconing()
                        && is_5ghz(o.freq)
                        && o.is_on_dfs()
                });
                (sap.vdev_id, !blocked)
            })
            .collect();

        if disabled != state.dfs_master_disabled {
            info!(
                "[pm] dynamic DFS master {}",
                if disabled { "disabled" } else { "enabled" }
            );
            state.dfs_master_disabled = disabled;
        }
        state.sap_6ghz_capable = sap_6ghz;
    }

    /// Apply the RX offload and RPS rules to the state.
    fn update_datapath(&self, state: &mut PolicyState, started: bool) {
        let entries = state.table.entries();
        let data_bearing = entries.iter().filter(|e| e.mode.is_data_bearing()).count();
        let idle_or_single_sta =
            entries.is_empty() || (entries.len() == 1 && entries[0].mode == ConnectionMode::Sta);

        if started && data_bearing > 1 {
            state.rx_offload_enabled = false;
        } else if !started && idle_or_single_sta {
            state.rx_offload_enabled = true;
        }
        state.rps_enabled = state.table.count_for_mode(ConnectionMode::Sap).0 == 1;
    }

    /// Push the current RX offload and RPS values to the datapath.
    ///
    /// The state is read under `datapath_sent`, so the last value sent
    /// always matches the latest state.
    fn sync_datapath(&self) {
        let sent = self.datapath_sent.lock();
        let (rx_offload, rps) = {
            let state = self.state.lock();
            (state.rx_offload_enabled, state.rps_enabled)
        };

        if rx_offload != sent.get().rx_offload {
            sent.set(DatapathState {
                rx_offload,
                ..sent.get()
            });
            info!("[pm] RX offload {}", if rx_offload { "enabled" } else { "disabled" });
            self.datapath.set_rx_offload(rx_offload);
        }
        if rps != sent.get().rps {
            sent.set(DatapathState { rps, ..sent.get() });
            info!("[pm] RPS {}", if rps { "enabled" } else { "disabled" });
            self.datapath.set_rps(rps);
        }
    }

    fn dispatch(&self, pcl_updates: PclUpdates) {
        for (mode, vdev_id, pcl) in &pcl_updates {
            debug!("[pm] PCL for vdev {}: {} channels", vdev_id, pcl.len());
            self.pcl_notifier.set_pcl(*mode, *vdev_id, pcl);
        }
        self.sync_datapath();
    }

    fn report_violation(&self, err: &PolicyError) {
        metric_inc!(INVARIANT_VIOLATIONS);
        error!("[pm] {}", err);
        self.diagnostics.raise_alert(&err.to_string());
    }

    fn record_decision(&self, mode: ConnectionMode, freq: FreqMhz, verdict: &Verdict) -> bool {
        let label = mode.to_string();
        match verdict {
            Ok(()) => {
                metric_inc!(ADMISSION_DECISIONS, &[label.as_str(), "allowed"]);
                true
            }
            Err(reason) => {
                debug!("[pm] {} on {} rejected: {}", mode, freq, reason);
                metric_inc!(ADMISSION_DECISIONS, &[label.as_str(), reason.as_str()]);
                false
            }
        }
    }

    fn admit<F>(&self, mode: ConnectionMode, freq: FreqMhz, rules: F) -> bool
    where
        F: FnOnce(&ConnectionTable, &AdmissionContext<'_>) -> Verdict,
    {
        let _timer = time_histogram!(ADMISSION_DURATION);

        let firmware = self.firmware_caps();
        let (verdict, violation) = {
            let state = self.state.lock();
            let ctx = self.ctx(self.effective_caps(firmware, &state.catalog));
            let verdict = rules(&state.table, &ctx);
            let violation = if verdict == Err(RejectReason::TableFull) {
                state.table.validate().err()
            } else {
                None
            };
            (verdict, violation)
        };

        if let Some(err) = violation {
            self.report_violation(&err);
        }
        self.record_decision(mode, freq, &verdict)
    }
}

impl PolicyManagerApi for PolicyManager {
    fn is_concurrency_allowed(
        &self,
        mode: ConnectionMode,
        freq: FreqMhz,
        bandwidth: ChannelWidth,
    ) -> bool {
        self.admit(mode, freq, |table, ctx| {
            check_concurrency(table, mode, freq, bandwidth, ctx)
        })
    }

    fn allow_concurrency(&self, mode: ConnectionMode, freq: FreqMhz, bandwidth: ChannelWidth) -> bool {
        self.admit(mode, freq, |table, ctx| {
            check_allow_concurrency(table, mode, freq, bandwidth, ctx)
        })
    }

    fn allow_concurrency_csa(
        &self,
        mode: ConnectionMode,
        freq: FreqMhz,
        bandwidth: ChannelWidth,
        vdev_id: VdevId,
        forced: bool,
        reason: CsaReason,
    ) -> bool {
        let _timer = time_histogram!(ADMISSION_DURATION);

        let firmware = self.firmware_caps();
        let verdict = {
            let mut state = self.state.lock();
            let ctx = self.ctx(self.effective_caps(firmware, &state.catalog));
            // the guard restores the table before `state` unlocks
            let verdict = match CsaEviction::evict(&mut state.table, vdev_id, forced, reason) {
                None => {
                    warn!("[pm] CSA check for unknown vdev {}", vdev_id);
                    Err(RejectReason::CsaVdevNotFound)
                }
                Some(guard) => {
                    debug!(
                        "[pm] CSA check for vdev {} to {} with {:?} evicted",
                        vdev_id,
                        freq,
                        guard.evicted_vdevs()
                    );
                    check_allow_concurrency(guard.table(), mode, freq, bandwidth, &ctx)
                }
            };
            verdict
        };

        let allowed = verdict.is_ok();
        metric_inc!(CSA_CHECKS, &[if allowed { "allowed" } else { "rejected" }]);
        self.record_decision(mode, freq, &verdict)
    }

    fn on_session_start(&self, start: SessionStart) -> Result<()> {
        let entry = self.build_entry(&start);
        let firmware = self.firmware_caps();
        let valid = self.regulatory.valid_channels();

        let pcl_updates = {
            let mut state = self.state.lock();
            state.table.add(entry)?;
            state.table.incr_active_session(start.mode);

            let pcl_updates = if start.mode != ConnectionMode::Sta
                && state.table.count_for_mode(ConnectionMode::Sta).0 > 0
            {
                let caps = self.effective_caps(firmware, &state.catalog);
                self.sta_pcls(&state, caps, &valid)
            } else {
                Vec::new()
            };

            self.refresh_derived(&mut state);
            self.update_datapath(&mut state, true);

            ACTIVE_CONNECTIONS.set(state.table.count() as f64);
            pcl_updates
        };

        let label = start.mode.to_string();
        metric_inc!(SESSION_EVENTS, &[label.as_str(), "start"]);
        log_vdev_event!(
            info,
            "session started",
            start.vdev_id,
            start.mode,
            freq = start.freq,
            mac_id = start.mac_id
        );

        self.dispatch(pcl_updates);
        Ok(())
    }

    fn on_session_stop(&self, mode: ConnectionMode, vdev_id: VdevId) -> Result<()> {
        {
            let mut state = self.state.lock();
            let removed = state.table.remove(vdev_id)?;
            if removed.mode != mode {
                warn!(
                    "[pm] vdev {} stopped as {} but was registered as {}",
                    vdev_id, mode, removed.mode
                );
            }
            state.table.decr_active_session(mode);

            self.refresh_derived(&mut state);
            self.update_datapath(&mut state, false);
            if mode.is_sta_like() {
                state.unsafe_channel_recheck = true;
            }

            ACTIVE_CONNECTIONS.set(state.table.count() as f64);
        }

        let label = mode.to_string();
        metric_inc!(SESSION_EVENTS, &[label.as_str(), "stop"]);
        log_vdev_event!(info, "session stopped", vdev_id, mode);

        self.sync_datapath();
        Ok(())
    }

    fn update_connection(
        &self,
        vdev_id: VdevId,
        freq: FreqMhz,
        bandwidth: ChannelWidth,
        mac_id: MacId,
    ) -> Result<()> {
        let flags = self.channel_flags(freq, bandwidth);
        let mut state = self.state.lock();
        state.table.update(vdev_id, freq, bandwidth, mac_id, flags)?;
        self.refresh_derived(&mut state);
        debug!("[pm] vdev {} moved to {} on mac {}", vdev_id, freq, mac_id);
        Ok(())
    }

    fn is_scc(&self) -> bool {
        let state = self.state.lock();
        classifier::is_scc(&state.table, classifier::is_current_hwmode_dbs(&state.catalog))
    }

    fn is_mcc(&self) -> bool {
        classifier::is_mcc(&self.state.lock().table)
    }

    fn is_mcc_in_24ghz(&self) -> bool {
        classifier::is_mcc_in_24ghz(&self.state.lock().table)
    }

    fn is_sta_present_on_dfs_channel(&self) -> bool {
        classifier::is_sta_present_on_dfs_channel(&self.state.lock().table)
    }

    fn is_any_dfs_beaconing_session_present(&self) -> Option<FreqMhz> {
        classifier::is_any_dfs_beaconing_session_present(&self.state.lock().table)
    }

    fn is_current_hwmode_dbs(&self) -> bool {
        classifier::is_current_hwmode_dbs(&self.state.lock().catalog)
    }

    fn is_dbs_capable(&self) -> bool {
        let firmware = self.firmware_caps();
        self.effective_caps(firmware, &self.state.lock().catalog).dbs
    }

    fn is_sbs_capable(&self) -> bool {
        let firmware = self.firmware_caps();
        self.effective_caps(firmware, &self.state.lock().catalog).sbs
    }

    fn get_hw_dbs_nss(&self) -> DbsNss {
        self.state.lock().catalog.get_hw_dbs_nss()
    }

    fn find_hw_mode_index(&self, query: &HwModeQuery) -> Option<usize> {
        self.state.lock().catalog.find_hw_mode_index(query)
    }

    fn update_hw_mode_catalog(&self, raw: &[u32]) -> Result<()> {
        let catalog = HwModeCatalog::from_raw(raw)?;
        let modes = catalog.len();
        self.state.lock().catalog = catalog;
        info!("[pm] hardware mode catalog replaced, {} modes", modes);
        Ok(())
    }

    fn update_hw_mode_index(&self, index: usize) -> Result<()> {
        self.state.lock().catalog.set_current_index(index)?;
        info!("[pm] hardware mode index now {}", index);
        Ok(())
    }

    fn connection_count(&self) -> u32 {
        self.state.lock().table.count()
    }

    fn mode_count(&self, mode: ConnectionMode) -> u32 {
        self.state.lock().table.count_for_mode(mode).0
    }

    fn concurrency_mode_mask(&self) -> u32 {
        self.state.lock().table.mode_mask()
    }

    fn connections(&self) -> Vec<ConnectionEntry> {
        self.state.lock().table.entries().to_vec()
    }

    fn get_pcl(&self, mode: ConnectionMode, vdev_id: Option<VdevId>) -> PreferredChannelList {
        let firmware = self.firmware_caps();
        let valid = self.regulatory.valid_channels();
        let state = self.state.lock();
        let ctx = self.ctx(self.effective_caps(firmware, &state.catalog));
        build_pcl(mode, &state.table, vdev_id, &valid, &ctx)
    }

    fn get_dfs_master_dynamic_enabled(&self, vdev_id: VdevId) -> bool {
        if self.config.sta_sap_scc_on_dfs_chan != StaSapDfsPolicy::Flex {
            return true;
        }
        let state = self.state.lock();
        match state.table.get(vdev_id) {
            Some(e) if e.mode.is_beaconing() && is_5ghz(e.freq) => !state.dfs_master_disabled,
            _ => true,
        }
    }

    fn is_ap_6ghz_capable(&self, vdev_id: VdevId) -> bool {
        self.state
            .lock()
            .sap_6ghz_capable
            .get(&vdev_id)
            .copied()
            .unwrap_or(false)
    }

    fn take_unsafe_channel_recheck(&self) -> bool {
        std::mem::take(&mut self.state.lock().unsafe_channel_recheck)
    }

    fn validate(&self) -> Result<()> {
        let result = self.state.lock().table.validate();
        if let Err(err) = &result {
            self.report_violation(err);
        }
        result
    }

    fn dump_connections(&self) {
        if !self.diagnostics.verbose_enabled() {
            return;
        }
        for (slot, e) in self.connections().iter().enumerate() {
            debug!(
                "[pm] slot {}: vdev {} {} mac {} freq {} bw {} nss {} chain_mask {:#x} flags {:#x}",
                slot,
                e.vdev_id,
                e.mode,
                e.mac_id,
                e.freq,
                e.bandwidth.mhz(),
                e.nss,
                e.chain_mask,
                e.channel_flags.bits()
            );
        }
    }
}

/// Builder wiring the Policy Manager to its collaborators.
pub struct PolicyManagerBuilder {
    config: PolicyManagerConfig,
    catalog: HwModeCatalog,
    regulatory: Option<Arc<dyn RegulatoryProvider>>,
    firmware: Option<Arc<dyn FirmwareCapabilities>>,
    security: Option<Arc<dyn SecurityProvider>>,
    pcl_notifier: Option<Arc<dyn PclNotifier>>,
    datapath: Option<Arc<dyn DatapathNotifier>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl PolicyManagerBuilder {
    /// Builder with the given configuration and an empty catalog.
    pub fn new(config: PolicyManagerConfig) -> Self {
        Self {
            config,
            catalog: HwModeCatalog::default(),
            regulatory: None,
            firmware: None,
            security: None,
            pcl_notifier: None,
            datapath: None,
            diagnostics: None,
        }
    }

    /// Initial hardware-mode catalog.
    pub fn hw_mode_catalog(mut self, catalog: HwModeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Regulatory database.
    pub fn regulatory(mut self, regulatory: Arc<dyn RegulatoryProvider>) -> Self {
        self.regulatory = Some(regulatory);
        self
    }

    /// Firmware capabilities.
    pub fn firmware(mut self, firmware: Arc<dyn FirmwareCapabilities>) -> Self {
        self.firmware = Some(firmware);
        self
    }

    /// Security state.
    pub fn security(mut self, security: Arc<dyn SecurityProvider>) -> Self {
        self.security = Some(security);
        self
    }

    /// PCL consumer.
    pub fn pcl_notifier(mut self, notifier: Arc<dyn PclNotifier>) -> Self {
        self.pcl_notifier = Some(notifier);
        self
    }

    /// Datapath knobs.
    pub fn datapath(mut self, datapath: Arc<dyn DatapathNotifier>) -> Self {
        self.datapath = Some(datapath);
        self
    }

    /// Diagnostic sink; defaults to [`TracingDiagnostics`].
    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Validate the configuration and assemble the Policy Manager.
    ///
    /// # Errors
    /// - `InvalidConfig` for an out-of-range configuration
    /// - `InvalidContext` when a required collaborator is missing
    pub fn build(self) -> Result<PolicyManager> {
        self.config.validate()?;

        fn required<T: ?Sized>(port: Option<Arc<T>>, name: &str) -> Result<Arc<T>> {
            port.ok_or_else(|| PolicyError::InvalidContext(format!("{} not provided", name)))
        }

        let table = ConnectionTable::new(self.config.max_conc_cxns)?;
        let manager = PolicyManager {
            state: Mutex::new(PolicyState {
                table,
                catalog: self.catalog,
                dfs_master_disabled: false,
                sap_6ghz_capable: HashMap::new(),
                rx_offload_enabled: true,
                rps_enabled: false,
                unsafe_channel_recheck: false,
            }),
            datapath_sent: ReentrantMutex::new(Cell::new(DatapathState::default())),
            regulatory: required(self.regulatory, "regulatory provider")?,
            firmware: required(self.firmware, "firmware capabilities")?,
            security: required(self.security, "security provider")?,
            pcl_notifier: required(self.pcl_notifier, "PCL notifier")?,
            datapath: required(self.datapath, "datapath notifier")?,
            diagnostics: self
                .diagnostics
                .unwrap_or_else(|| Arc::new(TracingDiagnostics::new())),
            config: self.config,
        };

        let fw = &manager.firmware;
        info!(
            "[pm] policy manager ready, max {} connections; firmware dbs {} sbs {} dual beacon same/diff channel {}/{} sta+sta {} wapi {} inter-band mcc {}",
            manager.config.max_conc_cxns,
            fw.dbs_supported(),
            fw.sbs_supported(),
            fw.dual_beacon_same_channel_supported(),
            fw.dual_beacon_diff_channel_supported(),
            fw.sta_plus_sta_supported(),
            fw.wapi_concurrency_supported(),
            fw.interband_mcc_supported()
        );
        Ok(manager)
    }
}
