//! # Hardware-Mode Capability Catalog
//!
//! Firmware reports every PHY/MAC configuration it supports as a packed
//! 32-bit word. Words are decoded once into [`HwModeEntry`] when the catalog
//! is built; queries never touch the raw bits again.
//!
//! ```text
//!  31  28 27  24 23  20 19  16 15  12 11   8  7   6   5  4  3 2   0
//! ┌──────┬──────┬──────┬──────┬──────┬──────┬───┬───┬───┬─────┬─────┐
//! │m0 tx │m0 rx │m1 tx │m1 rx │m0 bw │m1 bw │dbs│adf│sbs│band │ id  │
//! └──────┴──────┴──────┴──────┴──────┴──────┴───┴───┴───┴─────┴─────┘
//! ```

use serde::{Deserialize, Serialize};

use super::errors::{PolicyError, Result};

const MAC0_TX_SS_BITPOS: u32 = 28;
const MAC0_RX_SS_BITPOS: u32 = 24;
const MAC1_TX_SS_BITPOS: u32 = 20;
const MAC1_RX_SS_BITPOS: u32 = 16;
const MAC0_BW_BITPOS: u32 = 12;
const MAC1_BW_BITPOS: u32 = 8;
const DBS_MODE_BITPOS: u32 = 7;
const AGILE_DFS_BITPOS: u32 = 6;
const SBS_MODE_BITPOS: u32 = 5;
const MAC0_BAND_BITPOS: u32 = 3;
const HW_MODE_ID_BITPOS: u32 = 0;

const NIBBLE: u32 = 0xf;
const BAND_MASK: u32 = 0x3;
const ID_MASK: u32 = 0x7;

/// Per-MAC bandwidth capability of a hardware mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HwModeBandwidth {
    /// 20 MHz
    #[default]
    Bw20,
    /// 40 MHz
    Bw40,
    /// 80 MHz
    Bw80,
    /// 80+80 MHz
    Bw80P80,
    /// 160 MHz
    Bw160,
}

impl HwModeBandwidth {
    fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Self::Bw20),
            1 => Ok(Self::Bw40),
            2 => Ok(Self::Bw80),
            3 => Ok(Self::Bw80P80),
            4 => Ok(Self::Bw160),
            other => Err(PolicyError::InvalidHwMode(format!(
                "unknown bandwidth code {}",
                other
            ))),
        }
    }

    fn code(self) -> u32 {
        match self {
            Self::Bw20 => 0,
            Self::Bw40 => 1,
            Self::Bw80 => 2,
            Self::Bw80P80 => 3,
            Self::Bw160 => 4,
        }
    }
}

/// Band capability of MAC 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacBandCap {
    /// Not reported.
    #[default]
    None,
    /// 2.4 GHz only.
    Band2G,
    /// 5 GHz only.
    Band5G,
    /// Both bands.
    Both,
}

impl MacBandCap {
    fn from_code(code: u32) -> Self {
        match code & BAND_MASK {
            1 => Self::Band2G,
            2 => Self::Band5G,
            3 => Self::Both,
            _ => Self::None,
        }
    }

    fn code(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Band2G => 1,
            Self::Band5G => 2,
            Self::Both => 3,
        }
    }
}

/// One supported hardware configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HwModeEntry {
    /// Firmware-assigned identifier.
    pub hw_mode_id: u8,
    /// MAC 0 transmit streams.
    pub mac0_tx_ss: u8,
    /// MAC 0 receive streams.
    pub mac0_rx_ss: u8,
    /// MAC 1 transmit streams.
    pub mac1_tx_ss: u8,
    /// MAC 1 receive streams.
    pub mac1_rx_ss: u8,
    /// MAC 0 bandwidth.
    pub mac0_bw: HwModeBandwidth,
    /// MAC 1 bandwidth.
    pub mac1_bw: HwModeBandwidth,
    /// MAC 0 band capability.
    pub mac0_band: MacBandCap,
    /// Both MACs active on different bands.
    pub dbs_mode: bool,
    /// Agile DFS (background radar detection) available.
    pub agile_dfs: bool,
    /// Both MACs active within one band.
    pub sbs_mode: bool,
}

impl HwModeEntry {
    /// Decode a firmware hardware-mode word.
    ///
    /// # Errors
    /// - `InvalidHwMode` for an unknown bandwidth code
    pub fn from_raw(word: u32) -> Result<Self> {
        let field = |pos: u32, mask: u32| (word >> pos) & mask;
        let flag = |pos: u32| (word >> pos) & 1 == 1;

        Ok(Self {
            hw_mode_id: field(HW_MODE_ID_BITPOS, ID_MASK) as u8,
            mac0_tx_ss: field(MAC0_TX_SS_BITPOS, NIBBLE) as u8,
            mac0_rx_ss: field(MAC0_RX_SS_BITPOS, NIBBLE) as u8,
            mac1_tx_ss: field(MAC1_TX_SS_BITPOS, NIBBLE) as u8,
            mac1_rx_ss: field(MAC1_RX_SS_BITPOS, NIBBLE) as u8,
            mac0_bw: HwModeBandwidth::from_code(field(MAC0_BW_BITPOS, NIBBLE))?,
            mac1_bw: HwModeBandwidth::from_code(field(MAC1_BW_BITPOS, NIBBLE))?,
            mac0_band: MacBandCap::from_code(field(MAC0_BAND_BITPOS, BAND_MASK)),
            dbs_mode: flag(DBS_MODE_BITPOS),
            agile_dfs: flag(AGILE_DFS_BITPOS),
            sbs_mode: flag(SBS_MODE_BITPOS),
        })
    }

    /// Encode back into the firmware word layout.
    pub fn to_raw(&self) -> u32 {
        ((self.mac0_tx_ss as u32 & NIBBLE) << MAC0_TX_SS_BITPOS)
            | ((self.mac0_rx_ss as u32 & NIBBLE) << MAC0_RX_SS_BITPOS)
            | ((self.mac1_tx_ss as u32 & NIBBLE) << MAC1_TX_SS_BITPOS)
            | ((self.mac1_rx_ss as u32 & NIBBLE) << MAC1_RX_SS_BITPOS)
            | (self.mac0_bw.code() << MAC0_BW_BITPOS)
            | (self.mac1_bw.code() << MAC1_BW_BITPOS)
            | ((self.dbs_mode as u32) << DBS_MODE_BITPOS)
            | ((self.agile_dfs as u32) << AGILE_DFS_BITPOS)
            | ((self.sbs_mode as u32) << SBS_MODE_BITPOS)
            | (self.mac0_band.code() << MAC0_BAND_BITPOS)
            | ((self.hw_mode_id as u32 & ID_MASK) << HW_MODE_ID_BITPOS)
    }

    fn mac0_streams(&self) -> u8 {
        self.mac0_tx_ss.min(self.mac0_rx_ss)
    }

    fn mac1_streams(&self) -> u8 {
        self.mac1_tx_ss.min(self.mac1_rx_ss)
    }
}

/// Stream capability of the best DBS mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbsNss {
    /// Larger of the two per-MAC stream counts.
    pub max_streams: u8,
    /// MAC 0 streams, `min(tx, rx)`.
    pub mac0_ss: u8,
    /// MAC 1 streams, `min(tx, rx)`.
    pub mac1_ss: u8,
}

/// Fully-specified hardware configuration to look up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HwModeQuery {
    /// MAC 0 transmit streams.
    pub mac0_tx_ss: u8,
    /// MAC 0 bandwidth.
    pub mac0_bw: HwModeBandwidth,
    /// MAC 1 transmit streams.
    pub mac1_tx_ss: u8,
    /// MAC 1 bandwidth.
    pub mac1_bw: HwModeBandwidth,
    /// MAC 0 band capability.
    pub mac0_band: MacBandCap,
    /// DBS mode.
    pub dbs: bool,
    /// Agile DFS.
    pub agile_dfs: bool,
    /// SBS mode.
    pub sbs: bool,
}

impl HwModeQuery {
    fn matches(&self, entry: &HwModeEntry) -> bool {
        entry.mac0_tx_ss == self.mac0_tx_ss
            && entry.mac0_bw == self.mac0_bw
            && entry.mac1_tx_ss == self.mac1_tx_ss
            && entry.mac1_bw == self.mac1_bw
            && entry.mac0_band == self.mac0_band
            && entry.dbs_mode == self.dbs
            && entry.agile_dfs == self.agile_dfs
            && entry.sbs_mode == self.sbs
    }
}

/// Ordered list of supported hardware modes plus the active selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HwModeCatalog {
    entries: Vec<HwModeEntry>,
    current_index: Option<usize>,
    previous_index: Option<usize>,
}

impl HwModeCatalog {
    /// Catalog from already decoded entries.
    pub fn new(entries: Vec<HwModeEntry>) -> Self {
        Self {
            entries,
            current_index: None,
            previous_index: None,
        }
    }

    /// Decode the firmware capability event.
    pub fn from_raw(words: &[u32]) -> Result<Self> {
        let entries = words
            .iter()
            .map(|w| HwModeEntry::from_raw(*w))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(entries))
    }

    /// Number of modes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when firmware reported nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Modes in firmware order.
    pub fn entries(&self) -> &[HwModeEntry] {
        &self.entries
    }

    /// Mode with the given firmware id.
    pub fn by_hw_mode_id(&self, hw_mode_id: u8) -> Option<&HwModeEntry> {
        self.entries.iter().find(|e| e.hw_mode_id == hw_mode_id)
    }

    /// DBS service bit set and at least one DBS mode listed.
    pub fn is_dbs_capable(&self, dbs_service: bool) -> bool {
        dbs_service && self.entries.iter().any(|e| e.dbs_mode)
    }

    /// SBS service bit set and at least one SBS mode listed.
    pub fn is_sbs_capable(&self, sbs_service: bool) -> bool {
        sbs_service && self.entries.iter().any(|e| e.sbs_mode)
    }

    /// Best per-MAC stream split among DBS modes.
    ///
    /// A later mode replaces the current best only when its larger per-MAC
    /// stream count is strictly greater, so ties keep the first listed.
    pub fn get_hw_dbs_nss(&self) -> DbsNss {
        let mut best = DbsNss::default();
        for entry in self.entries.iter().filter(|e| e.dbs_mode) {
            let mac0 = entry.mac0_streams();
            let mac1 = entry.mac1_streams();
            let max = mac0.max(mac1);
            if max > best.max_streams {
                best = DbsNss {
                    max_streams: max,
                    mac0_ss: mac0,
                    mac1_ss: mac1,
                };
            }
        }
        best
    }

    /// Index of the mode exactly matching `query`.
    pub fn find_hw_mode_index(&self, query: &HwModeQuery) -> Option<usize> {
        self.entries.iter().position(|e| query.matches(e))
    }

    /// Record a firmware hardware-mode switch.
    ///
    /// # Errors
    /// - `InvalidHwMode` if the index is outside the catalog
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(PolicyError::InvalidHwMode(format!(
                "index {} outside catalog of {}",
                index,
                self.entries.len()
            )));
        }
        self.previous_index = self.current_index;
        self.current_index = Some(index);
        Ok(())
    }

    /// Active mode index.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Mode active before the last switch.
    pub fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    /// Active mode.
    pub fn current(&self) -> Option<&HwModeEntry> {
        self.current_index.and_then(|i| self.entries.get(i))
    }

    /// Mode active before the last switch.
    pub fn previous(&self) -> Option<&HwModeEntry> {
        self.previous_index.and_then(|i| self.entries.get(i))
    }
}
