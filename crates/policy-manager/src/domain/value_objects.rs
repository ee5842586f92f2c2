//! # Domain Value Objects
//!
//! Immutable value types shared by the table, the classifier and the
//! admission rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Operating mode of a vdev.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionMode {
    /// Infrastructure station.
    #[default]
    Sta,
    /// Soft access point.
    Sap,
    /// P2P client.
    P2pClient,
    /// P2P group owner.
    P2pGo,
    /// NAN discovery.
    NanDisc,
    /// NAN data interface.
    Ndi,
}

impl ConnectionMode {
    /// Number of modes.
    pub const COUNT: usize = 6;

    /// Every mode, in counter order.
    pub const ALL: [ConnectionMode; Self::COUNT] = [
        Self::Sta,
        Self::Sap,
        Self::P2pClient,
        Self::P2pGo,
        Self::NanDisc,
        Self::Ndi,
    ];

    /// Slot of this mode in per-mode counter arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Sta => 0,
            Self::Sap => 1,
            Self::P2pClient => 2,
            Self::P2pGo => 3,
            Self::NanDisc => 4,
            Self::Ndi => 5,
        }
    }

    /// SAP and P2P-GO transmit beacons.
    pub fn is_beaconing(self) -> bool {
        matches!(self, Self::Sap | Self::P2pGo)
    }

    /// STA and P2P client associate to a remote AP/GO.
    pub fn is_sta_like(self) -> bool {
        matches!(self, Self::Sta | Self::P2pClient)
    }

    /// Modes permitted to operate on a 6 GHz channel in concurrency.
    pub fn is_6ghz_eligible(self) -> bool {
        matches!(
            self,
            Self::Sta | Self::Sap | Self::P2pClient | Self::P2pGo
        )
    }

    /// Modes that carry a data path (everything except NAN discovery).
    pub fn is_data_bearing(self) -> bool {
        !matches!(self, Self::NanDisc)
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sta => "STA",
            Self::Sap => "SAP",
            Self::P2pClient => "P2P_CLIENT",
            Self::P2pGo => "P2P_GO",
            Self::NanDisc => "NAN_DISC",
            Self::Ndi => "NDI",
        };
        f.write_str(name)
    }
}

/// Channel width class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelWidth {
    /// 20 MHz
    #[default]
    Width20,
    /// 40 MHz
    Width40,
    /// 80 MHz
    Width80,
    /// 160 MHz
    Width160,
    /// 80+80 MHz
    Width80P80,
}

impl ChannelWidth {
    /// Occupied bandwidth in MHz.
    pub fn mhz(self) -> u32 {
        match self {
            Self::Width20 => 20,
            Self::Width40 => 40,
            Self::Width80 => 80,
            Self::Width160 | Self::Width80P80 => 160,
        }
    }
}

/// Regulatory state of a channel for a given width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelState {
    /// Usable without radar detection.
    Enabled,
    /// Usable, radar detection required.
    Dfs,
    /// Not usable.
    Disabled,
}

/// Frequency band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// 2.4 GHz
    Band2G,
    /// 5 GHz
    Band5G,
    /// 6 GHz
    Band6G,
}

/// Per-connection channel attribute bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelFlags(u32);

impl ChannelFlags {
    /// Radar detection required on the operating channel.
    pub const DFS: ChannelFlags = ChannelFlags(1 << 0);
    /// Operating channel is in the 6 GHz band.
    pub const SIX_GHZ: ChannelFlags = ChannelFlags(1 << 1);

    /// No bits set.
    pub const fn empty() -> Self {
        ChannelFlags(0)
    }

    /// Raw bit value.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set.
    pub fn contains(self, other: ChannelFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: ChannelFlags) {
        self.0 |= other.0;
    }

    /// Shorthand for `contains(DFS)`.
    pub fn is_dfs(self) -> bool {
        self.contains(Self::DFS)
    }

    /// Shorthand for `contains(SIX_GHZ)`.
    pub fn is_6ghz(self) -> bool {
        self.contains(Self::SIX_GHZ)
    }
}

impl BitOr for ChannelFlags {
    type Output = ChannelFlags;

    fn bitor(self, rhs: ChannelFlags) -> ChannelFlags {
        ChannelFlags(self.0 | rhs.0)
    }
}

/// Why a channel switch is being requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CsaReason {
    /// Current channel became unsafe (LTE coexistence).
    UnsafeChannel,
    /// Dynamic channel selection found a better channel.
    Dcs,
    /// Radar detected on the current channel.
    Radar,
    /// Requested by the user or the upper layer.
    UserInitiated,
    /// Anything else.
    Other,
}

impl CsaReason {
    /// Reasons for which SAPs sharing the vacated channel move together.
    pub fn moves_colocated_saps(self) -> bool {
        matches!(self, Self::UnsafeChannel | Self::Dcs)
    }
}
