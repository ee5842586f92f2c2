//! # Connection Table
//!
//! Dense, order-significant registry of active connections.
//!
//! ## Invariants Enforced
//!
//! - Compaction: `add()` appends at `count()`, `remove()` shifts later
//!   entries left and zeroes the tail slot
//! - Uniqueness: `add()` rejects a vdev that already owns a slot
//! - Counter consistency: checked by `validate()`, never enforced by panics

use tracing::warn;

use super::entities::ConnectionEntry;
use super::errors::{FreqMhz, MacId, PolicyError, Result, VdevId};
use super::invariants::{invariant_compacted, invariant_session_counters, invariant_unique_vdevs};
use super::value_objects::{ChannelFlags, ChannelWidth, ConnectionMode};

/// Physical capacity of the table.
pub const MAX_NUMBER_OF_CONC_CONNECTIONS: usize = 4;

/// The concurrency connection table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionTable {
    slots: [ConnectionEntry; MAX_NUMBER_OF_CONC_CONNECTIONS],
    max_conc_cxns: usize,
    active_sessions: [u32; ConnectionMode::COUNT],
}

impl ConnectionTable {
    /// Create an empty table admitting at most `max_conc_cxns` connections.
    pub fn new(max_conc_cxns: usize) -> Result<Self> {
        if max_conc_cxns == 0 || max_conc_cxns > MAX_NUMBER_OF_CONC_CONNECTIONS {
            return Err(PolicyError::InvalidConfig(format!(
                "max_conc_cxns {} outside 1..={}",
                max_conc_cxns, MAX_NUMBER_OF_CONC_CONNECTIONS
            )));
        }
        Ok(Self {
            slots: [ConnectionEntry::default(); MAX_NUMBER_OF_CONC_CONNECTIONS],
            max_conc_cxns,
            active_sessions: [0; ConnectionMode::COUNT],
        })
    }

    /// Configured maximum number of connections.
    pub fn max_conc_cxns(&self) -> usize {
        self.max_conc_cxns
    }

    /// Number of in-use entries.
    pub fn count(&self) -> u32 {
        self.slots.iter().filter(|e| e.in_use).count() as u32
    }

    /// True when no connection is active.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The in-use prefix of the table, in slot order.
    pub fn entries(&self) -> &[ConnectionEntry] {
        let used = self
            .slots
            .iter()
            .position(|e| !e.in_use)
            .unwrap_or(MAX_NUMBER_OF_CONC_CONNECTIONS);
        &self.slots[..used]
    }

    /// All slots including unused ones.
    pub fn slots(&self) -> &[ConnectionEntry; MAX_NUMBER_OF_CONC_CONNECTIONS] {
        &self.slots
    }

    /// Slot index of a vdev.
    pub fn index_of(&self, vdev_id: VdevId) -> Option<usize> {
        self.slots
            .iter()
            .position(|e| e.in_use && e.vdev_id == vdev_id)
    }

    /// Entry of a vdev.
    pub fn get(&self, vdev_id: VdevId) -> Option<&ConnectionEntry> {
        self.index_of(vdev_id).map(|i| &self.slots[i])
    }

    /// Number of entries in `mode` and their slot indices.
    pub fn count_for_mode(&self, mode: ConnectionMode) -> (u32, Vec<usize>) {
        let indices: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.in_use && e.mode == mode)
            .map(|(i, _)| i)
            .collect();
        (indices.len() as u32, indices)
    }

    /// Append an entry at the first free slot.
    ///
    /// # Errors
    /// - `CapacityExceeded` if `max_conc_cxns` entries are already present
    /// - `DuplicateVdev` if the vdev already owns a slot
    pub fn add(&mut self, entry: ConnectionEntry) -> Result<usize> {
        let count = self.count() as usize;
        if count >= self.max_conc_cxns {
            return Err(PolicyError::CapacityExceeded {
                count,
                max: self.max_conc_cxns,
            });
        }
        if self.index_of(entry.vdev_id).is_some() {
            return Err(PolicyError::DuplicateVdev(entry.vdev_id));
        }

        self.slots[count] = ConnectionEntry {
            in_use: true,
            ..entry
        };
        Ok(count)
    }

    /// Remove a vdev's entry, shifting later entries down.
    ///
    /// # Errors
    /// - `NotFound` if the vdev has no entry
    pub fn remove(&mut self, vdev_id: VdevId) -> Result<ConnectionEntry> {
        let index = self
            .index_of(vdev_id)
            .ok_or(PolicyError::NotFound(vdev_id))?;
        self.take_at(index).ok_or(PolicyError::NotFound(vdev_id))
    }

    /// Remove the entry at `index`, shifting later entries down.
    pub fn take_at(&mut self, index: usize) -> Option<ConnectionEntry> {
        if index >= MAX_NUMBER_OF_CONC_CONNECTIONS || !self.slots[index].in_use {
            return None;
        }
        let removed = self.slots[index];
        self.slots.copy_within(index + 1.., index);
        self.slots[MAX_NUMBER_OF_CONC_CONNECTIONS - 1] = ConnectionEntry::default();
        Some(removed)
    }

    /// Put an entry back at `index`, shifting later entries up.
    ///
    /// Only bounded by the physical capacity: restored entries were in the
    /// table before, so `max_conc_cxns` is not re-checked.
    pub fn insert_at(&mut self, index: usize, entry: ConnectionEntry) -> Result<()> {
        let count = self.count() as usize;
        if count >= MAX_NUMBER_OF_CONC_CONNECTIONS {
            return Err(PolicyError::CapacityExceeded {
                count,
                max: MAX_NUMBER_OF_CONC_CONNECTIONS,
            });
        }
        if self.index_of(entry.vdev_id).is_some() {
            return Err(PolicyError::DuplicateVdev(entry.vdev_id));
        }
        let index = index.min(count);
        self.slots.copy_within(index..count, index + 1);
        self.slots[index] = ConnectionEntry {
            in_use: true,
            ..entry
        };
        Ok(())
    }

    /// Move an existing connection to a new channel.
    pub fn update(
        &mut self,
        vdev_id: VdevId,
        freq: FreqMhz,
        bandwidth: ChannelWidth,
        mac_id: MacId,
        channel_flags: ChannelFlags,
    ) -> Result<()> {
        let index = self
            .index_of(vdev_id)
            .ok_or(PolicyError::NotFound(vdev_id))?;
        let slot = &mut self.slots[index];
        slot.freq = freq;
        slot.bandwidth = bandwidth;
        slot.mac_id = mac_id;
        slot.channel_flags = channel_flags;
        Ok(())
    }

    /// Count one more active session of `mode`.
    pub fn incr_active_session(&mut self, mode: ConnectionMode) {
        let counter = &mut self.active_sessions[mode.index()];
        *counter = counter.saturating_add(1);
    }

    /// Count one fewer active session of `mode`.
    ///
    /// Returns false (and leaves the counter at zero) on underflow.
    pub fn decr_active_session(&mut self, mode: ConnectionMode) -> bool {
        let counter = &mut self.active_sessions[mode.index()];
        if *counter == 0 {
            warn!("[pm] active session counter for {} already zero", mode);
            return false;
        }
        *counter -= 1;
        true
    }

    /// Active session counter of `mode`.
    pub fn active_sessions(&self, mode: ConnectionMode) -> u32 {
        self.active_sessions[mode.index()]
    }

    /// Bitmask with bit `mode.index()` set for every mode with active sessions.
    pub fn mode_mask(&self) -> u32 {
        ConnectionMode::ALL
            .iter()
            .filter(|m| self.active_sessions[m.index()] > 0)
            .fold(0, |mask, m| mask | (1 << m.index()))
    }

    /// Check uniqueness, compaction and counter consistency.
    pub fn validate(&self) -> Result<()> {
        invariant_unique_vdevs(&self.slots)?;
        invariant_compacted(&self.slots)?;
        invariant_session_counters(&self.slots, &self.active_sessions)?;
        Ok(())
    }
}
