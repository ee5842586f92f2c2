//! Temporary eviction of table entries for channel-switch admission checks.
//!
//! A switching vdev (and, for forced unsafe-channel or DCS switches, every
//! SAP leaving the same channel) must not count against itself. The guard
//! removes those entries and puts them back at their original slots when it
//! goes out of scope, whatever the exit path.

use tracing::error;

use crate::domain::{ConnectionEntry, ConnectionMode, ConnectionTable, CsaReason, FreqMhz, VdevId};

/// Entries evicted from the table for the lifetime of the guard.
pub struct CsaEviction<'a> {
    table: &'a mut ConnectionTable,
    /// Evicted entries with their original slot, ascending by slot.
    evicted: Vec<(usize, ConnectionEntry)>,
}

impl<'a> CsaEviction<'a> {
    /// Evict `vdev_id`, plus co-channel SAPs when the switch is forced for a
    /// reason that moves them too.
    ///
    /// Returns `None`, leaving the table untouched, if the vdev is absent.
    pub fn evict(
        table: &'a mut ConnectionTable,
        vdev_id: VdevId,
        forced: bool,
        reason: CsaReason,
    ) -> Option<Self> {
        let switching = *table.get(vdev_id)?;
        let vacated: FreqMhz = switching.freq;

        let mut slots: Vec<usize> = table
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.vdev_id == vdev_id
                    || (forced
                        && reason.moves_colocated_saps()
                        && e.mode == ConnectionMode::Sap
                        && e.freq == vacated)
            })
            .map(|(i, _)| i)
            .collect();
        slots.sort_unstable();

        let mut evicted = Vec::with_capacity(slots.len());
        // Highest slot first so the remaining indices stay valid.
        for &slot in slots.iter().rev() {
            if let Some(entry) = table.take_at(slot) {
                evicted.push((slot, entry));
            }
        }
        evicted.reverse();

        Some(Self { table, evicted })
    }

    /// Table without the evicted entries.
    pub fn table(&self) -> &ConnectionTable {
        self.table
    }

    /// Vdevs currently evicted.
    pub fn evicted_vdevs(&self) -> Vec<VdevId> {
        self.evicted.iter().map(|(_, e)| e.vdev_id).collect()
    }
}

impl Drop for CsaEviction<'_> {
    fn drop(&mut self) {
        for (slot, entry) in self.evicted.drain(..) {
            if let Err(e) = self.table.insert_at(slot, entry) {
                error!("[pm] failed to restore vdev {} at slot {}: {}", entry.vdev_id, slot, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelFlags, ChannelWidth};

    fn table() -> ConnectionTable {
        let mut table = ConnectionTable::new(4).unwrap();
        let rows = [
            (0, ConnectionMode::Sap, 5180),
            (1, ConnectionMode::Sta, 5180),
            (2, ConnectionMode::Sap, 5180),
            (3, ConnectionMode::Sap, 2412),
        ];
        for (vdev, mode, freq) in rows {
            table
                .add(ConnectionEntry::new(
                    vdev,
                    mode,
                    0,
                    freq,
                    ChannelWidth::Width20,
                    1,
                    1,
                    ChannelFlags::empty(),
                ))
                .unwrap();
        }
        table
    }

    #[test]
    fn test_missing_vdev_leaves_table() {
        let mut t = table();
        let before = t.clone();
        assert!(CsaEviction::evict(&mut t, 9, true, CsaReason::UnsafeChannel).is_none());
        assert_eq!(t, before);
    }

    #[test]
    fn test_unforced_evicts_only_vdev() {
        let mut t = table();
        let before = t.clone();
        {
            let guard = CsaEviction::evict(&mut t, 1, false, CsaReason::UnsafeChannel).unwrap();
            assert_eq!(guard.evicted_vdevs(), vec![1]);
            assert_eq!(guard.table().count(), 3);
        }
        assert_eq!(t, before);
    }

    #[test]
    fn test_forced_unsafe_evicts_colocated_saps() {
        let mut t = table();
        let before = t.clone();
        {
            let guard = CsaEviction::evict(&mut t, 0, true, CsaReason::UnsafeChannel).unwrap();
            assert_eq!(guard.evicted_vdevs(), vec![0, 2]);
            let remaining: Vec<VdevId> = guard.table().entries().iter().map(|e| e.vdev_id).collect();
            assert_eq!(remaining, vec![1, 3]);
        }
        assert_eq!(t, before);
    }

    #[test]
    fn test_forced_radar_keeps_colocated_saps() {
        let mut t = table();
        let guard = CsaEviction::evict(&mut t, 0, true, CsaReason::Radar).unwrap();
        assert_eq!(guard.evicted_vdevs(), vec![0]);
    }

    #[test]
    fn test_restore_on_panic() {
        let mut t = table();
        let before = t.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = CsaEviction::evict(&mut t, 2, true, CsaReason::Dcs).unwrap();
            panic!("admission check blew up");
        }));
        assert!(result.is_err());
        assert_eq!(t, before);
    }
}
