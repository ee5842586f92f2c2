//! # Domain Invariants
//!
//! Rules the connection table must satisfy at every lock release.

use std::collections::HashSet;

use super::entities::ConnectionEntry;
use super::errors::PolicyError;
use super::value_objects::ConnectionMode;

/// Invariant: no two in-use entries share a vdev id.
pub fn invariant_unique_vdevs(slots: &[ConnectionEntry]) -> Result<(), PolicyError> {
    let mut seen = HashSet::new();
    for entry in slots.iter().filter(|e| e.in_use) {
        if !seen.insert(entry.vdev_id) {
            return Err(PolicyError::InvariantViolation(format!(
                "duplicate vdev {} in connection table",
                entry.vdev_id
            )));
        }
    }
    Ok(())
}

/// Invariant: entries are compacted, no free slot precedes a used one.
pub fn invariant_compacted(slots: &[ConnectionEntry]) -> Result<(), PolicyError> {
    if let Some(first_free) = slots.iter().position(|e| !e.in_use) {
        if let Some(offset) = slots[first_free..].iter().position(|e| e.in_use) {
            return Err(PolicyError::InvariantViolation(format!(
                "gap at slot {} before used slot {}",
                first_free,
                first_free + offset
            )));
        }
    }
    Ok(())
}

/// Invariant: per-mode table count equals the active session counter.
pub fn invariant_session_counters(
    slots: &[ConnectionEntry],
    active_sessions: &[u32; ConnectionMode::COUNT],
) -> Result<(), PolicyError> {
    for mode in ConnectionMode::ALL {
        let in_table = slots
            .iter()
            .filter(|e| e.in_use && e.mode == mode)
            .count() as u32;
        let counter = active_sessions[mode.index()];
        if in_table != counter {
            return Err(PolicyError::InvariantViolation(format!(
                "{} entries {} != active sessions {}",
                mode, in_table, counter
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ChannelFlags, ChannelWidth};

    fn entry(vdev_id: u8, mode: ConnectionMode) -> ConnectionEntry {
        ConnectionEntry::new(
            vdev_id,
            mode,
            0,
            2412,
            ChannelWidth::Width20,
            1,
            1,
            ChannelFlags::empty(),
        )
    }

    #[test]
    fn test_unique_vdevs_pass() {
        let slots = [entry(0, ConnectionMode::Sta), entry(1, ConnectionMode::Sap)];
        assert!(invariant_unique_vdevs(&slots).is_ok());
    }

    #[test]
    fn test_unique_vdevs_duplicate() {
        let slots = [entry(3, ConnectionMode::Sta), entry(3, ConnectionMode::Sap)];
        assert!(invariant_unique_vdevs(&slots).is_err());
    }

    #[test]
    fn test_unused_slots_ignored_for_uniqueness() {
        let slots = [ConnectionEntry::default(), ConnectionEntry::default()];
        assert!(invariant_unique_vdevs(&slots).is_ok());
    }

    #[test]
    fn test_compacted_pass() {
        let slots = [
            entry(0, ConnectionMode::Sta),
            ConnectionEntry::default(),
            ConnectionEntry::default(),
        ];
        assert!(invariant_compacted(&slots).is_ok());
    }

    #[test]
    fn test_compacted_gap() {
        let slots = [
            ConnectionEntry::default(),
            entry(0, ConnectionMode::Sta),
        ];
        let err = invariant_compacted(&slots).unwrap_err();
        assert!(err.to_string().contains("slot 0"));
    }

    #[test]
    fn test_session_counters_mismatch() {
        let slots = [entry(0, ConnectionMode::Sta)];
        let mut counters = [0u32; ConnectionMode::COUNT];
        assert!(invariant_session_counters(&slots, &counters).is_err());

        counters[ConnectionMode::Sta.index()] = 1;
        assert!(invariant_session_counters(&slots, &counters).is_ok());
    }
}
