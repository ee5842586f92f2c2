//! # Concurrency Classifier
//!
//! Pure status functions over a snapshot of the connection table.
//!
//! | Term | Meaning |
//! |------|---------|
//! | SCC  | every connection on one channel |
//! | MCC  | one MAC time-shares several channels |
//! | DBS  | two MACs on different bands |
//! | SBS  | two MACs inside one band (5 GHz halves) |

use crate::domain::frequency::{is_24ghz, is_5ghz, is_5ghz_low, same_band};
use crate::domain::{ConnectionEntry, ConnectionTable, FreqMhz, HwModeCatalog};

/// Whether two channels would be served by the same MAC.
pub fn freqs_on_same_mac(f1: FreqMhz, f2: FreqMhz, dbs: bool, sbs: bool) -> bool {
    if !dbs {
        return true;
    }
    if !same_band(f1, f2) {
        return false;
    }
    if sbs && is_5ghz(f1) && is_5ghz(f2) {
        return is_5ghz_low(f1) == is_5ghz_low(f2);
    }
    true
}

pub(crate) fn all_pairs<'a>(
    entries: &'a [ConnectionEntry],
) -> impl Iterator<Item = (&'a ConnectionEntry, &'a ConnectionEntry)> + 'a {
    entries
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| entries[i + 1..].iter().map(move |b| (a, b)))
}

/// Single channel concurrency.
///
/// Two connections: same channel on the same MAC. Three or more: all on one
/// channel, or, in a DBS hardware mode, at least one pair sharing a channel.
pub fn is_scc(table: &ConnectionTable, current_hw_mode_dbs: bool) -> bool {
    let entries = table.entries();
    match entries.len() {
        0 | 1 => false,
        2 => entries[0].freq == entries[1].freq && entries[0].mac_id == entries[1].mac_id,
        _ => {
            (current_hw_mode_dbs && all_pairs(entries).any(|(a, b)| a.freq == b.freq))
                || entries.iter().all(|e| e.freq == entries[0].freq)
        }
    }
}

/// Multi channel concurrency.
pub fn is_mcc(table: &ConnectionTable) -> bool {
    let entries = table.entries();
    match entries.len() {
        0 | 1 => false,
        2 => entries[0].freq != entries[1].freq && entries[0].mac_id == entries[1].mac_id,
        _ => all_pairs(entries).any(|(a, b)| a.freq != b.freq),
    }
}

/// Two different 2.4 GHz channels in use.
pub fn is_mcc_in_24ghz(table: &ConnectionTable) -> bool {
    let mut first: Option<FreqMhz> = None;
    for freq in table.entries().iter().map(|e| e.freq).filter(|f| is_24ghz(*f)) {
        match first {
            None => first = Some(freq),
            Some(f) if f != freq => return true,
            Some(_) => {}
        }
    }
    false
}

/// A STA or P2P client sits on a DFS channel (or a 5 GHz 160 MHz one).
pub fn is_sta_present_on_dfs_channel(table: &ConnectionTable) -> bool {
    table
        .entries()
        .iter()
        .any(|e| e.mode.is_sta_like() && e.is_on_dfs())
}

/// Frequency of the first SAP/P2P-GO on a DFS channel.
pub fn is_any_dfs_beaconing_session_present(table: &ConnectionTable) -> Option<FreqMhz> {
    table
        .entries()
        .iter()
        .find(|e| e.mode.is_beaconing() && e.is_on_dfs())
        .map(|e| e.freq)
}

/// Active hardware mode is a DBS mode.
pub fn is_current_hwmode_dbs(catalog: &HwModeCatalog) -> bool {
    catalog.current().map(|m| m.dbs_mode).unwrap_or(false)
}
