//! Band classification of channel center frequencies.

use super::errors::FreqMhz;
use super::value_objects::Band;

/// Lowest 2.4 GHz center frequency considered.
pub const BAND_24GHZ_START_MHZ: FreqMhz = 2400;
/// 2.4 GHz band ceiling.
pub const BAND_24GHZ_CEILING_MHZ: FreqMhz = 2495;
/// Lowest 5 GHz center frequency considered.
pub const BAND_5GHZ_START_MHZ: FreqMhz = 4900;
/// Highest 5 GHz center frequency considered.
pub const BAND_5GHZ_END_MHZ: FreqMhz = 5925;
/// Lowest 6 GHz center frequency considered.
pub const BAND_6GHZ_START_MHZ: FreqMhz = 5935;
/// Highest 6 GHz center frequency considered.
pub const BAND_6GHZ_END_MHZ: FreqMhz = 7125;
/// SBS split: 5 GHz channels below this run on one MAC, the rest on the other.
pub const SBS_5GHZ_SPLIT_MHZ: FreqMhz = 5500;

/// 2.4 GHz channel?
pub fn is_24ghz(freq: FreqMhz) -> bool {
    (BAND_24GHZ_START_MHZ..=BAND_24GHZ_CEILING_MHZ).contains(&freq)
}

/// 5 GHz channel?
pub fn is_5ghz(freq: FreqMhz) -> bool {
    (BAND_5GHZ_START_MHZ..=BAND_5GHZ_END_MHZ).contains(&freq)
}

/// 6 GHz channel?
pub fn is_6ghz(freq: FreqMhz) -> bool {
    (BAND_6GHZ_START_MHZ..=BAND_6GHZ_END_MHZ).contains(&freq)
}

/// Band of a frequency, `None` outside the known bands (including 0).
pub fn band_of(freq: FreqMhz) -> Option<Band> {
    if is_24ghz(freq) {
        Some(Band::Band2G)
    } else if is_5ghz(freq) {
        Some(Band::Band5G)
    } else if is_6ghz(freq) {
        Some(Band::Band6G)
    } else {
        None
    }
}

/// Both frequencies belong to the same known band.
pub fn same_band(a: FreqMhz, b: FreqMhz) -> bool {
    match (band_of(a), band_of(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// 5 GHz channel in the lower SBS half.
pub fn is_5ghz_low(freq: FreqMhz) -> bool {
    is_5ghz(freq) && freq < SBS_5GHZ_SPLIT_MHZ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert!(is_24ghz(2412));
        assert!(is_24ghz(2484));
        assert!(!is_24ghz(2496));
        assert!(is_5ghz(5180));
        assert!(is_5ghz(5825));
        assert!(is_6ghz(5955));
        assert!(is_6ghz(7115));
        assert!(!is_5ghz(5955));
    }

    #[test]
    fn test_band_of_zero_is_none() {
        assert_eq!(band_of(0), None);
        assert!(!same_band(0, 0));
    }

    #[test]
    fn test_same_band() {
        assert!(same_band(2412, 2462));
        assert!(same_band(5180, 5745));
        assert!(!same_band(2412, 5180));
        assert!(!same_band(5745, 5955));
    }

    #[test]
    fn test_sbs_halves() {
        assert!(is_5ghz_low(5180));
        assert!(!is_5ghz_low(5745));
        assert!(!is_5ghz_low(2412));
    }
}
