// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Q20 fixed-point frequency representation used throughout the wire
protocol: panadapter/waterfall bin edges, slice tuning, and anywhere
else the radio expresses a frequency as a signed 64-bit integer scaled
by 2^20.
*/

use fixed::types::extra::U20;
use fixed::FixedI64;
use std::fmt;

/// A frequency stored internally as a signed Q20 fixed-point value
/// (`raw = hz * 2^20`), matching the wire representation used by
/// panadapter/waterfall bin edges and by slice tuning attributes.
///
/// # Example
/// ```
/// use flexradio::freq::Frequency;
/// let f = Frequency::from_hz(15_000_000);
/// assert_eq!(f.hz(), 15_000_000);
/// assert_eq!(f.mhz(), 15.0);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frequency(FixedI64<U20>);

impl Frequency {
    /// Builds a frequency from a whole number of Hz.
    ///
    /// For `|hz| < 2^43` this round-trips exactly through [`Frequency::hz`];
    /// the constructor silently truncates anything larger, matching the
    /// upstream dialect's fixed-width wire format.
    pub fn from_hz(hz: i64) -> Frequency {
        Frequency(FixedI64::<U20>::from_num(hz))
    }

    /// Builds a frequency from a fractional number of MHz. The conversion
    /// truncates toward zero at the Q20 boundary, matching the radio's own
    /// MHz-to-raw conversion.
    pub fn from_mhz(mhz: f64) -> Frequency {
        Frequency(FixedI64::<U20>::from_num(mhz * 1_000_000.0))
    }

    /// Builds a frequency from the raw Q20 wire value (`hz * 2^20`).
    pub fn from_raw(raw: i64) -> Frequency {
        Frequency(FixedI64::<U20>::from_bits(raw))
    }

    /// The raw Q20 wire value (`hz * 2^20`).
    pub fn raw(&self) -> i64 {
        self.0.to_bits()
    }

    /// The frequency in whole Hz (truncated).
    pub fn hz(&self) -> i64 {
        self.0.to_num::<i64>()
    }

    /// The frequency in MHz.
    pub fn mhz(&self) -> f64 {
        self.0.to_num::<f64>() / 1_000_000.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:.6}", self.mhz())
    }
}

impl From<i64> for Frequency {
    fn from(hz: i64) -> Frequency {
        Frequency::from_hz(hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_hz() {
        for hz in [0_i64, 1, -1, 15_000_000, -15_000_000, 7_000_000_000] {
            assert_eq!(Frequency::from_hz(hz).hz(), hz);
        }
    }

    #[test]
    fn round_trip_mhz() {
        let f = Frequency::from_mhz(14.250_000);
        assert_eq!(f.hz(), 14_250_000);
        assert!((f.mhz() - 14.25).abs() < 1e-9);
    }

    #[test]
    fn display_formats_six_decimals() {
        let f = Frequency::from_hz(15_000_000);
        assert_eq!(f.to_string(), "15.000000");
    }

    #[test]
    fn raw_round_trips() {
        let f = Frequency::from_hz(1_000_000);
        assert_eq!(Frequency::from_raw(f.raw()).hz(), 1_000_000);
    }
}
