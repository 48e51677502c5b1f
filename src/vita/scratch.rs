// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reusable scratch buffers for the VITA-49 parser. A session owns one
//! [`ScratchBuffers`] and passes it to every [`crate::vita::parse`] call
//! so that decoding a burst of wide panadapter frames does not allocate
//! on every packet.

use crate::vita::VitaParseError;

/// Default ceiling on scratch-buffer element count. A single panadapter
/// or waterfall frame carrying more bins than this is rejected rather
/// than growing the buffer without bound.
pub const DEFAULT_GROWTH_CEILING: usize = 65_536;

/// Scratch storage reused across [`crate::vita::parse`] calls for the
/// per-class array payloads (meter samples, panadapter bins, waterfall
/// bins). Buffers grow by doubling to the next power of two, capped at
/// `growth_ceiling`; a request beyond the ceiling fails with
/// [`VitaParseError::ScratchCeilingExceeded`] instead of growing
/// unbounded.
///
/// Views returned from a parse call borrow from these buffers and must
/// not be retained across the next call.
pub struct ScratchBuffers {
    pub(crate) meter_ids: Vec<u16>,
    pub(crate) meter_values: Vec<i16>,
    pub(crate) panadapter_bins: Vec<u16>,
    pub(crate) waterfall_bins: Vec<u16>,
    growth_ceiling: usize,
}

impl Default for ScratchBuffers {
    fn default() -> ScratchBuffers {
        ScratchBuffers::with_growth_ceiling(DEFAULT_GROWTH_CEILING)
    }
}

impl ScratchBuffers {
    /// Creates scratch buffers with a custom growth ceiling.
    pub fn with_growth_ceiling(growth_ceiling: usize) -> ScratchBuffers {
        ScratchBuffers {
            meter_ids: Vec::new(),
            meter_values: Vec::new(),
            panadapter_bins: Vec::new(),
            waterfall_bins: Vec::new(),
            growth_ceiling,
        }
    }

    pub(crate) fn ensure_meter(&mut self, needed: usize) -> Result<(), VitaParseError> {
        Self::ensure(&mut self.meter_ids, needed, self.growth_ceiling)?;
        Self::ensure(&mut self.meter_values, needed, self.growth_ceiling)
    }

    pub(crate) fn ensure_panadapter(&mut self, needed: usize) -> Result<(), VitaParseError> {
        Self::ensure(&mut self.panadapter_bins, needed, self.growth_ceiling)
    }

    pub(crate) fn ensure_waterfall(&mut self, needed: usize) -> Result<(), VitaParseError> {
        Self::ensure(&mut self.waterfall_bins, needed, self.growth_ceiling)
    }

    fn ensure<T: Default + Copy>(
        buf: &mut Vec<T>,
        needed: usize,
        ceiling: usize,
    ) -> Result<(), VitaParseError> {
        if needed > ceiling {
            return Err(VitaParseError::ScratchCeilingExceeded {
                needed,
                ceiling,
            });
        }
        if buf.len() < needed {
            let grown = needed.next_power_of_two().min(ceiling).max(needed);
            buf.resize(grown, T::default());
        }
        Ok(())
    }
}
