// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-class payload decoders, dispatched by packet class code (see
//! [`crate::vita::parse`]).

use crate::discovery::{parse_beacon, DiscoveryDescriptor};
use crate::freq::Frequency;
use crate::vita::reader::ByteReader;
use crate::vita::scratch::ScratchBuffers;
use crate::vita::VitaParseError;

/// One meter sample within a [`TaggedPayload::MeterSamples`] packet.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MeterSample {
    /// The meter id this sample belongs to (matches [`crate::store`]'s
    /// `Meter` key once converted to a string).
    pub id: u16,
    /// The raw sample value; scaling into engineering units is
    /// entity-specific and happens in the store (see §4.3 of the
    /// design spec).
    pub value: i16,
}

/// A decoded panadapter (FFT bin) frame.
#[derive(Clone, Debug)]
pub struct PanadapterFrame {
    /// Index of the first bin carried in this packet.
    pub starting_bin: u16,
    /// Number of bins carried in this packet.
    pub bins_in_frame: u16,
    /// Size, in bytes, of each bin sample (always 2 in this dialect).
    pub bin_size: u16,
    /// Total number of bins across the full panadapter frame.
    pub total_bins: u16,
    /// Monotonic frame counter.
    pub frame: u32,
    /// The bin magnitudes themselves, big-endian u16 on the wire.
    pub bins: Vec<u16>,
}

/// A decoded waterfall (time-indexed raster) line.
#[derive(Clone, Debug)]
pub struct WaterfallFrame {
    /// Frequency of the first bin in this line.
    pub first_bin_freq: Frequency,
    /// Bandwidth spanned by each bin.
    pub bin_bandwidth: Frequency,
    /// Duration represented by this line, in milliseconds.
    pub line_duration_ms: u32,
    /// Number of bins carried in this packet.
    pub bins_in_frame: u16,
    /// Height, in lines, of the waterfall display this line belongs to.
    pub height: u16,
    /// Monotonic frame counter.
    pub frame: u32,
    /// Radio-computed auto black level.
    pub auto_black_level: u32,
    /// Total number of bins across the full waterfall line.
    pub total_bins: u16,
    /// Index of the first bin carried in this packet.
    pub starting_bin: u16,
    /// The bin magnitudes themselves, big-endian u16 on the wire.
    pub bins: Vec<u16>,
}

/// One stereo float sample pair within a [`TaggedPayload::DaxAudioFrame`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DaxAudioSample {
    /// Left channel sample.
    pub left: f32,
    /// Right channel sample.
    pub right: f32,
}

/// The dispatch result of decoding a VITA-49 payload by packet class
/// code (see the table in §4.1 of the design spec).
#[derive(Clone, Debug)]
pub enum TaggedPayload {
    /// Class `0x8002`: an array of `{id, value}` meter samples.
    MeterSamples(Vec<MeterSample>),
    /// Class `0x8003`: a panadapter (FFT bin) frame.
    PanadapterBins(PanadapterFrame),
    /// Class `0x8004`: a waterfall raster line.
    WaterfallLine(WaterfallFrame),
    /// Class `0x8005`: Opus-compressed audio, carried as opaque bytes.
    CompressedAudio(Vec<u8>),
    /// Class `0x03e3`: uncompressed stereo float DAX audio frames.
    DaxAudioFrame(Vec<DaxAudioSample>),
    /// Classes `0x0123`, `0x02e3..=0x02e6`: DAX IQ / reduced-bandwidth
    /// IQ samples, carried as opaque bytes (the core never interprets
    /// DSP samples).
    DaxIqFrame(Vec<u8>),
    /// Class `0xffff`: a discovery beacon delivered over the data
    /// channel rather than via the UDP multicast listener.
    DiscoveryBeacon(DiscoveryDescriptor),
    /// Reserved for an FFT-frame class code not present in this
    /// dialect snapshot. No class code currently routes here; see
    /// `DESIGN.md` for the open-question resolution. Kept so a future
    /// dialect revision (or a vendor extension) can populate it without
    /// an API break.
    FftFrame(Vec<u8>),
    /// Any class code not in the dispatch table: opaque payload bytes.
    Unknown(Vec<u8>),
}

pub(crate) fn decode(
    class_code: u16,
    payload: &[u8],
    scratch: &mut ScratchBuffers,
) -> Result<TaggedPayload, VitaParseError> {
    match class_code {
        0x8002 => decode_meter(payload, scratch),
        0x8003 => decode_panadapter(payload, scratch),
        0x8004 => decode_waterfall(payload, scratch),
        0x8005 => Ok(TaggedPayload::CompressedAudio(payload.to_vec())),
        0x03e3 => decode_dax_audio(payload),
        0x0123 | 0x02e3..=0x02e6 => Ok(TaggedPayload::DaxIqFrame(payload.to_vec())),
        0xffff => Ok(TaggedPayload::DiscoveryBeacon(parse_beacon(payload))),
        other => {
            log::trace!("vita: unrecognized class code {other:#06x}, treating as opaque");
            Ok(TaggedPayload::Unknown(payload.to_vec()))
        }
    }
}

fn decode_meter(payload: &[u8], scratch: &mut ScratchBuffers) -> Result<TaggedPayload, VitaParseError> {
    let count = payload.len() / 4;
    scratch.ensure_meter(count)?;
    let mut reader = ByteReader::new(payload);
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        let id = reader.read_u16()?;
        let value = reader.read_i16()?;
        samples.push(MeterSample { id, value });
    }
    Ok(TaggedPayload::MeterSamples(samples))
}

fn decode_panadapter(payload: &[u8], scratch: &mut ScratchBuffers) -> Result<TaggedPayload, VitaParseError> {
    let mut reader = ByteReader::new(payload);
    let starting_bin = reader.read_u16()?;
    let bins_in_frame = reader.read_u16()?;
    let bin_size = reader.read_u16()?;
    let total_bins = reader.read_u16()?;
    let frame = reader.read_u32()?;
    scratch.ensure_panadapter(bins_in_frame as usize)?;
    let mut bins = Vec::with_capacity(bins_in_frame as usize);
    for _ in 0..bins_in_frame {
        bins.push(reader.read_u16()?);
    }
    Ok(TaggedPayload::PanadapterBins(PanadapterFrame {
        starting_bin,
        bins_in_frame,
        bin_size,
        total_bins,
        frame,
        bins,
    }))
}

fn decode_waterfall(payload: &[u8], scratch: &mut ScratchBuffers) -> Result<TaggedPayload, VitaParseError> {
    let mut reader = ByteReader::new(payload);
    let first_bin_freq = Frequency::from_raw(reader.read_i64()?);
    let bin_bandwidth = Frequency::from_raw(reader.read_i64()?);
    let line_duration_ms = reader.read_u32()?;
    let bins_in_frame = reader.read_u16()?;
    let height = reader.read_u16()?;
    let frame = reader.read_u32()?;
    let auto_black_level = reader.read_u32()?;
    let total_bins = reader.read_u16()?;
    let starting_bin = reader.read_u16()?;
    scratch.ensure_waterfall(bins_in_frame as usize)?;
    let mut bins = Vec::with_capacity(bins_in_frame as usize);
    for _ in 0..bins_in_frame {
        bins.push(reader.read_u16()?);
    }
    Ok(TaggedPayload::WaterfallLine(WaterfallFrame {
        first_bin_freq,
        bin_bandwidth,
        line_duration_ms,
        bins_in_frame,
        height,
        frame,
        auto_black_level,
        total_bins,
        starting_bin,
        bins,
    }))
}

fn decode_dax_audio(payload: &[u8]) -> Result<TaggedPayload, VitaParseError> {
    let count = payload.len() / 8;
    let mut reader = ByteReader::new(payload);
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        let left = reader.read_f32()?;
        let right = reader.read_f32()?;
        samples.push(DaxAudioSample { left, right });
    }
    Ok(TaggedPayload::DaxAudioFrame(samples))
}
