// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Primary module for decoding the Flex dialect of VITA-49 data-channel
packets: meters, panadapter spectra, waterfall rasters, audio, and
discovery beacons delivered over the datagram transport. This should
be the main entrypoint for any caller decoding bytes off the data
channel; see [`parse`].
*/

mod class_id;
mod header;
mod payload;
mod reader;
mod scratch;
mod trailer;

pub use class_id::ClassIdentifier;
pub use header::{Header, Tsf, Tsi};
pub use payload::{DaxAudioSample, MeterSample, PanadapterFrame, TaggedPayload, WaterfallFrame};
pub use scratch::{ScratchBuffers, DEFAULT_GROWTH_CEILING};
pub use trailer::Trailer;

use reader::ByteReader;
use thiserror::Error;

/// Failures that can occur while decoding a VITA-49 packet. The parser
/// is a pure function: it never logs and never panics, it only ever
/// returns one of these. Callers that have stream context (the demux,
/// the session) are the ones that decide how loudly to log a drop —
/// see §4.1 and §7 of the design spec.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum VitaParseError {
    /// The buffer is shorter than the minimum 28-byte header.
    #[error("packet is {len} bytes, shorter than the 28-byte minimum header")]
    TooShort {
        /// The length actually observed.
        len: usize,
    },
    /// A declared field ran past the end of the buffer.
    #[error("packet truncated while decoding")]
    Truncated,
    /// The wire-declared packet size is out of range for the buffer
    /// actually supplied, or the header/payload/trailer split produced
    /// a negative payload length.
    #[error("packet size mismatch: declared {declared} bytes, buffer has {available} bytes")]
    SizeMismatch {
        /// The size in bytes declared by the header.
        declared: usize,
        /// The size in bytes of the buffer actually supplied.
        available: usize,
    },
    /// A payload array (meter samples, bins) would require a scratch
    /// buffer larger than the configured growth ceiling.
    #[error("payload needs {needed} scratch elements, ceiling is {ceiling}")]
    ScratchCeilingExceeded {
        /// Elements needed to decode this packet.
        needed: usize,
        /// The configured ceiling.
        ceiling: usize,
    },
}

/// A fully decoded VITA-49 data-channel packet.
#[derive(Clone, Debug)]
pub struct VitaPacket {
    header: Header,
    class_id: Option<ClassIdentifier>,
    stream_id: u32,
    integer_timestamp: Option<u32>,
    fractional_timestamp: Option<u32>,
    payload: TaggedPayload,
    trailer: Option<Trailer>,
}

impl VitaPacket {
    /// The fixed header (descriptors and declared packet size).
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The class identifier, if `classIdPresent` was set.
    pub fn class_id(&self) -> Option<&ClassIdentifier> {
        self.class_id.as_ref()
    }

    /// The stream id. This dialect always assumes a stream id is
    /// present (see the open question in `DESIGN.md`), so this is not
    /// optional.
    pub fn stream_id(&self) -> u32 {
        self.stream_id
    }

    /// The stream id formatted the way the control channel renders it
    /// (`0x…`), for cross-referencing against store keys.
    pub fn stream_id_hex(&self) -> String {
        format!("0x{:08X}", self.stream_id)
    }

    /// The integer timestamp word, if `tsi != Null`.
    pub fn integer_timestamp(&self) -> Option<u32> {
        self.integer_timestamp
    }

    /// The fractional timestamp word, if `tsf != Null`. Per this
    /// dialect, only the low word of the two-word fractional timestamp
    /// is kept; the high word is discarded.
    pub fn fractional_timestamp(&self) -> Option<u32> {
        self.fractional_timestamp
    }

    /// The decoded, class-code-dispatched payload.
    pub fn payload(&self) -> &TaggedPayload {
        &self.payload
    }

    /// The trailer, if `trailerPresent` was set.
    pub fn trailer(&self) -> Option<&Trailer> {
        self.trailer.as_ref()
    }
}

/// Decodes one VITA-49 packet from `buf`, using `scratch` for the
/// per-class array payloads (meter samples, panadapter/waterfall
/// bins). See §4.1 of the design spec for the full algorithm;
/// `scratch` should be owned by the session and reused across calls.
pub fn parse(buf: &[u8], scratch: &mut ScratchBuffers) -> Result<VitaPacket, VitaParseError> {
    const MIN_HEADER_BYTES: usize = 28;
    if buf.len() < MIN_HEADER_BYTES {
        return Err(VitaParseError::TooShort { len: buf.len() });
    }

    let mut reader = ByteReader::new(buf);
    let packet_descriptor = reader.read_u8()?;
    let timestamp_descriptor = reader.read_u8()?;
    let packet_size_words = reader.read_u16()?;
    let header = Header::new(packet_descriptor, timestamp_descriptor, packet_size_words);

    let size_bytes = header.size_bytes();
    if size_bytes < MIN_HEADER_BYTES || size_bytes > buf.len() {
        return Err(VitaParseError::SizeMismatch {
            declared: size_bytes,
            available: buf.len(),
        });
    }

    // Stream id is always assumed present in this dialect, regardless
    // of what the packet type nibble claims.
    if !header.stream_id_indicated() {
        log::warn!(
            "vita: packet descriptor {:#04x} does not indicate a stream id, \
             but this dialect always consumes one",
            packet_descriptor
        );
    }
    let stream_id = reader.read_u32()?;
    let mut words_consumed = 1usize;

    let class_id = if header.class_id_included() {
        let word1 = reader.read_u32()?;
        let word2 = reader.read_u32()?;
        words_consumed += 2;
        Some(ClassIdentifier::new(
            word1,
            (word2 >> 16) as u16,
            word2 as u16,
        ))
    } else {
        None
    };

    let integer_timestamp = if header.integer_timestamp_included() {
        words_consumed += 1;
        Some(reader.read_u32()?)
    } else {
        None
    };

    let fractional_timestamp = if header.fractional_timestamp_included() {
        let high = reader.read_u32()?;
        let low = reader.read_u32()?;
        let _ = high; // high word discarded in this dialect, per §4.1 step 4.
        words_consumed += 2;
        Some(low)
    } else {
        None
    };

    let header_bytes = 4 * (1 + words_consumed);
    let trailer_bytes = if header.trailer_included() { 4 } else { 0 };
    if size_bytes < header_bytes + trailer_bytes {
        return Err(VitaParseError::SizeMismatch {
            declared: size_bytes,
            available: buf.len(),
        });
    }
    let payload_bytes = size_bytes - header_bytes - trailer_bytes;

    if reader.remaining() < payload_bytes + trailer_bytes {
        return Err(VitaParseError::Truncated);
    }
    let payload_start = reader.position();
    let payload_slice = &buf[payload_start..payload_start + payload_bytes];
    let class_code = class_id.as_ref().map(|c| c.packet_class_code()).unwrap_or(0);
    let payload = payload::decode(class_code, payload_slice, scratch)?;
    log::trace!("vita: decoded class {class_code:#06x} on stream {stream_id:#010x}");

    let mut reader = ByteReader::new(&buf[payload_start + payload_bytes..]);
    let trailer = if header.trailer_included() {
        Some(Trailer::from_bits(reader.read_u32()?))
    } else {
        None
    };

    Ok(VitaPacket {
        header,
        class_id,
        stream_id,
        integer_timestamp,
        fractional_timestamp,
        payload,
        trailer,
    })
}
