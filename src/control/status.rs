// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! `S`-prefixed status lines: the bulk of control-channel traffic, and
//! the only record kind the store ([`crate::store`]) reduces.

use crate::control::split_positional_and_attributes;
use std::collections::HashMap;

/// One decoded status line. `source` is always present and lowercased;
/// everything else is best-effort, since the grammar varies by source
/// (meter and gps sources use `#`-joined chunks rather than
/// space-separated `key=value` pairs).
#[derive(Clone, Debug)]
pub struct StatusRecord {
    /// The line as received, without its terminator.
    pub raw: String,
    /// The hex sequence number, if the header parsed.
    pub sequence: Option<u32>,
    /// First whitespace-delimited token, lowercased.
    pub source: String,
    /// The entity identifier this status concerns, if one could be
    /// determined (the first positional token after `source`, or the
    /// numeric prefix of a `meter`/`gps` chunk).
    pub identifier: Option<String>,
    /// Positional tokens between `source` and the first `key=value`.
    pub positional: Vec<String>,
    /// All `key=value` pairs observed, values always strings; typed
    /// conversion happens in [`crate::store`].
    pub attributes: HashMap<String, String>,
}

/// Parses the body of an `S` line (everything after the `|`) into a
/// [`StatusRecord`]. `raw` is the full original line, kept for
/// diagnostics; `sequence` is the already-parsed hex header.
pub(crate) fn parse_status(raw: &str, sequence: Option<u32>, body: &str) -> StatusRecord {
    let mut tokens = body.splitn(2, char::is_whitespace);
    let source = tokens.next().unwrap_or("").to_ascii_lowercase();
    let remainder = tokens.next().unwrap_or("").trim();

    if source == "meter" && remainder.contains('#') {
        let (identifier, attributes) = parse_hash_chunks(remainder, true);
        return StatusRecord {
            raw: raw.to_string(),
            sequence,
            source,
            identifier,
            positional: Vec::new(),
            attributes,
        };
    }

    if source == "gps" {
        let (identifier, attributes) = parse_hash_chunks(remainder, false);
        return StatusRecord {
            raw: raw.to_string(),
            sequence,
            source,
            identifier,
            positional: Vec::new(),
            attributes,
        };
    }

    let (positional, attributes) = split_positional_and_attributes(remainder);
    let identifier = positional.first().cloned();
    StatusRecord {
        raw: raw.to_string(),
        sequence,
        source,
        identifier,
        positional,
        attributes,
    }
}

/// Tokenizes a `#`-joined segment into `key=value` attributes. When
/// `id_prefixed` is set, each chunk is `<id>.<key>=<value>` and the id
/// (taken from the first chunk) becomes the record's identifier;
/// otherwise each chunk is a bare `<key>=<value>`.
fn parse_hash_chunks(segment: &str, id_prefixed: bool) -> (Option<String>, HashMap<String, String>) {
    let mut attributes = HashMap::new();
    let mut identifier = None;

    for chunk in segment.split('#').map(str::trim).filter(|c| !c.is_empty()) {
        if id_prefixed {
            let Some((id, kv)) = chunk.split_once('.') else {
                log::debug!("control: meter chunk missing id prefix: {chunk:?}");
                continue;
            };
            identifier.get_or_insert_with(|| id.to_string());
            if let Some((k, v)) = kv.split_once('=') {
                attributes.insert(k.to_string(), v.to_string());
            } else {
                attributes.insert(kv.to_string(), String::new());
            }
        } else if let Some((k, v)) = chunk.split_once('=') {
            attributes.insert(k.to_string(), v.to_string());
        } else {
            attributes.insert(chunk.to_string(), String::new());
        }
    }
    (identifier, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slice_status() {
        let s = parse_status(
            "S3A5E996B|slice 0 in_use=1 sample_rate=24000 RF_frequency=15.000000 mode=USB pan=0x40000000",
            Some(0x3A5E996B),
            "slice 0 in_use=1 sample_rate=24000 RF_frequency=15.000000 mode=USB pan=0x40000000",
        );
        assert_eq!(s.source, "slice");
        assert_eq!(s.identifier.as_deref(), Some("0"));
        assert_eq!(s.attributes.get("mode").map(String::as_str), Some("USB"));
        assert_eq!(s.attributes.get("pan").map(String::as_str), Some("0x40000000"));
    }

    #[test]
    fn parses_meter_chunks() {
        let body = "meter 1.src=TX-#1.num=5#1.nam=HWALC#1.low=-150.0#1.hi=20.0#1.unit=dBFS#1.fps=20#";
        let s = parse_status(&format!("S1|{body}"), Some(1), body);
        assert_eq!(s.source, "meter");
        assert_eq!(s.identifier.as_deref(), Some("1"));
        assert_eq!(s.attributes.get("src").map(String::as_str), Some("TX-"));
        assert_eq!(s.attributes.get("unit").map(String::as_str), Some("dBFS"));
        assert_eq!(s.attributes.get("fps").map(String::as_str), Some("20"));
    }

    #[test]
    fn meter_removed_uses_space_grammar() {
        // a bare "meter 1 removed" has no '#', so it falls through to
        // the default space-separated grammar rather than hash-chunks.
        let s = parse_status("S1|meter 1 removed", Some(1), "meter 1 removed");
        assert_eq!(s.identifier.as_deref(), Some("1"));
        assert_eq!(s.attributes.get("removed").map(String::as_str), Some("1"));
    }

    #[test]
    fn meter_src_trailing_dash_preserved() {
        let body = "meter 1.src=TX-#";
        let s = parse_status(&format!("S1|{body}"), Some(1), body);
        assert_eq!(s.attributes.get("src").map(String::as_str), Some("TX-"));
    }

    #[test]
    fn parses_gps_chunks() {
        let body = "gps lat=12.34#lon=-56.78#";
        let s = parse_status(&format!("S1|{body}"), Some(1), body);
        assert_eq!(s.attributes.get("lat").map(String::as_str), Some("12.34"));
        assert_eq!(s.attributes.get("lon").map(String::as_str), Some("-56.78"));
    }
}
