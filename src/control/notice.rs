// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! `M`-prefixed notices: `M<hexSeq>|<severity>|<text>[|<k=v,k=v>]`.

use crate::control::Severity;
use std::collections::HashMap;

/// A decoded notice line, e.g. a PTT interlock warning or a fatal
/// hardware fault.
#[derive(Clone, Debug)]
pub struct NoticeRecord {
    /// The line as received, without its terminator.
    pub raw: String,
    /// The hex sequence number, if the header parsed.
    pub sequence: Option<u32>,
    /// Normalized severity (see [`Severity::from_token`]).
    pub severity: Severity,
    /// The human-readable notice text.
    pub text: String,
    /// Optional trailing `k=v,k=v` metadata segment.
    pub metadata: Option<HashMap<String, String>>,
}

fn parse_metadata(segment: &str) -> HashMap<String, String> {
    segment
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Parses the body of an `M` line (everything after the `|`) into a
/// [`NoticeRecord`]. `raw` is the full original line; `sequence` is the
/// already-parsed hex header.
pub(crate) fn parse_notice(raw: &str, sequence: Option<u32>, body: &str) -> NoticeRecord {
    let mut parts = body.splitn(3, '|');
    let severity = Severity::from_token(parts.next().unwrap_or("").trim());
    let text = parts.next().unwrap_or("").trim().to_string();
    let metadata = parts.next().map(str::trim).filter(|m| !m.is_empty()).map(parse_metadata);

    NoticeRecord { raw: raw.to_string(), sequence, severity, text, metadata }
}
