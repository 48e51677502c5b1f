// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
The control-channel line protocol: a line-oriented ASCII grammar
distinguishing status, reply, and notice records. See [`parse_line`]
for the entrypoint; the store ([`crate::store`]) is the only consumer
that interprets `StatusRecord` attributes further.
*/

mod notice;
mod reply;
mod status;

pub use notice::NoticeRecord;
pub use reply::ReplyRecord;
pub use status::StatusRecord;

use std::collections::HashMap;

/// Severity of a [`NoticeRecord`], normalized from the wire token.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Informational; no action implied.
    Info,
    /// A recoverable condition worth surfacing.
    Warning,
    /// An operation failed.
    Error,
    /// The radio link cannot continue.
    Fatal,
}

impl Severity {
    fn from_token(token: &str) -> Severity {
        match token.to_ascii_lowercase().as_str() {
            "warn" | "warning" => Severity::Warning,
            "err" | "error" => Severity::Error,
            "fatal" => Severity::Fatal,
            _ => Severity::Info,
        }
    }
}

/// A control line that did not begin with `S`/`R`/`M`, or was malformed
/// past the point this parser can recover from. Carried verbatim so
/// callers can route it to a raw-line sink (see [`crate::session`]).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct UnknownRecord {
    /// The exact line as received, without its line terminator.
    pub raw: String,
}

/// The result of classifying one control line.
#[derive(Clone, Debug)]
pub enum ControlLine {
    /// An `S`-prefixed status line.
    Status(StatusRecord),
    /// An `R`-prefixed command reply.
    Reply(ReplyRecord),
    /// An `M`-prefixed notice.
    Notice(NoticeRecord),
    /// Anything else, including malformed `S`/`R`/`M` lines.
    Unknown(UnknownRecord),
}

/// Splits a hex sequence-number prefix and a `|`-delimited body from a
/// raw line, e.g. `S3A5E|slice 0 ...` -> `(0x3A5E, "slice 0 ...")`. Both
/// halves are parsed leniently; a missing sequence or missing `|`
/// yields `None` in the relevant slot.
fn split_header(rest: &str) -> (Option<u32>, Option<&str>) {
    match rest.split_once('|') {
        Some((hex, body)) => (u32::from_str_radix(hex.trim(), 16).ok(), Some(body)),
        None => (u32::from_str_radix(rest.trim(), 16).ok(), None),
    }
}

/// Parses one control line into a [`ControlLine`]. Never panics: a line
/// that cannot be classified as status/reply/notice becomes
/// [`ControlLine::Unknown`] and is logged at `debug` (unknown lines are
/// an expected occurrence — they are routed to the raw-line sink by
/// design, not a protocol fault).
pub fn parse_line(line: &str) -> ControlLine {
    let raw = line.trim_end_matches(['\r', '\n']);
    let Some(first) = raw.chars().next() else {
        log::debug!("control: empty line");
        return ControlLine::Unknown(UnknownRecord { raw: raw.to_string() });
    };
    let rest = &raw[first.len_utf8()..];

    match first {
        'S' => {
            let (sequence, body) = split_header(rest);
            match body {
                Some(body) => ControlLine::Status(status::parse_status(raw, sequence, body)),
                None => {
                    log::debug!("control: status line missing body: {raw:?}");
                    ControlLine::Unknown(UnknownRecord { raw: raw.to_string() })
                }
            }
        }
        'R' => {
            let (sequence, body) = split_header(rest);
            match (sequence, body) {
                (Some(sequence), Some(body)) => match reply::parse_reply(raw, sequence, body) {
                    Some(reply) => ControlLine::Reply(reply),
                    None => ControlLine::Unknown(UnknownRecord { raw: raw.to_string() }),
                },
                _ => {
                    log::debug!("control: reply line missing sequence or body: {raw:?}");
                    ControlLine::Unknown(UnknownRecord { raw: raw.to_string() })
                }
            }
        }
        'M' => {
            let (sequence, body) = split_header(rest);
            match body {
                Some(body) => ControlLine::Notice(notice::parse_notice(raw, sequence, body)),
                None => {
                    log::debug!("control: notice line missing body: {raw:?}");
                    ControlLine::Unknown(UnknownRecord { raw: raw.to_string() })
                }
            }
        }
        _ => {
            log::debug!("control: unrecognized line prefix {first:?}");
            ControlLine::Unknown(UnknownRecord { raw: raw.to_string() })
        }
    }
}

/// Scans `segment` for space-separated tokens, splitting them into a
/// positional prefix and a trailing run of `key=value`/bare-key
/// attributes. The first token containing `=` ends the positional run;
/// everything after that point is treated as an attribute even if it
/// lacks `=` (stored with an empty value), matching the wire grammar's
/// tolerance for bare flag tokens. A positional token literally equal
/// to `removed` becomes the synthetic attribute `removed=1`.
pub(crate) fn split_positional_and_attributes(segment: &str) -> (Vec<String>, HashMap<String, String>) {
    let mut positional = Vec::new();
    let mut attributes = HashMap::new();
    let mut in_attributes = false;

    for token in segment.split_whitespace() {
        if !in_attributes && !token.contains('=') {
            if token == "removed" {
                attributes.insert("removed".to_string(), "1".to_string());
            } else {
                positional.push(token.to_string());
            }
            continue;
        }
        in_attributes = true;
        match token.split_once('=') {
            Some((k, v)) => {
                attributes.insert(k.to_string(), v.to_string());
            }
            None => {
                attributes.insert(token.to_string(), String::new());
            }
        }
    }
    (positional, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_by_prefix() {
        assert!(matches!(parse_line("S1|slice 0 mode=USB"), ControlLine::Status(_)));
        assert!(matches!(parse_line("R1|00000000"), ControlLine::Reply(_)));
        assert!(matches!(parse_line("M1|warning|low voltage"), ControlLine::Notice(_)));
        assert!(matches!(parse_line("X garbage"), ControlLine::Unknown(_)));
    }

    #[test]
    fn missing_body_is_unknown() {
        assert!(matches!(parse_line("S1"), ControlLine::Unknown(_)));
    }

    #[test]
    fn garbled_reply_code_is_unknown_not_success() {
        assert!(matches!(parse_line("R1|not-a-code"), ControlLine::Unknown(_)));
    }

    #[test]
    fn positional_run_ends_at_first_assignment() {
        let (positional, attrs) = split_positional_and_attributes("0 in_use=1 mode=USB");
        assert_eq!(positional, vec!["0"]);
        assert_eq!(attrs.get("in_use").map(String::as_str), Some("1"));
        assert_eq!(attrs.get("mode").map(String::as_str), Some("USB"));
    }

    #[test]
    fn bare_flag_token_gets_empty_value() {
        let (_, attrs) = split_positional_and_attributes("0 in_use=1 muted");
        assert_eq!(attrs.get("muted").map(String::as_str), Some(""));
    }

    #[test]
    fn removed_positional_becomes_attribute() {
        let (positional, attrs) = split_positional_and_attributes("0 removed");
        assert!(positional.is_empty());
        assert_eq!(attrs.get("removed").map(String::as_str), Some("1"));
    }
}
