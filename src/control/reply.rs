// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! `R`-prefixed command replies: `R<hexSeq>|<code>[|<message>]`.

/// A decoded command reply, correlated to an outstanding command by
/// `sequence` (see [`crate::session`]).
#[derive(Clone, Debug)]
pub struct ReplyRecord {
    /// The line as received, without its terminator.
    pub raw: String,
    /// The hex sequence number this reply correlates to.
    pub sequence: u32,
    /// The reply code. Zero conventionally means success; non-zero
    /// codes are mapped to `SessionError::CommandRejected` by the
    /// session.
    pub code: u32,
    /// An optional human-readable message, present on most non-zero
    /// codes.
    pub message: Option<String>,
}

/// Parses a code token as hex if it is `0x`-prefixed or at least 8
/// characters long (the radio omits the `0x` prefix on its widest
/// error codes), otherwise as decimal.
fn parse_code(token: &str) -> Option<u32> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok();
    }
    if token.len() >= 8 {
        return u32::from_str_radix(token, 16).ok();
    }
    token.parse().ok()
}

/// Parses the body of an `R` line (everything after the `|`) into a
/// [`ReplyRecord`], or `None` if the code token does not parse as
/// either hex or decimal. A garbled code must not be allowed to default
/// to zero — that would be indistinguishable from a genuine success
/// reply once [`crate::session::Session`] checks `code == 0` — so the
/// caller in [`crate::control::parse_line`] surfaces this as
/// [`crate::control::ControlLine::Unknown`] instead. `raw` is the full
/// original line; `sequence` is the already-parsed hex header. Callers
/// only reach here once both a sequence and a body were present.
pub(crate) fn parse_reply(raw: &str, sequence: u32, body: &str) -> Option<ReplyRecord> {
    let mut parts = body.splitn(2, '|');
    let code_token = parts.next().unwrap_or("").trim();
    let message = parts.next().map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
    let code = match parse_code(code_token) {
        Some(code) => code,
        None => {
            log::debug!("control: unparseable reply code {code_token:?}");
            return None;
        }
    };
    Some(ReplyRecord { raw: raw.to_string(), sequence, code, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_code_no_message() {
        let r = parse_reply("R5|00000000", 5, "00000000").unwrap();
        assert_eq!(r.sequence, 5);
        assert_eq!(r.code, 0);
        assert_eq!(r.message, None);
    }

    #[test]
    fn hex_code_with_message() {
        let r = parse_reply("R6|50000015|Not Found", 6, "50000015|Not Found").unwrap();
        assert_eq!(r.code, 0x50000015);
        assert_eq!(r.message.as_deref(), Some("Not Found"));
    }

    #[test]
    fn zero_x_prefixed_code() {
        let r = parse_reply("R1|0x2A", 1, "0x2A").unwrap();
        assert_eq!(r.code, 0x2A);
    }

    #[test]
    fn unparseable_code_yields_none() {
        assert!(parse_reply("R1|not-a-code", 1, "not-a-code").is_none());
    }
}
