// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! The two-word class identifier field (ANSI/VITA-49.2-2017 section
//! 5.1.3). The packet class code is the authoritative discriminant for
//! payload dispatch (see [`crate::vita::payload`]); the information
//! class code is preserved but never branched on.

/// Two-word VITA-49 class identifier.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassIdentifier {
    word1: u32,
    information_class_code: u16,
    packet_class_code: u16,
}

impl ClassIdentifier {
    pub(crate) fn new(word1: u32, information_class_code: u16, packet_class_code: u16) -> ClassIdentifier {
        ClassIdentifier {
            word1,
            information_class_code,
            packet_class_code,
        }
    }

    /// The raw first class-id word (pad bit count + 24-bit OUI).
    pub fn word1(&self) -> u32 {
        self.word1
    }

    /// The 24-bit Organizationally Unique Identifier embedded in word 1.
    pub fn oui(&self) -> u32 {
        self.word1 & 0xFF_FFFF
    }

    /// The information class code (preserved, not used for dispatch).
    pub fn information_class_code(&self) -> u16 {
        self.information_class_code
    }

    /// The packet class code — the authoritative payload discriminant.
    pub fn packet_class_code(&self) -> u16 {
        self.packet_class_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_oui_and_codes() {
        let cid = ClassIdentifier::new(0x00_3A2911, 0x0001, 0x8002);
        assert_eq!(cid.oui(), 0x3A2911);
        assert_eq!(cid.information_class_code(), 0x0001);
        assert_eq!(cid.packet_class_code(), 0x8002);
    }
}
