// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
`flexradio` is a client library for FlexRadio software-defined radios.

A FlexRadio device exposes two concurrent channels over an IP network: a
reliable ordered bytestream carrying ASCII command/status/notice lines (the
"control" channel, see [`control`]), and an unreliable datagram channel
carrying binary VITA-49 packets for meters, panadapter spectra, waterfall
rasters, and audio (the "data" channel, see [`vita`]). This crate reduces
both channels into a single coherent, queryable [`store::Store`] and lets a
caller issue commands through per-entity [`controllers`], subscribe to state
changes through the [`events`] bus, and consume decoded real-time frames
through the [`jitter`] buffer.

The wire transport itself — TCP socket, WebSocket, whatever a given
embedder already has lying around — is out of scope; see [`session`] for
the `ControlTransport`/`DataTransport` traits a caller implements.
*/
#![deny(unstable_features, unused_import_braces, unreachable_pub)]
#![forbid(unsafe_code)]

pub mod control;
pub mod controllers;
pub mod demux;
pub mod discovery;
pub mod events;
pub mod freq;
pub mod jitter;
pub mod session;
pub mod store;
pub mod vita;

/// Standard imports for the most commonly used types in the `flexradio`
/// crate.
pub mod prelude {
    pub use crate::control::{ControlLine, NoticeRecord, ReplyRecord, Severity, StatusRecord};
    pub use crate::demux::{DataDemux, Scope};
    pub use crate::events::EventBus;
    pub use crate::freq::Frequency;
    pub use crate::jitter::{JitterBuffer, JitterConfig};
    pub use crate::session::{Session, SessionConfig, SessionError};
    pub use crate::store::{EntityKind, StateChange, Store};
    pub use crate::vita::{TaggedPayload, VitaPacket, VitaParseError};
}
