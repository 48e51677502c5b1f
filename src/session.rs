// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Session orchestration: wiring a discovered radio to a caller-supplied
control/data transport, correlating commands with replies, and owning
the store, event bus, demux, and VITA scratch buffers for the
connection's lifetime. See §4.8 of the design spec.

The concrete transport (TCP socket, WebSocket, RTCDataChannel) is out
of this crate's scope; a caller implements [`ControlTransport`] and
[`DataTransport`] over whatever they already have, and drives bytes
into [`Session::handle_control_line`]/[`Session::handle_data_packet`]
from their own read loop. This crate only reacts to bytes handed to it
and issues writes through the transport traits — it never owns a
socket or spawns a reader task itself.
*/

use crate::control::{parse_line, ControlLine, NoticeRecord};
use crate::demux::DataDemux;
use crate::events::EventBus;
use crate::store::Store;
use crate::vita::{self, ScratchBuffers, VitaPacket};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;

/// A session-level event, fanned out through [`Session::subscribe`].
/// Distinct from [`crate::store::StateChange`], which is specific to
/// one entity mutation — these are connection-lifecycle events.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A [`NoticeRecord`] was received on the control channel.
    Notice(NoticeRecord),
    /// The transport reported a failure; the session is now closed.
    TransportFailed(String),
    /// [`Session::close`] was called.
    Closed,
}

/// Errors surfaced at the session/controller boundary. See §7 of the
/// design spec.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// A controller operation referenced an entity absent from the
    /// store.
    #[error("{entity} {key:?} is not present in the store")]
    StateUnavailable {
        /// The entity kind that was missing (e.g. `"slice"`).
        entity: &'static str,
        /// The key that was looked up.
        key: String,
    },
    /// A command's reply carried a non-zero result code.
    #[error("command rejected with code {code:#x}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    CommandRejected {
        /// The reply's result code.
        code: u32,
        /// An optional human-readable message accompanying the code.
        message: Option<String>,
    },
    /// The operation was issued on, or was pending against, a session
    /// that has since been torn down.
    #[error("session is closed")]
    ClientClosed,
    /// A command was issued but no reply arrived within
    /// [`SessionConfig::command_timeout`].
    #[error("command timed out waiting for a reply")]
    CommandTimeout,
    /// The transport reported a failure.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// Tunables for one [`Session`]. See §4.8 and the ambient-configuration
/// note in the design spec: plain struct, documented defaults, no
/// external configuration-file crate.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// How long [`Session::command`] waits for a matching reply before
    /// resolving with [`SessionError::CommandTimeout`]. Default 5s.
    pub command_timeout: Duration,
    /// Ceiling on VITA-49 scratch buffer growth, in elements. Default
    /// 65536 (see [`crate::vita::DEFAULT_GROWTH_CEILING`]).
    pub scratch_growth_ceiling: usize,
    /// Initial backoff before a reconnect attempt after
    /// [`SessionError::TransportFailure`]. Zero disables automatic
    /// reconnection (the default): callers must reconnect explicitly.
    pub reconnect_backoff: Duration,
    /// Ceiling the exponential reconnect backoff is capped at. Default
    /// 30s.
    pub max_reconnect_backoff: Duration,
    /// Line terminator appended to outgoing command lines. Default
    /// `b'\n'`.
    pub line_terminator: u8,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            command_timeout: Duration::from_secs(5),
            scratch_growth_ceiling: crate::vita::DEFAULT_GROWTH_CEILING,
            reconnect_backoff: Duration::ZERO,
            max_reconnect_backoff: Duration::from_secs(30),
            line_terminator: b'\n',
        }
    }
}

/// What a caller implements to let the session write lines to the
/// control channel. Receiving bytes is the caller's responsibility
/// too — see the module docs: feed them to
/// [`Session::handle_control_line`].
#[async_trait]
pub trait ControlTransport: Send + Sync {
    /// Sends one already-terminated line (e.g. `"C3|slice create\n"`)
    /// on the control channel.
    async fn send_line(&self, line: &str) -> Result<(), SessionError>;
}

/// What a caller implements to let the session write datagrams to the
/// data channel (used for command-adjacent writes such as remote
/// audio transmit; most data-channel traffic is radio → client only).
#[async_trait]
pub trait DataTransport: Send + Sync {
    /// Sends one datagram on the data channel.
    async fn send(&self, bytes: &[u8]) -> Result<(), SessionError>;
}

struct PendingCommand {
    sender: oneshot::Sender<Result<crate::control::ReplyRecord, SessionError>>,
}

/// A live connection to one radio: the control-line parser, the VITA
/// parser, the store, the event bus, and the data-channel demux, tied
/// together with command/reply correlation. See §4.8 of the design
/// spec. Cheaply cloneable (an `Arc` handle); controllers hold a
/// clone plus an entity id, never a snapshot (§9 design note).
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    config: SessionConfig,
    control: Arc<dyn ControlTransport>,
    data: Arc<dyn DataTransport>,
    store: Mutex<Store>,
    events: EventBus<SessionEvent>,
    demux: DataDemux,
    scratch: Mutex<ScratchBuffers>,
    pending: Mutex<HashMap<u32, PendingCommand>>,
    next_seq: AtomicU32,
    raw_line_sink: Mutex<Option<Box<dyn Fn(&str) + Send + Sync>>>,
    closed: AtomicBool,
}

impl Session {
    /// Builds a session wired to the given control/data transports.
    pub fn new(control: Arc<dyn ControlTransport>, data: Arc<dyn DataTransport>, config: SessionConfig) -> Session {
        let scratch = ScratchBuffers::with_growth_ceiling(config.scratch_growth_ceiling);
        Session {
            inner: Arc::new(Inner {
                config,
                control,
                data,
                store: Mutex::new(Store::new()),
                events: EventBus::new(),
                demux: DataDemux::new(),
                scratch: Mutex::new(scratch),
                pending: Mutex::new(HashMap::new()),
                next_seq: AtomicU32::new(1),
                raw_line_sink: Mutex::new(None),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// The radio-state store. Controllers read through this; callers
    /// wanting a raw entity read (rather than a controller facade) can
    /// use it directly too.
    pub fn store(&self) -> &Mutex<Store> {
        &self.inner.store
    }

    /// The data-channel demultiplexer controllers attach scopes to.
    pub fn demux(&self) -> &DataDemux {
        &self.inner.demux
    }

    /// Subscribes to session-lifecycle events (notices, transport
    /// failure, close).
    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) -> crate::events::ListenerResult + Send + Sync + 'static) -> crate::events::Subscription {
        self.inner.events.subscribe("session", listener)
    }

    /// Installs a sink for control lines that are not `S`/`R`/`M`/`C`
    /// prefixed — e.g. an authentication handshake particular to one
    /// radio model (§4.8, §6.1).
    pub fn set_raw_line_sink(&self, sink: impl Fn(&str) + Send + Sync + 'static) {
        *self.inner.raw_line_sink.lock().unwrap() = Some(Box::new(sink));
    }

    /// Feeds one received control-channel line (without its line
    /// terminator) into the session: status lines mutate the store and
    /// fan out diffs to subscribers; reply lines resolve a matching
    /// pending [`Session::command`]; notice lines are republished as
    /// [`SessionEvent::Notice`]; anything else goes to the raw-line
    /// sink, if one is installed.
    pub fn handle_control_line(&self, line: &str) {
        match parse_line(line) {
            ControlLine::Status(record) => {
                self.inner.store.lock().unwrap().apply(&ControlLine::Status(record));
            }
            ControlLine::Reply(reply) => {
                self.resolve_reply(reply);
            }
            ControlLine::Notice(notice) => {
                self.inner.events.emit("session", &SessionEvent::Notice(notice));
            }
            ControlLine::Unknown(unknown) => {
                if let Some(sink) = self.inner.raw_line_sink.lock().unwrap().as_ref() {
                    sink(&unknown.raw);
                } else {
                    log::debug!("session: unrouted control line: {:?}", unknown.raw);
                }
            }
        }
    }

    fn resolve_reply(&self, reply: crate::control::ReplyRecord) {
        let pending = self.inner.pending.lock().unwrap().remove(&reply.sequence);
        let Some(pending) = pending else {
            log::debug!("session: reply for unknown sequence {:#x}", reply.sequence);
            return;
        };
        let result = if reply.code == 0 {
            Ok(reply)
        } else {
            Err(SessionError::CommandRejected { code: reply.code, message: reply.message.clone() })
        };
        let _ = pending.sender.send(result);
    }

    /// Feeds one received data-channel datagram into the session: it
    /// is decoded as a VITA-49 packet using this session's scratch
    /// buffers and, on success, handed to the demux for fan-out to
    /// attached controller scopes. Decode failures are logged at
    /// `warn` and otherwise dropped (§7: parser failures are never
    /// fatal to the session).
    pub fn handle_data_packet(&self, bytes: &[u8]) {
        let mut scratch = self.inner.scratch.lock().unwrap();
        match vita::parse(bytes, &mut scratch) {
            Ok(packet) => {
                drop(scratch);
                self.inner.demux.dispatch(&packet);
            }
            Err(err) => {
                log::warn!("session: dropping malformed data packet: {err}");
            }
        }
    }

    /// Formats `command_text` as `C<hexSeq>|<command_text><terminator>`,
    /// sends it on the control transport, and awaits the matching
    /// reply (or [`SessionConfig::command_timeout`], or session
    /// closure).
    pub async fn command(&self, command_text: &str) -> Result<crate::control::ReplyRecord, SessionError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(SessionError::ClientClosed);
        }
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().unwrap().insert(seq, PendingCommand { sender: tx });

        let terminator = self.inner.config.line_terminator as char;
        let line = format!("C{seq:X}|{command_text}{terminator}");
        if let Err(err) = self.inner.control.send_line(&line).await {
            self.inner.pending.lock().unwrap().remove(&seq);
            return Err(err);
        }

        match tokio::time::timeout(self.inner.config.command_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(SessionError::ClientClosed),
            Err(_) => {
                self.inner.pending.lock().unwrap().remove(&seq);
                Err(SessionError::CommandTimeout)
            }
        }
    }

    /// Sends a datagram on the data channel (e.g. remote audio
    /// transmit). Most data-channel traffic flows radio → client; this
    /// exists for the minority that does not.
    pub async fn send_data(&self, bytes: &[u8]) -> Result<(), SessionError> {
        self.inner.data.send(bytes).await
    }

    /// Tears the session down: resolves every pending command with
    /// [`SessionError::ClientClosed`], emits [`SessionEvent::Closed`],
    /// and marks the session closed so subsequent [`Session::command`]
    /// calls fail fast.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        let pending: Vec<_> = self.inner.pending.lock().unwrap().drain().collect();
        for (_, p) in pending {
            let _ = p.sender.send(Err(SessionError::ClientClosed));
        }
        self.inner.events.emit("session", &SessionEvent::Closed);
    }

    /// Reports a transport-level failure: resolves every pending
    /// command with [`SessionError::TransportFailure`], emits
    /// [`SessionEvent::TransportFailed`], and schedules a reconnect
    /// attempt if [`SessionConfig::reconnect_backoff`] is non-zero.
    /// Reconnection itself is left to the caller (this crate does not
    /// own a transport to reconnect) — the session only signals that
    /// one should be attempted, via the same [`SessionEvent`] channel,
    /// after waiting out the backoff on the async runtime's timer.
    pub fn report_transport_failure(&self, cause: impl Into<String>) {
        let cause = cause.into();
        self.inner.closed.store(true, Ordering::Release);
        let pending: Vec<_> = self.inner.pending.lock().unwrap().drain().collect();
        for (_, p) in pending {
            let _ = p.sender.send(Err(SessionError::TransportFailure(cause.clone())));
        }
        self.inner.events.emit("session", &SessionEvent::TransportFailed(cause.clone()));

        if self.inner.config.reconnect_backoff.is_zero() {
            return;
        }
        let inner = self.inner.clone();
        let backoff = self.inner.config.reconnect_backoff.min(self.inner.config.max_reconnect_backoff);
        tokio::spawn(async move {
            tokio::time::sleep(backoff).await;
            inner.events.emit("session", &SessionEvent::TransportFailed(cause));
        });
    }

    /// Whether [`Session::close`] or a fatal transport failure has
    /// already torn this session down.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct RecordingControl {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ControlTransport for RecordingControl {
        async fn send_line(&self, line: &str) -> Result<(), SessionError> {
            self.sent.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    struct NullData;

    #[async_trait]
    impl DataTransport for NullData {
        async fn send(&self, _bytes: &[u8]) -> Result<(), SessionError> {
            Ok(())
        }
    }

    fn test_session() -> (Session, Arc<RecordingControl>) {
        let control = Arc::new(RecordingControl { sent: Mutex::new(Vec::new()) });
        let session = Session::new(control.clone(), Arc::new(NullData), SessionConfig::default());
        (session, control)
    }

    #[tokio::test]
    async fn command_resolves_on_matching_reply() {
        let (session, control) = test_session();
        let session2 = session.clone();
        let handle = tokio::spawn(async move { session2.command("slice create").await });
        // Give the command task a chance to register before we reply.
        tokio::task::yield_now().await;
        let line = control.sent.lock().unwrap()[0].clone();
        let seq_hex = line.trim_start_matches('C').split('|').next().unwrap().to_string();
        session.handle_control_line(&format!("R{seq_hex}|00000000"));
        let reply = handle.await.unwrap().unwrap();
        assert_eq!(reply.code, 0);
    }

    #[tokio::test]
    async fn command_rejected_surfaces_code() {
        let (session, control) = test_session();
        let session2 = session.clone();
        let handle = tokio::spawn(async move { session2.command("bogus").await });
        tokio::task::yield_now().await;
        let line = control.sent.lock().unwrap()[0].clone();
        let seq_hex = line.trim_start_matches('C').split('|').next().unwrap().to_string();
        session.handle_control_line(&format!("R{seq_hex}|00000005|Not Found"));
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(SessionError::CommandRejected { code: 5, .. })));
    }

    #[tokio::test]
    async fn close_resolves_pending_commands() {
        let (session, _control) = test_session();
        let session2 = session.clone();
        let handle = tokio::spawn(async move { session2.command("slice create").await });
        tokio::task::yield_now().await;
        session.close();
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(SessionError::ClientClosed)));
    }

    #[test]
    fn status_line_mutates_store() {
        let (session, _control) = test_session();
        session.handle_control_line("S1|slice 0 in_use=1 RF_frequency=15.000000 mode=USB");
        let slice = session.store().lock().unwrap().slice("0").unwrap();
        assert_eq!(slice.mode.as_deref(), Some("USB"));
    }

    #[test]
    fn unknown_line_routes_to_raw_sink() {
        let (session, _control) = test_session();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        session.set_raw_line_sink(move |_line| {
            seen_clone.fetch_add(1, Ordering::Relaxed);
        });
        session.handle_control_line("AUTH please-login");
        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }
}
