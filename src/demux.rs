// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
The data-channel demultiplexer: a single producer (the session, feeding
decoded [`crate::vita::VitaPacket`]s off the data transport) fanned out
to per-entity [`crate::controllers`] via narrow **scopes**. See §4.5 of
the design spec.

A scope is a `(VitaKind, filter)` pair. Controllers lazily attach a
scope on first subscription and detach it when the last listener is
gone, so an idle entity costs nothing on every inbound packet beyond a
kind check.
*/

use crate::vita::{TaggedPayload, VitaPacket};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// The coarse kind of an inbound packet, used as the first-level
/// dispatch key before a scope's filter runs. Mirrors
/// [`crate::vita::TaggedPayload`]'s variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VitaKind {
    /// [`TaggedPayload::MeterSamples`].
    Meter,
    /// [`TaggedPayload::PanadapterBins`].
    Panadapter,
    /// [`TaggedPayload::WaterfallLine`].
    Waterfall,
    /// [`TaggedPayload::CompressedAudio`].
    CompressedAudio,
    /// [`TaggedPayload::DaxAudioFrame`].
    DaxAudio,
    /// [`TaggedPayload::DaxIqFrame`].
    DaxIq,
    /// [`TaggedPayload::DiscoveryBeacon`].
    Discovery,
    /// [`TaggedPayload::FftFrame`].
    Fft,
    /// [`TaggedPayload::Unknown`].
    Unknown,
}

impl VitaKind {
    fn of(payload: &TaggedPayload) -> VitaKind {
        match payload {
            TaggedPayload::MeterSamples(_) => VitaKind::Meter,
            TaggedPayload::PanadapterBins(_) => VitaKind::Panadapter,
            TaggedPayload::WaterfallLine(_) => VitaKind::Waterfall,
            TaggedPayload::CompressedAudio(_) => VitaKind::CompressedAudio,
            TaggedPayload::DaxAudioFrame(_) => VitaKind::DaxAudio,
            TaggedPayload::DaxIqFrame(_) => VitaKind::DaxIq,
            TaggedPayload::DiscoveryBeacon(_) => VitaKind::Discovery,
            TaggedPayload::FftFrame(_) => VitaKind::Fft,
            TaggedPayload::Unknown(_) => VitaKind::Unknown,
        }
    }
}

type Filter = Box<dyn Fn(&VitaPacket) -> bool + Send + Sync>;
type Listener = Box<dyn Fn(&VitaPacket) + Send + Sync>;

struct ScopeEntry {
    id: u64,
    kind: VitaKind,
    filter: Filter,
    listener: Listener,
}

type SharedScopeEntry = Arc<ScopeEntry>;

/// A handle to one attached scope. Controllers hold this for as long
/// as they have at least one listener; dropping the last listener
/// should be paired with [`DataDemux::detach`] so the scope's refcount
/// reaches zero and the entry is actually removed (see §4.5, §5:
/// "a scope with zero listeners detaches its parent subscription").
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Scope(u64);

struct RefcountedScope {
    scope: Scope,
    refcount: usize,
}

/// The data-channel demultiplexer. Owned by the session; see
/// [`crate::session::Session`].
#[derive(Default)]
pub struct DataDemux {
    entries: Mutex<Vec<SharedScopeEntry>>,
    refcounts: Mutex<Vec<RefcountedScope>>,
    next_id: AtomicU64,
}

impl DataDemux {
    /// Builds an empty demux.
    pub fn new() -> DataDemux {
        DataDemux::default()
    }

    /// Attaches a new scope: `listener` is invoked for every inbound
    /// packet of `kind` for which `filter` returns true. Returns a
    /// [`Scope`] handle with a refcount of 1; call
    /// [`DataDemux::add_ref`] for additional listeners sharing the
    /// same scope, and [`DataDemux::detach`] once per listener removed.
    pub fn attach(
        &self,
        kind: VitaKind,
        filter: impl Fn(&VitaPacket) -> bool + Send + Sync + 'static,
        listener: impl Fn(&VitaPacket) + Send + Sync + 'static,
    ) -> Scope {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let scope = Scope(id);
        self.entries.lock().unwrap().push(Arc::new(ScopeEntry { id, kind, filter: Box::new(filter), listener: Box::new(listener) }));
        self.refcounts.lock().unwrap().push(RefcountedScope { scope, refcount: 1 });
        scope
    }

    /// Increments a scope's listener refcount, e.g. when a second
    /// caller subscribes to data already covered by an existing scope.
    pub fn add_ref(&self, scope: Scope) {
        if let Some(entry) = self.refcounts.lock().unwrap().iter_mut().find(|e| e.scope == scope) {
            entry.refcount += 1;
        }
    }

    /// Decrements a scope's listener refcount; once it reaches zero the
    /// scope is detached (removed from dispatch) within this call — no
    /// separate tick is needed (testable property 7 in the design
    /// spec).
    pub fn detach(&self, scope: Scope) {
        let mut refcounts = self.refcounts.lock().unwrap();
        let Some(pos) = refcounts.iter().position(|e| e.scope == scope) else {
            return;
        };
        refcounts[pos].refcount = refcounts[pos].refcount.saturating_sub(1);
        if refcounts[pos].refcount == 0 {
            refcounts.remove(pos);
            self.entries.lock().unwrap().retain(|e| e.id != scope.0);
        }
    }

    /// The number of currently attached scopes (for diagnostics and
    /// tests; not part of the dispatch hot path).
    pub fn scope_count(&self) -> usize {
        self.refcounts.lock().unwrap().len()
    }

    /// Dispatches one inbound packet to every scope whose kind matches
    /// and whose filter accepts it. Called by the session's data-plane
    /// ingress task; this is the demux's only entrypoint driven off the
    /// wire.
    ///
    /// Takes a snapshot of the matching entries and releases the lock
    /// before invoking any listener: a listener that synchronously
    /// drops its own [`crate::controllers`] subscription (calling
    /// [`DataDemux::detach`] in turn) would otherwise re-enter the same
    /// non-reentrant `Mutex` and deadlock.
    pub fn dispatch(&self, packet: &VitaPacket) {
        let kind = VitaKind::of(packet.payload());
        let snapshot: Vec<SharedScopeEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect();
        for entry in &snapshot {
            if (entry.filter)(packet) {
                (entry.listener)(packet);
            }
        }
    }
}

/// A filter matching packets on a specific numeric stream id —
/// the common case for panadapter/waterfall/audio scopes (§4.5).
pub fn stream_id_filter(stream_id: u32) -> impl Fn(&VitaPacket) -> bool + Send + Sync + 'static {
    move |packet: &VitaPacket| packet.stream_id() == stream_id
}

/// A filter matching meter packets that carry a sample for `meter_id`
/// — the common case for a single [`crate::controllers::MeterController`]
/// attaching to the shared meter stream (§4.5).
pub fn meter_id_filter(meter_id: u16) -> impl Fn(&VitaPacket) -> bool + Send + Sync + 'static {
    move |packet: &VitaPacket| match packet.payload() {
        TaggedPayload::MeterSamples(samples) => samples.iter().any(|s| s.id == meter_id),
        _ => false,
    }
}
