// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A keyed, multi-listener event bus. [`crate::session`] and
[`crate::controllers`] use this for "data arrived" / "state changed"
fan-out that is orthogonal to the store's own subscription mechanism
(see [`crate::store::Store::subscribe`], which is specialized to
entity diffs); this one is generic over any `Clone`-able event payload,
keyed by an arbitrary string topic.
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// The result a listener returns; an `Err` does not stop other
/// listeners from running, but is collected and reported (see
/// [`EventBus::emit`]).
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Listener<T> = Box<dyn Fn(&T) -> ListenerResult + Send + Sync>;

struct Entry<T> {
    id: u64,
    topic: String,
    callback: Listener<T>,
}

type SharedEntry<T> = Arc<Entry<T>>;

/// One or more listener failures observed during a single [`EventBus::emit`]
/// call. Reported to the bus's sink (if any) and, unless rethrow is
/// suppressed, logged asynchronously so a failing listener cannot stall
/// the emitting call.
#[derive(Error, Debug, Clone)]
#[error("{} listener(s) failed on topic {topic:?}: {causes:?}", causes.len())]
pub struct ListenerFailure {
    /// The topic that was being emitted when listeners failed.
    pub topic: String,
    /// The stringified cause of each failing listener, in listener
    /// registration order.
    pub causes: Vec<String>,
}

/// A subscription handle. Release via [`EventBus::unsubscribe`]; doing
/// so twice, or with a handle the bus has already forgotten, is a
/// no-op.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Subscription(u64);

/// A keyed multi-listener emitter. See §4.4 of the design spec.
pub struct EventBus<T> {
    entries: Mutex<Vec<SharedEntry<T>>>,
    next_id: AtomicU64,
    sink: Mutex<Option<Box<dyn Fn(ListenerFailure) + Send + Sync>>>,
    suppress_rethrow: bool,
}

impl<T> Default for EventBus<T> {
    fn default() -> EventBus<T> {
        EventBus::new()
    }
}

impl<T> EventBus<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a bus that rethrows (logs, asynchronously) aggregated
    /// listener failures.
    pub fn new() -> EventBus<T> {
        EventBus { entries: Mutex::new(Vec::new()), next_id: AtomicU64::new(0), sink: Mutex::new(None), suppress_rethrow: false }
    }

    /// Creates a bus that never rethrows; listener failures are only
    /// ever visible through the sink (if one is installed).
    pub fn without_rethrow() -> EventBus<T> {
        EventBus { suppress_rethrow: true, ..EventBus::new() }
    }

    /// Installs a sink invoked synchronously with every aggregated
    /// [`ListenerFailure`], in addition to (not instead of) the
    /// asynchronous rethrow.
    pub fn set_failure_sink(&self, sink: impl Fn(ListenerFailure) + Send + Sync + 'static) {
        *self.sink.lock().unwrap() = Some(Box::new(sink));
    }

    /// Subscribes `listener` to `topic`.
    pub fn subscribe(&self, topic: impl Into<String>, listener: impl Fn(&T) -> ListenerResult + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().unwrap().push(Arc::new(Entry { id, topic: topic.into(), callback: Box::new(listener) }));
        Subscription(id)
    }

    /// Releases a subscription. Idempotent.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.entries.lock().unwrap().retain(|e| e.id != subscription.0);
    }

    /// The number of listeners currently subscribed to `topic`.
    pub fn listener_count(&self, topic: &str) -> usize {
        self.entries.lock().unwrap().iter().filter(|e| e.topic == topic).count()
    }

    /// Emits `event` to every listener on `topic`, synchronously, over
    /// a frozen snapshot of the listener set taken at the start of this
    /// call — a listener that unsubscribes (itself or a sibling) during
    /// emission does not cause any other listener to be skipped, and
    /// does not deadlock against [`EventBus::unsubscribe`]'s own lock.
    /// Failures are collected; if any occurred, they are reported to
    /// the sink and then (unless this bus was built with
    /// [`EventBus::without_rethrow`]) spawned onto the async runtime so
    /// a failing listener cannot stall this call.
    pub fn emit(&self, topic: &str, event: &T) {
        // Clone the matching entries' `Arc`s and drop the lock before
        // invoking anything: a listener that synchronously unsubscribes
        // itself or a sibling would otherwise re-enter the same
        // non-reentrant `Mutex` and deadlock.
        let snapshot: Vec<SharedEntry<T>> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect();

        let mut causes = Vec::new();
        for entry in &snapshot {
            if let Err(err) = (entry.callback)(event) {
                causes.push(err.to_string());
            }
        }

        if causes.is_empty() {
            return;
        }
        let failure = ListenerFailure { topic: topic.to_string(), causes };
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink(failure.clone());
        }
        if !self.suppress_rethrow {
            tokio::spawn(async move {
                log::error!("events: {failure}");
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn delivers_to_matching_topic_only() {
        let bus: EventBus<i32> = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        bus.subscribe("a", move |_| {
            count_clone.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });
        bus.emit("a", &1);
        bus.emit("b", &1);
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let bus: EventBus<i32> = EventBus::new();
        let sub = bus.subscribe("a", |_| Ok(()));
        bus.unsubscribe(sub);
        bus.unsubscribe(sub);
        assert_eq!(bus.listener_count("a"), 0);
    }

    #[test]
    fn listener_unsubscribing_itself_mid_emit_does_not_deadlock() {
        let bus: Arc<EventBus<i32>> = Arc::new(EventBus::new());
        let bus_clone = bus.clone();
        let sub_cell: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let sub_cell_clone = sub_cell.clone();
        let sub = bus.subscribe("a", move |_| {
            let sub = sub_cell_clone.lock().unwrap().unwrap();
            bus_clone.unsubscribe(sub);
            Ok(())
        });
        *sub_cell.lock().unwrap() = Some(sub);

        bus.emit("a", &1);
        assert_eq!(bus.listener_count("a"), 0);
    }

    #[test]
    fn sink_receives_aggregated_failure() {
        let bus: EventBus<i32> = EventBus::without_rethrow();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        bus.set_failure_sink(move |failure| {
            *seen_clone.lock().unwrap() = Some(failure.causes.len());
        });
        bus.subscribe("a", |_| Err("boom".into()));
        bus.subscribe("a", |_| Err("bang".into()));
        bus.emit("a", &1);
        assert_eq!(*seen.lock().unwrap(), Some(2));
    }
}
