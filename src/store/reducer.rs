// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
The radio-state store: an in-memory reducer that applies control-line
status records to a keyed map of entities, computing a diff per
mutation and fanning it out to subscribers. See the module-level
design notes in `DESIGN.md` for why this stays single-threaded: the
store is meant to be owned by one task and driven `&mut`, never shared
behind a lock.
*/

use crate::control::{ControlLine, StatusRecord};
use crate::store::diff::{EntityKind, StateChange};
use crate::store::entities::{
    apply_audio_stream_attribute, apply_meter_attribute, apply_panadapter_attribute, apply_radio_attribute,
    apply_slice_attribute, apply_tx_band_setting_attribute, apply_waterfall_attribute, AudioStream, Meter,
    Panadapter, Radio, Slice, TxBandSetting, Waterfall,
};
use crate::store::ReducerError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

type Listener = Box<dyn Fn(&StateChange) + Send + Sync>;

struct Subscription {
    id: u64,
    entity: EntityKind,
    key: Option<String>,
    callback: Listener,
}

/// A handle returned by [`Store::subscribe`]. Pass to
/// [`Store::unsubscribe`] to stop receiving changes; unsubscribing more
/// than once, or a handle whose store has already dropped it, is a
/// no-op.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SubscriptionHandle(u64);

/// In-memory radio-state store. See §4.3 of the design spec.
#[derive(Default)]
pub struct Store {
    radio: Radio,
    slices: HashMap<String, Slice>,
    panadapters: HashMap<String, Panadapter>,
    waterfalls: HashMap<String, Waterfall>,
    meters: HashMap<String, Meter>,
    audio_streams: HashMap<String, AudioStream>,
    tx_band_settings: HashMap<String, TxBandSetting>,
    subscriptions: Vec<Subscription>,
    next_subscription_id: AtomicU64,
}

enum RouteTarget {
    Radio,
    Slice(String),
    Panadapter(String),
    Waterfall(String),
    Meter(String),
    AudioStream(String),
    TxBandSetting(String),
    Unroutable,
}

/// Routes a status record's `(source, positional)` to an entity and
/// key, per the table in §4.3 of the design spec. `display`,
/// `interlock`, and `transmit` are two-token sources on the wire
/// (`display pan ...`, `interlock bandset ...`); the sub-keyword is the
/// first positional token and is consumed before reaching the id.
fn route(source: &str, positional: &[String]) -> RouteTarget {
    match source {
        "slice" => positional.first().cloned().map(RouteTarget::Slice).unwrap_or(RouteTarget::Unroutable),
        "meter" => positional.first().cloned().map(RouteTarget::Meter).unwrap_or(RouteTarget::Unroutable),
        "display" => match positional.first().map(String::as_str) {
            Some("pan") | Some("panafall") => {
                positional.get(1).cloned().map(RouteTarget::Panadapter).unwrap_or(RouteTarget::Unroutable)
            }
            Some("waterfall") => {
                positional.get(1).cloned().map(RouteTarget::Waterfall).unwrap_or(RouteTarget::Unroutable)
            }
            _ => RouteTarget::Unroutable,
        },
        "audio_stream" => positional.first().cloned().map(RouteTarget::AudioStream).unwrap_or(RouteTarget::Unroutable),
        s if s.starts_with("dax_") => {
            positional.first().cloned().map(RouteTarget::AudioStream).unwrap_or(RouteTarget::Unroutable)
        }
        "interlock" | "transmit" => match positional.first().map(String::as_str) {
            Some("bandset") => {
                positional.get(1).cloned().map(RouteTarget::TxBandSetting).unwrap_or(RouteTarget::Unroutable)
            }
            _ => RouteTarget::Unroutable,
        },
        "radio" | "gps" => RouteTarget::Radio,
        _ => RouteTarget::Radio,
    }
}

/// Pushes `$name` onto `$changed` when `$old.$field != $new.$field`.
macro_rules! record_if_changed {
    ($changed:expr, $old:expr, $new:expr, $name:literal, $field:ident) => {
        if $old.$field != $new.$field {
            $changed.push($name.to_string());
        }
    };
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Store {
        Store::default()
    }

    /// Reduces one classified control line into zero or more diffs.
    /// Only [`ControlLine::Status`] lines mutate the store; replies and
    /// notices are session-level concerns (see [`crate::session`]).
    pub fn apply(&mut self, line: &ControlLine) -> Vec<StateChange> {
        match line {
            ControlLine::Status(record) => self.apply_status(record),
            _ => Vec::new(),
        }
    }

    fn apply_status(&mut self, record: &StatusRecord) -> Vec<StateChange> {
        match route(&record.source, &record.positional) {
            RouteTarget::Radio => self.reduce_radio(record),
            RouteTarget::Slice(id) => self.reduce_slice(id, record),
            RouteTarget::Panadapter(id) => self.reduce_panadapter(id, record),
            RouteTarget::Waterfall(id) => self.reduce_waterfall(id, record),
            RouteTarget::Meter(id) => self.reduce_meter(id, record),
            RouteTarget::AudioStream(id) => self.reduce_audio_stream(id, record),
            RouteTarget::TxBandSetting(id) => self.reduce_tx_band_setting(id, record),
            RouteTarget::Unroutable => {
                log::debug!("store: unroutable status from source {:?}", record.source);
                Vec::new()
            }
        }
    }

    fn is_removed(record: &StatusRecord) -> bool {
        record.attributes.get("removed").map(String::as_str) == Some("1")
    }

    fn apply_attributes<T>(
        target: &mut T,
        record: &StatusRecord,
        apply_one: fn(&mut T, &str, &str) -> Result<bool, ReducerError>,
    ) {
        for (k, v) in &record.attributes {
            match apply_one(target, k, v) {
                Ok(true) => {}
                Ok(false) => log::debug!("store: unknown attribute {k:?} (raw line: {:?})", record.raw),
                Err(err) => log::warn!("store: attribute {k:?}={v:?} failed to parse: {err}"),
            }
        }
    }

    fn notify(&self, changes: &[StateChange]) {
        for change in changes {
            for sub in &self.subscriptions {
                if sub.entity != change.entity {
                    continue;
                }
                if let Some(key) = &sub.key {
                    if key != &change.key {
                        continue;
                    }
                }
                (sub.callback)(change);
            }
        }
    }

    /// Subscribes to changes on `entity`, optionally narrowed to one
    /// `key` (e.g. one slice id). Fires for every matching
    /// [`StateChange`] produced by [`Store::apply`].
    pub fn subscribe(
        &mut self,
        entity: EntityKind,
        key: Option<&str>,
        listener: impl Fn(&StateChange) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let id = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
        self.subscriptions.push(Subscription {
            id,
            entity,
            key: key.map(String::from),
            callback: Box::new(listener),
        });
        SubscriptionHandle(id)
    }

    /// Releases a subscription. Idempotent: unsubscribing twice, or a
    /// handle that never matched, is a no-op.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.subscriptions.retain(|sub| sub.id != handle.0);
    }

    /// The radio singleton snapshot.
    pub fn radio(&self) -> Radio {
        self.radio.clone()
    }

    /// The slice snapshot for `id`, if present.
    pub fn slice(&self, id: &str) -> Option<Slice> {
        self.slices.get(id).cloned()
    }

    /// The panadapter snapshot for `stream_id`, if present.
    pub fn panadapter(&self, stream_id: &str) -> Option<Panadapter> {
        self.panadapters.get(stream_id).cloned()
    }

    /// The waterfall snapshot for `stream_id`, if present.
    pub fn waterfall(&self, stream_id: &str) -> Option<Waterfall> {
        self.waterfalls.get(stream_id).cloned()
    }

    /// The meter snapshot for `id`, if present.
    pub fn meter(&self, id: &str) -> Option<Meter> {
        self.meters.get(id).cloned()
    }

    /// The audio stream snapshot for `stream_id`, if present.
    pub fn audio_stream(&self, stream_id: &str) -> Option<AudioStream> {
        self.audio_streams.get(stream_id).cloned()
    }

    /// The TX band setting snapshot for `band_id`, if present.
    pub fn tx_band_setting(&self, band_id: &str) -> Option<TxBandSetting> {
        self.tx_band_settings.get(band_id).cloned()
    }

    fn reduce_radio(&mut self, record: &StatusRecord) -> Vec<StateChange> {
        let previous = self.radio.clone();
        let mut next = previous.clone();
        Self::apply_attributes(&mut next, record, |r, k, v| apply_radio_attribute(r, k, v));
        next.raw.extend(record.attributes.clone());

        let mut changed = Vec::new();
        record_if_changed!(changed, previous, next, "model", model);
        record_if_changed!(changed, previous, next, "serial", serial);
        record_if_changed!(changed, previous, next, "callsign", callsign);
        record_if_changed!(changed, previous, next, "nickname", nickname);
        record_if_changed!(changed, previous, next, "version", version);

        self.radio = next;
        let changes = vec![StateChange { entity: EntityKind::Radio, key: String::new(), changed_fields: changed, removed: false }];
        self.notify(&changes);
        changes
    }

    fn reduce_slice(&mut self, id: String, record: &StatusRecord) -> Vec<StateChange> {
        if Self::is_removed(record) {
            return self.remove_slice(&id);
        }
        let previous = self.slices.get(&id).cloned().unwrap_or_else(|| Slice { id: id.clone(), ..Slice::default() });
        let mut next = previous.clone();
        Self::apply_attributes(&mut next, record, |s, k, v| apply_slice_attribute(s, k, v));
        next.raw.extend(record.attributes.clone());

        let mut changed = Vec::new();
        record_if_changed!(changed, previous, next, "frequency_hz", frequency_hz);
        record_if_changed!(changed, previous, next, "frequency_mhz", frequency_mhz);
        record_if_changed!(changed, previous, next, "sample_rate_hz", sample_rate_hz);
        record_if_changed!(changed, previous, next, "mode", mode);
        record_if_changed!(changed, previous, next, "panadapter_stream_id", panadapter_stream_id);
        record_if_changed!(changed, previous, next, "dax_channel", dax_channel);
        record_if_changed!(changed, previous, next, "in_use", in_use);

        let mut changes = vec![StateChange { entity: EntityKind::Slice, key: id.clone(), changed_fields: changed, removed: false }];
        if previous.panadapter_stream_id != next.panadapter_stream_id {
            changes.extend(self.rebind_slice_panadapter(&id, previous.panadapter_stream_id.as_deref(), next.panadapter_stream_id.as_deref()));
        }

        self.slices.insert(id, next);
        self.notify(&changes);
        changes
    }

    fn rebind_slice_panadapter(&mut self, slice_id: &str, old: Option<&str>, new: Option<&str>) -> Vec<StateChange> {
        let mut changes = Vec::new();
        if let Some(old_pan) = old {
            if let Some(p) = self.panadapters.get_mut(old_pan) {
                p.attached_slices.retain(|s| s != slice_id);
                changes.push(StateChange {
                    entity: EntityKind::Panadapter,
                    key: old_pan.to_string(),
                    changed_fields: vec!["attached_slices".to_string()],
                    removed: false,
                });
            }
        }
        if let Some(new_pan) = new {
            if let Some(p) = self.panadapters.get_mut(new_pan) {
                if !p.attached_slices.iter().any(|s| s == slice_id) {
                    p.attached_slices.push(slice_id.to_string());
                }
                changes.push(StateChange {
                    entity: EntityKind::Panadapter,
                    key: new_pan.to_string(),
                    changed_fields: vec!["attached_slices".to_string()],
                    removed: false,
                });
            }
        }
        changes
    }

    fn remove_slice(&mut self, id: &str) -> Vec<StateChange> {
        let Some(removed) = self.slices.remove(id) else {
            return Vec::new();
        };
        let mut changes = self.rebind_slice_panadapter(id, removed.panadapter_stream_id.as_deref(), None);
        changes.push(StateChange { entity: EntityKind::Slice, key: id.to_string(), changed_fields: Vec::new(), removed: true });
        self.notify(&changes);
        changes
    }

    fn reduce_panadapter(&mut self, stream_id: String, record: &StatusRecord) -> Vec<StateChange> {
        if Self::is_removed(record) {
            return self.remove_panadapter(&stream_id);
        }
        let previous = self
            .panadapters
            .get(&stream_id)
            .cloned()
            .unwrap_or_else(|| Panadapter { stream_id: stream_id.clone(), ..Panadapter::default() });
        let mut next = previous.clone();
        Self::apply_attributes(&mut next, record, |p, k, v| apply_panadapter_attribute(p, k, v));
        next.raw.extend(record.attributes.clone());

        let mut changed = Vec::new();
        record_if_changed!(changed, previous, next, "center_freq_hz", center_freq_hz);
        record_if_changed!(changed, previous, next, "bandwidth_hz", bandwidth_hz);
        record_if_changed!(changed, previous, next, "x_pixels", x_pixels);
        record_if_changed!(changed, previous, next, "y_pixels", y_pixels);
        record_if_changed!(changed, previous, next, "band", band);
        record_if_changed!(changed, previous, next, "rf_gain", rf_gain);
        record_if_changed!(changed, previous, next, "preamp", preamp);
        record_if_changed!(changed, previous, next, "rx_antenna", rx_antenna);

        self.panadapters.insert(stream_id.clone(), next);
        let changes = vec![StateChange { entity: EntityKind::Panadapter, key: stream_id, changed_fields: changed, removed: false }];
        self.notify(&changes);
        changes
    }

    fn remove_panadapter(&mut self, stream_id: &str) -> Vec<StateChange> {
        if self.panadapters.remove(stream_id).is_none() {
            return Vec::new();
        }
        let changes = vec![StateChange { entity: EntityKind::Panadapter, key: stream_id.to_string(), changed_fields: Vec::new(), removed: true }];
        self.notify(&changes);
        changes
    }

    fn reduce_waterfall(&mut self, stream_id: String, record: &StatusRecord) -> Vec<StateChange> {
        if Self::is_removed(record) {
            return self.remove_waterfall(&stream_id);
        }
        let previous = self
            .waterfalls
            .get(&stream_id)
            .cloned()
            .unwrap_or_else(|| Waterfall { stream_id: stream_id.clone(), ..Waterfall::default() });
        let mut next = previous.clone();
        Self::apply_attributes(&mut next, record, |w, k, v| apply_waterfall_attribute(w, k, v));
        next.raw.extend(record.attributes.clone());

        let mut changed = Vec::new();
        record_if_changed!(changed, previous, next, "panadapter_stream_id", panadapter_stream_id);
        record_if_changed!(changed, previous, next, "line_speed", line_speed);
        record_if_changed!(changed, previous, next, "color_gain", color_gain);
        record_if_changed!(changed, previous, next, "black_level", black_level);
        record_if_changed!(changed, previous, next, "auto_black", auto_black);
        record_if_changed!(changed, previous, next, "gradient_index", gradient_index);

        self.waterfalls.insert(stream_id.clone(), next);
        let changes = vec![StateChange { entity: EntityKind::Waterfall, key: stream_id, changed_fields: changed, removed: false }];
        self.notify(&changes);
        changes
    }

    fn remove_waterfall(&mut self, stream_id: &str) -> Vec<StateChange> {
        if self.waterfalls.remove(stream_id).is_none() {
            return Vec::new();
        }
        let changes = vec![StateChange { entity: EntityKind::Waterfall, key: stream_id.to_string(), changed_fields: Vec::new(), removed: true }];
        self.notify(&changes);
        changes
    }

    fn reduce_meter(&mut self, id: String, record: &StatusRecord) -> Vec<StateChange> {
        if Self::is_removed(record) {
            return self.remove_meter(&id);
        }
        let previous = self.meters.get(&id).cloned().unwrap_or_else(|| Meter { id: id.clone(), ..Meter::default() });
        let mut next = previous.clone();
        Self::apply_attributes(&mut next, record, |m, k, v| apply_meter_attribute(m, k, v));
        next.raw.extend(record.attributes.clone());

        let mut changed = Vec::new();
        record_if_changed!(changed, previous, next, "source", source);
        record_if_changed!(changed, previous, next, "source_index", source_index);
        record_if_changed!(changed, previous, next, "name", name);
        record_if_changed!(changed, previous, next, "description", description);
        record_if_changed!(changed, previous, next, "units", units);
        record_if_changed!(changed, previous, next, "low", low);
        record_if_changed!(changed, previous, next, "high", high);
        record_if_changed!(changed, previous, next, "fps", fps);

        self.meters.insert(id.clone(), next);
        let changes = vec![StateChange { entity: EntityKind::Meter, key: id, changed_fields: changed, removed: false }];
        self.notify(&changes);
        changes
    }

    fn remove_meter(&mut self, id: &str) -> Vec<StateChange> {
        if self.meters.remove(id).is_none() {
            return Vec::new();
        }
        let changes = vec![StateChange { entity: EntityKind::Meter, key: id.to_string(), changed_fields: Vec::new(), removed: true }];
        self.notify(&changes);
        changes
    }

    fn reduce_audio_stream(&mut self, stream_id: String, record: &StatusRecord) -> Vec<StateChange> {
        if Self::is_removed(record) {
            return self.remove_audio_stream(&stream_id);
        }
        let previous = self
            .audio_streams
            .get(&stream_id)
            .cloned()
            .unwrap_or_else(|| AudioStream { stream_id: stream_id.clone(), ..AudioStream::default() });
        let mut next = previous.clone();
        Self::apply_attributes(&mut next, record, |a, k, v| apply_audio_stream_attribute(a, k, v));
        next.raw.extend(record.attributes.clone());

        let mut changed = Vec::new();
        record_if_changed!(changed, previous, next, "kind", kind);
        record_if_changed!(changed, previous, next, "compression", compression);
        record_if_changed!(changed, previous, next, "ip", ip);
        record_if_changed!(changed, previous, next, "port", port);
        record_if_changed!(changed, previous, next, "channel", channel);
        record_if_changed!(changed, previous, next, "gain", gain);
        record_if_changed!(changed, previous, next, "mute", mute);

        self.audio_streams.insert(stream_id.clone(), next);
        let changes = vec![StateChange { entity: EntityKind::AudioStream, key: stream_id, changed_fields: changed, removed: false }];
        self.notify(&changes);
        changes
    }

    fn remove_audio_stream(&mut self, stream_id: &str) -> Vec<StateChange> {
        if self.audio_streams.remove(stream_id).is_none() {
            return Vec::new();
        }
        let changes = vec![StateChange { entity: EntityKind::AudioStream, key: stream_id.to_string(), changed_fields: Vec::new(), removed: true }];
        self.notify(&changes);
        changes
    }

    fn reduce_tx_band_setting(&mut self, band_id: String, record: &StatusRecord) -> Vec<StateChange> {
        if Self::is_removed(record) {
            return self.remove_tx_band_setting(&band_id);
        }
        let previous = self
            .tx_band_settings
            .get(&band_id)
            .cloned()
            .unwrap_or_else(|| TxBandSetting { band_id: band_id.clone(), ..TxBandSetting::default() });
        let mut next = previous.clone();
        Self::apply_attributes(&mut next, record, |t, k, v| apply_tx_band_setting_attribute(t, k, v));
        next.raw.extend(record.attributes.clone());

        let mut changed = Vec::new();
        record_if_changed!(changed, previous, next, "tune_power", tune_power);
        record_if_changed!(changed, previous, next, "rf_power", rf_power);
        record_if_changed!(changed, previous, next, "ptt_inhibit", ptt_inhibit);
        record_if_changed!(changed, previous, next, "interlock_enable", interlock_enable);

        self.tx_band_settings.insert(band_id.clone(), next);
        let changes = vec![StateChange { entity: EntityKind::TxBandSetting, key: band_id, changed_fields: changed, removed: false }];
        self.notify(&changes);
        changes
    }

    fn remove_tx_band_setting(&mut self, band_id: &str) -> Vec<StateChange> {
        if self.tx_band_settings.remove(band_id).is_none() {
            return Vec::new();
        }
        let changes = vec![StateChange { entity: EntityKind::TxBandSetting, key: band_id.to_string(), changed_fields: Vec::new(), removed: true }];
        self.notify(&changes);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::parse_line;

    #[test]
    fn scenario_one_slice_status() {
        let mut store = Store::new();
        let line = parse_line("S3A5E996B|slice 0 in_use=1 sample_rate=24000 RF_frequency=15.000000 mode=USB pan=0x40000000");
        store.apply(&line);
        let slice = store.slice("0").unwrap();
        assert_eq!(slice.frequency_hz, Some(15_000_000));
        assert_eq!(slice.sample_rate_hz, Some(24000));
        assert_eq!(slice.mode.as_deref(), Some("USB"));
        assert_eq!(slice.panadapter_stream_id.as_deref(), Some("0x40000000"));
    }

    #[test]
    fn scenario_two_meter_lifecycle() {
        let mut store = Store::new();
        let body = "S1|meter 1.src=TX-#1.num=5#1.nam=HWALC#1.low=-150.0#1.hi=20.0#1.unit=dBFS#1.fps=20#";
        store.apply(&parse_line(body));
        let meter = store.meter("1").unwrap();
        assert_eq!(meter.source.as_deref(), Some("TX-"));
        assert_eq!(meter.source_index, Some(5));
        assert_eq!(meter.name.as_deref(), Some("HWALC"));
        assert_eq!(meter.low, Some(-150.0));
        assert_eq!(meter.high, Some(20.0));
        assert_eq!(meter.units.as_deref(), Some("dBFS"));
        assert_eq!(meter.fps, Some(20));

        store.apply(&parse_line("S1|meter 1 removed"));
        assert!(store.meter("1").is_none());
    }

    #[test]
    fn scenario_three_waterfall_derivation() {
        let mut store = Store::new();
        store.apply(&parse_line("S1|display waterfall 0x42000000 panadapter=0x40000000 line_duration=100"));
        let wf = store.waterfall("0x42000000").unwrap();
        assert_eq!(wf.line_speed, 100);
        assert_eq!(wf.line_duration_ms(), 40);
        assert_eq!(wf.panadapter_stream_id.as_deref(), Some("0x40000000"));
    }

    #[test]
    fn idempotent_status_application_empty_second_diff() {
        let mut store = Store::new();
        let line = parse_line("S1|slice 0 mode=USB");
        let first = store.apply(&line);
        assert_eq!(first[0].changed_fields, vec!["mode".to_string()]);
        let second = store.apply(&line);
        assert!(second[0].changed_fields.is_empty());
    }

    #[test]
    fn raw_monotonicity_keeps_last_write() {
        let mut store = Store::new();
        store.apply(&parse_line("S1|slice 0 mode=USB"));
        store.apply(&parse_line("S2|slice 0 mode=CW"));
        let slice = store.slice("0").unwrap();
        assert_eq!(slice.raw.get("mode").map(String::as_str), Some("CW"));
    }

    #[test]
    fn removal_is_terminal() {
        let mut store = Store::new();
        store.apply(&parse_line("S1|slice 0 mode=USB"));
        assert!(store.slice("0").is_some());
        store.apply(&parse_line("S2|slice 0 removed"));
        assert!(store.slice("0").is_none());
    }

    #[test]
    fn panadapter_attachment_follows_slice_rebind() {
        let mut store = Store::new();
        store.apply(&parse_line("S1|display pan 0x40000000 band=20"));
        store.apply(&parse_line("S2|slice 0 pan=0x40000000"));
        assert_eq!(store.panadapter("0x40000000").unwrap().attached_slices, vec!["0".to_string()]);

        store.apply(&parse_line("S3|display pan 0x41000000 band=40"));
        store.apply(&parse_line("S4|slice 0 pan=0x41000000"));
        assert!(store.panadapter("0x40000000").unwrap().attached_slices.is_empty());
        assert_eq!(store.panadapter("0x41000000").unwrap().attached_slices, vec!["0".to_string()]);
    }

    #[test]
    fn subscribe_receives_matching_changes() {
        use std::sync::{Arc, Mutex};
        let mut store = Store::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        store.subscribe(EntityKind::Slice, Some("0"), move |change| {
            seen_clone.lock().unwrap().push(change.key.clone());
        });
        store.apply(&parse_line("S1|slice 0 mode=USB"));
        store.apply(&parse_line("S2|slice 1 mode=CW"));
        assert_eq!(*seen.lock().unwrap(), vec!["0".to_string()]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let mut store = Store::new();
        let handle = store.subscribe(EntityKind::Slice, None, |_| {});
        store.unsubscribe(handle);
        store.unsubscribe(handle);
    }
}
