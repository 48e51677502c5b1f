// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! The shape of a store mutation, as fanned out to subscribers.

/// Which entity map a [`StateChange`] concerns.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EntityKind {
    /// The singleton [`crate::store::Radio`].
    Radio,
    /// [`crate::store::Slice`], keyed by slice id.
    Slice,
    /// [`crate::store::Panadapter`], keyed by stream id.
    Panadapter,
    /// [`crate::store::Waterfall`], keyed by stream id.
    Waterfall,
    /// [`crate::store::Meter`], keyed by meter id.
    Meter,
    /// [`crate::store::AudioStream`], keyed by stream id.
    AudioStream,
    /// [`crate::store::TxBandSetting`], keyed by band id.
    TxBandSetting,
}

/// One entity mutation, as produced by [`crate::store::Store::apply`].
#[derive(Clone, Debug)]
pub struct StateChange {
    /// Which entity map changed.
    pub entity: EntityKind,
    /// The entity's key within its map (e.g. slice id, stream id).
    pub key: String,
    /// Names of the typed fields that differ from the previous
    /// snapshot (empty if only `raw` changed, e.g. re-applying an
    /// already-known attribute with the same value — see testable
    /// property 2 in the design spec).
    pub changed_fields: Vec<String>,
    /// Set when this change is the terminal `removed` transition; the
    /// entity has already been deleted from its map by the time
    /// subscribers observe this.
    pub removed: bool,
}
