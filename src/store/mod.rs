// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
The in-memory radio-state store: entity snapshots, their attribute
schemas, and the reducer that turns parsed [`crate::control`] status
records into diffs. See [`Store`] for the main entrypoint.
*/

mod diff;
mod entities;
mod reducer;
mod schema;

pub use diff::{EntityKind, StateChange};
pub use entities::{AudioStream, Meter, Panadapter, Radio, Slice, TxBandSetting, Waterfall, DEFAULT_VOLTS_AMPS_DENOM};
pub use reducer::{Store, SubscriptionHandle};

use thiserror::Error;

/// Field-level reducer failures. Never surfaced as a `Result` from
/// [`Store::apply`] — per §4.3 and §7 of the design spec, a bad field
/// is logged and the rest of the record is still applied.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ReducerError {
    /// The value for a recognized attribute key could not be parsed
    /// into its expected type.
    #[error("could not parse attribute value {value:?}")]
    ParseAttribute {
        /// The raw value string that failed to parse.
        value: String,
    },
}
