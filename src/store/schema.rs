// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data-driven attribute dispatch for entity reducers.

Each entity type defines a static table mapping a wire attribute key to
an [`AttrSpec`]: a setter function plus enough type information for the
table itself to double as documentation. `apply_schema` walks the table
once per `(key, value)` pair; an unmatched key is reported to the
caller so it can log at `debug` and keep applying the remaining
attributes (see §9 of the design spec — this replaces a per-entity
`match key { ... }` block with one generic walk).
*/

use crate::store::ReducerError;

/// The wire representation an attribute value is parsed from. Purely
/// informational at present (the setter functions do the actual
/// parsing); kept on [`AttrSpec`] so the schema table reads as
/// documentation of the wire grammar, not just a list of setters.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[allow(dead_code)]
pub(crate) enum AttrKind {
    Int,
    HexInt,
    Float,
    Mhz,
    Csv,
    BoolFlag,
    Str,
}

/// One entry in an entity's attribute schema.
pub(crate) struct AttrSpec<T> {
    pub kind: AttrKind,
    pub apply: fn(&mut T, &str) -> Result<(), ReducerError>,
}

/// An entity's full attribute schema: wire key -> spec.
pub(crate) type Schema<T> = &'static [(&'static str, AttrSpec<T>)];

/// Applies one `(key, value)` pair against `schema`. Returns `Ok(true)`
/// if the key was recognized, `Ok(false)` if it was not (the caller
/// logs and moves on), or `Err` if the key was recognized but the value
/// failed to parse (the caller logs and skips just that field).
pub(crate) fn apply_schema<T>(
    target: &mut T,
    schema: Schema<T>,
    key: &str,
    value: &str,
) -> Result<bool, ReducerError> {
    for (name, spec) in schema {
        if *name == key {
            (spec.apply)(target, value)?;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Parses `1|true|on|yes` -> `true`, `0|false|off|no` -> `false`;
/// anything else fails rather than silently defaulting.
pub(crate) fn parse_bool_flag(v: &str) -> Result<bool, ReducerError> {
    match v {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(ReducerError::ParseAttribute { value: other.to_string() }),
    }
}

pub(crate) fn parse_int(v: &str) -> Result<i64, ReducerError> {
    v.parse().map_err(|_| ReducerError::ParseAttribute { value: v.to_string() })
}

pub(crate) fn parse_float(v: &str) -> Result<f64, ReducerError> {
    v.parse().map_err(|_| ReducerError::ParseAttribute { value: v.to_string() })
}

/// Splits a `,`-joined wire value into trimmed, non-empty entries, e.g.
/// an antenna list or a tune-step list (see `AttrKind::Csv`).
pub(crate) fn parse_csv(v: &str) -> Vec<String> {
    v.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// As [`parse_csv`], but each entry is further parsed as an integer
/// (e.g. a tune step list in Hz).
pub(crate) fn parse_int_csv(v: &str) -> Result<Vec<i64>, ReducerError> {
    parse_csv(v)
        .iter()
        .map(|entry| entry.parse().map_err(|_| ReducerError::ParseAttribute { value: v.to_string() }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_flag_accepts_aliases() {
        assert_eq!(parse_bool_flag("1").unwrap(), true);
        assert_eq!(parse_bool_flag("yes").unwrap(), true);
        assert_eq!(parse_bool_flag("off").unwrap(), false);
        assert!(parse_bool_flag("maybe").is_err());
    }

    #[test]
    fn csv_drops_empty_entries() {
        assert_eq!(parse_csv("ANT1,,ANT2,"), vec!["ANT1", "ANT2"]);
    }

    #[test]
    fn int_csv_parses_each_entry() {
        assert_eq!(parse_int_csv("10,25,50").unwrap(), vec![10, 25, 50]);
        assert!(parse_int_csv("10,x,50").is_err());
    }
}
