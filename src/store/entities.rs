// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! Radio-state entity snapshots and their attribute schemas. Each
//! entity is a frozen, cheaply cloneable record; the reducer
//! ([`crate::store::reducer`]) is the only code that constructs a new
//! one.

use crate::store::schema::{
    apply_schema, parse_bool_flag, parse_csv, parse_float, parse_int, parse_int_csv, AttrKind, AttrSpec, Schema,
};
use crate::store::ReducerError;
use std::collections::HashMap;

/// The radio singleton: identity fields plus whatever else it last
/// reported. GPS, oscillator, and filter-sharpness sub-blocks are not
/// broken out into typed fields (see `DESIGN.md`); their key/value
/// pairs remain available via `raw`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Radio {
    pub model: Option<String>,
    pub serial: Option<String>,
    pub callsign: Option<String>,
    pub nickname: Option<String>,
    pub version: Option<String>,
    pub raw: HashMap<String, String>,
}

fn radio_set_model(r: &mut Radio, v: &str) -> Result<(), ReducerError> {
    r.model = Some(v.to_string());
    Ok(())
}
fn radio_set_serial(r: &mut Radio, v: &str) -> Result<(), ReducerError> {
    r.serial = Some(v.to_string());
    Ok(())
}
fn radio_set_callsign(r: &mut Radio, v: &str) -> Result<(), ReducerError> {
    r.callsign = Some(v.to_string());
    Ok(())
}
fn radio_set_nickname(r: &mut Radio, v: &str) -> Result<(), ReducerError> {
    r.nickname = Some(v.to_string());
    Ok(())
}
fn radio_set_version(r: &mut Radio, v: &str) -> Result<(), ReducerError> {
    r.version = Some(v.to_string());
    Ok(())
}

pub(crate) const RADIO_SCHEMA: Schema<Radio> = &[
    ("model", AttrSpec { kind: AttrKind::Str, apply: radio_set_model }),
    ("serial", AttrSpec { kind: AttrKind::Str, apply: radio_set_serial }),
    ("callsign", AttrSpec { kind: AttrKind::Str, apply: radio_set_callsign }),
    ("nickname", AttrSpec { kind: AttrKind::Str, apply: radio_set_nickname }),
    ("version", AttrSpec { kind: AttrKind::Str, apply: radio_set_version }),
];

pub(crate) fn apply_radio_attribute(r: &mut Radio, key: &str, value: &str) -> Result<bool, ReducerError> {
    apply_schema(r, RADIO_SCHEMA, key, value)
}

/// A virtual receiver. Multiple slices may share one panadapter.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slice {
    pub id: String,
    pub frequency_hz: Option<i64>,
    pub frequency_mhz: Option<f64>,
    pub sample_rate_hz: Option<i64>,
    pub mode: Option<String>,
    pub panadapter_stream_id: Option<String>,
    pub dax_channel: Option<i64>,
    pub in_use: Option<bool>,
    /// AGC operating mode (e.g. `"slow"`, `"med"`, `"fast"`, `"off"`).
    pub agc_mode: Option<String>,
    /// AGC threshold, in the radio's native units.
    pub agc_threshold: Option<i64>,
    /// Noise reduction enabled.
    pub nr_enabled: Option<bool>,
    /// Noise reduction level.
    pub nr_level: Option<i64>,
    /// Noise blanker enabled.
    pub nb_enabled: Option<bool>,
    /// Noise blanker level.
    pub nb_level: Option<i64>,
    /// Antennas available to this slice.
    pub ant_list: Vec<String>,
    /// The currently selected receive antenna.
    pub rx_ant: Option<String>,
    /// Diversity combining enabled for this slice.
    pub diversity_enabled: Option<bool>,
    /// Slice id acting as the diversity parent, if this slice is a child.
    pub diversity_parent: Option<String>,
    /// Slice id acting as the diversity child, if this slice is a parent.
    pub diversity_child: Option<String>,
    /// Tune steps available to this slice, in Hz.
    pub step_list: Vec<i64>,
    /// The currently selected tune step, in Hz.
    pub step: Option<i64>,
    pub raw: HashMap<String, String>,
}

fn slice_set_freq(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    let mhz = parse_float(v)?;
    s.frequency_mhz = Some(mhz);
    s.frequency_hz = Some((mhz * 1_000_000.0).round() as i64);
    Ok(())
}
fn slice_set_sample_rate(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.sample_rate_hz = Some(parse_int(v)?);
    Ok(())
}
fn slice_set_mode(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.mode = Some(v.to_string());
    Ok(())
}
fn slice_set_pan(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.panadapter_stream_id = Some(v.to_string());
    Ok(())
}
fn slice_set_dax(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.dax_channel = Some(parse_int(v)?);
    Ok(())
}
fn slice_set_in_use(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.in_use = Some(parse_bool_flag(v)?);
    Ok(())
}
fn slice_set_agc_mode(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.agc_mode = Some(v.to_string());
    Ok(())
}
fn slice_set_agc_threshold(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.agc_threshold = Some(parse_int(v)?);
    Ok(())
}
fn slice_set_nr(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.nr_enabled = Some(parse_bool_flag(v)?);
    Ok(())
}
fn slice_set_nr_level(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.nr_level = Some(parse_int(v)?);
    Ok(())
}
fn slice_set_nb(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.nb_enabled = Some(parse_bool_flag(v)?);
    Ok(())
}
fn slice_set_nb_level(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.nb_level = Some(parse_int(v)?);
    Ok(())
}
fn slice_set_ant_list(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.ant_list = parse_csv(v);
    Ok(())
}
fn slice_set_rx_ant(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.rx_ant = Some(v.to_string());
    Ok(())
}
fn slice_set_diversity(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.diversity_enabled = Some(parse_bool_flag(v)?);
    Ok(())
}
fn slice_set_diversity_parent(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.diversity_parent = Some(v.to_string());
    Ok(())
}
fn slice_set_diversity_child(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.diversity_child = Some(v.to_string());
    Ok(())
}
fn slice_set_step_list(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.step_list = parse_int_csv(v)?;
    Ok(())
}
fn slice_set_step(s: &mut Slice, v: &str) -> Result<(), ReducerError> {
    s.step = Some(parse_int(v)?);
    Ok(())
}

pub(crate) const SLICE_SCHEMA: Schema<Slice> = &[
    ("RF_frequency", AttrSpec { kind: AttrKind::Mhz, apply: slice_set_freq }),
    ("sample_rate", AttrSpec { kind: AttrKind::Int, apply: slice_set_sample_rate }),
    ("mode", AttrSpec { kind: AttrKind::Str, apply: slice_set_mode }),
    ("pan", AttrSpec { kind: AttrKind::HexInt, apply: slice_set_pan }),
    ("dax", AttrSpec { kind: AttrKind::Int, apply: slice_set_dax }),
    ("in_use", AttrSpec { kind: AttrKind::BoolFlag, apply: slice_set_in_use }),
    ("agc_mode", AttrSpec { kind: AttrKind::Str, apply: slice_set_agc_mode }),
    ("agc_threshold", AttrSpec { kind: AttrKind::Int, apply: slice_set_agc_threshold }),
    ("nr", AttrSpec { kind: AttrKind::BoolFlag, apply: slice_set_nr }),
    ("nr_level", AttrSpec { kind: AttrKind::Int, apply: slice_set_nr_level }),
    ("nb", AttrSpec { kind: AttrKind::BoolFlag, apply: slice_set_nb }),
    ("nb_level", AttrSpec { kind: AttrKind::Int, apply: slice_set_nb_level }),
    ("ant_list", AttrSpec { kind: AttrKind::Csv, apply: slice_set_ant_list }),
    ("rxant", AttrSpec { kind: AttrKind::Str, apply: slice_set_rx_ant }),
    ("diversity", AttrSpec { kind: AttrKind::BoolFlag, apply: slice_set_diversity }),
    ("diversity_parent", AttrSpec { kind: AttrKind::Str, apply: slice_set_diversity_parent }),
    ("diversity_child", AttrSpec { kind: AttrKind::Str, apply: slice_set_diversity_child }),
    ("step_list", AttrSpec { kind: AttrKind::Csv, apply: slice_set_step_list }),
    ("step", AttrSpec { kind: AttrKind::Int, apply: slice_set_step }),
];

pub(crate) fn apply_slice_attribute(s: &mut Slice, key: &str, value: &str) -> Result<bool, ReducerError> {
    apply_schema(s, SLICE_SCHEMA, key, value)
}

/// A spectrum-display stream. `attached_slices` is derived by the
/// reducer, never set from a wire attribute (see §9 of the design
/// spec).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Panadapter {
    pub stream_id: String,
    pub center_freq_hz: Option<i64>,
    pub bandwidth_hz: Option<i64>,
    pub x_pixels: Option<i64>,
    pub y_pixels: Option<i64>,
    pub band: Option<String>,
    pub rf_gain: Option<i64>,
    pub preamp: Option<String>,
    pub rx_antenna: Vec<String>,
    pub attached_slices: Vec<String>,
    pub raw: HashMap<String, String>,
}

fn pan_set_center(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.center_freq_hz = Some((parse_float(v)? * 1_000_000.0).round() as i64);
    Ok(())
}
fn pan_set_bandwidth(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.bandwidth_hz = Some((parse_float(v)? * 1_000_000.0).round() as i64);
    Ok(())
}
fn pan_set_x_pixels(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.x_pixels = Some(parse_int(v)?);
    Ok(())
}
fn pan_set_y_pixels(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.y_pixels = Some(parse_int(v)?);
    Ok(())
}
fn pan_set_band(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.band = Some(v.to_string());
    Ok(())
}
fn pan_set_rf_gain(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.rf_gain = Some(parse_int(v)?);
    Ok(())
}
fn pan_set_preamp(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.preamp = Some(v.to_string());
    Ok(())
}
fn pan_set_rxant(p: &mut Panadapter, v: &str) -> Result<(), ReducerError> {
    p.rx_antenna = parse_csv(v);
    Ok(())
}

pub(crate) const PANADAPTER_SCHEMA: Schema<Panadapter> = &[
    ("center_freq", AttrSpec { kind: AttrKind::Mhz, apply: pan_set_center }),
    ("bandwidth", AttrSpec { kind: AttrKind::Mhz, apply: pan_set_bandwidth }),
    ("x_pixels", AttrSpec { kind: AttrKind::Int, apply: pan_set_x_pixels }),
    ("y_pixels", AttrSpec { kind: AttrKind::Int, apply: pan_set_y_pixels }),
    ("band", AttrSpec { kind: AttrKind::Str, apply: pan_set_band }),
    ("rfgain", AttrSpec { kind: AttrKind::Int, apply: pan_set_rf_gain }),
    ("pre", AttrSpec { kind: AttrKind::Str, apply: pan_set_preamp }),
    ("rxant", AttrSpec { kind: AttrKind::Csv, apply: pan_set_rxant }),
];

pub(crate) fn apply_panadapter_attribute(p: &mut Panadapter, key: &str, value: &str) -> Result<bool, ReducerError> {
    apply_schema(p, PANADAPTER_SCHEMA, key, value)
}

/// A time-indexed raster stream derived from the same RF source as an
/// associated panadapter.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waterfall {
    pub stream_id: String,
    pub panadapter_stream_id: Option<String>,
    pub line_speed: u8,
    pub color_gain: Option<i64>,
    pub black_level: Option<i64>,
    pub auto_black: Option<bool>,
    pub gradient_index: Option<i64>,
    pub raw: HashMap<String, String>,
}

impl Waterfall {
    /// Derived line duration in milliseconds, per §4.3 of the design
    /// spec: `40 + floor((100 - speed)^3 / 200)`.
    pub fn line_duration_ms(&self) -> u32 {
        let speed = self.line_speed as i64;
        40 + ((100 - speed).pow(3) / 200) as u32
    }
}

fn waterfall_set_panadapter(w: &mut Waterfall, v: &str) -> Result<(), ReducerError> {
    w.panadapter_stream_id = Some(v.to_string());
    Ok(())
}
fn waterfall_set_line_speed(w: &mut Waterfall, v: &str) -> Result<(), ReducerError> {
    let speed = parse_int(v)?;
    w.line_speed = speed.clamp(0, 100) as u8;
    Ok(())
}
fn waterfall_set_color_gain(w: &mut Waterfall, v: &str) -> Result<(), ReducerError> {
    w.color_gain = Some(parse_int(v)?);
    Ok(())
}
fn waterfall_set_black_level(w: &mut Waterfall, v: &str) -> Result<(), ReducerError> {
    w.black_level = Some(parse_int(v)?);
    Ok(())
}
fn waterfall_set_auto_black(w: &mut Waterfall, v: &str) -> Result<(), ReducerError> {
    w.auto_black = Some(parse_bool_flag(v)?);
    Ok(())
}
fn waterfall_set_gradient(w: &mut Waterfall, v: &str) -> Result<(), ReducerError> {
    w.gradient_index = Some(parse_int(v)?);
    Ok(())
}

pub(crate) const WATERFALL_SCHEMA: Schema<Waterfall> = &[
    ("panadapter", AttrSpec { kind: AttrKind::HexInt, apply: waterfall_set_panadapter }),
    ("line_duration", AttrSpec { kind: AttrKind::Int, apply: waterfall_set_line_speed }),
    ("color_gain", AttrSpec { kind: AttrKind::Int, apply: waterfall_set_color_gain }),
    ("black_level", AttrSpec { kind: AttrKind::Int, apply: waterfall_set_black_level }),
    ("auto_black", AttrSpec { kind: AttrKind::BoolFlag, apply: waterfall_set_auto_black }),
    ("gradient_index", AttrSpec { kind: AttrKind::Int, apply: waterfall_set_gradient }),
];

pub(crate) fn apply_waterfall_attribute(w: &mut Waterfall, key: &str, value: &str) -> Result<bool, ReducerError> {
    apply_schema(w, WATERFALL_SCHEMA, key, value)
}

/// A single meter: a named, unit-tagged telemetry value (e.g. forward
/// power, SWR, PA temperature).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    pub id: String,
    pub source: Option<String>,
    pub source_index: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub units: Option<String>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub fps: Option<i64>,
    pub raw: HashMap<String, String>,
}

/// Default Volts/Amps scaling denominator, used by [`Meter::scale`].
/// Callers with a radio that reports a different native resolution for
/// these units can call [`Meter::scale_with_volts_amps_denom`] instead.
pub const DEFAULT_VOLTS_AMPS_DENOM: f64 = 256.0;

impl Meter {
    /// Scales a raw VITA meter sample value into engineering units
    /// according to this meter's units, per §4.3 of the design spec,
    /// using [`DEFAULT_VOLTS_AMPS_DENOM`] for Volts/Amps. Units this
    /// meter has not yet reported (`self.units == None`) scale as
    /// identity.
    pub fn scale(&self, raw: i16) -> f64 {
        self.scale_with_volts_amps_denom(raw, DEFAULT_VOLTS_AMPS_DENOM)
    }

    /// As [`Meter::scale`], but with the Volts/Amps denominator
    /// supplied by the caller rather than defaulted.
    pub fn scale_with_volts_amps_denom(&self, raw: i16, volts_amps_denom: f64) -> f64 {
        match self.units.as_deref() {
            Some("dB") | Some("dBm") | Some("dBFS") | Some("SWR") => raw as f64 / 128.0,
            Some("Volts") | Some("Amps") => raw as f64 / volts_amps_denom,
            Some("degF") | Some("degC") => raw as f64 / 64.0,
            _ => raw as f64,
        }
    }
}

fn meter_set_source(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.source = Some(v.to_string());
    Ok(())
}
fn meter_set_source_index(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.source_index = Some(parse_int(v)?);
    Ok(())
}
fn meter_set_name(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.name = Some(v.to_string());
    Ok(())
}
fn meter_set_description(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.description = Some(v.to_string());
    Ok(())
}
fn meter_set_units(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.units = Some(v.to_string());
    Ok(())
}
fn meter_set_low(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.low = Some(parse_float(v)?);
    Ok(())
}
fn meter_set_high(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.high = Some(parse_float(v)?);
    Ok(())
}
fn meter_set_fps(m: &mut Meter, v: &str) -> Result<(), ReducerError> {
    m.fps = Some(parse_int(v)?);
    Ok(())
}

pub(crate) const METER_SCHEMA: Schema<Meter> = &[
    ("src", AttrSpec { kind: AttrKind::Str, apply: meter_set_source }),
    ("num", AttrSpec { kind: AttrKind::Int, apply: meter_set_source_index }),
    ("nam", AttrSpec { kind: AttrKind::Str, apply: meter_set_name }),
    ("desc", AttrSpec { kind: AttrKind::Str, apply: meter_set_description }),
    ("unit", AttrSpec { kind: AttrKind::Str, apply: meter_set_units }),
    ("low", AttrSpec { kind: AttrKind::Float, apply: meter_set_low }),
    ("hi", AttrSpec { kind: AttrKind::Float, apply: meter_set_high }),
    ("fps", AttrSpec { kind: AttrKind::Int, apply: meter_set_fps }),
];

pub(crate) fn apply_meter_attribute(m: &mut Meter, key: &str, value: &str) -> Result<bool, ReducerError> {
    apply_schema(m, METER_SCHEMA, key, value)
}

/// A DAX or remote-audio stream.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioStream {
    pub stream_id: String,
    pub kind: Option<String>,
    pub compression: Option<String>,
    pub ip: Option<String>,
    pub port: Option<i64>,
    pub channel: Option<i64>,
    pub gain: Option<i64>,
    pub mute: Option<bool>,
    pub raw: HashMap<String, String>,
}

fn audio_set_kind(a: &mut AudioStream, v: &str) -> Result<(), ReducerError> {
    a.kind = Some(v.to_string());
    Ok(())
}
fn audio_set_compression(a: &mut AudioStream, v: &str) -> Result<(), ReducerError> {
    a.compression = Some(v.to_string());
    Ok(())
}
fn audio_set_ip(a: &mut AudioStream, v: &str) -> Result<(), ReducerError> {
    a.ip = Some(v.to_string());
    Ok(())
}
fn audio_set_port(a: &mut AudioStream, v: &str) -> Result<(), ReducerError> {
    a.port = Some(parse_int(v)?);
    Ok(())
}
fn audio_set_channel(a: &mut AudioStream, v: &str) -> Result<(), ReducerError> {
    a.channel = Some(parse_int(v)?);
    Ok(())
}
fn audio_set_gain(a: &mut AudioStream, v: &str) -> Result<(), ReducerError> {
    a.gain = Some(parse_int(v)?);
    Ok(())
}
fn audio_set_mute(a: &mut AudioStream, v: &str) -> Result<(), ReducerError> {
    a.mute = Some(parse_bool_flag(v)?);
    Ok(())
}

pub(crate) const AUDIO_STREAM_SCHEMA: Schema<AudioStream> = &[
    ("type", AttrSpec { kind: AttrKind::Str, apply: audio_set_kind }),
    ("compression", AttrSpec { kind: AttrKind::Str, apply: audio_set_compression }),
    ("ip", AttrSpec { kind: AttrKind::Str, apply: audio_set_ip }),
    ("port", AttrSpec { kind: AttrKind::Int, apply: audio_set_port }),
    ("channel", AttrSpec { kind: AttrKind::Int, apply: audio_set_channel }),
    ("gain", AttrSpec { kind: AttrKind::Int, apply: audio_set_gain }),
    ("mute", AttrSpec { kind: AttrKind::BoolFlag, apply: audio_set_mute }),
];

pub(crate) fn apply_audio_stream_attribute(a: &mut AudioStream, key: &str, value: &str) -> Result<bool, ReducerError> {
    apply_schema(a, AUDIO_STREAM_SCHEMA, key, value)
}

/// Per-band transmit settings (tune/RF power limits, interlocks).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxBandSetting {
    pub band_id: String,
    pub tune_power: Option<i64>,
    pub rf_power: Option<i64>,
    pub ptt_inhibit: Option<bool>,
    pub interlock_enable: Option<bool>,
    pub raw: HashMap<String, String>,
}

fn txband_set_tune_power(t: &mut TxBandSetting, v: &str) -> Result<(), ReducerError> {
    t.tune_power = Some(parse_int(v)?);
    Ok(())
}
fn txband_set_rf_power(t: &mut TxBandSetting, v: &str) -> Result<(), ReducerError> {
    t.rf_power = Some(parse_int(v)?);
    Ok(())
}
fn txband_set_ptt_inhibit(t: &mut TxBandSetting, v: &str) -> Result<(), ReducerError> {
    t.ptt_inhibit = Some(parse_bool_flag(v)?);
    Ok(())
}
fn txband_set_interlock_enable(t: &mut TxBandSetting, v: &str) -> Result<(), ReducerError> {
    t.interlock_enable = Some(parse_bool_flag(v)?);
    Ok(())
}

pub(crate) const TX_BAND_SETTING_SCHEMA: Schema<TxBandSetting> = &[
    ("tune_power", AttrSpec { kind: AttrKind::Int, apply: txband_set_tune_power }),
    ("rfpower", AttrSpec { kind: AttrKind::Int, apply: txband_set_rf_power }),
    ("pttinhibit", AttrSpec { kind: AttrKind::BoolFlag, apply: txband_set_ptt_inhibit }),
    ("acc_txreq_enable", AttrSpec { kind: AttrKind::BoolFlag, apply: txband_set_interlock_enable }),
];

pub(crate) fn apply_tx_band_setting_attribute(
    t: &mut TxBandSetting,
    key: &str,
    value: &str,
) -> Result<bool, ReducerError> {
    apply_schema(t, TX_BAND_SETTING_SCHEMA, key, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_schema_parses_scenario_one() {
        let mut slice = Slice::default();
        for (k, v) in [
            ("in_use", "1"),
            ("sample_rate", "24000"),
            ("RF_frequency", "15.000000"),
            ("mode", "USB"),
            ("pan", "0x40000000"),
        ] {
            assert!(apply_slice_attribute(&mut slice, k, v).unwrap());
        }
        assert_eq!(slice.frequency_hz, Some(15_000_000));
        assert_eq!(slice.sample_rate_hz, Some(24000));
        assert_eq!(slice.mode.as_deref(), Some("USB"));
        assert_eq!(slice.panadapter_stream_id.as_deref(), Some("0x40000000"));
        assert_eq!(slice.in_use, Some(true));
    }

    #[test]
    fn slice_schema_parses_agc_nr_nb_antenna_diversity_and_step() {
        let mut slice = Slice::default();
        for (k, v) in [
            ("agc_mode", "med"),
            ("agc_threshold", "65"),
            ("nr", "1"),
            ("nr_level", "30"),
            ("nb", "on"),
            ("nb_level", "40"),
            ("ant_list", "ANT1,ANT2,XVTRA"),
            ("rxant", "ANT2"),
            ("diversity", "1"),
            ("diversity_parent", "0"),
            ("diversity_child", "1"),
            ("step_list", "10,25,50,100"),
            ("step", "25"),
        ] {
            assert!(apply_slice_attribute(&mut slice, k, v).unwrap());
        }
        assert_eq!(slice.agc_mode.as_deref(), Some("med"));
        assert_eq!(slice.agc_threshold, Some(65));
        assert_eq!(slice.nr_enabled, Some(true));
        assert_eq!(slice.nr_level, Some(30));
        assert_eq!(slice.nb_enabled, Some(true));
        assert_eq!(slice.nb_level, Some(40));
        assert_eq!(slice.ant_list, vec!["ANT1", "ANT2", "XVTRA"]);
        assert_eq!(slice.rx_ant.as_deref(), Some("ANT2"));
        assert_eq!(slice.diversity_enabled, Some(true));
        assert_eq!(slice.diversity_parent.as_deref(), Some("0"));
        assert_eq!(slice.diversity_child.as_deref(), Some("1"));
        assert_eq!(slice.step_list, vec![10, 25, 50, 100]);
        assert_eq!(slice.step, Some(25));
    }

    #[test]
    fn meter_schema_parses_scenario_two() {
        let mut meter = Meter::default();
        for (k, v) in [
            ("src", "TX-"),
            ("num", "5"),
            ("nam", "HWALC"),
            ("low", "-150.0"),
            ("hi", "20.0"),
            ("unit", "dBFS"),
            ("fps", "20"),
        ] {
            assert!(apply_meter_attribute(&mut meter, k, v).unwrap());
        }
        assert_eq!(meter.source.as_deref(), Some("TX-"));
        assert_eq!(meter.source_index, Some(5));
        assert_eq!(meter.name.as_deref(), Some("HWALC"));
        assert_eq!(meter.low, Some(-150.0));
        assert_eq!(meter.high, Some(20.0));
        assert_eq!(meter.units.as_deref(), Some("dBFS"));
        assert_eq!(meter.fps, Some(20));
    }

    #[test]
    fn waterfall_line_duration_scenario_three() {
        let mut wf = Waterfall::default();
        apply_waterfall_attribute(&mut wf, "panadapter", "0x40000000").unwrap();
        apply_waterfall_attribute(&mut wf, "line_duration", "100").unwrap();
        assert_eq!(wf.line_speed, 100);
        assert_eq!(wf.line_duration_ms(), 40);
    }

    #[test]
    fn unknown_key_reported_unmatched() {
        let mut slice = Slice::default();
        assert_eq!(apply_slice_attribute(&mut slice, "nonexistent_key", "x").unwrap(), false);
    }
}
