// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Per-entity controller facades: thin `(session, id)` pairs that read
through [`crate::store::Store`] on every property access and format
ASCII commands for mutation. See §4.6 of the design spec.

A controller never caches a snapshot — it borrows the session and
re-reads on every call, so two controllers for the same entity always
agree, and a controller whose entity has gone `removed` starts raising
[`SessionError::StateUnavailable`] on its very next read. On a
successful command reply, a controller optimistically applies the same
key/value pairs to the store directly (by replaying them through the
reducer as a synthetic status record) so observers see the change
before the radio gets around to re-broadcasting it (§4.6).
*/

use crate::control::StatusRecord;
use crate::demux::{meter_id_filter, stream_id_filter, Scope, VitaKind};
use crate::session::{Session, SessionError};
use crate::store::{AudioStream, Meter, Panadapter, Radio, Slice, TxBandSetting, Waterfall};
use crate::vita::VitaPacket;
use std::collections::HashMap;

fn optimistic_status(source: &str, positional: Vec<String>, attributes: HashMap<String, String>) -> StatusRecord {
    StatusRecord { raw: format!("(optimistic {source})"), sequence: None, source: source.to_string(), identifier: positional.first().cloned(), positional, attributes }
}

fn apply_optimistic(session: &Session, record: StatusRecord) {
    session.store().lock().unwrap().apply(&crate::control::ControlLine::Status(record));
}

fn one_attr(key: &str, value: impl ToString) -> HashMap<String, String> {
    HashMap::from([(key.to_string(), value.to_string())])
}

/// Parses a wire-form stream id (`0x…`) into its numeric form, the way
/// the demux and the VITA parser key on it (§3.2: "the numeric form …
/// is derived by hex parse").
fn parse_stream_id(wire_form: &str) -> Option<u32> {
    u32::from_str_radix(wire_form.trim_start_matches("0x").trim_start_matches("0X"), 16).ok()
}

/// A live attachment to the data-channel demux, returned by a
/// controller's `on_data`. Dropping it detaches the underlying
/// [`Scope`] (§4.5: "a scope with zero listeners detaches its parent
/// subscription"), so callers do not need to call anything explicitly
/// to stop receiving frames — just drop the handle.
pub struct DataSubscription {
    session: Session,
    scope: Scope,
}

impl Drop for DataSubscription {
    fn drop(&mut self) {
        self.session.demux().detach(self.scope);
    }
}

/// Facade over the singleton [`Radio`] entity.
pub struct RadioController {
    session: Session,
}

impl RadioController {
    /// Builds a controller over `session`'s radio singleton.
    pub fn new(session: Session) -> RadioController {
        RadioController { session }
    }

    /// The current radio snapshot. The radio singleton always exists
    /// once a session is created (it has no `removed` transition), so
    /// this never raises `StateUnavailable`.
    pub fn snapshot(&self) -> Radio {
        self.session.store().lock().unwrap().radio()
    }

    /// Sets the operator-configured nickname.
    pub async fn set_nickname(&self, nickname: &str) -> Result<(), SessionError> {
        self.session.command(&format!("radio name {nickname}")).await?;
        apply_optimistic(&self.session, optimistic_status("radio", Vec::new(), one_attr("nickname", nickname)));
        Ok(())
    }
}

/// Facade over one [`Slice`] (virtual receiver).
pub struct SliceController {
    session: Session,
    id: String,
}

impl SliceController {
    /// Builds a controller over the slice keyed `id`.
    pub fn new(session: Session, id: impl Into<String>) -> SliceController {
        SliceController { session, id: id.into() }
    }

    fn read(&self) -> Result<Slice, SessionError> {
        self.session
            .store()
            .lock()
            .unwrap()
            .slice(&self.id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "slice", key: self.id.clone() })
    }

    /// The current slice snapshot.
    pub fn snapshot(&self) -> Result<Slice, SessionError> {
        self.read()
    }

    /// Tunes this slice to `freq_mhz` (megahertz).
    pub async fn set_frequency_mhz(&self, freq_mhz: f64) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("slice tune {} {freq_mhz:.6}", self.id)).await?;
        apply_optimistic(
            &self.session,
            optimistic_status("slice", vec![self.id.clone()], one_attr("RF_frequency", format!("{freq_mhz:.6}"))),
        );
        Ok(())
    }

    /// Sets this slice's demodulator mode (e.g. `"USB"`, `"CW"`).
    pub async fn set_mode(&self, mode: &str) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("slice set {} mode={mode}", self.id)).await?;
        apply_optimistic(&self.session, optimistic_status("slice", vec![self.id.clone()], one_attr("mode", mode)));
        Ok(())
    }

    /// Assigns this slice's DAX audio channel (0 disables DAX).
    pub async fn set_dax_channel(&self, channel: i64) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("slice set {} dax={channel}", self.id)).await?;
        apply_optimistic(&self.session, optimistic_status("slice", vec![self.id.clone()], one_attr("dax", channel)));
        Ok(())
    }

    /// Removes this slice from the radio.
    pub async fn remove(&self) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("slice remove {}", self.id)).await?;
        apply_optimistic(&self.session, optimistic_status("slice", vec![self.id.clone()], one_attr("removed", 1)));
        Ok(())
    }
}

/// Facade over one [`Panadapter`] spectrum-display stream.
pub struct PanadapterController {
    session: Session,
    stream_id: String,
}

impl PanadapterController {
    /// Builds a controller over the panadapter keyed `stream_id`
    /// (wire form, `0x…`).
    pub fn new(session: Session, stream_id: impl Into<String>) -> PanadapterController {
        PanadapterController { session, stream_id: stream_id.into() }
    }

    fn read(&self) -> Result<Panadapter, SessionError> {
        self.session
            .store()
            .lock()
            .unwrap()
            .panadapter(&self.stream_id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "panadapter", key: self.stream_id.clone() })
    }

    /// The current panadapter snapshot, including its derived
    /// `attached_slices`.
    pub fn snapshot(&self) -> Result<Panadapter, SessionError> {
        self.read()
    }

    /// Sets the RF preamp gain, clamped to `[-10, 35]` dB (the
    /// documented range for this attribute).
    pub async fn set_rf_gain(&self, gain_db: i64) -> Result<(), SessionError> {
        self.read()?;
        let clamped = gain_db.clamp(-10, 35);
        self.session.command(&format!("display panafall set {} rfgain={clamped}", self.stream_id)).await?;
        apply_optimistic(
            &self.session,
            optimistic_status("display", vec!["pan".to_string(), self.stream_id.clone()], one_attr("rfgain", clamped)),
        );
        Ok(())
    }

    /// Sets the displayed center frequency, in MHz.
    pub async fn set_center_freq_mhz(&self, freq_mhz: f64) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("display panafall set {} center_freq={freq_mhz:.6}", self.stream_id)).await?;
        apply_optimistic(
            &self.session,
            optimistic_status("display", vec!["pan".to_string(), self.stream_id.clone()], one_attr("center_freq", format!("{freq_mhz:.6}"))),
        );
        Ok(())
    }

    /// Subscribes to decoded panadapter (FFT bin) frames for this
    /// stream. Attaches a demux scope lazily on the first call and
    /// keeps it alive for as long as the returned [`DataSubscription`]
    /// lives (§4.5).
    pub fn on_data(&self, listener: impl Fn(&VitaPacket) + Send + Sync + 'static) -> Result<DataSubscription, SessionError> {
        let stream_id = parse_stream_id(&self.stream_id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "panadapter", key: self.stream_id.clone() })?;
        let scope = self.session.demux().attach(VitaKind::Panadapter, stream_id_filter(stream_id), listener);
        Ok(DataSubscription { session: self.session.clone(), scope })
    }
}

/// Facade over one [`Waterfall`] raster stream.
pub struct WaterfallController {
    session: Session,
    stream_id: String,
}

impl WaterfallController {
    /// Builds a controller over the waterfall keyed `stream_id`.
    pub fn new(session: Session, stream_id: impl Into<String>) -> WaterfallController {
        WaterfallController { session, stream_id: stream_id.into() }
    }

    fn read(&self) -> Result<Waterfall, SessionError> {
        self.session
            .store()
            .lock()
            .unwrap()
            .waterfall(&self.stream_id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "waterfall", key: self.stream_id.clone() })
    }

    /// The current waterfall snapshot.
    pub fn snapshot(&self) -> Result<Waterfall, SessionError> {
        self.read()
    }

    /// Sets the line speed, clamped to `[0, 100]` (the wire attribute
    /// is confusingly named `line_duration`, but its value is the
    /// speed the radio derives a duration from — see §4.3 of the
    /// design spec and [`Waterfall::line_duration_ms`]).
    pub async fn set_line_speed(&self, speed: i64) -> Result<(), SessionError> {
        self.read()?;
        let clamped = speed.clamp(0, 100);
        self.session.command(&format!("display panafall set {} line_duration={clamped}", self.stream_id)).await?;
        apply_optimistic(
            &self.session,
            optimistic_status("display", vec!["waterfall".to_string(), self.stream_id.clone()], one_attr("line_duration", clamped)),
        );
        Ok(())
    }

    /// Sets the display black level.
    pub async fn set_black_level(&self, level: i64) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("display panafall set {} black_level={level}", self.stream_id)).await?;
        apply_optimistic(
            &self.session,
            optimistic_status("display", vec!["waterfall".to_string(), self.stream_id.clone()], one_attr("black_level", level)),
        );
        Ok(())
    }

    /// Subscribes to decoded waterfall raster lines for this stream.
    /// See [`PanadapterController::on_data`]; callers pacing delivery
    /// for display should feed the frames through a [`crate::jitter::JitterBuffer`].
    pub fn on_data(&self, listener: impl Fn(&VitaPacket) + Send + Sync + 'static) -> Result<DataSubscription, SessionError> {
        let stream_id = parse_stream_id(&self.stream_id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "waterfall", key: self.stream_id.clone() })?;
        let scope = self.session.demux().attach(VitaKind::Waterfall, stream_id_filter(stream_id), listener);
        Ok(DataSubscription { session: self.session.clone(), scope })
    }
}

/// Facade over one [`Meter`]. Read-only: meters are radio-reported
/// telemetry, there is no wire command to mutate one.
pub struct MeterController {
    session: Session,
    id: String,
}

impl MeterController {
    /// Builds a controller over the meter keyed `id`.
    pub fn new(session: Session, id: impl Into<String>) -> MeterController {
        MeterController { session, id: id.into() }
    }

    fn read(&self) -> Result<Meter, SessionError> {
        self.session
            .store()
            .lock()
            .unwrap()
            .meter(&self.id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "meter", key: self.id.clone() })
    }

    /// The current meter snapshot.
    pub fn snapshot(&self) -> Result<Meter, SessionError> {
        self.read()
    }

    /// Scales a raw VITA meter sample for this meter into engineering
    /// units, per [`Meter::scale`].
    pub fn scale(&self, raw: i16) -> Result<f64, SessionError> {
        Ok(self.read()?.scale(raw))
    }

    /// As [`MeterController::scale`], but with the Volts/Amps
    /// denominator supplied by the caller, per
    /// [`Meter::scale_with_volts_amps_denom`].
    pub fn scale_with_volts_amps_denom(&self, raw: i16, volts_amps_denom: f64) -> Result<f64, SessionError> {
        Ok(self.read()?.scale_with_volts_amps_denom(raw, volts_amps_denom))
    }

    /// Subscribes to raw VITA meter samples carrying this meter's id.
    /// Meter packets are not scoped by stream id like the others — all
    /// meters share one VITA stream and are distinguished by the
    /// sample's own id field, hence [`meter_id_filter`] rather than
    /// [`stream_id_filter`] (§4.5).
    pub fn on_data(&self, listener: impl Fn(&VitaPacket) + Send + Sync + 'static) -> Result<DataSubscription, SessionError> {
        let meter_id: u16 = self
            .id
            .parse()
            .map_err(|_| SessionError::StateUnavailable { entity: "meter", key: self.id.clone() })?;
        let scope = self.session.demux().attach(VitaKind::Meter, meter_id_filter(meter_id), listener);
        Ok(DataSubscription { session: self.session.clone(), scope })
    }
}

/// Facade over one [`AudioStream`] (DAX or remote audio).
pub struct AudioStreamController {
    session: Session,
    stream_id: String,
}

impl AudioStreamController {
    /// Builds a controller over the audio stream keyed `stream_id`.
    pub fn new(session: Session, stream_id: impl Into<String>) -> AudioStreamController {
        AudioStreamController { session, stream_id: stream_id.into() }
    }

    fn read(&self) -> Result<AudioStream, SessionError> {
        self.session
            .store()
            .lock()
            .unwrap()
            .audio_stream(&self.stream_id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "audio_stream", key: self.stream_id.clone() })
    }

    /// The current audio stream snapshot.
    pub fn snapshot(&self) -> Result<AudioStream, SessionError> {
        self.read()
    }

    /// Sets the channel gain, clamped to `[0, 100]`.
    pub async fn set_gain(&self, gain: i64) -> Result<(), SessionError> {
        self.read()?;
        let clamped = gain.clamp(0, 100);
        self.session.command(&format!("audio stream {} slice set gain={clamped}", self.stream_id)).await?;
        apply_optimistic(&self.session, optimistic_status("audio_stream", vec![self.stream_id.clone()], one_attr("gain", clamped)));
        Ok(())
    }

    /// Mutes or unmutes this stream.
    pub async fn set_mute(&self, mute: bool) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("audio stream {} slice set mute={}", self.stream_id, mute as u8)).await?;
        apply_optimistic(&self.session, optimistic_status("audio_stream", vec![self.stream_id.clone()], one_attr("mute", mute as u8)));
        Ok(())
    }

    /// Subscribes to decoded audio frames for this stream. The VITA
    /// kind dispatched on depends on this stream's reported `kind`:
    /// uncompressed DAX channels decode as [`VitaKind::DaxAudio`],
    /// everything else (remote audio / compressed) as
    /// [`VitaKind::CompressedAudio`].
    pub fn on_data(&self, listener: impl Fn(&VitaPacket) + Send + Sync + 'static) -> Result<DataSubscription, SessionError> {
        let snapshot = self.read()?;
        let stream_id = parse_stream_id(&self.stream_id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "audio_stream", key: self.stream_id.clone() })?;
        let kind = match snapshot.kind.as_deref() {
            Some("dax_rx") | Some("dax_tx") | Some("dax_mic") => VitaKind::DaxAudio,
            _ => VitaKind::CompressedAudio,
        };
        let scope = self.session.demux().attach(kind, stream_id_filter(stream_id), listener);
        Ok(DataSubscription { session: self.session.clone(), scope })
    }
}

/// Facade over one [`TxBandSetting`] (per-band transmit limits and
/// interlocks).
pub struct TxBandSettingController {
    session: Session,
    band_id: String,
}

impl TxBandSettingController {
    /// Builds a controller over the band keyed `band_id`.
    pub fn new(session: Session, band_id: impl Into<String>) -> TxBandSettingController {
        TxBandSettingController { session, band_id: band_id.into() }
    }

    fn read(&self) -> Result<TxBandSetting, SessionError> {
        self.session
            .store()
            .lock()
            .unwrap()
            .tx_band_setting(&self.band_id)
            .ok_or_else(|| SessionError::StateUnavailable { entity: "tx_band_setting", key: self.band_id.clone() })
    }

    /// The current TX band setting snapshot.
    pub fn snapshot(&self) -> Result<TxBandSetting, SessionError> {
        self.read()
    }

    /// Sets the tune power limit, clamped to `[0, 100]`.
    pub async fn set_tune_power(&self, power: i64) -> Result<(), SessionError> {
        self.read()?;
        let clamped = power.clamp(0, 100);
        self.session.command(&format!("transmit bandset {} tune_power={clamped}", self.band_id)).await?;
        apply_optimistic(
            &self.session,
            optimistic_status("transmit", vec!["bandset".to_string(), self.band_id.clone()], one_attr("tune_power", clamped)),
        );
        Ok(())
    }

    /// Enables or disables the accessory-jack TX-request interlock.
    pub async fn set_interlock_enable(&self, enable: bool) -> Result<(), SessionError> {
        self.read()?;
        self.session.command(&format!("interlock bandset {} acc_txreq_enable={}", self.band_id, enable as u8)).await?;
        apply_optimistic(
            &self.session,
            optimistic_status("interlock", vec!["bandset".to_string(), self.band_id.clone()], one_attr("acc_txreq_enable", enable as u8)),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ControlTransport, DataTransport, SessionConfig};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex as StdMutex};

    struct RecordingControl {
        sent: StdMutex<Vec<String>>,
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
        let control = Arc::new(RecordingControl { sent: StdMutex::new(Vec::new()) });
        let session = Session::new(control.clone(), Arc::new(NullData), SessionConfig::default());
        (session, control)
    }

    fn ack_last_command(session: &Session, control: &RecordingControl) {
        let line = control.sent.lock().unwrap().last().unwrap().clone();
        let seq_hex = line.trim_start_matches('C').split('|').next().unwrap().to_string();
        session.handle_control_line(&format!("R{seq_hex}|00000000"));
    }

    // header(4) + stream id(4) + class id(8) + one {id, value} sample(4),
    // padded with sentinel samples to the dialect's 28-byte floor.
    fn meter_packet(id: u16, value: i16) -> Vec<u8> {
        let mut buf = vec![0u8; 16];
        buf[0] = 0x08; // classIdPresent
        buf[12..16].copy_from_slice(&0x0000_8002u32.to_be_bytes()); // class code 0x8002
        buf.extend_from_slice(&id.to_be_bytes());
        buf.extend_from_slice(&value.to_be_bytes());
        while buf.len() < 28 {
            buf.extend_from_slice(&0xFFFFu16.to_be_bytes());
            buf.extend_from_slice(&0i16.to_be_bytes());
        }
        let words = (buf.len() / 4) as u16;
        buf[2..4].copy_from_slice(&words.to_be_bytes());
        buf
    }

    #[tokio::test]
    async fn meter_on_data_filters_by_id_and_detaches_on_drop() {
        let (session, _control) = test_session();
        session.handle_control_line("S1|meter 9.src=TX-#9.nam=HWALC#");
        let controller = MeterController::new(session.clone(), "9");

        let seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let subscription = controller.on_data(move |_| { seen_clone.fetch_add(1, std::sync::atomic::Ordering::Relaxed); }).unwrap();
        assert_eq!(session.demux().scope_count(), 1);

        session.handle_data_packet(&meter_packet(9, -128));
        session.handle_data_packet(&meter_packet(10, 1));
        assert_eq!(seen.load(std::sync::atomic::Ordering::Relaxed), 1);

        drop(subscription);
        assert_eq!(session.demux().scope_count(), 0);
        session.handle_data_packet(&meter_packet(9, -128));
        assert_eq!(seen.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    // header(4) + stream id(4) + class id(8) + an empty (0 bins) panadapter
    // frame header(12) = 28 bytes exactly.
    fn panadapter_packet(stream_id: u32) -> Vec<u8> {
        let mut buf = vec![0u8; 16];
        buf[0] = 0x08;
        buf[4..8].copy_from_slice(&stream_id.to_be_bytes());
        buf[12..16].copy_from_slice(&0x0000_8003u32.to_be_bytes());
        buf.extend_from_slice(&[0, 0]); // starting_bin
        buf.extend_from_slice(&[0, 0]); // bins_in_frame
        buf.extend_from_slice(&[0, 0]); // bin_size
        buf.extend_from_slice(&[0, 0]); // total_bins
        buf.extend_from_slice(&0u32.to_be_bytes()); // frame
        let words = (buf.len() / 4) as u16;
        buf[2..4].copy_from_slice(&words.to_be_bytes());
        buf
    }

    #[tokio::test]
    async fn panadapter_on_data_filters_by_stream_id() {
        let (session, _control) = test_session();
        session.handle_control_line("S1|display pan 0x40000000 band=20");
        let controller = PanadapterController::new(session.clone(), "0x40000000");

        let seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let _subscription = controller.on_data(move |_| { seen_clone.fetch_add(1, std::sync::atomic::Ordering::Relaxed); }).unwrap();

        session.handle_data_packet(&panadapter_packet(0x4000_0000));
        session.handle_data_packet(&panadapter_packet(0x4100_0000));
        assert_eq!(seen.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn absent_slice_raises_state_unavailable() {
        let (session, _control) = test_session();
        let controller = SliceController::new(session, "0");
        assert!(matches!(controller.snapshot(), Err(SessionError::StateUnavailable { entity: "slice", .. })));
    }

    #[tokio::test]
    async fn set_mode_optimistically_patches_before_reply() {
        let (session, control) = test_session();
        session.handle_control_line("S1|slice 0 in_use=1 mode=USB");
        let controller = SliceController::new(session.clone(), "0");

        let session2 = session.clone();
        let handle = tokio::spawn(async move {
            let controller = SliceController::new(session2, "0");
            controller.set_mode("CW").await
        });
        tokio::task::yield_now().await;
        ack_last_command(&session, &control);
        handle.await.unwrap().unwrap();

        assert_eq!(controller.snapshot().unwrap().mode.as_deref(), Some("CW"));
    }

    #[tokio::test]
    async fn tx_band_setting_clamps_tune_power() {
        let (session, control) = test_session();
        session.handle_control_line("S1|transmit bandset 20m tune_power=10");
        let controller = TxBandSettingController::new(session.clone(), "20m");

        let session2 = session.clone();
        let handle = tokio::spawn(async move {
            let controller = TxBandSettingController::new(session2, "20m");
            controller.set_tune_power(500).await
        });
        tokio::task::yield_now().await;
        ack_last_command(&session, &control);
        handle.await.unwrap().unwrap();

        assert_eq!(controller.snapshot().unwrap().tune_power, Some(100));
    }
}
