//! UI-side controller: owns the transport, the controls and the reporter and
//! is the only place that changes any of them.
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::audio_player::PlaybackEngine;
use crate::controls::{Controls, ZERO_TIME};
use crate::reporter::{PositionReporter, format_elapsed};
use crate::seek::SeekRequest;
use crate::transport::{Transition, TransitionError, Transport, TransportState};

pub struct Player<E> {
    engine: E,
    transport: Transport,
    controls: Controls,
    reporter: PositionReporter,
    seek: Arc<SeekRequest>,
    track: Option<String>,
}

impl<E: PlaybackEngine> Player<E> {
    pub fn new(engine: E, seek: Arc<SeekRequest>, tick_interval: Duration) -> Self {
        Self {
            engine,
            transport: Transport::new(),
            controls: Controls::default(),
            reporter: PositionReporter::new(tick_interval),
            seek,
            track: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn slider_value(&self) -> f64 {
        self.seek.slider()
    }

    /// How long until the reporter wants to tick, if it is running.
    pub fn time_to_tick(&self, now: Instant) -> Option<Duration> {
        self.reporter.time_to_next(now)
    }

    pub fn request_transition(
        &mut self,
        to: TransportState,
    ) -> Result<Transition, TransitionError> {
        let transition = self.transport.request(to)?;
        if let Transition::Entered { from, to } = transition {
            debug!(%from, %to, "transport");
            self.enter(to);
        }
        Ok(transition)
    }

    fn enter(&mut self, state: TransportState) {
        match state {
            TransportState::Playing => {
                self.controls.show_playing();
                self.reporter.start(Instant::now());
            }
            TransportState::Stopped => {
                self.stop_song();
                self.controls.show_idle();
            }
            TransportState::Stopping | TransportState::Pausing => self.engine.stop(),
            TransportState::Starting => self.engine.start(),
            TransportState::Paused => {
                self.controls.show_paused();
                self.reporter.stop();
            }
        }
    }

    fn request_or_log(&mut self, to: TransportState) -> bool {
        match self.request_transition(to) {
            Ok(_) => true,
            Err(err) => {
                debug!("{err}, ignored");
                false
            }
        }
    }

    /// Back to the top of the track with the reporter halted.
    fn stop_song(&mut self) {
        self.reporter.stop();
        // a drag still waiting for the audio side must not land after the rewind
        self.seek.clear();
        self.engine.set_position(0.);
        self.controls.time_label = ZERO_TIME.to_string();
    }

    /// The engine holds a new stream. Everything goes back to `Stopped`.
    pub fn file_loaded(&mut self, name: impl Into<String>) {
        let name = name.into();
        let length = self.engine.length_in_seconds();
        let previous = self.transport.reset();
        self.stop_song();
        self.controls.slider_max = length;
        self.controls.use_default_labels();
        self.controls.show_idle();
        info!(track = %name, length, %previous, "track ready");
        self.track = Some(name);
    }

    pub fn start_clicked(&mut self) {
        if !self.controls.start_enabled {
            return;
        }
        if self.state() == TransportState::Paused {
            self.controls.use_default_labels();
        }
        if self.engine.has_stream_finished() {
            self.stop_song();
        }
        self.request_or_log(TransportState::Starting);
    }

    pub fn stop_clicked(&mut self) {
        if !self.controls.stop_enabled {
            return;
        }
        match self.state() {
            TransportState::Playing => {
                self.request_or_log(TransportState::Stopping);
            }
            TransportState::Paused => {
                self.controls.use_default_labels();
                self.request_or_log(TransportState::Stopped);
            }
            state => debug!(%state, "stop ignored"),
        }
    }

    pub fn pause_clicked(&mut self) {
        if !self.controls.pause_enabled {
            return;
        }
        if self.request_or_log(TransportState::Pausing) {
            self.controls.use_paused_labels();
        }
    }

    /// The user moved the slider. The audio side applies it on its next block.
    pub fn slider_moved(&mut self, seconds: f64) {
        if self.track.is_none() {
            return;
        }
        let target = self.controls.clamp_to_slider(seconds);
        debug!(target, "seek requested");
        self.seek.request(target);
    }

    pub fn tick(&mut self, now: Instant) {
        if self.reporter.poll(now) {
            self.report();
        }
    }

    fn report(&mut self) {
        let position = self.engine.current_position();
        self.controls.time_label = format_elapsed(position);
        // leave a drag the audio side has not picked up yet alone
        if !self.seek.is_pending() {
            self.seek.set_slider(position);
        }
    }

    /// The engine said something changed; find out what.
    pub fn on_engine_changed(&mut self) {
        if self.engine.is_playing() {
            self.request_or_log(TransportState::Playing);
        } else {
            match self.state() {
                TransportState::Stopping => {
                    self.request_or_log(TransportState::Stopped);
                }
                TransportState::Pausing => {
                    self.request_or_log(TransportState::Paused);
                }
                _ => (),
            }
        }
        if self.engine.has_stream_finished() {
            info!("stream finished");
            self.controls.show_idle();
        }
    }
}
