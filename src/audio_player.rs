use crossbeam::channel::Sender;
use rodio::Source;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use crate::file_reader::DecodedAudio;
use crate::seek::SeekRequest;

/// Status change broadcast by the deck. The receiver asks the engine what
/// changed, the event itself carries nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Changed,
}

/// What the transport needs from whatever produces audio.
pub trait PlaybackEngine {
    fn start(&mut self);
    fn stop(&mut self);
    fn set_position(&mut self, seconds: f64);
    fn current_position(&self) -> f64;
    fn length_in_seconds(&self) -> f64;
    fn is_playing(&self) -> bool;
    fn has_stream_finished(&self) -> bool;
}

// Shared between the deck (UI side) and its source (audio side).
#[derive(Debug)]
struct StreamState {
    playing: AtomicBool,
    finished: AtomicBool,
    // index of the first sample of the next frame to play
    cursor: AtomicUsize,
    len: usize,
    channels: usize,
    sample_rate: u32,
}

impl StreamState {
    fn new(audio: &DecodedAudio) -> Self {
        let channels = audio.channels.max(1) as usize;
        Self {
            playing: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            cursor: AtomicUsize::new(0),
            // drop a trailing partial frame so the cursor stays aligned
            len: audio.samples.len() - audio.samples.len() % channels,
            channels,
            sample_rate: audio.sample_rate,
        }
    }

    fn frames(&self) -> usize {
        self.len / self.channels
    }

    fn position(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.;
        }
        let frame = self.cursor.load(Ordering::Acquire) / self.channels;
        frame as f64 / self.sample_rate as f64
    }

    fn length(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    fn seek_to(&self, seconds: f64) {
        let frame = if seconds.is_finite() && seconds > 0. {
            ((seconds * self.sample_rate as f64).round() as usize).min(self.frames())
        } else {
            0
        };
        self.cursor.store(frame * self.channels, Ordering::Release);
        self.finished.store(false, Ordering::Release);
    }
}

/// Plays one decoded file at a time. The deck is driven from the UI thread;
/// the samples themselves are pulled by the output through [`TransportSource`].
pub struct Deck {
    stream: Option<Arc<StreamState>>,
    seek: Arc<SeekRequest>,
    events: Sender<EngineEvent>,
    block_frames: usize,
}

impl Deck {
    pub fn new(seek: Arc<SeekRequest>, events: Sender<EngineEvent>, block_frames: usize) -> Self {
        Self {
            stream: None,
            seek,
            events,
            block_frames: block_frames.max(1),
        }
    }

    /// Replaces the current stream. The old source goes silent and the
    /// returned one starts stopped at position 0.
    pub fn load(&mut self, audio: &DecodedAudio) -> TransportSource {
        if let Some(old) = self.stream.take() {
            old.playing.store(false, Ordering::Release);
        }
        let state = Arc::new(StreamState::new(audio));
        self.stream = Some(Arc::clone(&state));
        info!(
            path = %audio.path.display(),
            seconds = state.length(),
            "loaded into deck"
        );
        TransportSource {
            samples: Arc::clone(&audio.samples),
            state,
            seek: Arc::clone(&self.seek),
            events: self.events.clone(),
            channels: audio.channels.max(1),
            sample_rate: audio.sample_rate,
            block_frames: self.block_frames,
            left_in_block: 0,
            channel: 0,
            frame: None,
        }
    }

    fn notify(&self) {
        if self.events.send(EngineEvent::Changed).is_err() {
            debug!("engine event dropped, nobody is listening");
        }
    }
}

impl PlaybackEngine for Deck {
    fn start(&mut self) {
        if let Some(stream) = &self.stream {
            if !stream.playing.load(Ordering::Acquire) {
                stream.finished.store(false, Ordering::Release);
                stream.playing.store(true, Ordering::Release);
                debug!(position = stream.position(), "deck started");
                self.notify();
            }
        }
    }

    fn stop(&mut self) {
        if let Some(stream) = &self.stream {
            stream.playing.store(false, Ordering::Release);
            debug!(position = stream.position(), "deck stopped");
        }
        self.notify();
    }

    fn set_position(&mut self, seconds: f64) {
        if let Some(stream) = &self.stream {
            stream.seek_to(seconds);
        }
    }

    fn current_position(&self) -> f64 {
        self.stream.as_ref().map_or(0., |s| s.position())
    }

    fn length_in_seconds(&self) -> f64 {
        self.stream.as_ref().map_or(0., |s| s.length())
    }

    fn is_playing(&self) -> bool {
        self.stream
            .as_ref()
            .is_some_and(|s| s.playing.load(Ordering::Acquire))
    }

    fn has_stream_finished(&self) -> bool {
        self.stream
            .as_ref()
            .is_some_and(|s| s.finished.load(Ordering::Acquire))
    }
}

/// The audio-thread half of the deck. It never ends on its own: when stopped
/// or past the end it yields silence so the output keeps pulling blocks.
pub struct TransportSource {
    samples: Arc<[f32]>,
    state: Arc<StreamState>,
    seek: Arc<SeekRequest>,
    events: Sender<EngineEvent>,
    channels: u16,
    sample_rate: u32,
    block_frames: usize,
    left_in_block: usize,
    // channel of the next sample within the current frame
    channel: usize,
    // sample index of the frame being emitted, None while silent
    frame: Option<usize>,
}

impl TransportSource {
    fn begin_block(&mut self) {
        let state = &self.state;
        self.seek.consume(|seconds| state.seek_to(seconds));
    }

    fn begin_frame(&mut self) -> Option<usize> {
        let state = &self.state;
        if !state.playing.load(Ordering::Acquire) {
            return None;
        }
        let pos = state.cursor.load(Ordering::Acquire);
        if pos + state.channels > state.len {
            state.finished.store(true, Ordering::Release);
            if state.playing.swap(false, Ordering::AcqRel) {
                // unbounded, never blocks
                let _ = self.events.try_send(EngineEvent::Changed);
            }
            return None;
        }
        Some(pos)
    }

    fn end_frame(&mut self) {
        if let Some(start) = self.frame.take() {
            // a seek or reset from the UI wins over our own advance
            let _ = self.state.cursor.compare_exchange(
                start,
                start + self.state.channels,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
    }
}

impl Iterator for TransportSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.channel == 0 {
            if self.left_in_block == 0 {
                self.begin_block();
                self.left_in_block = self.block_frames;
            }
            self.left_in_block -= 1;
            self.frame = self.begin_frame();
        }
        let sample = match self.frame {
            Some(start) => self.samples[start + self.channel],
            None => 0.,
        };
        self.channel += 1;
        if self.channel == self.state.channels {
            self.channel = 0;
            self.end_frame();
        }
        Some(sample)
    }
}

impl Source for TransportSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> rodio::ChannelCount {
        self.channels
    }

    fn sample_rate(&self) -> rodio::SampleRate {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crossbeam::channel::{Receiver, unbounded};
    use std::path::PathBuf;

    /// Stereo ramp where left = frame index and right = -frame index.
    pub(crate) fn ramp(frames: usize, sample_rate: u32) -> DecodedAudio {
        let samples: Vec<f32> = (0..frames)
            .flat_map(|i| [i as f32, -(i as f32)])
            .collect();
        DecodedAudio {
            path: PathBuf::from("ramp.wav"),
            samples: samples.into(),
            sample_rate,
            channels: 2,
        }
    }

    pub(crate) fn deck(block_frames: usize) -> (Deck, Arc<SeekRequest>, Receiver<EngineEvent>) {
        let seek = Arc::new(SeekRequest::new());
        let (tx, rx) = unbounded();
        (Deck::new(Arc::clone(&seek), tx, block_frames), seek, rx)
    }

    fn pull(source: &mut TransportSource, samples: usize) -> Vec<f32> {
        source.by_ref().take(samples).collect()
    }

    #[test]
    fn stopped_source_is_silent_and_endless() {
        let (mut deck, _, _) = deck(4);
        let mut source = deck.load(&ramp(8, 10));
        assert_eq!(pull(&mut source, 100), vec![0.; 100]);
        assert_eq!(deck.current_position(), 0.);
    }

    #[test]
    fn plays_frames_in_order() {
        let (mut deck, _, rx) = deck(4);
        let mut source = deck.load(&ramp(8, 10));
        deck.start();
        assert_eq!(rx.try_recv(), Ok(EngineEvent::Changed));
        assert!(deck.is_playing());
        assert_eq!(pull(&mut source, 6), vec![0., -0., 1., -1., 2., -2.]);
        assert_relative_eq!(deck.current_position(), 0.3);
    }

    #[test]
    fn end_of_stream_reports_finished_once() {
        let (mut deck, _, rx) = deck(2);
        let mut source = deck.load(&ramp(3, 10));
        deck.start();
        rx.try_recv().unwrap();
        let out = pull(&mut source, 10);
        assert_eq!(&out[..6], &[0., -0., 1., -1., 2., -2.]);
        assert_eq!(&out[6..], &[0.; 4]);
        assert!(!deck.is_playing());
        assert!(deck.has_stream_finished());
        assert_eq!(rx.try_iter().count(), 1);
        assert_relative_eq!(deck.current_position(), deck.length_in_seconds());
    }

    #[test]
    fn seek_is_applied_at_block_boundary() {
        let (mut deck, seek, _) = deck(2);
        let mut source = deck.load(&ramp(100, 10));
        deck.start();
        // first block: frames 0 and 1
        assert_eq!(pull(&mut source, 2), vec![0., -0.]);
        seek.request(5.0);
        // rest of the block is untouched by the request
        assert_eq!(pull(&mut source, 2), vec![1., -1.]);
        assert!(seek.is_pending());
        // next block starts at 5 s = frame 50
        assert_eq!(pull(&mut source, 2), vec![50., -50.]);
        assert!(!seek.is_pending());
    }

    #[test]
    fn coalesced_seeks_apply_latest_slider_value() {
        let (mut deck, seek, _) = deck(1);
        let mut source = deck.load(&ramp(100, 10));
        deck.start();
        seek.request(2.0);
        seek.request(3.0);
        assert_eq!(pull(&mut source, 2), vec![30., -30.]);
        assert_eq!(pull(&mut source, 2), vec![31., -31.]);
    }

    #[test]
    fn seek_while_stopped_moves_position() {
        let (mut deck, seek, _) = deck(4);
        let mut source = deck.load(&ramp(100, 10));
        seek.request(4.0);
        pull(&mut source, 8);
        assert_relative_eq!(deck.current_position(), 4.0);
        assert!(!deck.is_playing());
    }

    #[test]
    fn set_position_clamps_and_clears_finished() {
        let (mut deck, _, _) = deck(4);
        let mut source = deck.load(&ramp(10, 10));
        deck.start();
        pull(&mut source, 40);
        assert!(deck.has_stream_finished());
        deck.set_position(99.);
        assert_relative_eq!(deck.current_position(), 1.0);
        deck.set_position(0.);
        assert!(!deck.has_stream_finished());
        assert_eq!(deck.current_position(), 0.);
    }

    #[test]
    fn stop_keeps_channel_alignment() {
        let (mut deck, _, _) = deck(8);
        let mut source = deck.load(&ramp(100, 10));
        deck.start();
        // stop after a left sample, mid-frame
        assert_eq!(pull(&mut source, 3), vec![0., -0., 1.]);
        deck.stop();
        assert_eq!(pull(&mut source, 1), vec![-1.]);
        assert_eq!(pull(&mut source, 4), vec![0.; 4]);
        deck.start();
        assert_eq!(pull(&mut source, 2), vec![2., -2.]);
    }

    #[test]
    fn loading_silences_previous_source() {
        let (mut deck, _, _) = deck(4);
        let mut first = deck.load(&ramp(100, 10));
        deck.start();
        let _second = deck.load(&ramp(50, 10));
        assert_eq!(pull(&mut first, 4), vec![0.; 4]);
        assert!(!deck.is_playing());
        assert_relative_eq!(deck.length_in_seconds(), 5.0);
    }

    #[test]
    fn source_reports_format() {
        let (mut deck, _, _) = deck(4);
        let source = deck.load(&ramp(10, 22050));
        assert_eq!(source.channels(), 2);
        assert_eq!(source.sample_rate(), 22050);
        assert_eq!(source.total_duration(), None);
    }

    #[test]
    fn unloaded_deck_reports_nothing() {
        let (mut deck, _, rx) = deck(4);
        deck.start();
        assert!(!deck.is_playing());
        assert!(rx.try_recv().is_err());
        assert_eq!(deck.length_in_seconds(), 0.);
        assert!(!deck.has_stream_finished());
    }
}
