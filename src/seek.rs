//! Seek handoff between the UI and the audio callback.
//!
//! The UI never writes the playback position while audio is running. It only
//! moves the slider and raises a flag; the audio side picks the flag up at the
//! start of its next block and applies whatever the slider holds *then*.
//! Requests made before that block coalesce into one.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug)]
pub struct SeekRequest {
    pending: AtomicBool,
    // f64 bits of the slider value in seconds
    slider: AtomicU64,
}

impl Default for SeekRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl SeekRequest {
    pub fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            slider: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// UI side: the user dragged the slider to `target` seconds.
    pub fn request(&self, target: f64) {
        self.set_slider(target);
        if !self.pending.load(Ordering::Acquire) {
            self.pending.store(true, Ordering::Release);
        }
    }

    /// Moves the slider without asking for a seek (timer updates, resets).
    pub fn set_slider(&self, value: f64) {
        self.slider.store(value.to_bits(), Ordering::Release);
    }

    pub fn slider(&self) -> f64 {
        f64::from_bits(self.slider.load(Ordering::Acquire))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Audio side, once per block. Calls `apply` with the slider's current
    /// value if a seek is pending, then clears the flag.
    pub fn consume(&self, apply: impl FnOnce(f64)) -> bool {
        if !self.pending.load(Ordering::Acquire) {
            return false;
        }
        apply(self.slider());
        self.pending.store(false, Ordering::Release);
        true
    }

    /// Drops a pending request and zeroes the slider, used whenever playback
    /// goes back to the top.
    pub fn clear(&self) {
        // zero first so a block that already saw the flag applies 0
        self.set_slider(0.);
        self.pending.store(false, Ordering::Release);
    }
}
