//! What the screen shows: button enablement and labels, the elapsed label and
//! the slider range. The TUI draws from this and nothing else.

pub const START_LABEL: &str = "Play";
pub const RESUME_LABEL: &str = "Resume";
pub const STOP_LABEL: &str = "Stop";
pub const RESTART_LABEL: &str = "Restart";
pub const ZERO_TIME: &str = "00:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Open,
    Start,
    Stop,
    Pause,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Open, Button::Start, Button::Stop, Button::Pause];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub open_enabled: bool,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub pause_enabled: bool,
    pub start_label: &'static str,
    pub stop_label: &'static str,
    pub time_label: String,
    // slider range upper bound in seconds, the lower bound is always 0
    pub slider_max: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            open_enabled: true,
            start_enabled: false,
            stop_enabled: false,
            pause_enabled: false,
            start_label: START_LABEL,
            stop_label: STOP_LABEL,
            time_label: ZERO_TIME.to_string(),
            slider_max: 0.,
        }
    }
}

impl Controls {
    pub fn is_enabled(&self, button: Button) -> bool {
        match button {
            Button::Open => self.open_enabled,
            Button::Start => self.start_enabled,
            Button::Stop => self.stop_enabled,
            Button::Pause => self.pause_enabled,
        }
    }

    pub fn label(&self, button: Button) -> &'static str {
        match button {
            Button::Open => "Open",
            Button::Start => self.start_label,
            Button::Stop => self.stop_label,
            Button::Pause => "Pause",
        }
    }

    pub fn show_playing(&mut self) {
        self.start_enabled = false;
        self.stop_enabled = true;
        self.pause_enabled = true;
    }

    pub fn show_paused(&mut self) {
        self.pause_enabled = false;
        self.start_enabled = true;
        self.stop_enabled = true;
    }

    /// Stopped, and also what a finished stream leaves behind.
    pub fn show_idle(&mut self) {
        self.stop_enabled = false;
        self.pause_enabled = false;
        self.start_enabled = true;
    }

    pub fn use_paused_labels(&mut self) {
        self.start_label = RESUME_LABEL;
        self.stop_label = RESTART_LABEL;
    }

    pub fn use_default_labels(&mut self) {
        self.start_label = START_LABEL;
        self.stop_label = STOP_LABEL;
    }

    pub fn clamp_to_slider(&self, value: f64) -> f64 {
        value.clamp(0., self.slider_max.max(0.))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_open_is_enabled_initially() {
        let controls = Controls::default();
        let enabled: Vec<_> = Button::ALL
            .into_iter()
            .filter(|b| controls.is_enabled(*b))
            .collect();
        assert_eq!(enabled, vec![Button::Open]);
        assert_eq!(controls.time_label, ZERO_TIME);
    }

    #[test]
    fn paused_labels_swap_and_restore() {
        let mut controls = Controls::default();
        controls.use_paused_labels();
        assert_eq!(controls.label(Button::Start), "Resume");
        assert_eq!(controls.label(Button::Stop), "Restart");
        controls.use_default_labels();
        assert_eq!(controls.label(Button::Start), "Play");
        assert_eq!(controls.label(Button::Stop), "Stop");
    }

    #[test]
    fn slider_clamps_into_range() {
        let controls = Controls {
            slider_max: 10.,
            ..Default::default()
        };
        assert_eq!(controls.clamp_to_slider(-1.), 0.);
        assert_eq!(controls.clamp_to_slider(4.5), 4.5);
        assert_eq!(controls.clamp_to_slider(12.), 10.);
    }
}
