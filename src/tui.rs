use color_eyre::Result;
use crossbeam::channel::Receiver;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{
    DefaultTerminal,
    layout::{Flex, Position},
    prelude::*,
    widgets::{Block, Clear, FrameExt, Gauge, Paragraph},
};
use ratatui_explorer::FileExplorer;
use std::{
    io::stdout,
    path::Path,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};
use tui_big_text::{BigText, PixelSize};

use crate::{
    audio_device::AudioOutput,
    audio_player::{Deck, EngineEvent, PlaybackEngine},
    builtin_themes,
    config::{ColorOverrides, UiConfig},
    controls::Button,
    file_reader::{self, read_audio},
    player::Player,
    reporter::format_elapsed,
};

const BUTTON_WIDTH: u16 = 12;
// one quadrant-sized glyph of the elapsed label
const GLYPH_WIDTH: u16 = 4;
const GLYPH_HEIGHT: u16 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalTheme {
    pub background: Color,
    pub foreground: Color,
    pub highlight: Option<Color>,
}

impl Default for GlobalTheme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Reset,
            highlight: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub global: GlobalTheme,
    pub open: Color,
    pub start: Color,
    pub stop: Color,
    pub pause: Color,
    pub disabled: Color,
    pub slider: Color,
    pub time: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            global: GlobalTheme::default(),
            open: Color::Blue,
            start: Color::Rgb(34, 139, 34), // forest green
            stop: Color::Rgb(205, 92, 92),  // indian red
            pause: Color::Yellow,
            disabled: Color::DarkGray,
            slider: Color::Cyan,
            time: Color::Reset,
            border: Color::Reset,
        }
    }
}

impl Theme {
    /// Spreads the global colours over the components that follow them.
    pub fn apply_global_as_default(&mut self) {
        let accent = self.global.highlight.unwrap_or(self.global.foreground);
        self.open = accent;
        self.slider = accent;
        self.time = self.global.foreground;
        self.border = self.global.foreground;
    }

    pub fn from_config(ui: &UiConfig) -> Self {
        let theme = builtin_themes::get_by_name(&ui.theme).unwrap_or_else(|| {
            warn!(
                theme = %ui.theme,
                available = ?builtin_themes::list_themes(),
                "unknown theme, using Classic"
            );
            builtin_themes::classic()
        });
        theme.with_overrides(&ui.colors)
    }

    pub fn with_overrides(mut self, colors: &ColorOverrides) -> Self {
        if let Some(c) = colors.background {
            self.global.background = c;
        }
        if let Some(c) = colors.foreground {
            self.global.foreground = c;
            self.time = c;
            self.border = c;
        }
        if let Some(c) = colors.start {
            self.start = c;
        }
        if let Some(c) = colors.stop {
            self.stop = c;
        }
        if let Some(c) = colors.pause {
            self.pause = c;
        }
        if let Some(c) = colors.slider {
            self.slider = c;
        }
        self
    }

    fn button(&self, button: Button) -> Color {
        match button {
            Button::Open => self.open,
            Button::Start => self.start,
            Button::Stop => self.stop,
            Button::Pause => self.pause,
        }
    }
}

// Where things were drawn last frame, for mouse hits.
#[derive(Debug, Default)]
struct HitAreas {
    buttons: Vec<(Button, Rect)>,
    slider: Rect,
}

impl HitAreas {
    fn button_at(&self, pos: Position) -> Option<Button> {
        self.buttons
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(button, _)| *button)
    }

    /// Slider position under `pos` as a fraction of the range.
    fn slider_ratio(&self, pos: Position) -> Option<f64> {
        if !self.slider.contains(pos) {
            return None;
        }
        let span = self.slider.width.saturating_sub(1).max(1) as f64;
        Some(((pos.x - self.slider.x) as f64 / span).clamp(0., 1.))
    }
}

pub struct App {
    player: Player<Deck>,
    output: Option<AudioOutput>,
    engine_rx: Receiver<EngineEvent>,
    explorer: FileExplorer,
    show_explorer: bool,
    theme: Theme,
    seek_step: f64,
    frame_timeout: Duration,
    hit: HitAreas,
}

impl App {
    pub fn new(
        player: Player<Deck>,
        output: Option<AudioOutput>,
        engine_rx: Receiver<EngineEvent>,
        ui: &UiConfig,
        seek_step: f64,
    ) -> Result<Self> {
        let explorer_theme = ratatui_explorer::Theme::default()
            .add_default_title()
            .with_item_style(Style::default().fg(Color::Reset));
        let mut explorer = FileExplorer::with_theme(explorer_theme)?;
        let dir = ui.picker_dir();
        if let Err(err) = explorer.set_cwd(dir.clone()) {
            warn!(dir = %dir.display(), %err, "cannot open picker directory");
        }
        Ok(Self {
            player,
            output,
            engine_rx,
            explorer,
            show_explorer: false,
            theme: Theme::from_config(ui),
            seek_step,
            frame_timeout: ui.frame_timeout(),
            hit: HitAreas::default(),
        })
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        f.render_widget(
            Block::default().style(
                Style::default()
                    .bg(self.theme.global.background)
                    .fg(self.theme.global.foreground),
            ),
            area,
        );

        let [buttons_area, time_area, slider_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(GLYPH_HEIGHT),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_buttons(f, buttons_area);
        self.render_time(f, time_area);
        self.render_slider(f, slider_area);
        self.render_status(f, status_area);

        if self.show_explorer {
            let area = Self::popup_area(area, 60, 70);
            f.render_widget(Clear, area);
            f.render_widget_ref(self.explorer.widget(), area);
        }
    }

    fn render_buttons(&mut self, f: &mut Frame, area: Rect) {
        let areas: [Rect; 4] = Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 4])
            .spacing(1)
            .areas(area);
        let controls = self.player.controls();
        self.hit.buttons.clear();
        for (button, rect) in Button::ALL.into_iter().zip(areas) {
            let style = if controls.is_enabled(button) {
                Style::default()
                    .fg(self.theme.button(button))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.disabled)
            };
            let widget = Paragraph::new(controls.label(button))
                .centered()
                .style(style)
                .block(Block::bordered().border_style(style));
            f.render_widget(widget, rect);
            self.hit.buttons.push((button, rect));
        }
    }

    fn render_time(&self, f: &mut Frame, area: Rect) {
        let label = self.player.controls().time_label.as_str();
        let width = GLYPH_WIDTH * label.chars().count() as u16;
        let [row] = Layout::vertical([Constraint::Length(GLYPH_HEIGHT)])
            .flex(Flex::Center)
            .areas(area);
        let [cell] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);
        let big = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(self.theme.time))
            .lines(vec![Line::from(label)])
            .build();
        f.render_widget(big, cell);
    }

    fn render_slider(&mut self, f: &mut Frame, area: Rect) {
        let max = self.player.controls().slider_max;
        let value = self.player.slider_value();
        let ratio = if max > 0. {
            (value / max).clamp(0., 1.)
        } else {
            0.
        };
        let block = Block::bordered().border_style(Style::default().fg(self.theme.border));
        self.hit.slider = block.inner(area);
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(self.theme.slider))
            .use_unicode(true)
            .ratio(ratio)
            .label(format!("{} / {}", format_elapsed(value), format_elapsed(max)));
        f.render_widget(gauge, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let track = self.player.track().unwrap_or("no file");
        let output = self
            .output
            .as_ref()
            .map_or("no audio output", |out| out.device_name());
        let text = format!(
            " {track} | {} | {output} | o open  space play/pause  s stop  \u{2190}/\u{2192} seek  q quit",
            self.player.state()
        );
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(self.theme.disabled)),
            area,
        );
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            // engine status changes are handled here, on the UI thread
            while let Ok(EngineEvent::Changed) = self.engine_rx.try_recv() {
                self.player.on_engine_changed();
            }
            let now = Instant::now();
            self.player.tick(now);

            let timeout = self
                .player
                .time_to_tick(now)
                .map_or(self.frame_timeout, |due| due.min(self.frame_timeout));
            if event::poll(timeout)? {
                let event = event::read()?;
                if self.handle_event(&event)? {
                    return Ok(());
                }
            }
        }
    }

    /// Returns true when the user asked to quit.
    fn handle_event(&mut self, event: &Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.show_explorer {
                    return self.handle_explorer_key(key, event);
                }
                Ok(self.handle_key(key))
            }
            Event::Mouse(mouse) if !self.show_explorer => {
                self.handle_mouse(mouse);
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_explorer_key(&mut self, key: &KeyEvent, event: &Event) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc | KeyCode::Char('o') => self.show_explorer = false,
            KeyCode::Enter => self.select_file(),
            _ => self.explorer.handle(event)?,
        }
        Ok(false)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('o') => self.click(Button::Open),
            KeyCode::Char(' ') => {
                if self.player.controls().start_enabled {
                    self.click(Button::Start)
                } else {
                    self.click(Button::Pause)
                }
            }
            KeyCode::Char('p') => self.click(Button::Start),
            KeyCode::Char('a') => self.click(Button::Pause),
            KeyCode::Char('s') => self.click(Button::Stop),
            KeyCode::Left => self.nudge(-self.seek_step),
            KeyCode::Right => self.nudge(self.seek_step),
            _ => (),
        }
        false
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(button) = self.hit.button_at(pos) {
                    self.click(button);
                } else if let Some(ratio) = self.hit.slider_ratio(pos) {
                    self.drag_to(ratio);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(ratio) = self.hit.slider_ratio(pos) {
                    self.drag_to(ratio);
                }
            }
            _ => (),
        }
    }

    fn click(&mut self, button: Button) {
        match button {
            Button::Open => self.show_explorer = true,
            Button::Start => self.player.start_clicked(),
            Button::Stop => self.player.stop_clicked(),
            Button::Pause => self.player.pause_clicked(),
        }
    }

    fn nudge(&mut self, delta: f64) {
        let target = self.player.slider_value() + delta;
        self.player.slider_moved(target);
    }

    fn drag_to(&mut self, ratio: f64) {
        let target = ratio * self.player.controls().slider_max;
        self.player.slider_moved(target);
    }

    fn select_file(&mut self) {
        let file = self.explorer.current();
        if !file.is_file() {
            return;
        }
        let path = file.path().to_path_buf();
        if !file_reader::is_wav(&path) {
            debug!(path = %path.display(), "not a wav file");
            return;
        }
        self.show_explorer = false;
        self.open(&path);
    }

    /// Failures leave the previous state alone; the user just does not get
    /// a playable file.
    fn open(&mut self, path: &Path) {
        let Some(output) = &self.output else {
            warn!(path = %path.display(), "no audio output, not loading");
            return;
        };
        let audio = match read_audio(path) {
            Ok(audio) => audio,
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot play file");
                return;
            }
        };
        let source = self.player.engine_mut().load(&audio);
        output.play(source);
        self.player.file_loaded(audio.file_name());
        info!(
            path = %path.display(),
            length = self.player.engine().length_in_seconds(),
            "opened"
        );
    }

    fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
        let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);
        area
    }
}

pub fn run(app: App) -> Result<()> {
    let terminal = ratatui::init();
    if let Err(err) = execute!(stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(err.into());
    }
    let app_result = app.run(terminal);
    if let Err(err) = execute!(stdout(), DisableMouseCapture) {
        warn!(%err, "cannot disable mouse capture");
    }
    ratatui::restore();
    app_result
}
