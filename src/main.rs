mod audio_device;
mod audio_player;
mod builtin_themes;
mod config;
mod controls;
mod file_reader;
mod logging;
mod player;
mod reporter;
mod seek;
mod transport;
mod tui;
use crate::audio_device::AudioOutput;
use crate::audio_player::{Deck, EngineEvent};
use crate::config::Config;
use crate::player::Player;
use crate::seek::SeekRequest;
use color_eyre::Result;
use crossbeam::channel::unbounded;
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    logging::init(&config.log)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting wavdeck");

    // the deck reports status changes here; the tui drains them on its own thread
    let (engine_tx, engine_rx) = unbounded::<EngineEvent>();

    // slider value and pending-seek flag, shared with the audio callback
    let seek = Arc::new(SeekRequest::new());

    // without an output the app still runs, files just never become playable
    let output = match AudioOutput::open(config.playback.output_device.as_deref()) {
        Ok(output) => Some(output),
        Err(err) => {
            warn!("{err:#}");
            None
        }
    };

    let deck = Deck::new(Arc::clone(&seek), engine_tx, config.playback.block_frames);
    let player = Player::new(deck, seek, config.playback.tick_interval());
    let app = tui::App::new(
        player,
        output,
        engine_rx,
        &config.ui,
        config.playback.seek_step_secs,
    )?;
    let result = tui::run(app);
    info!("bye");
    result
}
