//! Arcade Playground entry point
//!
//! Headless runner: loads settings, wires the boundary services and runs a
//! campaign until it ends or the frame limit is reached.
//!
//! Usage: `arcade-playground [settings.json] [shooter|breakout]`

use std::path::PathBuf;

use arcade_playground::assets::DescriptorLoader;
use arcade_playground::audio::{AudioManager, LogPlayer};
use arcade_playground::highscores::FileScoreStore;
use arcade_playground::levels::{Services, breakout_campaign, shooter_campaign};
use arcade_playground::platform::{Command, FramePresenter, HeadlessPainter};
use arcade_playground::{GameLoop, Settings};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arcade Playground (headless) starting...");

    let mut settings_path = PathBuf::from("settings.json");
    let mut campaign = "shooter".to_string();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "shooter" | "breakout" => campaign = arg,
            _ => settings_path = PathBuf::from(arg),
        }
    }

    let settings = Settings::load(&settings_path);
    let levels = if campaign == "breakout" {
        breakout_campaign()
    } else {
        shooter_campaign()
    };
    log::info!("Campaign '{campaign}' with {} levels", levels.len());

    let services = Services::new(
        FileScoreStore::open(&settings.highscore_path),
        DescriptorLoader::new(&settings.asset_dir),
    );

    let mut audio = AudioManager::new(Box::new(LogPlayer));
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let painter = HeadlessPainter::new();
    let painted = painter.counter();
    let presenter = FramePresenter::new(Box::new(painter));

    let autostart = settings.autostart;
    let mut game = GameLoop::new(levels, services, Box::new(audio), Box::new(presenter), settings);
    if autostart {
        game.commands().post(Command::NewGame);
    }

    if let Err(e) = game.run() {
        log::error!("Game stopped: {e}");
    }
    drop(game);
    log::info!(
        "Painted {} frames",
        painted.load(std::sync::atomic::Ordering::Relaxed)
    );
}
