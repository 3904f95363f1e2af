//! Game loop orchestrator
//!
//! Outer loop: the ordered list of levels. Inner loop: one frame at a time,
//! poll the command slot, hand the buffered input to the playground, advance
//! objects and level logic unless paused, apply the mutations queued by the
//! logic, dispatch sounds, then render. The
//! render call blocks while the previous frame is still being painted.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::audio::AudioSink;
use crate::error::EngineError;
use crate::levels::{Level, Services};
use crate::platform::{Command, CommandSlot, InputQueue, Presenter};
use crate::renderer::DisplayList;
use crate::settings::Settings;
use crate::sim::{FlagScope, GameEvent, Playground};

/// What a single frame ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No level is active; waiting for a command
    Idle,
    /// The current level advanced one frame
    Running,
    /// The current level ended and the next one was prepared
    LevelEnded,
    /// Quit requested, game over, or the campaign is complete
    Quit,
}

pub struct GameLoop {
    levels: Vec<Box<dyn Level>>,
    current: Option<usize>,
    playground: Playground,
    services: Services,
    audio: Box<dyn AudioSink>,
    presenter: Box<dyn Presenter>,
    commands: CommandSlot,
    input: InputQueue,
    settings: Settings,
    frames: u64,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

impl GameLoop {
    pub fn new(
        levels: Vec<Box<dyn Level>>,
        services: Services,
        audio: Box<dyn AudioSink>,
        presenter: Box<dyn Presenter>,
        settings: Settings,
    ) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("Game loop with {} levels, seed {seed}", levels.len());
        Self {
            levels,
            current: None,
            playground: Playground::new(seed),
            services,
            audio,
            presenter,
            commands: CommandSlot::new(),
            input: InputQueue::new(),
            settings,
            frames: 0,
        }
    }

    /// Handle for posting commands from another thread
    pub fn commands(&self) -> CommandSlot {
        self.commands.clone()
    }

    /// Handle for feeding input events from another thread
    pub fn input(&self) -> InputQueue {
        self.input.clone()
    }

    pub fn playground(&self) -> &Playground {
        &self.playground
    }

    pub fn playground_mut(&mut self) -> &mut Playground {
        &mut self.playground
    }

    pub fn current_level(&self) -> Option<&str> {
        self.current.map(|i| self.levels[i].name())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run frames at the configured rate until quit, game over, the end of
    /// the campaign, or the frame limit.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let budget = Duration::from_secs_f32(self.settings.frame_budget());
        let mut last = Instant::now();

        loop {
            let frame_start = Instant::now();
            let dt = frame_start
                .duration_since(last)
                .as_secs_f32()
                .min(self.settings.max_frame_dt);
            last = frame_start;

            if self.step(dt)? == FrameOutcome::Quit {
                break;
            }
            if self.settings.frame_limit.is_some_and(|limit| self.frames >= limit) {
                log::info!("Frame limit {} reached", self.frames);
                break;
            }

            let spent = frame_start.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }
        log::info!("Game loop finished after {} frames", self.frames);
        Ok(())
    }

    /// One frame with the given timestep in seconds.
    pub fn step(&mut self, dt: f32) -> Result<FrameOutcome, EngineError> {
        self.frames += 1;
        if self.handle_command()? {
            return Ok(FrameOutcome::Quit);
        }

        let batch = self.input.take_batch();
        let Some(idx) = self.current else {
            self.render();
            return Ok(FrameOutcome::Idle);
        };
        self.playground.process_input(batch);

        if !self.playground.is_paused() {
            self.playground.set_timestep(dt);
            let t = self.playground.game_time() + dt;
            self.playground.set_game_time(t);

            self.playground.update_objects();
            self.levels[idx].apply_game_logic(&mut self.playground, &mut self.services)?;
            // removals made by the level logic must not survive into the render
            self.playground.apply_pending();
            self.dispatch_events();
        }
        self.render();

        let level = &self.levels[idx];
        if level.game_over() || level.level_finished() {
            return self.finish_level(idx);
        }
        Ok(FrameOutcome::Running)
    }

    /// Handle the pending command, if any. Returns true on quit.
    fn handle_command(&mut self) -> Result<bool, EngineError> {
        let Some(command) = self.commands.poll() else {
            return Ok(false);
        };
        log::debug!("Handling command {}", command.as_str());

        let quit = match command {
            Command::NewGame => {
                self.playground.reset_flags(FlagScope::All);
                self.start_level(0)?;
                false
            }
            Command::Reset => {
                if let Some(idx) = self.current {
                    self.start_level(idx)?;
                }
                false
            }
            Command::TogglePause => {
                self.playground.toggle_pause();
                false
            }
            Command::Save | Command::Load => {
                log::warn!("Command '{}' is not supported", command.as_str());
                false
            }
            Command::Quit => true,
        };
        self.commands.acknowledge(command);
        Ok(quit)
    }

    fn start_level(&mut self, idx: usize) -> Result<(), EngineError> {
        let Some(level) = self.levels.get_mut(idx) else {
            log::warn!("No level {idx} to start");
            self.current = None;
            return Ok(());
        };
        log::info!("Starting level '{}'", level.name());
        self.playground.set_size(level.preferred_size());
        level.prepare(&mut self.playground, &mut self.services)?;
        self.current = Some(idx);
        Ok(())
    }

    fn finish_level(&mut self, idx: usize) -> Result<FrameOutcome, EngineError> {
        if self.levels[idx].game_over() {
            log::info!("Game over in level '{}'", self.levels[idx].name());
            self.current = None;
            return Ok(FrameOutcome::Quit);
        }

        log::info!("Level '{}' finished", self.levels[idx].name());
        let next = idx + 1;
        if next >= self.levels.len() {
            log::info!("All levels done");
            self.current = None;
            return Ok(FrameOutcome::Quit);
        }
        self.start_level(next)?;
        Ok(FrameOutcome::LevelEnded)
    }

    fn dispatch_events(&mut self) {
        for event in self.playground.drain_events() {
            match event {
                GameEvent::Sound(cue) => self.audio.play(cue),
            }
        }
    }

    fn render(&mut self) {
        let mut frame = DisplayList::new();
        if let Some(idx) = self.current {
            self.levels[idx].draw_level(&self.playground, &mut frame);
            self.playground.draw_objects(&mut frame);
        }
        self.presenter.present(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    use glam::Vec2;

    use crate::assets::DescriptorLoader;
    use crate::audio::SoundCue;
    use crate::highscores::MemoryScoreStore;
    use crate::levels::breakout_campaign;
    use crate::platform::{FramePresenter, HeadlessPainter, Key, KeyEvent};
    use crate::renderer::RenderSink;
    use crate::sim::flags::names;
    use crate::sim::{GameObject, ObjectTag};

    /// Finishes (or loses) after a fixed number of logic ticks and plays a
    /// sound on each one.
    struct Countdown {
        name: &'static str,
        ticks: u32,
        left: u32,
        lose: bool,
    }

    impl Countdown {
        fn boxed(name: &'static str, ticks: u32, lose: bool) -> Box<dyn Level> {
            Box::new(Self {
                name,
                ticks,
                left: ticks,
                lose,
            })
        }
    }

    impl Level for Countdown {
        fn name(&self) -> &str {
            self.name
        }

        fn preferred_size(&self) -> Vec2 {
            Vec2::new(300.0, 200.0)
        }

        fn prepare(&mut self, pg: &mut Playground, _services: &mut Services) -> Result<(), EngineError> {
            pg.prepare(self.name);
            pg.global_int_or(names::POINTS, 0)?;
            self.left = self.ticks;
            Ok(())
        }

        fn apply_game_logic(&mut self, pg: &mut Playground, _services: &mut Services) -> Result<(), EngineError> {
            self.left = self.left.saturating_sub(1);
            pg.add_to_global(names::POINTS, 1)?;
            pg.emit(GameEvent::Sound(SoundCue::Smash));
            Ok(())
        }

        fn level_finished(&self) -> bool {
            self.left == 0 && !self.lose
        }

        fn game_over(&self) -> bool {
            self.left == 0 && self.lose
        }

        fn draw_level(&self, _pg: &Playground, sink: &mut dyn RenderSink) {
            sink.draw_text(Vec2::ZERO, self.name, 10.0, crate::renderer::colors::HUD);
        }
    }

    /// Places one target on prepare and removes it in its first logic tick.
    struct Sweeper;

    impl Level for Sweeper {
        fn name(&self) -> &str {
            "sweeper"
        }

        fn preferred_size(&self) -> Vec2 {
            Vec2::new(300.0, 200.0)
        }

        fn prepare(&mut self, pg: &mut Playground, _services: &mut Services) -> Result<(), EngineError> {
            pg.prepare("sweeper");
            pg.add_object_now(GameObject::new("target", ObjectTag::Enemy, Vec2::new(50.0, 50.0), Vec2::ZERO));
            Ok(())
        }

        fn apply_game_logic(&mut self, pg: &mut Playground, _services: &mut Services) -> Result<(), EngineError> {
            if pg.object("target").is_some() {
                pg.delete_object("target");
            }
            Ok(())
        }

        fn level_finished(&self) -> bool {
            false
        }

        fn game_over(&self) -> bool {
            false
        }

        fn draw_level(&self, _pg: &Playground, _sink: &mut dyn RenderSink) {}
    }

    #[derive(Clone, Default)]
    struct Sounds(Arc<Mutex<Vec<SoundCue>>>);

    impl AudioSink for Sounds {
        fn play(&self, cue: SoundCue) {
            self.0.lock().unwrap().push(cue);
        }
    }

    #[derive(Clone, Default)]
    struct Frames(Arc<Mutex<Vec<DisplayList>>>);

    impl Presenter for Frames {
        fn present(&mut self, frame: DisplayList) {
            self.0.lock().unwrap().push(frame);
        }
    }

    fn settings() -> Settings {
        Settings {
            seed: Some(11),
            target_fps: 1000,
            autostart: false,
            ..Settings::default()
        }
    }

    fn game(levels: Vec<Box<dyn Level>>) -> (GameLoop, Sounds, Frames) {
        let sounds = Sounds::default();
        let frames = Frames::default();
        let services = Services::new(MemoryScoreStore::new(0), DescriptorLoader::new("no-such-asset-dir"));
        let game = GameLoop::new(
            levels,
            services,
            Box::new(sounds.clone()),
            Box::new(frames.clone()),
            settings(),
        );
        (game, sounds, frames)
    }

    #[test]
    fn test_idle_until_new_game() {
        let (mut game, _sounds, frames) = game(vec![Countdown::boxed("a", 3, false)]);
        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Idle);
        assert_eq!(game.current_level(), None);

        game.commands().post(Command::NewGame);
        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Running);
        assert_eq!(game.current_level(), Some("a"));
        assert_eq!(game.commands().poll(), None);
        assert_eq!(game.playground().size(), Vec2::new(300.0, 200.0));
        assert_eq!(frames.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_levels_advance_then_campaign_ends() {
        let (mut game, _sounds, _frames) =
            game(vec![Countdown::boxed("a", 2, false), Countdown::boxed("b", 1, false)]);
        game.commands().post(Command::NewGame);

        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Running);
        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::LevelEnded);
        assert_eq!(game.current_level(), Some("b"));
        // points are global and survive the level change
        assert_eq!(game.playground().global_int(names::POINTS).unwrap(), 2);

        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Quit);
        assert_eq!(game.current_level(), None);
        assert_eq!(game.playground().global_int(names::POINTS).unwrap(), 3);
    }

    #[test]
    fn test_game_over_stops_campaign() {
        let (mut game, _sounds, _frames) =
            game(vec![Countdown::boxed("a", 1, true), Countdown::boxed("b", 1, false)]);
        game.commands().post(Command::NewGame);
        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Quit);
        assert_eq!(game.current_level(), None);
    }

    #[test]
    fn test_pause_freezes_time_and_logic() {
        let (mut game, sounds, frames) = game(vec![Countdown::boxed("a", 10, false)]);
        game.commands().post(Command::NewGame);
        game.step(0.01).unwrap();
        let t = game.playground().game_time();

        game.commands().post(Command::TogglePause);
        assert_eq!(game.step(0.5).unwrap(), FrameOutcome::Running);
        assert_eq!(game.playground().game_time(), t);
        assert_eq!(sounds.0.lock().unwrap().len(), 1);
        // paused frames are still rendered
        assert_eq!(frames.0.lock().unwrap().len(), 2);

        game.commands().post(Command::TogglePause);
        game.step(0.5).unwrap();
        assert!((game.playground().game_time() - (t + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_logic_deletions_gone_before_next_tick() {
        let (mut game, _sounds, _frames) = game(vec![Box::new(Sweeper)]);
        game.commands().post(Command::NewGame);
        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Running);
        assert!(game.playground().object("target").is_none());
        assert_eq!(game.playground().object_count(), 0);
    }

    #[test]
    fn test_new_game_restarts_clock() {
        let (mut game, _sounds, _frames) = game(vec![Countdown::boxed("a", 10, false)]);
        game.commands().post(Command::NewGame);
        game.step(0.5).unwrap();
        game.step(0.5).unwrap();
        assert!((game.playground().game_time() - 1.0).abs() < 1e-6);

        game.commands().post(Command::NewGame);
        game.step(0.25).unwrap();
        assert!((game.playground().game_time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_new_game_resets_global_flags() {
        let (mut game, _sounds, _frames) = game(vec![Countdown::boxed("a", 10, false)]);
        game.commands().post(Command::NewGame);
        game.step(0.01).unwrap();
        game.step(0.01).unwrap();
        assert_eq!(game.playground().global_int(names::POINTS).unwrap(), 2);

        game.commands().post(Command::NewGame);
        game.step(0.01).unwrap();
        assert_eq!(game.playground().global_int(names::POINTS).unwrap(), 1);
    }

    #[test]
    fn test_quit_and_unsupported_commands() {
        let (mut game, _sounds, _frames) = game(vec![Countdown::boxed("a", 10, false)]);
        game.commands().post(Command::Save);
        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Idle);
        assert_eq!(game.commands().poll(), None);

        game.commands().post(Command::Quit);
        assert_eq!(game.step(0.01).unwrap(), FrameOutcome::Quit);
    }

    #[test]
    fn test_sounds_reach_audio_sink() {
        let (mut game, sounds, _frames) = game(vec![Countdown::boxed("a", 10, false)]);
        game.commands().post(Command::NewGame);
        game.step(0.01).unwrap();
        game.step(0.01).unwrap();
        assert_eq!(*sounds.0.lock().unwrap(), vec![SoundCue::Smash, SoundCue::Smash]);
    }

    #[test]
    fn test_input_reaches_paddle() {
        let (mut game, _sounds, _frames) = game(breakout_campaign());
        game.commands().post(Command::NewGame);
        game.step(0.0).unwrap();
        let x = game.playground().object(crate::sim::EGO_ID).unwrap().pos().x;

        game.input().push_key(KeyEvent::pressed(Key::Left));
        game.step(0.1).unwrap();
        let moved = game.playground().object(crate::sim::EGO_ID).unwrap().pos().x;
        assert!((moved - (x - 22.0)).abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_level() {
        let (mut game, _sounds, _frames) = game(breakout_campaign());
        game.commands().post(Command::NewGame);
        game.step(0.0).unwrap();
        game.playground_mut().delete_object_now("brick0/0");
        assert_eq!(game.playground().collect_objects(ObjectTag::Brick, false).len(), 8);

        game.commands().post(Command::Reset);
        game.step(0.0).unwrap();
        assert_eq!(game.playground().collect_objects(ObjectTag::Brick, false).len(), 9);
    }

    #[test]
    fn test_run_honours_frame_limit() {
        let painter = HeadlessPainter::new();
        let painted = painter.counter();
        {
            let services = Services::new(MemoryScoreStore::new(0), DescriptorLoader::new("no-such-asset-dir"));
            let mut game = GameLoop::new(
                breakout_campaign(),
                services,
                Box::new(Sounds::default()),
                Box::new(FramePresenter::new(Box::new(painter))),
                Settings {
                    frame_limit: Some(5),
                    autostart: true,
                    ..settings()
                },
            );
            game.commands().post(Command::NewGame);
            game.run().unwrap();
            assert_eq!(game.frames(), 5);
            assert_eq!(game.current_level(), Some("breakout"));
        } // dropping the presenter joins the paint thread
        assert_eq!(painted.load(Ordering::SeqCst), 5);
    }
}
