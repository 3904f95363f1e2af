//! Audio dispatch
//!
//! The simulation only names cues. Playback happens on a worker thread so a
//! slow or failing backend never stalls a tick; requests are fire-and-forget.

use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use crate::error::EngineError;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Enemy destroyed
    Smash,
    /// Player shot fired
    Laser,
}

impl SoundCue {
    /// Clip file played for this cue
    pub fn clip_name(self) -> &'static str {
        match self {
            SoundCue::Smash => "smash.wav",
            SoundCue::Laser => "laser.wav",
        }
    }
}

/// Receiver of sound requests from the game loop
pub trait AudioSink {
    fn play(&self, cue: SoundCue);
}

/// Backend that actually renders a clip
pub trait ClipPlayer: Send {
    fn play_clip(&mut self, clip: &str, volume: f32) -> Result<(), EngineError>;
}

/// Backend for headless runs: records the request in the log only
#[derive(Debug, Default)]
pub struct LogPlayer;

impl ClipPlayer for LogPlayer {
    fn play_clip(&mut self, clip: &str, volume: f32) -> Result<(), EngineError> {
        log::debug!("Playing {clip} at volume {volume:.2}");
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    tx: Option<Sender<(SoundCue, f32)>>,
    worker: Option<JoinHandle<()>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(mut player: Box<dyn ClipPlayer>) -> Self {
        let (tx, rx) = mpsc::channel::<(SoundCue, f32)>();
        let worker = std::thread::Builder::new()
            .name("audio".into())
            .spawn(move || {
                for (cue, volume) in rx {
                    if let Err(e) = player.play_clip(cue.clip_name(), volume) {
                        log::warn!("Sound {cue:?} failed: {e}");
                    }
                }
            });

        let (tx, worker) = match worker {
            Ok(handle) => (Some(tx), Some(handle)),
            Err(e) => {
                log::warn!("Failed to start audio thread - audio disabled: {e}");
                (None, None)
            }
        };

        Self {
            tx,
            worker,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(tx) = &self.tx else { return };
        if tx.send((cue, vol)).is_err() {
            log::warn!("Audio thread gone, dropping {cue:?}");
        }
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        // closing the channel ends the worker loop
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Audio thread panicked");
            }
        }
    }
}
