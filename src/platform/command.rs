//! UI commands to the game loop
//!
//! A single slot: the UI posts, the loop polls once per frame and
//! acknowledges after acting. A newer command posted in between is kept.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Reset,
    TogglePause,
    Save,
    Load,
    Quit,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::NewGame => "new_game",
            Command::Reset => "reset",
            Command::TogglePause => "toggle_pause",
            Command::Save => "save",
            Command::Load => "load",
            Command::Quit => "quit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new_game" | "new" => Some(Command::NewGame),
            "reset" => Some(Command::Reset),
            "toggle_pause" | "pause" => Some(Command::TogglePause),
            "save" => Some(Command::Save),
            "load" => Some(Command::Load),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandSlot {
    slot: Arc<Mutex<Option<Command>>>,
}

impl CommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Command>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace any unhandled command.
    pub fn post(&self, command: Command) {
        log::debug!("Command posted: {}", command.as_str());
        *self.lock() = Some(command);
    }

    /// Current command, left in place until acknowledged.
    pub fn poll(&self) -> Option<Command> {
        *self.lock()
    }

    /// Clear the slot if it still holds `handled`.
    pub fn acknowledge(&self, handled: Command) {
        let mut slot = self.lock();
        if *slot == Some(handled) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_then_acknowledge() {
        let slot = CommandSlot::new();
        let ui = slot.clone();
        ui.post(Command::TogglePause);

        assert_eq!(slot.poll(), Some(Command::TogglePause));
        assert_eq!(slot.poll(), Some(Command::TogglePause));
        slot.acknowledge(Command::TogglePause);
        assert_eq!(slot.poll(), None);
    }

    #[test]
    fn test_newer_command_survives_stale_ack() {
        let slot = CommandSlot::new();
        slot.post(Command::Reset);
        let seen = slot.poll().unwrap();
        slot.post(Command::Quit);
        slot.acknowledge(seen);
        assert_eq!(slot.poll(), Some(Command::Quit));
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::from_str("Pause"), Some(Command::TogglePause));
        assert_eq!(Command::from_str(Command::NewGame.as_str()), Some(Command::NewGame));
        assert_eq!(Command::from_str("dance"), None);
    }
}
