//! Input buffering between the UI thread and the simulation
//!
//! The UI side pushes raw events into an `InputQueue` as they arrive. At the
//! start of every tick the loop swaps the buffer out as an immutable
//! `InputBatch`, so the simulation never observes a half-filled buffer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Stop,
    Other(char),
}

impl Key {
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Key::Left | Key::Right | Key::Up | Key::Down | Key::Stop
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Pressed,
    Released,
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub pos: Vec2,
    pub button: u8,
    pub kind: MouseKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

/// Events captured since the previous tick, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputBatch {
    pub keys: VecDeque<KeyEvent>,
    pub mouse: Vec<MouseEvent>,
}

impl InputBatch {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.mouse.is_empty()
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => self.keys.push_back(key),
            InputEvent::Mouse(mouse) => self.mouse.push(mouse),
        }
    }
}

/// Shared producer side of the input buffer
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: Arc<Mutex<InputBatch>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InputBatch> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, event: InputEvent) {
        self.lock().push(event);
    }

    pub fn push_key(&self, event: KeyEvent) {
        self.push(InputEvent::Key(event));
    }

    /// Swap out everything buffered so far.
    pub fn take_batch(&self) -> InputBatch {
        std::mem::take(&mut *self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_keeps_arrival_order() {
        let queue = InputQueue::new();
        let producer = queue.clone();
        producer.push_key(KeyEvent::pressed(Key::Left));
        producer.push_key(KeyEvent::pressed(Key::Right));
        producer.push(InputEvent::Mouse(MouseEvent {
            pos: Vec2::new(3.0, 4.0),
            button: 1,
            kind: MouseKind::Pressed,
        }));

        let batch = queue.take_batch();
        assert_eq!(
            batch.keys.iter().map(|e| e.key).collect::<Vec<_>>(),
            vec![Key::Left, Key::Right]
        );
        assert_eq!(batch.mouse.len(), 1);
        assert!(queue.take_batch().is_empty());
    }

    #[test]
    fn test_producer_on_other_thread() {
        let queue = InputQueue::new();
        let producer = queue.clone();
        std::thread::spawn(move || {
            for _ in 0..10 {
                producer.push_key(KeyEvent::pressed(Key::Fire));
            }
        })
        .join()
        .unwrap();
        assert_eq!(queue.take_batch().keys.len(), 10);
    }
}
