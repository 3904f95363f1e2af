//! Painter for runs without a window

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::frame::Painter;
use crate::renderer::DisplayList;

/// Counts frames and logs a summary of each at trace level.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPainter {
    frames: Arc<AtomicU64>,
}

impl HeadlessPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter of painted frames
    pub fn counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.frames)
    }
}

impl Painter for HeadlessPainter {
    fn paint(&mut self, frame: &DisplayList) {
        let n = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        log::trace!("Frame {n}: {} draw commands", frame.len());
        if let Some(status) = frame.texts().next() {
            log::trace!("Frame {n} first text: {status}");
        }
    }
}
