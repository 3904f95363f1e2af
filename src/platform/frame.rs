//! Paint back-pressure
//!
//! The loop records a frame, then waits until the painter has finished the
//! previous one before handing it over. At most one frame is in flight.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::renderer::DisplayList;

/// One-frame handshake between the loop and the paint thread
#[derive(Debug, Default)]
pub struct FrameGate {
    busy: Mutex<bool>,
    idle: Condvar,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until no frame is in flight, then claim the gate.
    pub fn acquire(&self) {
        let mut busy = self.busy.lock().unwrap_or_else(|p| p.into_inner());
        while *busy {
            busy = self.idle.wait(busy).unwrap_or_else(|p| p.into_inner());
        }
        *busy = true;
    }

    /// Mark the in-flight frame as painted.
    pub fn release(&self) {
        let mut busy = self.busy.lock().unwrap_or_else(|p| p.into_inner());
        *busy = false;
        self.idle.notify_all();
    }

    /// Block until the in-flight frame, if any, is painted.
    pub fn wait_idle(&self) {
        let mut busy = self.busy.lock().unwrap_or_else(|p| p.into_inner());
        while *busy {
            busy = self.idle.wait(busy).unwrap_or_else(|p| p.into_inner());
        }
    }
}

/// Turns recorded frames into pixels (or whatever the backend does)
pub trait Painter: Send {
    fn paint(&mut self, frame: &DisplayList);
}

/// Destination for finished frames
pub trait Presenter {
    fn present(&mut self, frame: DisplayList);
}

/// Presents frames on a dedicated paint thread, gated by `FrameGate`.
pub struct FramePresenter {
    gate: Arc<FrameGate>,
    tx: Option<Sender<DisplayList>>,
    worker: Option<JoinHandle<()>>,
}

impl FramePresenter {
    pub fn new(mut painter: Box<dyn Painter>) -> Self {
        let gate = Arc::new(FrameGate::new());
        let (tx, rx) = mpsc::channel::<DisplayList>();
        let worker_gate = Arc::clone(&gate);

        let worker = std::thread::Builder::new()
            .name("paint".into())
            .spawn(move || {
                for frame in rx {
                    painter.paint(&frame);
                    worker_gate.release();
                }
            });
        let (tx, worker) = match worker {
            Ok(handle) => (Some(tx), Some(handle)),
            Err(e) => {
                log::error!("Failed to start paint thread - frames will be dropped: {e}");
                (None, None)
            }
        };

        Self { gate, tx, worker }
    }

    pub fn submit(&self, frame: DisplayList) {
        let Some(tx) = &self.tx else { return };
        self.gate.acquire();
        if tx.send(frame).is_err() {
            log::warn!("Paint thread gone, frame dropped");
            self.gate.release();
        }
    }

    pub fn wait_idle(&self) {
        self.gate.wait_idle();
    }
}

impl Presenter for FramePresenter {
    fn present(&mut self, frame: DisplayList) {
        self.submit(frame);
    }
}

impl Drop for FramePresenter {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Paint thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SlowPainter {
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
        painted: Arc<AtomicUsize>,
    }

    impl Painter for SlowPainter {
        fn paint(&mut self, _frame: &DisplayList) {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.painted.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_one_frame_in_flight() {
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let painted = Arc::new(AtomicUsize::new(0));
        let presenter = FramePresenter::new(Box::new(SlowPainter {
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::clone(&max_in_flight),
            painted: Arc::clone(&painted),
        }));

        for _ in 0..5 {
            presenter.submit(DisplayList::new());
        }
        presenter.wait_idle();
        assert_eq!(painted.load(Ordering::SeqCst), 5);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_gate_release_wakes_waiter() {
        let gate = Arc::new(FrameGate::new());
        gate.acquire();
        let other = Arc::clone(&gate);
        let releaser = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(5));
            other.release();
        });
        gate.wait_idle();
        releaser.join().unwrap();
    }
}
