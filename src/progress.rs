//! Progress observation for the worker pool
//!
//! The pool publishes `ProgressEvent`s to a `ProgressObserver`; it never
//! knows how (or whether) they are displayed. Observers must not block.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Events published by the worker pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Processing begins
    Started { total: usize, workers: usize },
    /// A worker changed what it is doing
    Status { worker: usize, status: String },
    /// A worker finished one entry
    Finished {
        worker: usize,
        name: String,
        finished: usize,
        total: usize,
    },
    /// Every entry has been processed
    Completed { total: usize },
}

/// Receiver of progress events
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Point-in-time view of a `ProgressTracker`
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub finished: usize,
    pub total: usize,
    /// Latest status per worker slot
    pub statuses: Vec<String>,
}

impl ProgressSnapshot {
    /// Completion percentage (100 when there is nothing to do)
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.finished as f64 * 100.0 / self.total as f64
    }
}

/// Observer that keeps counters and per-worker status for pollers
#[derive(Debug, Default)]
pub struct ProgressTracker {
    finished: AtomicUsize,
    total: AtomicUsize,
    slots: Mutex<Vec<String>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters and statuses
    pub fn snapshot(&self) -> ProgressSnapshot {
        let statuses = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        ProgressSnapshot {
            finished: self.finished.load(Ordering::Acquire),
            total: self.total.load(Ordering::Acquire),
            statuses,
        }
    }

    fn set_status(&self, worker: usize, status: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if worker >= slots.len() {
            slots.resize(worker + 1, String::new());
        }
        slots[worker] = status.to_string();
    }
}

impl ProgressObserver for ProgressTracker {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { total, workers } => {
                self.total.store(*total, Ordering::Release);
                self.finished.store(0, Ordering::Release);
                let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
                *slots = vec![String::new(); *workers];
            }
            ProgressEvent::Status { worker, status } => self.set_status(*worker, status),
            ProgressEvent::Finished {
                worker, finished, ..
            } => {
                self.finished.fetch_max(*finished, Ordering::AcqRel);
                self.set_status(*worker, "idle");
            }
            ProgressEvent::Completed { total } => {
                self.finished.store(*total, Ordering::Release);
            }
        }
    }
}

/// Terminal progress bar on stderr
///
/// Keeps its own `ProgressTracker` so the bar always reflects the highest
/// finished count seen.
pub struct ProgressRenderer {
    bar: ProgressBar,
    tracker: ProgressTracker,
}

impl ProgressRenderer {
    /// Create a renderer; a disabled renderer draws nothing
    pub fn new(enabled: bool) -> Self {
        let target = if enabled {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(0), target);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
        {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        Self {
            bar,
            tracker: ProgressTracker::new(),
        }
    }

    /// Create a renderer that draws nothing
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Counters behind the bar
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }
}

impl ProgressObserver for ProgressRenderer {
    fn on_event(&self, event: &ProgressEvent) {
        self.tracker.on_event(event);
        match event {
            ProgressEvent::Started { total, .. } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
                self.bar.set_message("Checking dependencies");
                self.bar.enable_steady_tick(Duration::from_millis(100));
            }
            ProgressEvent::Status { worker, status } => {
                self.bar.set_message(format!("[{}] {}", worker, status));
            }
            ProgressEvent::Finished { .. } => {
                self.bar.set_position(self.tracker.snapshot().finished as u64);
            }
            ProgressEvent::Completed { .. } => self.bar.finish_and_clear(),
        }
    }
}
