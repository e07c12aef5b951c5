//! Directory watcher - turns file creations into file-ready events
//!
//! One `DirectoryWatcher` owns at most one active watch. The OS watcher
//! (via `notify`) delivers creation events on its own thread; each created
//! non-directory file becomes one `FileReadyEvent` pushed into the bounded
//! dispatcher channel. A periodic liveness tick verifies the watch handle
//! is still alive and rebuilds it when the backend has died, so detection
//! never stops silently.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::WatchError;
use crate::event::FileReadyEvent;

/// Interval of the liveness tick while a watch is active
pub const LIVENESS_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Shared slot holding the live OS watch handle
///
/// The tick task replaces the handle in place when it has to restart a dead
/// watcher; `stop_watch` empties the slot to release it.
type WatchSlot = Arc<Mutex<Option<RecommendedWatcher>>>;

// =============================================================================
// Watcher
// =============================================================================

/// Recursive file-creation watcher feeding the dispatcher channel
///
/// Must be used from within a tokio runtime; the liveness tick runs as a
/// background task for as long as the watch is active.
pub struct DirectoryWatcher {
    events: mpsc::Sender<FileReadyEvent>,
    tick_interval: Duration,
    active: Option<ActiveWatch>,
}

struct ActiveWatch {
    slot: WatchSlot,
    tick: JoinHandle<()>,
}

impl DirectoryWatcher {
    /// Create a watcher that submits into `events`
    pub fn new(events: mpsc::Sender<FileReadyEvent>) -> Self {
        Self {
            events,
            tick_interval: LIVENESS_TICK_INTERVAL,
            active: None,
        }
    }

    /// Shorten the liveness tick, for tests that exercise the rebuild path
    #[cfg(test)]
    fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
    }

    /// Begin recursive monitoring of `path` for file creations
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::AlreadyActive`] when a watch is running (call
    /// [`stop_watch`](Self::stop_watch) first) and [`WatchError::Unavailable`]
    /// when `path` is not an existing directory or the OS watch cannot be
    /// registered.
    pub fn start_watch(&mut self, path: &Path) -> Result<(), WatchError> {
        if self.active.is_some() {
            return Err(WatchError::AlreadyActive);
        }
        if !path.is_dir() {
            return Err(WatchError::Unavailable);
        }

        let healthy = Arc::new(AtomicBool::new(true));
        let watcher = build_watcher(path, self.events.clone(), healthy.clone())?;
        let slot: WatchSlot = Arc::new(Mutex::new(Some(watcher)));

        let tick = tokio::spawn(liveness_tick(
            path.to_path_buf(),
            slot.clone(),
            healthy,
            self.events.clone(),
            self.tick_interval,
        ));

        self.active = Some(ActiveWatch { slot, tick });
        Ok(())
    }

    /// Stop monitoring and release the OS watch handle
    ///
    /// Idempotent; safe to call when no watch is active. Cancels the
    /// liveness tick without waiting for any in-flight upload.
    pub fn stop_watch(&mut self) {
        if let Some(active) = self.active.take() {
            active.tick.abort();
            if let Ok(mut slot) = active.slot.lock() {
                slot.take();
            }
        }
    }

    /// Whether a watch is currently active
    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop_watch();
    }
}

// =============================================================================
// Backend
// =============================================================================

/// Register an OS watcher that forwards created files into `events`
///
/// The callback runs on the notify backend thread, so the blocking send is
/// safe and gives backpressure when the dispatcher backlog fills. Backend
/// errors flip the health flag for the tick task to act on.
fn build_watcher(
    path: &Path,
    events: mpsc::Sender<FileReadyEvent>,
    healthy: Arc<AtomicBool>,
) -> Result<RecommendedWatcher, WatchError> {
    let mut watcher = recommended_watcher(move |result: Result<Event, notify::Error>| {
        match result {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_)) {
                    return;
                }
                for path in event.paths {
                    // Only files are relayed; duplicates for the same path
                    // are tolerated downstream
                    if path.is_dir() {
                        continue;
                    }
                    let _ = events.blocking_send(FileReadyEvent::now(path));
                }
            }
            Err(_) => healthy.store(false, Ordering::Relaxed),
        }
    })
    .map_err(|_| WatchError::Unavailable)?;

    watcher
        .watch(path, RecursiveMode::Recursive)
        .map_err(|_| WatchError::Unavailable)?;

    Ok(watcher)
}

/// Periodic liveness check while a watch is active
///
/// The tick performs no file action itself. It verifies the watch handle is
/// still alive and rebuilds it if the backend reported an error or the
/// watched directory reappeared after vanishing.
async fn liveness_tick(
    path: PathBuf,
    slot: WatchSlot,
    healthy: Arc<AtomicBool>,
    events: mpsc::Sender<FileReadyEvent>,
    tick_interval: Duration,
) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if !path.is_dir() {
            // Nothing to rebuild against; flag it and keep checking
            healthy.store(false, Ordering::Relaxed);
            continue;
        }
        if healthy.load(Ordering::Relaxed) {
            continue;
        }

        // The backend died; replace the handle in place
        match build_watcher(&path, events.clone(), healthy.clone()) {
            Ok(watcher) => {
                if let Ok(mut slot) = slot.lock() {
                    *slot = Some(watcher);
                }
                healthy.store(true, Ordering::Relaxed);
            }
            Err(_) => {
                // Leave the flag down; retried on the next tick
                if let Ok(mut slot) = slot.lock() {
                    slot.take();
                }
            }
        }
    }
}
