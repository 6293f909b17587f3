//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

// == Sweeper ==
/// Handle to a running sweep thread.
///
/// Dropping the handle signals the thread to stop and joins it, so a
/// discarded cache instance never leaks its sweeper.
#[derive(Debug)]
pub struct Sweeper {
    stop_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        // The send fails only if the thread already exited.
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawns a background thread that runs `sweep` every `interval`.
///
/// The closure returns the number of entries it removed, which is logged.
/// The thread sleeps on a channel so a stop signal interrupts the wait
/// immediately instead of after the next tick.
///
/// # Arguments
/// * `interval` - Time between sweep runs
/// * `sweep` - Callback that evicts expired entries and reports the count
pub fn spawn_sweep_task<F>(interval: Duration, mut sweep: F) -> Sweeper
where
    F: FnMut() -> usize + Send + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        info!(interval_secs = interval.as_secs(), "starting TTL sweep task");

        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let removed = sweep();
                    if removed > 0 {
                        info!(removed, "TTL sweep removed expired entries");
                    } else {
                        debug!("TTL sweep found no expired entries");
                    }
                }
                // Stop signal or sender dropped
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!("TTL sweep task stopping");
                    break;
                }
            }
        }
    });

    Sweeper {
        stop_tx,
        handle: Some(handle),
    }
}
