//! Background eviction of expired entries.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::Shared;

/// Lifecycle of a cache's sweep thread.
pub(crate) enum SweepState {
    /// No sweep yet, or stopped by `close`. The next `put` starts one.
    Idle,
    Running(Sweeper),
    /// The thread could not be spawned. Entries expire only on access and
    /// no further spawn is attempted.
    Unavailable,
}

impl SweepState {
    /// Start the sweep unless it is running or has failed before.
    pub(crate) fn ensure_started<T, E>(&mut self, shared: &Arc<Shared<T, E>>)
    where
        T: Send + Sync + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        if matches!(self, SweepState::Idle) {
            *self = Sweeper::start(Arc::clone(shared))
                .map_or(SweepState::Unavailable, SweepState::Running);
        }
    }

    /// Stop a running sweep and return to `Idle`. `Unavailable` stays.
    pub(crate) fn stop(&mut self) {
        match std::mem::replace(self, SweepState::Idle) {
            SweepState::Running(sweeper) => sweeper.stop(),
            SweepState::Unavailable => *self = SweepState::Unavailable,
            SweepState::Idle => {}
        }
    }
}

/// Handle to the running sweep thread.
pub(crate) struct Sweeper {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn the sweep. Returns `None` if the thread cannot be started.
    fn start<T, E>(shared: Arc<Shared<T, E>>) -> Option<Self>
    where
        T: Send + Sync + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let (cancel, cancelled) = channel::bounded::<()>(1);
        let interval = shared.config.sweep_interval;
        let spawned = thread::Builder::new()
            .name("parsley-conncache-sweep".into())
            .spawn(move || {
                debug!(?interval, "connection sweep started");
                loop {
                    match cancelled.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            shared.evict_stale();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("connection sweep stopped");
            });
        match spawned {
            Ok(handle) => Some(Sweeper { cancel, handle }),
            Err(error) => {
                warn!(%error, "could not start connection sweep");
                None
            }
        }
    }

    /// Signal the thread and wait for it to finish.
    fn stop(self) {
        let _ = self.cancel.send(());
        if self.handle.join().is_err() {
            warn!("connection sweep thread panicked");
        }
    }
}
