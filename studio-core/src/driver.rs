//! Real-time playback driver.
//!
//! Spawns a tokio task that calls [`EditorStore::tick_playback`] once per
//! configured tick period. The task watches the store and exits as soon as
//! playback stops, even between ticks, and the returned [`PlaybackDriver`]
//! shuts it down when stopped or dropped, so no timer outlives its owner.

use std::sync::Arc;

use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;

use crate::playback::TickOutcome;
use crate::store::{EditorStore, SubscriptionId};

/// Store subscription removed when the task ends or is aborted.
struct PauseWatch {
    store: EditorStore,
    id: SubscriptionId,
}

impl PauseWatch {
    fn new(store: &EditorStore, stopped: Arc<Notify>) -> Self {
        let id = store.subscribe(move |_, state| {
            if !state.is_playing() {
                stopped.notify_one();
            }
        });
        Self {
            store: store.clone(),
            id,
        }
    }
}

impl Drop for PauseWatch {
    fn drop(&mut self) {
        self.store.unsubscribe(self.id);
    }
}

/// Handle to a running playback task.
#[derive(Debug)]
pub struct PlaybackDriver {
    handle: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl PlaybackDriver {
    /// Spawn the tick task for `store`.
    ///
    /// Must be called from within a tokio runtime. The task does nothing but
    /// exit if the store is not playing, and exits on the first change that
    /// leaves the store paused.
    #[must_use]
    pub fn spawn(store: EditorStore) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let period = store.config().tick_interval();

        let stopped = Arc::new(Notify::new());
        let watch = PauseWatch::new(&store, Arc::clone(&stopped));

        let handle = tokio::spawn(async move {
            let _watch = watch;
            let mut ticker = tokio::time::interval(period);
            // Don't fire immediately on start
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Playback driver received shutdown signal");
                        break;
                    }

                    () = stopped.notified() => {
                        tracing::debug!("Playback paused, driver exiting");
                        break;
                    }

                    _ = ticker.tick() => {
                        match store.tick_playback() {
                            Some(TickOutcome::Advanced(_)) => {}
                            Some(TickOutcome::Finished) => {
                                tracing::debug!("Playback reached end of page");
                                break;
                            }
                            None => {
                                tracing::debug!("Playback stopped, driver exiting");
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Start playback if needed and spawn a driver for it.
    #[must_use]
    pub fn play(store: EditorStore) -> Self {
        if !store.snapshot().is_playing() {
            store.toggle_play();
        }
        Self::spawn(store)
    }

    /// Whether the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the task without touching the store's playing flag.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Wait for the task to exit on its own.
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Playback driver task failed");
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Abort as backup
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
