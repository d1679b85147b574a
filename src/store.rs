//! In-memory store with serial action processing and broadcast of applied actions

use crate::{
    actions::Action,
    state::{reduce, State},
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};

/// Capacity of the applied-actions broadcast channel
const APPLIED_CHANNEL_CAPACITY: usize = 256;

/// Single entry point for submitting actions
///
/// Dispatching never blocks and never fails from the caller's point of view.
pub trait Dispatch: Send + Sync {
    /// Submits an action for the reducer
    ///
    /// # Arguments
    /// * `action` - The state transition to apply
    fn dispatch(&self, action: Action);
}

/// Shared dispatch handle passed to coordinators
pub type DispatchHandle = Arc<dyn Dispatch>;

/// Dispatcher that queues actions for the store's reducer task
#[derive(Clone)]
pub struct StoreDispatcher {
    tx: mpsc::UnboundedSender<Action>,
}

impl Dispatch for StoreDispatcher {
    fn dispatch(&self, action: Action) {
        let kind = action.kind();
        if self.tx.send(action).is_err() {
            tracing::warn!(action = kind, "Store is shut down, dropping action");
        }
    }
}

/// In-memory store for the widget state
///
/// All mutations go through one reducer task that drains the action queue,
/// so actions are applied one at a time in the order they were dispatched.
pub struct Store {
    state: Arc<RwLock<State>>,
    dispatcher: StoreDispatcher,
    applied_tx: broadcast::Sender<Action>,
}

impl Store {
    /// Creates the store and starts its reducer task
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `initial_state` - State before any action is applied
    ///
    /// # Returns
    /// Shared handle to the running store
    pub fn start(initial_state: State) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (applied_tx, _) = broadcast::channel(APPLIED_CHANNEL_CAPACITY);
        let state = Arc::new(RwLock::new(initial_state));

        tokio::spawn(Self::run_reducer(state.clone(), rx, applied_tx.clone()));

        Arc::new(Self {
            state,
            dispatcher: StoreDispatcher { tx },
            applied_tx,
        })
    }

    async fn run_reducer(
        state: Arc<RwLock<State>>,
        mut rx: mpsc::UnboundedReceiver<Action>,
        applied_tx: broadcast::Sender<Action>,
    ) {
        tracing::debug!("Starting store reducer task");

        while let Some(action) = rx.recv().await {
            {
                let mut state = state.write().await;
                reduce(&mut state, &action);
            }
            tracing::trace!(action = %action, "Applied action");
            // No subscribers is fine
            let _ = applied_tx.send(action);
        }

        tracing::debug!("Store reducer task stopped");
    }

    /// Returns a dispatch handle for this store
    pub fn dispatcher(&self) -> DispatchHandle {
        Arc::new(self.dispatcher.clone())
    }

    /// Returns a snapshot of the current state
    ///
    /// Actions still queued behind the reducer are not reflected.
    pub async fn state(&self) -> State {
        self.state.read().await.clone()
    }

    /// Subscribes to actions after they have been applied
    ///
    /// # Returns
    /// A receiver that sees every action applied after this call; slow
    /// receivers lag rather than block the reducer
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.applied_tx.subscribe()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Dispatch handle that records every action
    #[derive(Default)]
    pub struct RecordingDispatch {
        actions: Mutex<Vec<Action>>,
        notify: Notify,
    }

    impl RecordingDispatch {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }

        /// Waits until at least `count` actions were recorded
        pub async fn wait_for(&self, count: usize) -> Vec<Action> {
            let wait = async {
                loop {
                    let notified = self.notify.notified();
                    if self.actions.lock().unwrap().len() >= count {
                        return;
                    }
                    notified.await;
                }
            };
            tokio::time::timeout(Duration::from_secs(5), wait)
                .await
                .expect("timed out waiting for actions");
            self.actions()
        }
    }

    impl Dispatch for RecordingDispatch {
        fn dispatch(&self, action: Action) {
            self.actions.lock().unwrap().push(action);
            self.notify.notify_waiters();
        }
    }
}
