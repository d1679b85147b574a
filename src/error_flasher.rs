//! Transient user-facing error messages

use crate::{
    actions::Action,
    constants::ERROR_FLASH_DURATION,
    store::DispatchHandle,
};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Shows an error message and hides it again after a delay
///
/// Only the most recent flash owns the hide timer: flashing a new message
/// cancels the pending hide of the previous one.
pub struct ErrorFlasher {
    display_duration: Duration,
    hide_task: Mutex<Option<JoinHandle<()>>>,
}

impl Default for ErrorFlasher {
    fn default() -> Self {
        Self::new(ERROR_FLASH_DURATION)
    }
}

impl ErrorFlasher {
    pub fn new(display_duration: Duration) -> Self {
        Self {
            display_duration,
            hide_task: Mutex::new(None),
        }
    }

    /// Dispatches the message now and schedules `HideError`
    pub fn flash_new_error_message(&self, dispatch: &DispatchHandle, message: &str) {
        tracing::debug!(message = %message, "Flashing error message");
        self.cancel_pending_hide();
        dispatch.dispatch(Action::set_error_message(message));

        let dispatch = dispatch.clone();
        let delay = self.display_duration;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dispatch.dispatch(Action::HideError);
        });
        self.replace_hide_task(Some(handle));
    }

    /// Hides the current error right away
    pub fn clear_error(&self, dispatch: &DispatchHandle) {
        self.cancel_pending_hide();
        dispatch.dispatch(Action::HideError);
    }

    fn cancel_pending_hide(&self) {
        self.replace_hide_task(None);
    }

    fn replace_hide_task(&self, handle: Option<JoinHandle<()>>) {
        let previous = match self.hide_task.lock() {
            Ok(mut slot) => std::mem::replace(&mut *slot, handle),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), handle),
        };
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}
