use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::global_constants::LOG_TAG_SESSION;

struct SessionState {
    active: AtomicBool,
    cancelled: AtomicBool,
    cancel_notify: Notify,
}

/// Exclusive activity slot (one capture run, one region selection). Clones
/// share the same slot.
#[derive(Clone)]
pub struct Session {
    name: &'static str,
    state: Arc<SessionState>,
}

/// Held for the lifetime of an activity; dropping it frees the slot.
pub struct SessionGuard {
    name: &'static str,
    state: Arc<SessionState>,
}

impl Session {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(SessionState {
                active: AtomicBool::new(false),
                cancelled: AtomicBool::new(false),
                cancel_notify: Notify::new(),
            }),
        }
    }

    /// Claims the slot. Returns `None` while another activity holds it.
    pub fn start(&self) -> Option<SessionGuard> {
        if self
            .state
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("{} {} session already active", LOG_TAG_SESSION, self.name);
            return None;
        }

        self.state.cancelled.store(false, Ordering::Release);
        log::debug!("{} {} session started", LOG_TAG_SESSION, self.name);

        Some(SessionGuard {
            name: self.name,
            state: Arc::clone(&self.state),
        })
    }

    /// Requests cancellation of the active activity. Returns whether there
    /// was one to cancel.
    pub fn cancel(&self) -> bool {
        if !self.is_active() {
            return false;
        }

        log::info!("{} {} session cancel requested", LOG_TAG_SESSION, self.name);
        self.state.cancelled.store(true, Ordering::Release);
        self.state.cancel_notify.notify_waiters();
        true
    }

    pub fn is_active(&self) -> bool {
        self.state.active.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Completes once `cancel` has been called for the current activity.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.state.cancel_notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state.cancelled.store(false, Ordering::Release);
        self.state.active.store(false, Ordering::Release);
        log::debug!("{} {} session finished", LOG_TAG_SESSION, self.name);
    }
}
