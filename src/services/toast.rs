//! User-visible notices ("toasts").
//!
//! `ToastQueue` buffers notices until the view layer drains them with the
//! next rendered view.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Destination for toasts.
pub trait Toaster: Send + Sync {
    fn show(&self, toast: Toast);
}

/// Keeps at most `capacity` undelivered toasts; the oldest are dropped first.
pub struct ToastQueue {
    pending: Mutex<VecDeque<Toast>>,
    capacity: usize,
}

const DEFAULT_CAPACITY: usize = 32;

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { pending: Mutex::new(VecDeque::new()), capacity: capacity.max(1) }
    }

    /// Remove and return every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.pending
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Toaster for ToastQueue {
    fn show(&self, toast: Toast) {
        tracing::debug!(level = ?toast.level, message = %toast.message, "toast");
        let Ok(mut q) = self.pending.lock() else {
            return;
        };
        if q.len() == self.capacity {
            q.pop_front();
        }
        q.push_back(toast);
    }
}
