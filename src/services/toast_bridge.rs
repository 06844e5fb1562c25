//! Process-wide access to the mounted toast queue.
//!
//! One [`Toaster`] can be bound at a time. Binding returns a
//! [`ToastBinding`] guard; dropping the guard unbinds. The free functions
//! here reach whichever queue is bound and log a warning and do nothing when
//! none is.

use std::sync::{Mutex, PoisonError};

use crate::domain::{ToastId, ToastOptions};

use super::toast_service::Toaster;

static ACTIVE: Mutex<Option<Toaster>> = Mutex::new(None);

fn active() -> Option<Toaster> {
    ACTIVE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Keeps a queue bound for as long as it lives.
#[must_use = "dropping the binding unbinds the toast queue"]
#[derive(Debug)]
pub struct ToastBinding {
    toaster: Toaster,
}

impl Drop for ToastBinding {
    fn drop(&mut self) {
        let mut slot = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
        // A newer binding may have replaced ours.
        if slot.as_ref().is_some_and(|t| t.same_queue(&self.toaster)) {
            *slot = None;
            tracing::debug!("toast queue unbound");
        }
    }
}

/// Binds `toaster` as the process-wide queue, replacing any previous one.
pub fn bind(toaster: Toaster) -> ToastBinding {
    let mut slot = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        tracing::warn!("replacing an already bound toast queue");
    }
    *slot = Some(toaster.clone());
    ToastBinding { toaster }
}

/// Whether a queue is currently bound.
pub fn is_bound() -> bool {
    ACTIVE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Shows a toast with just a title.
pub fn toast(title: impl Into<String>) -> Option<ToastId> {
    toast_with(ToastOptions::message(title))
}

/// Shows a toast on the bound queue.
pub fn toast_with(options: ToastOptions) -> Option<ToastId> {
    match active() {
        Some(toaster) => Some(toaster.push(options)),
        None => {
            tracing::warn!(title = ?options.title, "toast() called with no toast queue bound");
            None
        }
    }
}

/// Dismisses a toast on the bound queue.
pub fn dismiss(id: &ToastId) -> bool {
    match active() {
        Some(toaster) => toaster.dismiss(id),
        None => {
            tracing::warn!(%id, "dismiss() called with no toast queue bound");
            false
        }
    }
}

/// Clears the bound queue.
pub fn clear_toasts() -> usize {
    match active() {
        Some(toaster) => toaster.clear(),
        None => {
            tracing::warn!("clear_toasts() called with no toast queue bound");
            0
        }
    }
}

#[cfg(test)]
pub(crate) static TEST_LOCK: Mutex<()> = Mutex::new(());
