//! Controlled/uncontrolled open-state cell.

use std::fmt;

use super::OverlayError;

/// Callback notified with every requested open-state change.
pub type OpenChangeHandler = Box<dyn FnMut(bool) + Send>;

/// Who owns the open flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// The caller owns the flag; the cell only forwards requests.
    Controlled,
    /// The cell owns the flag.
    Uncontrolled,
}

/// Single source of truth for an overlay's open flag.
///
/// Authority is chosen at construction and never changes. A controlled cell
/// reports the value last pushed with [`OpenState::sync`] and treats
/// [`OpenState::set_open`] as a request to the caller.
pub struct OpenState {
    authority: Authority,
    open: bool,
    on_change: Option<OpenChangeHandler>,
}

impl OpenState {
    /// A cell that owns its flag, starting at `default_open`.
    pub fn uncontrolled(default_open: bool) -> Self {
        Self {
            authority: Authority::Uncontrolled,
            open: default_open,
            on_change: None,
        }
    }

    /// A cell mirroring an externally owned flag.
    pub fn controlled(open: bool) -> Self {
        Self {
            authority: Authority::Controlled,
            open,
            on_change: None,
        }
    }

    /// Sets the change handler.
    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn is_controlled(&self) -> bool {
        self.authority == Authority::Controlled
    }

    /// The displayed open flag.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Requests a new value.
    ///
    /// Uncontrolled cells store it first; controlled cells leave their
    /// value alone. The handler is invoked in both cases.
    pub fn set_open(&mut self, open: bool) {
        if self.authority == Authority::Uncontrolled {
            self.open = open;
        }
        if let Some(handler) = self.on_change.as_mut() {
            handler(open);
        }
    }

    /// Pushes the caller's current value into a controlled cell.
    pub fn sync(&mut self, open: bool) -> Result<(), OverlayError> {
        if self.authority != Authority::Controlled {
            return Err(OverlayError::AuthoritySwitch);
        }
        self.open = open;
        Ok(())
    }

    /// Overwrites the stored value without notifying.
    ///
    /// Used when an overlay is torn down and its flag must read closed.
    pub(crate) fn force_closed(&mut self) {
        self.open = false;
    }
}

impl Default for OpenState {
    fn default() -> Self {
        Self::uncontrolled(false)
    }
}

impl fmt::Debug for OpenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenState")
            .field("authority", &self.authority)
            .field("open", &self.open)
            .field("has_handler", &self.on_change.is_some())
            .finish()
    }
}
