//! Overlay surface variants.
//!
//! Each component is a builder that turns variant options into an
//! [`OverlayConfig`](crate::overlay::OverlayConfig) and registers it with a
//! [`Runtime`](crate::app::Runtime). Components with their own interaction
//! state (the command palette, dropdown menus, alert dialogs) return a
//! handle that routes through the runtime.

pub mod alert_dialog;
pub mod command_dialog;
pub mod command_menu;
pub mod dialog;
pub mod drawer;
pub mod dropdown;
pub mod hover_card;
pub mod sheet;
pub mod tooltip;

use std::fmt;

use crate::overlay::{OpenChangeHandler, OpenState};

pub use alert_dialog::{AlertDialog, AlertDialogHandle, AlertVariant};
pub use command_dialog::{CommandDialog, CommandPalette, PaletteKey};
pub use command_menu::{filter_groups, CommandMenu, CommandView, VisibleGroup, EMPTY_MESSAGE};
pub use dialog::Dialog;
pub use drawer::Drawer;
pub use dropdown::{Dropdown, DropdownMenu, DropdownSelection, MenuItem};
pub use hover_card::HoverCard;
pub use sheet::Sheet;
pub use tooltip::Tooltip;

/// Open-state options shared by click-activated surfaces.
///
/// Collected separately so builder calls can come in any order.
#[derive(Default)]
pub(crate) struct OpenOptions {
    open: Option<bool>,
    default_open: bool,
    on_change: Option<OpenChangeHandler>,
}

impl OpenOptions {
    pub(crate) fn controlled(&mut self, open: bool) {
        self.open = Some(open);
    }

    pub(crate) fn default_open(&mut self, open: bool) {
        self.default_open = open;
    }

    pub(crate) fn on_change<F>(&mut self, handler: F)
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.on_change = Some(Box::new(handler));
    }

    pub(crate) fn into_state(self) -> OpenState {
        let state = match self.open {
            Some(open) => OpenState::controlled(open),
            None => OpenState::uncontrolled(self.default_open),
        };
        match self.on_change {
            Some(handler) => state.on_change(handler),
            None => state,
        }
    }
}

impl fmt::Debug for OpenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("open", &self.open)
            .field("default_open", &self.default_open)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
