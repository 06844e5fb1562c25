//! Modal dialog.
//!
//! Centered in the viewport, focus-trapping, closed by Escape or by a click
//! on the backdrop (anything outside the dialog surface).

use crate::app::Runtime;
use crate::domain::{ElementId, OverlayId};
use crate::host::Host;
use crate::overlay::{DismissOptions, Geometry, OverlayConfig, OverlayKind};

use super::OpenOptions;

/// Maximum width of a dialog surface.
pub const DIALOG_MAX_WIDTH: f32 = 512.0;

#[derive(Debug)]
pub struct Dialog {
    surface: ElementId,
    trigger: Option<ElementId>,
    open: OpenOptions,
    close_on_overlay_click: Option<bool>,
}

impl Dialog {
    pub fn new(surface: impl Into<ElementId>) -> Self {
        Self {
            surface: surface.into(),
            trigger: None,
            open: OpenOptions::default(),
            close_on_overlay_click: None,
        }
    }

    pub fn trigger(mut self, trigger: impl Into<ElementId>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Makes the dialog controlled by the caller.
    pub fn open(mut self, open: bool) -> Self {
        self.open.controlled(open);
        self
    }

    pub fn default_open(mut self, open: bool) -> Self {
        self.open.default_open(open);
        self
    }

    pub fn on_open_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.open.on_change(handler);
        self
    }

    /// Whether a backdrop click closes. Defaults to the dialog settings.
    pub fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = Some(close);
        self
    }

    pub fn mount<H: Host>(self, rt: &mut Runtime<H>) -> OverlayId {
        let outside_click = self
            .close_on_overlay_click
            .unwrap_or(rt.settings().dialogs.close_on_overlay_click);
        let mut config = OverlayConfig::new(
            OverlayKind::Dialog,
            self.surface,
            Geometry::Centered {
                max_width: DIALOG_MAX_WIDTH,
            },
        )
        .open_state(self.open.into_state())
        .dismiss(Some(DismissOptions {
            escape_key: true,
            outside_click,
        }));
        if let Some(trigger) = self.trigger {
            config = config.trigger(trigger);
        }
        rt.register(config)
    }
}
