//! Bottom drawer.

use crate::app::Runtime;
use crate::domain::{ElementId, OverlayId, Side, SurfaceSize};
use crate::host::Host;
use crate::overlay::{DismissOptions, EdgeKind, Geometry, OverlayConfig, OverlayKind};

use super::OpenOptions;

/// A panel attached to the bottom edge of the viewport.
#[derive(Debug)]
pub struct Drawer {
    surface: ElementId,
    trigger: Option<ElementId>,
    open: OpenOptions,
    size: SurfaceSize,
    close_on_overlay_click: Option<bool>,
}

impl Drawer {
    pub fn new(surface: impl Into<ElementId>) -> Self {
        Self {
            surface: surface.into(),
            trigger: None,
            open: OpenOptions::default(),
            size: SurfaceSize::Md,
            close_on_overlay_click: None,
        }
    }

    pub fn trigger(mut self, trigger: impl Into<ElementId>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

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

    pub fn size(mut self, size: SurfaceSize) -> Self {
        self.size = size;
        self
    }

    pub fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = Some(close);
        self
    }

    pub fn mount<H: Host>(self, rt: &mut Runtime<H>) -> OverlayId {
        let outside_click = self
            .close_on_overlay_click
            .unwrap_or(rt.settings().dialogs.close_on_overlay_click);
        let mut config = OverlayConfig::new(
            OverlayKind::Drawer,
            self.surface,
            Geometry::Edge {
                side: Side::Bottom,
                size: self.size,
                kind: EdgeKind::Drawer,
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
