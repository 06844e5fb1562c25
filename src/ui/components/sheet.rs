//! Side sheet.
//!
//! Slides in from any viewport edge, right by default, and traps focus
//! while open.

use crate::app::Runtime;
use crate::domain::{ElementId, OverlayId, Side, SurfaceSize};
use crate::host::Host;
use crate::overlay::{DismissOptions, EdgeKind, Geometry, OverlayConfig, OverlayKind};

use super::OpenOptions;

#[derive(Debug)]
pub struct Sheet {
    surface: ElementId,
    trigger: Option<ElementId>,
    open: OpenOptions,
    position: Side,
    size: SurfaceSize,
    close_on_overlay_click: Option<bool>,
}

impl Sheet {
    pub fn new(surface: impl Into<ElementId>) -> Self {
        Self {
            surface: surface.into(),
            trigger: None,
            open: OpenOptions::default(),
            position: Side::Right,
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

    /// Viewport edge the sheet is attached to.
    pub fn position(mut self, position: Side) -> Self {
        self.position = position;
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
            OverlayKind::Sheet,
            self.surface,
            Geometry::Edge {
                side: self.position,
                size: self.size,
                kind: EdgeKind::Sheet,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::domain::Viewport;
    use crate::host::{FocusHost, MemoryHost};
    use crate::overlay::{ManualClock, SurfaceLayout};
    use crate::ui::keybindings::{Key, Keystroke};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    fn runtime() -> Runtime<MemoryHost> {
        let mut host = MemoryHost::new(Viewport::new(1280.0, 720.0));
        host.add_focusable("settings", None);
        host.add_detached("panel")
            .add_focusable("theme", Some(&id("panel")))
            .add_focusable("close", Some(&id("panel")));
        Runtime::new(host, Arc::new(ManualClock::new()), Settings::default())
    }

    #[test]
    fn defaults_to_right_edge() {
        let mut rt = runtime();
        let sheet = Sheet::new("panel").default_open(true).mount(&mut rt);

        assert_eq!(
            rt.overlay(sheet).unwrap().layout(),
            Some(SurfaceLayout::Edge {
                side: Side::Right,
                extent: 384.0,
            })
        );
    }

    #[test]
    fn vertical_positions_use_height_presets() {
        let mut rt = runtime();
        let sheet = Sheet::new("panel")
            .position(Side::Top)
            .size(SurfaceSize::Lg)
            .default_open(true)
            .mount(&mut rt);

        assert_eq!(
            rt.overlay(sheet).unwrap().layout(),
            Some(SurfaceLayout::Edge {
                side: Side::Top,
                extent: 384.0,
            })
        );
    }

    #[test]
    fn traps_focus_while_open() {
        let mut rt = runtime();
        rt.host_mut().set_focus(&id("settings"));
        let sheet = Sheet::new("panel").trigger("settings").mount(&mut rt);
        rt.trigger_click(sheet).unwrap();

        assert_eq!(rt.host().active_element(), Some(id("theme")));
        rt.handle_key(&Keystroke::shift(Key::Tab));
        assert_eq!(rt.host().active_element(), Some(id("close")));

        rt.handle_key(&Keystroke::key(Key::Escape));
        assert_eq!(rt.host().active_element(), Some(id("settings")));
    }
}
