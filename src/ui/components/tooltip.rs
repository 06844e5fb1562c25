//! Tooltip component.
//!
//! A hover-activated label anchored to its trigger. It opens after a short
//! delay and hides as soon as the pointer leaves. It never traps focus and
//! has no dismissal layer.

use std::time::Duration;

use crate::app::Runtime;
use crate::domain::{Align, ElementId, OverlayId, Placement, Side};
use crate::host::Host;
use crate::overlay::{Activation, Geometry, OverlayConfig, OverlayKind};

use super::OpenOptions;

/// A tooltip attached to a trigger element.
#[derive(Debug)]
pub struct Tooltip {
    trigger: ElementId,
    surface: ElementId,
    content: String,
    position: Side,
    delay: Option<Duration>,
    open: OpenOptions,
}

impl Tooltip {
    pub fn new(
        trigger: impl Into<ElementId>,
        surface: impl Into<ElementId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            surface: surface.into(),
            content: content.into(),
            position: Side::Top,
            delay: None,
            open: OpenOptions::default(),
        }
    }

    /// Set the side of the trigger the tooltip appears on.
    pub fn position(mut self, position: Side) -> Self {
        self.position = position;
        self
    }

    /// Set the delay before showing. Defaults to the configured tooltip delay.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes the tooltip controlled by the caller.
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

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Builds the overlay configuration against the runtime's settings.
    pub fn config<H: Host>(self, rt: &Runtime<H>) -> OverlayConfig {
        let settings = &rt.settings().tooltip;
        let open_delay = self
            .delay
            .unwrap_or_else(|| Duration::from_millis(settings.delay_ms));
        OverlayConfig::new(
            OverlayKind::Tooltip,
            self.surface,
            Geometry::Anchored {
                placement: Placement::new(self.position, Align::Center),
                offset: settings.offset,
            },
        )
        .trigger(self.trigger)
        .open_state(self.open.into_state())
        .activation(Activation::Hover {
            open_delay,
            close_delay: Duration::ZERO,
        })
        .dismiss(None)
        .focus_trap(false)
    }

    pub fn mount<H: Host>(self, rt: &mut Runtime<H>) -> OverlayId {
        let config = self.config(rt);
        rt.register(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::domain::{Point, Rect, Viewport};
    use crate::host::MemoryHost;
    use crate::overlay::{HoverTarget, ManualClock, SurfaceLayout};
    use std::sync::Arc;

    fn runtime() -> (ManualClock, Runtime<MemoryHost>) {
        let mut host = MemoryHost::new(Viewport::new(800.0, 600.0));
        host.add("save", None)
            .set_rect(&ElementId::from("save"), Rect::new(100.0, 200.0, 40.0, 20.0));
        host.add_detached("save-tip");
        let clock = ManualClock::new();
        let rt = Runtime::new(host, Arc::new(clock.clone()), Settings::default());
        (clock, rt)
    }

    #[test]
    fn shows_after_delay_above_trigger() {
        let (clock, mut rt) = runtime();
        let tip = Tooltip::new("save", "save-tip", "Save changes").mount(&mut rt);

        rt.pointer_enter(tip, HoverTarget::Trigger).unwrap();
        clock.advance(Duration::from_millis(150));
        rt.advance();

        let overlay = rt.overlay(tip).unwrap();
        assert!(overlay.is_open());
        assert_eq!(
            overlay.layout(),
            Some(SurfaceLayout::Anchored {
                anchor: Point::new(120.0, 192.0),
                side: Side::Top,
            })
        );
    }

    #[test]
    fn hides_immediately_on_leave() {
        let (clock, mut rt) = runtime();
        let tip = Tooltip::new("save", "save-tip", "Save changes")
            .delay(Duration::from_millis(10))
            .mount(&mut rt);

        rt.pointer_enter(tip, HoverTarget::Trigger).unwrap();
        clock.advance(Duration::from_millis(10));
        rt.advance();
        assert!(rt.is_open(tip).unwrap());

        rt.pointer_leave(tip, HoverTarget::Trigger).unwrap();
        assert!(!rt.is_open(tip).unwrap());
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn quick_pass_never_shows() {
        let (clock, mut rt) = runtime();
        let tip = Tooltip::new("save", "save-tip", "Save changes").mount(&mut rt);

        rt.pointer_enter(tip, HoverTarget::Trigger).unwrap();
        clock.advance(Duration::from_millis(100));
        rt.pointer_leave(tip, HoverTarget::Trigger).unwrap();
        clock.advance(Duration::from_millis(500));
        rt.advance();

        assert!(!rt.is_open(tip).unwrap());
    }

    #[test]
    fn reports_show_and_hide() {
        let (clock, mut rt) = runtime();
        let changes = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let tip = Tooltip::new("save", "save-tip", "Save changes")
            .on_open_change(move |open| sink.lock().unwrap().push(open))
            .mount(&mut rt);

        rt.pointer_enter(tip, HoverTarget::Trigger).unwrap();
        clock.advance(Duration::from_millis(150));
        rt.advance();
        rt.pointer_leave(tip, HoverTarget::Trigger).unwrap();

        assert_eq!(*changes.lock().unwrap(), vec![true, false]);
    }
}
