//! Hover card component.
//!
//! A richer preview anchored to its trigger. Entering the card surface
//! keeps it open, so the pointer can travel from trigger to card.

use std::time::Duration;

use crate::app::Runtime;
use crate::domain::{Align, ElementId, OverlayId, Placement, Side};
use crate::host::Host;
use crate::overlay::{Activation, Geometry, OverlayConfig, OverlayKind, DEFAULT_OFFSET};

use super::OpenOptions;

#[derive(Debug)]
pub struct HoverCard {
    trigger: ElementId,
    surface: ElementId,
    placement: Placement,
    open_delay: Option<Duration>,
    close_delay: Option<Duration>,
    open: OpenOptions,
}

impl HoverCard {
    pub fn new(trigger: impl Into<ElementId>, surface: impl Into<ElementId>) -> Self {
        Self {
            trigger: trigger.into(),
            surface: surface.into(),
            placement: Placement::new(Side::Top, Align::Center),
            open_delay: None,
            close_delay: None,
            open: OpenOptions::default(),
        }
    }

    pub fn side(mut self, side: Side) -> Self {
        self.placement.side = side;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.placement.align = align;
        self
    }

    pub fn open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    pub fn close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = Some(delay);
        self
    }

    /// Makes the card controlled by the caller.
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

    /// Unset delays come from the runtime's hover settings.
    pub fn config<H: Host>(self, rt: &Runtime<H>) -> OverlayConfig {
        let hover = &rt.settings().hover;
        OverlayConfig::new(
            OverlayKind::HoverCard,
            self.surface,
            Geometry::Anchored {
                placement: self.placement,
                offset: DEFAULT_OFFSET,
            },
        )
        .trigger(self.trigger)
        .open_state(self.open.into_state())
        .activation(Activation::Hover {
            open_delay: self.open_delay.unwrap_or_else(|| hover.open_delay()),
            close_delay: self.close_delay.unwrap_or_else(|| hover.close_delay()),
        })
        .dismiss(None)
        .focus_trap(false)
    }

    pub fn mount<H: Host>(self, rt: &mut Runtime<H>) -> OverlayId {
        let config = self.config(rt);
        rt.register(config)
    }
}
