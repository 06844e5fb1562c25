//! Per-overlay lifecycle.
//!
//! An [`Overlay`] ties one surface's open-state cell to the shared
//! primitives held in a [`Stage`]. Every transition runs its side effects
//! directly: opening mounts, positions, traps focus and activates
//! dismissal; closing undoes all of it and cancels the overlay's timers.

use std::fmt;
use std::time::Duration;

use crate::app::events::{EventBus, OverlayEvent};
use crate::domain::{ElementId, OverlayId};
use crate::host::Host;

use super::dismissal::{DismissBounds, DismissHandle, DismissLayers, DismissOptions};
use super::focus::FocusManager;
use super::open_state::OpenState;
use super::portal::{PortalHandle, PortalRoot};
use super::position::{Geometry, SurfaceLayout};
use super::timers::TimerRegistry;
use super::Result;

/// The surface variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Dialog,
    AlertDialog,
    Drawer,
    Sheet,
    HoverCard,
    Tooltip,
    Dropdown,
    CommandDialog,
}

impl OverlayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlayKind::Dialog => "dialog",
            OverlayKind::AlertDialog => "alert-dialog",
            OverlayKind::Drawer => "drawer",
            OverlayKind::Sheet => "sheet",
            OverlayKind::HoverCard => "hover-card",
            OverlayKind::Tooltip => "tooltip",
            OverlayKind::Dropdown => "dropdown",
            OverlayKind::CommandDialog => "command-dialog",
        }
    }

    /// Modal kinds lock page scroll while open.
    pub fn locks_scroll(self) -> bool {
        matches!(
            self,
            OverlayKind::Dialog
                | OverlayKind::AlertDialog
                | OverlayKind::Drawer
                | OverlayKind::Sheet
                | OverlayKind::CommandDialog
        )
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the trigger opens the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A trigger click opens.
    Click,
    /// A trigger click flips the state. The trigger does not count as an
    /// outside click.
    Toggle,
    /// Hover intent with separate open and close delays.
    Hover {
        open_delay: Duration,
        close_delay: Duration,
    },
}

impl Activation {
    pub fn is_hover(self) -> bool {
        matches!(self, Activation::Hover { .. })
    }
}

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Why a surface closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    OutsidePointer,
    HoverLeave,
    Programmatic,
    /// The surface this one nests in closed.
    ParentClosed,
    Removed,
}

/// Which element the pointer entered or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Trigger,
    Surface,
}

/// Everything needed to register an overlay.
#[derive(Debug)]
pub struct OverlayConfig {
    pub kind: OverlayKind,
    pub trigger: Option<ElementId>,
    /// Root element of the surface content.
    pub surface: ElementId,
    pub open_state: OpenState,
    pub activation: Activation,
    /// `None` registers no dismissal layer.
    pub dismiss: Option<DismissOptions>,
    pub focus_trap: bool,
    pub scroll_lock: bool,
    /// Overlay this one nests in. A child never outlives its parent's
    /// open phase.
    pub parent: Option<OverlayId>,
    pub geometry: Geometry,
}

impl OverlayConfig {
    /// A click-activated, focus-trapping, dismissable surface.
    pub fn new(kind: OverlayKind, surface: impl Into<ElementId>, geometry: Geometry) -> Self {
        Self {
            kind,
            trigger: None,
            surface: surface.into(),
            open_state: OpenState::default(),
            activation: Activation::Click,
            dismiss: Some(DismissOptions::default()),
            focus_trap: true,
            scroll_lock: kind.locks_scroll(),
            parent: None,
            geometry,
        }
    }

    pub fn trigger(mut self, trigger: impl Into<ElementId>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn open_state(mut self, state: OpenState) -> Self {
        self.open_state = state;
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn dismiss(mut self, options: Option<DismissOptions>) -> Self {
        self.dismiss = options;
        self
    }

    pub fn focus_trap(mut self, trap: bool) -> Self {
        self.focus_trap = trap;
        self
    }

    pub fn scroll_lock(mut self, lock: bool) -> Self {
        self.scroll_lock = lock;
        self
    }

    pub fn parent(mut self, parent: OverlayId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Shared resources every overlay transition touches.
pub struct Stage<H> {
    pub host: H,
    pub timers: TimerRegistry<OverlayId>,
    pub portal: PortalRoot,
    pub layers: DismissLayers,
    pub events: EventBus,
    /// Open surfaces holding the page scroll lock.
    pub scroll_locks: usize,
}

impl<H: Host> Stage<H> {
    fn lock_scroll(&mut self) {
        self.scroll_locks += 1;
        if self.scroll_locks == 1 {
            self.host.lock_scroll();
        }
    }

    fn unlock_scroll(&mut self) {
        match self.scroll_locks {
            0 => tracing::warn!("scroll unlock without a matching lock"),
            1 => {
                self.scroll_locks = 0;
                self.host.unlock_scroll();
            }
            _ => self.scroll_locks -= 1,
        }
    }
}

impl<H> fmt::Debug for Stage<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("timers", &self.timers)
            .field("portal", &self.portal)
            .field("layers", &self.layers)
            .field("scroll_locks", &self.scroll_locks)
            .finish_non_exhaustive()
    }
}

/// One registered surface.
#[derive(Debug)]
pub struct Overlay {
    id: OverlayId,
    kind: OverlayKind,
    trigger: Option<ElementId>,
    surface: ElementId,
    activation: Activation,
    dismiss: Option<DismissOptions>,
    focus_trap: bool,
    scroll_lock: bool,
    parent: Option<OverlayId>,
    geometry: Geometry,
    state: OpenState,
    phase: Phase,
    focus: FocusManager,
    portal: Option<PortalHandle>,
    dismiss_handle: Option<DismissHandle>,
    holds_scroll_lock: bool,
    layout: Option<SurfaceLayout>,
}

impl Overlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            id: OverlayId::next(),
            kind: config.kind,
            trigger: config.trigger,
            surface: config.surface,
            activation: config.activation,
            dismiss: config.dismiss,
            focus_trap: config.focus_trap,
            scroll_lock: config.scroll_lock,
            parent: config.parent,
            geometry: config.geometry,
            state: config.open_state,
            phase: Phase::Closed,
            focus: FocusManager::new(),
            portal: None,
            dismiss_handle: None,
            holds_scroll_lock: false,
            layout: None,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The open flag as its authority sees it.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Whether the surface is currently mounted and interactive.
    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Open
    }

    pub fn is_controlled(&self) -> bool {
        self.state.is_controlled()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn trigger(&self) -> Option<&ElementId> {
        self.trigger.as_ref()
    }

    pub fn surface(&self) -> &ElementId {
        &self.surface
    }

    pub fn traps_focus(&self) -> bool {
        self.focus_trap
    }

    pub fn locks_scroll(&self) -> bool {
        self.scroll_lock
    }

    pub fn parent(&self) -> Option<OverlayId> {
        self.parent
    }

    pub fn layout(&self) -> Option<SurfaceLayout> {
        self.layout
    }

    pub fn portal_handle(&self) -> Option<PortalHandle> {
        self.portal
    }

    pub(crate) fn focus(&self) -> &FocusManager {
        &self.focus
    }

    /// Asks the open-state authority for a new value.
    ///
    /// Requests matching the current flag are dropped. Returns whether the
    /// request reached the open-state cell.
    pub(crate) fn request<H: Host>(
        &mut self,
        stage: &mut Stage<H>,
        open: bool,
        reason: CloseReason,
    ) -> bool {
        if self.state.is_open() == open {
            return false;
        }
        self.state.set_open(open);
        self.reconcile(stage, reason);
        true
    }

    /// Pushes the caller's value into a controlled overlay.
    pub(crate) fn sync<H: Host>(&mut self, stage: &mut Stage<H>, open: bool) -> Result<()> {
        self.state.sync(open)?;
        self.reconcile(stage, CloseReason::Programmatic);
        Ok(())
    }

    /// Brings the phase in line with the open flag.
    pub(crate) fn reconcile<H: Host>(&mut self, stage: &mut Stage<H>, reason: CloseReason) {
        match (self.state.is_open(), self.phase) {
            (true, Phase::Closed) => self.open_surface(stage),
            (false, Phase::Open) => self.close_surface(stage, reason),
            _ => {}
        }
    }

    /// Recomputes the layout from fresh trigger geometry.
    pub(crate) fn reposition<H: Host>(&mut self, stage: &mut Stage<H>) -> Option<SurfaceLayout> {
        if self.phase != Phase::Open {
            return None;
        }
        self.layout = self.resolve_layout(&stage.host);
        if let Some(layout) = self.layout {
            stage.events.publish(OverlayEvent::Repositioned {
                id: self.id,
                layout,
            });
        }
        self.layout
    }

    /// Closes without notifying and leaves the flag false.
    pub(crate) fn teardown<H: Host>(&mut self, stage: &mut Stage<H>) {
        if self.phase == Phase::Open {
            self.close_surface(stage, CloseReason::Removed);
        }
        self.state.force_closed();
        stage.timers.cancel_owner(&self.id);
    }

    /// Closes because the overlay this one nests in closed.
    ///
    /// The handler still hears the request, but the surface closes whoever
    /// owns the flag.
    pub(crate) fn close_with_parent<H: Host>(&mut self, stage: &mut Stage<H>) {
        if self.state.is_open() {
            self.state.set_open(false);
            self.state.force_closed();
        }
        if self.phase == Phase::Open {
            self.close_surface(stage, CloseReason::ParentClosed);
        }
    }

    fn open_surface<H: Host>(&mut self, stage: &mut Stage<H>) {
        self.phase = Phase::Opening;
        tracing::debug!(id = %self.id, kind = %self.kind, "opening");

        let handle = stage
            .portal
            .mount(&mut stage.host, self.id, self.surface.clone());
        self.portal = Some(handle);
        self.layout = self.resolve_layout(&stage.host);

        if self.scroll_lock {
            stage.lock_scroll();
            self.holds_scroll_lock = true;
        }
        if self.focus_trap {
            self.focus.on_open(&mut stage.host, &self.surface);
        }
        if let Some(options) = self.dismiss {
            let trigger = match self.activation {
                Activation::Toggle => self.trigger.clone(),
                _ => None,
            };
            let bounds = DismissBounds {
                surface: self.surface.clone(),
                trigger,
            };
            self.dismiss_handle = Some(stage.layers.activate(self.id, bounds, options));
        }

        self.phase = Phase::Open;
        stage.events.publish(OverlayEvent::Opened {
            id: self.id,
            kind: self.kind,
        });
    }

    fn close_surface<H: Host>(&mut self, stage: &mut Stage<H>, reason: CloseReason) {
        self.phase = Phase::Closing;
        tracing::debug!(id = %self.id, kind = %self.kind, ?reason, "closing");

        stage.timers.cancel_owner(&self.id);
        if let Some(handle) = self.dismiss_handle.take() {
            stage.layers.deactivate(handle);
        }
        if self.focus_trap {
            self.focus.on_close(&mut stage.host);
        }
        if let Some(handle) = self.portal.take() {
            stage.portal.unmount(&mut stage.host, handle);
        }
        if std::mem::take(&mut self.holds_scroll_lock) {
            stage.unlock_scroll();
        }
        self.layout = None;

        self.phase = Phase::Closed;
        stage.events.publish(OverlayEvent::Closed {
            id: self.id,
            kind: self.kind,
            reason,
        });
    }

    fn resolve_layout<H: Host>(&self, host: &H) -> Option<SurfaceLayout> {
        let rect = self.trigger.as_ref().and_then(|t| host.bounding_rect(t));
        let layout = self.geometry.resolve(rect, host.viewport());
        if layout.is_none() && self.geometry.needs_trigger() {
            tracing::warn!(id = %self.id, kind = %self.kind, "trigger has no geometry, surface left unplaced");
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Align, Placement, Rect, Side};
    use crate::host::{FocusHost, MemoryHost};
    use crate::overlay::position::DEFAULT_OFFSET;
    use crate::overlay::timers::{ManualClock, TimerPurpose};
    use std::sync::Arc;

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    fn stage() -> Stage<MemoryHost> {
        let mut host = MemoryHost::default();
        host.add_focusable("button", None);
        host.set_rect(&id("button"), Rect::new(10.0, 10.0, 100.0, 30.0));
        host.add_detached("popover")
            .add_focusable("field", Some(&id("popover")));
        host.set_focus(&id("button"));
        Stage {
            host,
            timers: TimerRegistry::new(Arc::new(ManualClock::new())),
            portal: PortalRoot::new(),
            layers: DismissLayers::new(),
            events: EventBus::new(),
            scroll_locks: 0,
        }
    }

    fn popover() -> Overlay {
        Overlay::new(
            OverlayConfig::new(
                OverlayKind::Dropdown,
                "popover",
                Geometry::Anchored {
                    placement: Placement::new(Side::Bottom, Align::Start),
                    offset: DEFAULT_OFFSET,
                },
            )
            .trigger("button")
            .activation(Activation::Toggle),
        )
    }

    #[test]
    fn open_runs_every_side_effect() {
        let mut stage = stage();
        let mut overlay = popover();

        assert!(overlay.request(&mut stage, true, CloseReason::Programmatic));

        assert_eq!(overlay.phase(), Phase::Open);
        assert_eq!(stage.host.portal_layers(), &[id("popover")]);
        assert_eq!(stage.host.active_element(), Some(id("field")));
        assert_eq!(stage.layers.innermost(), Some(overlay.id()));
        assert!(matches!(overlay.layout(), Some(SurfaceLayout::Anchored { .. })));
    }

    #[test]
    fn close_undoes_everything() {
        let mut stage = stage();
        let mut overlay = popover();
        overlay.request(&mut stage, true, CloseReason::Programmatic);
        stage.timers.schedule(
            overlay.id(),
            TimerPurpose::HoverClose,
            Duration::from_millis(100),
        );

        overlay.request(&mut stage, false, CloseReason::Escape);

        assert_eq!(overlay.phase(), Phase::Closed);
        assert!(stage.host.portal_layers().is_empty());
        assert_eq!(stage.host.active_element(), Some(id("button")));
        assert!(stage.layers.is_empty());
        assert_eq!(stage.timers.pending_count(), 0);
        assert_eq!(overlay.layout(), None);
    }

    #[test]
    fn same_value_request_is_dropped() {
        let mut stage = stage();
        let mut overlay = popover();

        assert!(!overlay.request(&mut stage, false, CloseReason::Programmatic));
        assert_eq!(overlay.phase(), Phase::Closed);
    }

    #[test]
    fn reposition_reads_fresh_geometry() {
        let mut stage = stage();
        let mut overlay = popover();
        overlay.request(&mut stage, true, CloseReason::Programmatic);

        stage
            .host
            .set_rect(&id("button"), Rect::new(200.0, 50.0, 100.0, 30.0));
        let layout = overlay.reposition(&mut stage);

        assert_eq!(
            layout,
            Some(SurfaceLayout::Anchored {
                anchor: crate::domain::Point::new(200.0, 88.0),
                side: Side::Bottom
            })
        );
    }

    #[test]
    fn teardown_forces_closed() {
        let mut stage = stage();
        let mut overlay = popover();
        overlay.request(&mut stage, true, CloseReason::Programmatic);

        overlay.teardown(&mut stage);

        assert!(!overlay.is_open());
        assert_eq!(overlay.phase(), Phase::Closed);
        assert!(stage.portal.mounted_count() == 0);
    }

    #[test]
    fn scroll_lock_follows_kind() {
        assert!(OverlayKind::Sheet.locks_scroll());
        assert!(!OverlayKind::Tooltip.locks_scroll());
        assert!(!OverlayKind::Dropdown.locks_scroll());

        let mut stage = stage();
        let mut overlay = popover();
        overlay.request(&mut stage, true, CloseReason::Programmatic);
        assert!(!stage.host.is_scroll_locked());
    }

    #[test]
    fn nested_modals_share_one_scroll_lock() {
        let mut stage = stage();
        stage.host.add_detached("outer").add_detached("inner");
        let centered = Geometry::Centered { max_width: 512.0 };
        let mut outer = Overlay::new(OverlayConfig::new(OverlayKind::Sheet, "outer", centered));
        let mut inner = Overlay::new(OverlayConfig::new(OverlayKind::Dialog, "inner", centered));

        outer.request(&mut stage, true, CloseReason::Programmatic);
        inner.request(&mut stage, true, CloseReason::Programmatic);
        assert_eq!(stage.scroll_locks, 2);

        inner.request(&mut stage, false, CloseReason::Escape);
        assert!(stage.host.is_scroll_locked());

        outer.teardown(&mut stage);
        assert!(!stage.host.is_scroll_locked());
        assert_eq!(stage.scroll_locks, 0);
    }
}
