//! Overlay runtime.
//!
//! Owns the host, the shared overlay primitives, every registered overlay
//! and a toast queue, and routes input and timer expiry to them. All
//! wiring is explicit: handlers return what happened and the runtime
//! performs the follow-up transition itself.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::config::Settings;
use crate::domain::{ElementId, OverlayId};
use crate::host::Host;
use crate::overlay::lifecycle::Stage;
use crate::overlay::{
    Activation, Clock, CloseReason, DismissLayers, Dispatch, HoverTarget, Overlay, OverlayConfig,
    OverlayError, PortalRoot, Result, Scheduled, SurfaceLayout, SystemClock, TimerPurpose,
    TimerRegistry,
};
use crate::services::Toaster;
use crate::ui::keybindings::Keystroke;

use super::events::EventBus;

/// A runtime shared with the async timer driver.
pub type SharedRuntime<H> = Arc<Mutex<Runtime<H>>>;

/// Explicit wiring of overlays to their host.
pub struct Runtime<H: Host> {
    stage: Stage<H>,
    overlays: BTreeMap<OverlayId, Overlay>,
    toaster: Toaster,
    settings: Settings,
}

impl<H: Host> Runtime<H> {
    pub fn new(host: H, clock: Arc<dyn Clock>, settings: Settings) -> Self {
        let events = EventBus::new();
        let toaster = Toaster::new(Arc::clone(&clock), &settings.toasts).with_events(events.clone());
        Self {
            stage: Stage {
                host,
                timers: TimerRegistry::new(clock),
                portal: PortalRoot::new(),
                layers: DismissLayers::new(),
                events,
                scroll_locks: 0,
            },
            overlays: BTreeMap::new(),
            toaster,
            settings,
        }
    }

    /// Wall clock and default settings.
    pub fn with_defaults(host: H) -> Self {
        Self::new(host, Arc::new(SystemClock), Settings::default())
    }

    pub fn into_shared(self) -> SharedRuntime<H> {
        Arc::new(Mutex::new(self))
    }

    pub fn host(&self) -> &H {
        &self.stage.host
    }

    /// Mutable host access, for hosts that change layout or structure.
    ///
    /// Call [`Runtime::reposition`] afterwards if a trigger moved.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.stage.host
    }

    pub fn events(&self) -> &EventBus {
        &self.stage.events
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn overlay(&self, id: OverlayId) -> Result<&Overlay> {
        self.overlays.get(&id).ok_or(OverlayError::NotRegistered(id))
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Result<&mut Overlay> {
        self.overlays
            .get_mut(&id)
            .ok_or(OverlayError::NotRegistered(id))
    }

    pub fn is_open(&self, id: OverlayId) -> Result<bool> {
        Ok(self.overlay(id)?.is_open())
    }

    /// Ids of registered overlays whose surface is mounted.
    pub fn open_overlays(&self) -> Vec<OverlayId> {
        self.overlays
            .values()
            .filter(|o| o.is_visible())
            .map(Overlay::id)
            .collect()
    }

    /// Pending hover timers across all overlays.
    pub fn pending_timers(&self) -> usize {
        self.stage.timers.pending_count()
    }

    /// Registers an overlay, opening it at once if it starts open.
    pub fn register(&mut self, config: OverlayConfig) -> OverlayId {
        let mut overlay = Overlay::new(config);
        let id = overlay.id();
        tracing::debug!(%id, kind = %overlay.kind(), "overlay registered");
        overlay.reconcile(&mut self.stage, CloseReason::Programmatic);
        self.overlays.insert(id, overlay);
        id
    }

    /// Tears an overlay down and forgets it.
    pub fn remove(&mut self, id: OverlayId) -> Result<()> {
        let mut overlay = self
            .overlays
            .remove(&id)
            .ok_or(OverlayError::NotRegistered(id))?;
        overlay.teardown(&mut self.stage);
        self.close_orphans();
        Ok(())
    }

    /// Requests a new open value from the overlay's authority.
    pub fn set_open(&mut self, id: OverlayId, open: bool) -> Result<()> {
        let overlay = self
            .overlays
            .get_mut(&id)
            .ok_or(OverlayError::NotRegistered(id))?;
        overlay.request(&mut self.stage, open, CloseReason::Programmatic);
        self.close_orphans();
        Ok(())
    }

    /// Pushes the caller-owned value into a controlled overlay.
    pub fn sync_open(&mut self, id: OverlayId, open: bool) -> Result<()> {
        let overlay = self
            .overlays
            .get_mut(&id)
            .ok_or(OverlayError::NotRegistered(id))?;
        overlay.sync(&mut self.stage, open)?;
        self.close_orphans();
        Ok(())
    }

    pub fn toggle(&mut self, id: OverlayId) -> Result<()> {
        let open = self.is_open(id)?;
        self.set_open(id, !open)
    }

    /// A click on the overlay's trigger.
    pub fn trigger_click(&mut self, id: OverlayId) -> Result<()> {
        match self.overlay(id)?.activation() {
            Activation::Click => self.set_open(id, true),
            Activation::Toggle => self.toggle(id),
            Activation::Hover { .. } => Err(OverlayError::UnsupportedInteraction {
                id,
                interaction: "click",
            }),
        }
    }

    /// Pointer entered the trigger or the surface of a hover overlay.
    pub fn pointer_enter(&mut self, id: OverlayId, target: HoverTarget) -> Result<()> {
        let overlay = self
            .overlays
            .get_mut(&id)
            .ok_or(OverlayError::NotRegistered(id))?;
        let Activation::Hover { open_delay, .. } = overlay.activation() else {
            return Err(OverlayError::UnsupportedInteraction {
                id,
                interaction: "hover",
            });
        };

        self.stage.timers.cancel(&id, TimerPurpose::HoverClose);
        if overlay.is_open() || target == HoverTarget::Surface {
            overlay.reposition(&mut self.stage);
            return Ok(());
        }

        match self
            .stage
            .timers
            .schedule(id, TimerPurpose::HoverOpen, open_delay)
        {
            Scheduled::Immediate => {
                overlay.request(&mut self.stage, true, CloseReason::Programmatic);
                self.close_orphans();
            }
            Scheduled::Pending { .. } => {
                tracing::trace!(%id, ?open_delay, "hover open scheduled");
            }
        }
        Ok(())
    }

    /// Pointer left the trigger or the surface of a hover overlay.
    pub fn pointer_leave(&mut self, id: OverlayId, target: HoverTarget) -> Result<()> {
        let overlay = self
            .overlays
            .get_mut(&id)
            .ok_or(OverlayError::NotRegistered(id))?;
        let Activation::Hover { close_delay, .. } = overlay.activation() else {
            return Err(OverlayError::UnsupportedInteraction {
                id,
                interaction: "hover",
            });
        };

        self.stage.timers.cancel(&id, TimerPurpose::HoverOpen);
        if !overlay.is_open() {
            return Ok(());
        }

        match self
            .stage
            .timers
            .schedule(id, TimerPurpose::HoverClose, close_delay)
        {
            Scheduled::Immediate => {
                overlay.request(&mut self.stage, false, CloseReason::HoverLeave);
                self.close_orphans();
            }
            Scheduled::Pending { .. } => {
                tracing::trace!(%id, ?target, ?close_delay, "hover close scheduled");
            }
        }
        Ok(())
    }

    /// Recomputes an open overlay's layout from fresh trigger geometry.
    pub fn reposition(&mut self, id: OverlayId) -> Result<Option<SurfaceLayout>> {
        let overlay = self
            .overlays
            .get_mut(&id)
            .ok_or(OverlayError::NotRegistered(id))?;
        Ok(overlay.reposition(&mut self.stage))
    }

    /// Offers a keydown to the open overlays. Returns whether it was
    /// consumed.
    ///
    /// Escape goes to the innermost dismissal layer. Tab cycles focus in
    /// the topmost focus-trapping surface.
    pub fn handle_key(&mut self, keystroke: &Keystroke) -> bool {
        if keystroke.is_escape() {
            let dispatch = self.stage.layers.dispatch_escape();
            return self.route(dispatch);
        }

        if let Some(backwards) = keystroke.tab_direction() {
            let trap = self.stage.portal.owners_top_down().find(|owner| {
                self.overlays
                    .get(owner)
                    .is_some_and(|o| o.is_visible() && o.traps_focus())
            });
            let Some(owner) = trap else {
                return false;
            };
            if let Some(overlay) = self.overlays.get(&owner) {
                overlay.focus().handle_tab(&mut self.stage.host, backwards);
            }
            return true;
        }

        false
    }

    /// Offers a pointer-down on `target`. Returns whether it was consumed.
    pub fn handle_pointer_down(&mut self, target: &ElementId) -> bool {
        let dispatch = self
            .stage
            .layers
            .dispatch_pointer_down(&self.stage.host, target);
        self.route(dispatch)
    }

    fn route(&mut self, dispatch: Dispatch) -> bool {
        if let Some(dismissal) = dispatch.dismissal() {
            match self.overlays.get_mut(&dismissal.owner) {
                Some(overlay) => {
                    overlay.request(&mut self.stage, false, dismissal.reason);
                }
                None => {
                    tracing::warn!(owner = %dismissal.owner, "dismissal for unknown overlay")
                }
            }
            self.close_orphans();
        }
        dispatch.is_consumed()
    }

    /// Fires every due hover and toast timer. Returns how many fired.
    pub fn advance(&mut self) -> usize {
        let now = self.stage.timers.now();
        self.advance_to(now)
    }

    /// [`Runtime::advance`] at an explicit instant.
    pub fn advance_to(&mut self, now: Instant) -> usize {
        let fired = self.stage.timers.advance(now);
        let mut count = fired.len();
        for (id, purpose) in fired {
            let Some(overlay) = self.overlays.get_mut(&id) else {
                continue;
            };
            match purpose {
                TimerPurpose::HoverOpen => {
                    overlay.request(&mut self.stage, true, CloseReason::Programmatic);
                }
                TimerPurpose::HoverClose => {
                    overlay.request(&mut self.stage, false, CloseReason::HoverLeave);
                }
                TimerPurpose::AutoDismiss => {
                    tracing::warn!(%id, "auto-dismiss timer on an overlay ignored");
                }
            }
        }
        self.close_orphans();
        count += self.toaster.advance(now).len();
        count
    }

    /// Closes every open child whose parent is closed or gone, innermost
    /// chains included.
    fn close_orphans(&mut self) {
        loop {
            let orphans: Vec<OverlayId> = self
                .overlays
                .values()
                .filter(|o| o.is_visible())
                .filter(|o| {
                    o.parent()
                        .is_some_and(|p| !self.overlays.get(&p).is_some_and(Overlay::is_visible))
                })
                .map(Overlay::id)
                .collect();
            if orphans.is_empty() {
                return;
            }
            for id in orphans {
                if let Some(overlay) = self.overlays.get_mut(&id) {
                    tracing::debug!(%id, "closing child of a closed overlay");
                    overlay.close_with_parent(&mut self.stage);
                }
            }
        }
    }

    /// Earliest pending deadline across overlays and toasts.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.stage.timers.next_deadline(), self.toaster.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Tells the runtime the host's overlay root now exists.
    ///
    /// Attaches deferred mounts in order and returns how many.
    pub fn root_available(&mut self) -> usize {
        self.stage.portal.flush(&mut self.stage.host)
    }
}

impl<H: Host> std::fmt::Debug for Runtime<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("overlays", &self.overlays.len())
            .field("stage", &self.stage)
            .field("toaster", &self.toaster)
            .finish()
    }
}
