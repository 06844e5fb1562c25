//! Escape-key and outside-pointer dismissal.
//!
//! Active surfaces register a layer on a shared stack. Events are offered to
//! the innermost layer only, which consumes them whether or not it
//! dismisses, so a single click or keypress never closes more than one
//! surface.

use crate::domain::{ElementId, OverlayId};
use crate::host::ElementTree;

use super::CloseReason;

/// Identifies an active dismissal layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissHandle(u64);

/// Elements that count as "inside" a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissBounds {
    pub surface: ElementId,
    /// Set for toggle-style surfaces whose trigger handles its own clicks.
    pub trigger: Option<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissOptions {
    pub escape_key: bool,
    pub outside_click: bool,
}

impl Default for DismissOptions {
    fn default() -> Self {
        Self {
            escape_key: true,
            outside_click: true,
        }
    }
}

/// A layer asking its owner to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dismissal {
    pub owner: OverlayId,
    pub reason: CloseReason,
}

/// Result of offering an event to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No layer is active; the event belongs to the page.
    Ignored,
    /// The innermost layer swallowed the event without dismissing.
    Consumed,
    /// The innermost layer swallowed the event and wants to close.
    Dismiss(Dismissal),
}

impl Dispatch {
    pub fn dismissal(self) -> Option<Dismissal> {
        match self {
            Dispatch::Dismiss(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_consumed(self) -> bool {
        !matches!(self, Dispatch::Ignored)
    }
}

#[derive(Debug)]
struct Layer {
    handle: DismissHandle,
    owner: OverlayId,
    bounds: DismissBounds,
    options: DismissOptions,
}

/// Stack of active dismissal layers, innermost last.
#[derive(Debug, Default)]
pub struct DismissLayers {
    layers: Vec<Layer>,
    next_handle: u64,
}

impl DismissLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a layer on top of the stack.
    pub fn activate(
        &mut self,
        owner: OverlayId,
        bounds: DismissBounds,
        options: DismissOptions,
    ) -> DismissHandle {
        self.next_handle += 1;
        let handle = DismissHandle(self.next_handle);
        tracing::debug!(%owner, depth = self.layers.len() + 1, "dismissal layer activated");
        self.layers.push(Layer {
            handle,
            owner,
            bounds,
            options,
        });
        handle
    }

    /// Removes a layer wherever it sits in the stack.
    pub fn deactivate(&mut self, handle: DismissHandle) -> bool {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.handle != handle);
        before != self.layers.len()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Owner of the innermost layer.
    pub fn innermost(&self) -> Option<OverlayId> {
        self.layers.last().map(|layer| layer.owner)
    }

    /// Offers an Escape keydown to the innermost layer.
    ///
    /// Fires on every keydown; owners must tolerate repeated dismissals.
    pub fn dispatch_escape(&self) -> Dispatch {
        let Some(layer) = self.layers.last() else {
            return Dispatch::Ignored;
        };
        if !layer.options.escape_key {
            return Dispatch::Consumed;
        }
        Dispatch::Dismiss(Dismissal {
            owner: layer.owner,
            reason: CloseReason::Escape,
        })
    }

    /// Offers a pointer-down on `target` to the innermost layer.
    pub fn dispatch_pointer_down<T>(&self, tree: &T, target: &ElementId) -> Dispatch
    where
        T: ElementTree + ?Sized,
    {
        let Some(layer) = self.layers.last() else {
            return Dispatch::Ignored;
        };

        let inside = tree.contains(&layer.bounds.surface, target)
            || layer
                .bounds
                .trigger
                .as_ref()
                .is_some_and(|trigger| tree.contains(trigger, target));

        if inside || !layer.options.outside_click {
            return Dispatch::Consumed;
        }
        Dispatch::Dismiss(Dismissal {
            owner: layer.owner,
            reason: CloseReason::OutsidePointer,
        })
    }
}
