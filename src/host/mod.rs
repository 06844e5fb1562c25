//! Rendering host capabilities.
//!
//! The overlay engine never touches a concrete UI toolkit. It talks to the
//! host through three small traits:
//!
//! - [`ElementTree`]: containment, attachment and layout queries
//! - [`FocusHost`]: reading and moving keyboard focus
//! - [`PortalHost`]: attaching surfaces to the overlay root
//! - [`ScrollHost`]: locking page scroll behind modal surfaces
//!
//! A terminal UI, a native toolkit or a test double implements these
//! against its own focus and z-order model. [`MemoryHost`] is the in-memory
//! implementation used by tests and the demo binary.

mod memory;

pub use memory::{MemoryHost, Overflow};

use crate::domain::{ElementId, Rect, Viewport};

/// Structural and layout queries on the host's element tree.
pub trait ElementTree {
    /// Returns true when `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &ElementId, node: &ElementId) -> bool;

    /// Returns true when the element is still part of the rendered tree.
    fn is_attached(&self, element: &ElementId) -> bool;

    /// Current on-screen rectangle of an element, if it has one.
    fn bounding_rect(&self, element: &ElementId) -> Option<Rect>;

    /// Visible area of the host.
    fn viewport(&self) -> Viewport;
}

/// Keyboard focus capabilities.
pub trait FocusHost: ElementTree {
    /// The element that currently holds focus.
    fn active_element(&self) -> Option<ElementId>;

    /// Moves focus to `element`.
    fn focus(&mut self, element: &ElementId);

    /// Focusable descendants of `root`, in tab order.
    fn focusable_descendants(&self, root: &ElementId) -> Vec<ElementId>;
}

/// Overlay root capabilities.
pub trait PortalHost {
    /// Whether the overlay root exists yet.
    fn root_available(&self) -> bool;

    /// Appends `content` to the overlay root, above everything attached
    /// before it.
    fn attach(&mut self, content: &ElementId);

    /// Removes `content` from the overlay root.
    fn detach(&mut self, content: &ElementId);
}

/// Page scroll control.
///
/// The runtime reference-counts modal surfaces and only calls these on
/// the first lock and the last unlock.
pub trait ScrollHost {
    /// Saves the page's scroll behavior and stops it from scrolling.
    fn lock_scroll(&mut self);

    /// Restores the behavior saved by the matching [`ScrollHost::lock_scroll`].
    fn unlock_scroll(&mut self);
}

/// Everything a runtime needs from its host.
pub trait Host: FocusHost + PortalHost + ScrollHost {}

impl<T: FocusHost + PortalHost + ScrollHost> Host for T {}
