//! Focus capture, trapping and restoration for modal surfaces.

use crate::domain::ElementId;
use crate::host::FocusHost;

/// Per-overlay focus bookkeeping.
///
/// The snapshot is retaken on every open and consumed on close, so a
/// manager never restores focus from an earlier open.
#[derive(Debug, Clone, Default)]
pub struct FocusManager {
    snapshot: Option<ElementId>,
    root: Option<ElementId>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the focused element and moves focus into `root`.
    pub fn on_open<H>(&mut self, host: &mut H, root: &ElementId)
    where
        H: FocusHost + ?Sized,
    {
        self.snapshot = host.active_element();
        self.root = Some(root.clone());

        let target = host
            .focusable_descendants(root)
            .into_iter()
            .next()
            .unwrap_or_else(|| root.clone());
        tracing::debug!(root = %root, target = %target, "focus moved into surface");
        host.focus(&target);
    }

    /// Restores the snapshot if it is still attached, then forgets it.
    ///
    /// Returns the element focus was restored to.
    pub fn on_close<H>(&mut self, host: &mut H) -> Option<ElementId>
    where
        H: FocusHost + ?Sized,
    {
        self.root = None;
        let snapshot = self.snapshot.take()?;
        if !host.is_attached(&snapshot) {
            tracing::debug!(element = %snapshot, "focus snapshot detached, not restoring");
            return None;
        }
        host.focus(&snapshot);
        Some(snapshot)
    }

    /// Moves focus to the next (or previous) focusable element of the root,
    /// wrapping at either end.
    ///
    /// Focus outside the cycle goes to the first element, or the last when
    /// moving backwards. With nothing focusable the key is swallowed and
    /// `None` is returned.
    pub fn handle_tab<H>(&self, host: &mut H, backwards: bool) -> Option<ElementId>
    where
        H: FocusHost + ?Sized,
    {
        let root = self.root.as_ref()?;
        let focusable = host.focusable_descendants(root);
        if focusable.is_empty() {
            return None;
        }

        let len = focusable.len();
        let current = host
            .active_element()
            .and_then(|active| focusable.iter().position(|el| *el == active));
        let index = match (current, backwards) {
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
            (None, false) => 0,
            (None, true) => len - 1,
        };

        let next = focusable[index].clone();
        host.focus(&next);
        Some(next)
    }

    /// Whether a surface currently holds the trap.
    pub fn is_trapping(&self) -> bool {
        self.root.is_some()
    }

    pub fn snapshot(&self) -> Option<&ElementId> {
        self.snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rect, Viewport};
    use crate::host::{ElementTree, MemoryHost, PortalHost};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Host {}

        impl ElementTree for Host {
            fn contains(&self, ancestor: &ElementId, node: &ElementId) -> bool;
            fn is_attached(&self, element: &ElementId) -> bool;
            fn bounding_rect(&self, element: &ElementId) -> Option<Rect>;
            fn viewport(&self) -> Viewport;
        }

        impl FocusHost for Host {
            fn active_element(&self) -> Option<ElementId>;
            fn focus(&mut self, element: &ElementId);
            fn focusable_descendants(&self, root: &ElementId) -> Vec<ElementId>;
        }
    }

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    fn dialog_host() -> MemoryHost {
        let mut host = MemoryHost::default();
        host.add_focusable("open-button", None);
        host.add_detached("dialog")
            .add_focusable("name", Some(&id("dialog")))
            .add_focusable("email", Some(&id("dialog")))
            .add_focusable("submit", Some(&id("dialog")));
        host.attach(&id("dialog"));
        host.set_focus(&id("open-button"));
        host
    }

    #[test]
    fn open_focuses_first_focusable() {
        let mut host = dialog_host();
        let mut focus = FocusManager::new();

        focus.on_open(&mut host, &id("dialog"));

        assert_eq!(host.active_element(), Some(id("name")));
        assert_eq!(focus.snapshot(), Some(&id("open-button")));
    }

    #[test]
    fn open_falls_back_to_root() {
        let mut host = MemoryHost::default();
        host.add_detached("empty");
        host.attach(&id("empty"));
        let mut focus = FocusManager::new();

        focus.on_open(&mut host, &id("empty"));

        assert_eq!(host.active_element(), Some(id("empty")));
    }

    #[test]
    fn tab_wraps_in_both_directions() {
        let mut host = dialog_host();
        let mut focus = FocusManager::new();
        focus.on_open(&mut host, &id("dialog"));

        assert_eq!(focus.handle_tab(&mut host, false), Some(id("email")));
        assert_eq!(focus.handle_tab(&mut host, false), Some(id("submit")));
        assert_eq!(focus.handle_tab(&mut host, false), Some(id("name")));
        assert_eq!(focus.handle_tab(&mut host, true), Some(id("submit")));
    }

    #[test]
    fn tab_from_outside_enters_cycle() {
        let mut host = dialog_host();
        let mut focus = FocusManager::new();
        focus.on_open(&mut host, &id("dialog"));
        host.set_focus(&id("open-button"));

        assert_eq!(focus.handle_tab(&mut host, true), Some(id("submit")));
    }

    #[test]
    fn tab_without_focusables_is_noop() {
        let mut host = MemoryHost::default();
        host.add_detached("empty");
        let mut focus = FocusManager::new();
        focus.on_open(&mut host, &id("empty"));

        assert_eq!(focus.handle_tab(&mut host, false), None);
        assert_eq!(host.active_element(), Some(id("empty")));
    }

    #[test]
    fn close_restores_attached_snapshot_once() {
        let mut host = dialog_host();
        let mut focus = FocusManager::new();
        focus.on_open(&mut host, &id("dialog"));

        assert_eq!(focus.on_close(&mut host), Some(id("open-button")));
        assert_eq!(host.active_element(), Some(id("open-button")));
        assert!(!focus.is_trapping());

        // Snapshot is gone after use.
        assert_eq!(focus.on_close(&mut host), None);
    }

    #[test]
    fn close_skips_detached_snapshot() {
        let mut host = MockHost::new();
        host.expect_active_element()
            .return_const(Some(id("gone")));
        host.expect_focusable_descendants()
            .with(eq(id("panel")))
            .return_const(vec![id("field")]);
        host.expect_focus()
            .with(eq(id("field")))
            .times(1)
            .return_const(());
        host.expect_is_attached()
            .with(eq(id("gone")))
            .return_const(false);

        let mut focus = FocusManager::new();
        focus.on_open(&mut host, &id("panel"));

        // No second focus() call is expected.
        assert_eq!(focus.on_close(&mut host), None);
    }
}
