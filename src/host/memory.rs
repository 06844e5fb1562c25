//! In-memory element tree implementing every host capability.

use std::collections::HashMap;

use super::{ElementTree, FocusHost, PortalHost, ScrollHost};
use crate::domain::{ElementId, Rect, Viewport};

/// Id of the implicit document root.
pub const DOCUMENT_ROOT: &str = "document";

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    focusable: bool,
    rect: Option<Rect>,
}

/// A headless element tree.
///
/// Elements added with [`MemoryHost::add`] hang off the document root.
/// Surfaces are built with [`MemoryHost::add_detached`] and only become
/// attached once the portal root mounts them, mirroring how a real host
/// keeps overlay content out of the main tree.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    nodes: HashMap<ElementId, Node>,
    focused: Option<ElementId>,
    viewport: Viewport,
    portal_ready: bool,
    portal_layers: Vec<ElementId>,
    overflow: Overflow,
    saved_overflow: Option<Overflow>,
}

/// Page scroll behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Auto,
    Scroll,
    Hidden,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl MemoryHost {
    /// Creates a host with a document root and a ready portal root.
    pub fn new(viewport: Viewport) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ElementId::from(DOCUMENT_ROOT), Node::default());
        Self {
            nodes,
            focused: None,
            viewport,
            portal_ready: true,
            portal_layers: Vec::new(),
            overflow: Overflow::Auto,
            saved_overflow: None,
        }
    }

    /// Creates a host whose portal root is not available yet.
    pub fn without_portal_root(viewport: Viewport) -> Self {
        Self {
            portal_ready: false,
            ..Self::new(viewport)
        }
    }

    /// Makes the portal root available.
    pub fn create_portal_root(&mut self) {
        self.portal_ready = true;
    }

    /// Adds an element under `parent`, or under the document root when
    /// `parent` is `None`.
    pub fn add(&mut self, id: impl Into<ElementId>, parent: Option<&ElementId>) -> &mut Self {
        let parent = parent
            .cloned()
            .unwrap_or_else(|| ElementId::from(DOCUMENT_ROOT));
        self.insert(id.into(), Some(parent), false)
    }

    /// Adds a focusable element under `parent`.
    pub fn add_focusable(
        &mut self,
        id: impl Into<ElementId>,
        parent: Option<&ElementId>,
    ) -> &mut Self {
        let parent = parent
            .cloned()
            .unwrap_or_else(|| ElementId::from(DOCUMENT_ROOT));
        self.insert(id.into(), Some(parent), true)
    }

    /// Adds a parentless element, typically the root of a surface.
    pub fn add_detached(&mut self, id: impl Into<ElementId>) -> &mut Self {
        self.insert(id.into(), None, false)
    }

    fn insert(&mut self, id: ElementId, parent: Option<ElementId>, focusable: bool) -> &mut Self {
        if let Some(parent_id) = &parent {
            if let Some(parent_node) = self.nodes.get_mut(parent_id) {
                parent_node.children.push(id.clone());
            }
        }
        self.nodes.insert(
            id,
            Node {
                parent,
                focusable,
                ..Node::default()
            },
        );
        self
    }

    /// Sets the on-screen rectangle of an element.
    pub fn set_rect(&mut self, id: &ElementId, rect: Rect) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect = Some(rect);
        }
        self
    }

    /// Removes an element and its subtree.
    pub fn remove(&mut self, id: &ElementId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        if let Some(parent) = node.parent.as_ref().and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|child| child != id);
        }
        for child in node.children {
            self.remove(&child);
        }
        if self.focused.as_ref() == Some(id) {
            self.focused = None;
        }
        self.portal_layers.retain(|layer| layer != id);
    }

    /// Focuses an element directly, as a user click would.
    pub fn set_focus(&mut self, id: &ElementId) {
        if self.nodes.contains_key(id) {
            self.focused = Some(id.clone());
        }
    }

    /// Page scroll behavior as the page itself sets it.
    pub fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.saved_overflow.is_some()
    }

    /// Surfaces attached to the portal root, bottom first.
    pub fn portal_layers(&self) -> &[ElementId] {
        &self.portal_layers
    }

    fn top_ancestor<'a>(&'a self, id: &'a ElementId) -> Option<&'a ElementId> {
        let mut current = id;
        loop {
            let node = self.nodes.get(current)?;
            match &node.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    fn collect_focusable(&self, id: &ElementId, out: &mut Vec<ElementId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for child in &node.children {
            if self.nodes.get(child).is_some_and(|n| n.focusable) {
                out.push(child.clone());
            }
            self.collect_focusable(child, out);
        }
    }
}

impl ElementTree for MemoryHost {
    fn contains(&self, ancestor: &ElementId, node: &ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent.as_ref());
        }
        false
    }

    fn is_attached(&self, element: &ElementId) -> bool {
        match self.top_ancestor(element) {
            Some(top) => top.0 == DOCUMENT_ROOT || self.portal_layers.contains(top),
            None => false,
        }
    }

    fn bounding_rect(&self, element: &ElementId) -> Option<Rect> {
        self.nodes.get(element).and_then(|n| n.rect)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl FocusHost for MemoryHost {
    fn active_element(&self) -> Option<ElementId> {
        self.focused.clone()
    }

    fn focus(&mut self, element: &ElementId) {
        if self.nodes.contains_key(element) {
            self.focused = Some(element.clone());
        }
    }

    fn focusable_descendants(&self, root: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_focusable(root, &mut out);
        out
    }
}

impl PortalHost for MemoryHost {
    fn root_available(&self) -> bool {
        self.portal_ready
    }

    fn attach(&mut self, content: &ElementId) {
        self.portal_layers.retain(|layer| layer != content);
        self.portal_layers.push(content.clone());
    }

    fn detach(&mut self, content: &ElementId) {
        self.portal_layers.retain(|layer| layer != content);
    }
}

impl ScrollHost for MemoryHost {
    fn lock_scroll(&mut self) {
        if self.saved_overflow.is_none() {
            self.saved_overflow = Some(self.overflow);
        }
        self.overflow = Overflow::Hidden;
    }

    fn unlock_scroll(&mut self) {
        if let Some(saved) = self.saved_overflow.take() {
            self.overflow = saved;
        }
    }
}
