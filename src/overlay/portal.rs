//! Portal mount point.
//!
//! Surfaces are attached to a single overlay root outside the normal
//! containment tree. Later mounts paint above earlier ones. When the host
//! has no overlay root yet, mounts queue up and attach in order once it
//! appears.

use crate::domain::{ElementId, OverlayId};
use crate::host::PortalHost;

/// Handle returned by [`PortalRoot::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalState {
    /// Waiting for the overlay root.
    Pending,
    /// Attached to the overlay root.
    Mounted,
}

#[derive(Debug, Clone)]
struct Entry {
    handle: PortalHandle,
    owner: OverlayId,
    content: ElementId,
}

/// Bookkeeping for everything mounted at the overlay root.
#[derive(Debug, Default)]
pub struct PortalRoot {
    mounted: Vec<Entry>,
    pending: Vec<Entry>,
    next_handle: u64,
}

impl PortalRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `content` above everything already mounted.
    ///
    /// Never fails: without an overlay root the handle stays pending.
    pub fn mount<H>(&mut self, host: &mut H, owner: OverlayId, content: ElementId) -> PortalHandle
    where
        H: PortalHost + ?Sized,
    {
        self.next_handle += 1;
        let entry = Entry {
            handle: PortalHandle(self.next_handle),
            owner,
            content,
        };
        let handle = entry.handle;

        self.flush(host);
        if host.root_available() {
            host.attach(&entry.content);
            self.mounted.push(entry);
        } else {
            tracing::warn!(%owner, content = %entry.content, "overlay root unavailable, mount deferred");
            self.pending.push(entry);
        }
        handle
    }

    /// Detaches a mounted surface or drops a pending one.
    pub fn unmount<H>(&mut self, host: &mut H, handle: PortalHandle) -> bool
    where
        H: PortalHost + ?Sized,
    {
        if let Some(pos) = self.mounted.iter().position(|e| e.handle == handle) {
            let entry = self.mounted.remove(pos);
            host.detach(&entry.content);
            return true;
        }
        let before = self.pending.len();
        self.pending.retain(|e| e.handle != handle);
        before != self.pending.len()
    }

    /// Attaches pending mounts if the overlay root has appeared.
    ///
    /// Returns how many were attached.
    pub fn flush<H>(&mut self, host: &mut H) -> usize
    where
        H: PortalHost + ?Sized,
    {
        if self.pending.is_empty() || !host.root_available() {
            return 0;
        }
        let count = self.pending.len();
        for entry in self.pending.drain(..) {
            host.attach(&entry.content);
            self.mounted.push(entry);
        }
        tracing::debug!(count, "attached deferred portal mounts");
        count
    }

    pub fn state(&self, handle: PortalHandle) -> Option<PortalState> {
        if self.mounted.iter().any(|e| e.handle == handle) {
            Some(PortalState::Mounted)
        } else if self.pending.iter().any(|e| e.handle == handle) {
            Some(PortalState::Pending)
        } else {
            None
        }
    }

    /// Paint position of a mounted handle, 0 being the bottom.
    pub fn layer_of(&self, handle: PortalHandle) -> Option<usize> {
        self.mounted.iter().position(|e| e.handle == handle)
    }

    /// Owners of mounted surfaces, topmost first.
    pub fn owners_top_down(&self) -> impl Iterator<Item = OverlayId> + '_ {
        self.mounted.iter().rev().map(|e| e.owner)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
