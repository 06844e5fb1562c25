//! Core identifier types.
//!
//! These newtype wrappers keep host elements, overlays and toasts from
//! being mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier of an element in the rendering host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<&ElementId> for ElementId {
    fn from(id: &ElementId) -> Self {
        id.clone()
    }
}

/// Identifier of a registered overlay instance.
///
/// Allocated from a process-wide counter, so ids never repeat even across
/// separate runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(u64);

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

impl OverlayId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// Identifier of a queued toast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(pub String);

impl ToastId {
    /// Generates an id that is unique for the lifetime of the process.
    pub fn generate() -> Self {
        Self(format!("toast-{}", uuid::Uuid::new_v4()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ToastId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ToastId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_ids_are_unique() {
        let a = OverlayId::next();
        let b = OverlayId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn generated_toast_ids_differ() {
        let a = ToastId::generate();
        let b = ToastId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("toast-"));
    }

    #[test]
    fn element_id_conversions() {
        let a = ElementId::from("dialog");
        let b = ElementId::from("dialog".to_string());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "dialog");
    }
}
