//! Runtime wiring and lifecycle events.

pub mod events;
mod runtime;

pub use events::{EventBus, OverlayEvent, SubscriberId, ToastRemoval};
pub use runtime::{Runtime, SharedRuntime};
