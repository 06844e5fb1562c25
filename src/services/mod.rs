//! Services layer.
//!
//! Pieces that run alongside the overlay runtime rather than inside it.
//!
//! # Architecture
//!
//! ```text
//! Host input (keys, pointer, hover)
//!          |
//!          v
//!     app::Runtime  <---- timer_driver (tokio)
//!          |                    |
//!          v                    v
//!   overlay primitives     toast_service  <---- toast_bridge (global slot)
//! ```
//!
//! # Services Overview
//!
//! - [`Toaster`]: the toast queue, shared between the runtime and callers
//! - [`toast_bridge`]: free functions reaching the currently bound queue
//! - [`timer_driver`]: sleeps until the next deadline and advances timers

pub mod timer_driver;
pub mod toast_bridge;
mod toast_service;

pub use timer_driver::TimerSource;
pub use toast_bridge::{bind, clear_toasts, dismiss, toast, toast_with, ToastBinding};
pub use toast_service::Toaster;
