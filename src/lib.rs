//! stratum - Headless overlay positioning and transient lifecycle
//!
//! This crate provides the shared machinery behind floating surfaces:
//! anchored positioning, open-state authority, escape and outside-click
//! dismissal, focus trapping, hover-intent timers, portal mounting and a
//! toast queue. Rendering is left to a host implementing the traits in
//! [`host`].

pub mod app;
pub mod config;
pub mod domain;
pub mod host;
pub mod overlay;
pub mod services;
pub mod ui;

pub use app::{EventBus, OverlayEvent, Runtime, SharedRuntime};
pub use config::Settings;
pub use host::{ElementTree, FocusHost, Host, MemoryHost, PortalHost, ScrollHost};
pub use overlay::{OverlayConfig, OverlayError, OverlayKind};
pub use services::Toaster;
