//! Overlay primitives.
//!
//! Each submodule owns one concern of a floating surface's life:
//! placement, open-state authority, dismissal, focus, timers and portal
//! mounting. [`lifecycle`] combines them into the per-overlay state machine
//! that [`crate::app::Runtime`] drives.

pub mod dismissal;
pub mod focus;
pub mod lifecycle;
pub mod open_state;
pub mod portal;
pub mod position;
pub mod timers;

pub use dismissal::{
    DismissBounds, DismissHandle, DismissLayers, DismissOptions, Dismissal, Dispatch,
};
pub use focus::FocusManager;
pub use lifecycle::{
    Activation, CloseReason, HoverTarget, Overlay, OverlayConfig, OverlayKind, Phase,
};
pub use open_state::{Authority, OpenChangeHandler, OpenState};
pub use portal::{PortalHandle, PortalRoot, PortalState};
pub use position::{compute, EdgeKind, Geometry, SurfaceLayout, DEFAULT_OFFSET};
pub use timers::{
    Clock, ManualClock, Scheduled, SystemClock, TimerPurpose, TimerRegistry, TokioClock,
};

use thiserror::Error;

use crate::domain::OverlayId;

/// Misuse of the overlay API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("overlay {0} is not registered")]
    NotRegistered(OverlayId),

    #[error("open-state authority is fixed at construction")]
    AuthoritySwitch,

    #[error("overlay {id} does not support {interaction}")]
    UnsupportedInteraction {
        id: OverlayId,
        interaction: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, OverlayError>;
