//! Alert dialog.
//!
//! A centered confirmation surface with a confirm action and a cancel
//! action. Confirming runs the action handler and then closes.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::Runtime;
use crate::domain::{ElementId, OverlayId, SurfaceSize};
use crate::host::Host;
use crate::overlay::{DismissOptions, Geometry, OverlayConfig, OverlayKind, Result};

use super::OpenOptions;

/// Visual intent of an alert dialog. Hosts pick colors from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertVariant {
    #[default]
    Default,
    Destructive,
    Success,
    Warning,
    Info,
}

impl FromStr for AlertVariant {
    type Err = Infallible;

    /// Unknown names fall back to `default`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "default" => AlertVariant::Default,
            "destructive" => AlertVariant::Destructive,
            "success" => AlertVariant::Success,
            "warning" => AlertVariant::Warning,
            "info" => AlertVariant::Info,
            other => {
                tracing::warn!(value = other, "unknown alert variant, using default");
                AlertVariant::default()
            }
        })
    }
}

/// Maximum width for an alert dialog size. There is no full-width alert;
/// `Full` is treated as `Lg`.
pub fn alert_max_width(size: SurfaceSize) -> f32 {
    match size {
        SurfaceSize::Sm => 384.0,
        SurfaceSize::Md => 448.0,
        SurfaceSize::Lg | SurfaceSize::Full => 512.0,
    }
}

type ConfirmHandler = Box<dyn FnMut() + Send>;

pub struct AlertDialog {
    surface: ElementId,
    trigger: Option<ElementId>,
    open: OpenOptions,
    variant: AlertVariant,
    size: SurfaceSize,
    close_on_outside_click: bool,
    on_confirm: Option<ConfirmHandler>,
}

impl AlertDialog {
    pub fn new(surface: impl Into<ElementId>) -> Self {
        Self {
            surface: surface.into(),
            trigger: None,
            open: OpenOptions::default(),
            variant: AlertVariant::Default,
            size: SurfaceSize::Md,
            close_on_outside_click: true,
            on_confirm: None,
        }
    }

    pub fn trigger(mut self, trigger: impl Into<ElementId>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open.controlled(open);
        self
    }

    pub fn default_open(mut self, open: bool) -> Self {
        self.open.default_open(open);
        self
    }

    pub fn on_open_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.open.on_change(handler);
        self
    }

    pub fn variant(mut self, variant: AlertVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: SurfaceSize) -> Self {
        self.size = size;
        self
    }

    pub fn close_on_outside_click(mut self, close: bool) -> Self {
        self.close_on_outside_click = close;
        self
    }

    /// Runs when the confirm action is taken, before the dialog closes.
    pub fn on_confirm<F>(mut self, handler: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_confirm = Some(Box::new(handler));
        self
    }

    pub fn mount<H: Host>(self, rt: &mut Runtime<H>) -> AlertDialogHandle {
        let mut config = OverlayConfig::new(
            OverlayKind::AlertDialog,
            self.surface,
            Geometry::Centered {
                max_width: alert_max_width(self.size),
            },
        )
        .open_state(self.open.into_state())
        .dismiss(Some(DismissOptions {
            escape_key: true,
            outside_click: self.close_on_outside_click,
        }));
        if let Some(trigger) = self.trigger {
            config = config.trigger(trigger);
        }
        AlertDialogHandle {
            id: rt.register(config),
            variant: self.variant,
            on_confirm: self.on_confirm,
        }
    }
}

impl fmt::Debug for AlertDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertDialog")
            .field("surface", &self.surface)
            .field("variant", &self.variant)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// A mounted alert dialog.
pub struct AlertDialogHandle {
    id: OverlayId,
    variant: AlertVariant,
    on_confirm: Option<ConfirmHandler>,
}

impl AlertDialogHandle {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn variant(&self) -> AlertVariant {
        self.variant
    }

    /// Runs the confirm handler, then requests close.
    ///
    /// Does nothing while the dialog is closed. Returns whether the handler
    /// ran.
    pub fn confirm<H: Host>(&mut self, rt: &mut Runtime<H>) -> Result<bool> {
        if !rt.is_open(self.id)? {
            return Ok(false);
        }
        if let Some(handler) = self.on_confirm.as_mut() {
            handler();
        }
        rt.set_open(self.id, false)?;
        Ok(true)
    }

    pub fn cancel<H: Host>(&self, rt: &mut Runtime<H>) -> Result<()> {
        rt.set_open(self.id, false)
    }
}

impl fmt::Debug for AlertDialogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertDialogHandle")
            .field("id", &self.id)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
