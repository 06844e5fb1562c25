//! Toast notification types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use super::ToastId;

/// Default auto-dismiss delay when none is supplied.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 4000;

/// Visual intent of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Success,
    Error,
    Info,
}

impl ToastVariant {
    /// Returns the icon name hosts usually pair with this variant.
    pub fn icon(&self) -> &'static str {
        match self {
            ToastVariant::Default | ToastVariant::Info => "info",
            ToastVariant::Success => "check-circle",
            ToastVariant::Error => "alert-triangle",
        }
    }
}

impl FromStr for ToastVariant {
    type Err = Infallible;

    /// Unknown names fall back to `default`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "default" => ToastVariant::Default,
            "success" => ToastVariant::Success,
            "error" => ToastVariant::Error,
            "info" => ToastVariant::Info,
            other => {
                tracing::warn!(value = other, "unknown toast variant, using default");
                ToastVariant::Default
            }
        })
    }
}

/// Screen corner the toast stack is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Handler invoked when a toast's action button is activated.
pub type ToastActionHandler = Arc<dyn Fn(&ToastId) + Send + Sync>;

/// An action button on a toast.
#[derive(Clone)]
pub struct ToastAction {
    /// Button label.
    pub label: String,
    /// Called with the toast's id.
    pub on_activate: ToastActionHandler,
}

impl ToastAction {
    /// Creates a new action.
    pub fn new<F>(label: impl Into<String>, on_activate: F) -> Self
    where
        F: Fn(&ToastId) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            on_activate: Arc::new(on_activate),
        }
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Options accepted by a toast push.
#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    /// Caller-supplied id; generated when absent.
    pub id: Option<ToastId>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Auto-dismiss delay in milliseconds. `Some(0)` keeps the toast until
    /// it is dismissed.
    pub duration_ms: Option<u64>,
    pub variant: Option<ToastVariant>,
    pub action: Option<ToastAction>,
}

impl ToastOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for options carrying only a title.
    pub fn message(title: impl Into<String>) -> Self {
        Self::new().title(title)
    }

    pub fn id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the auto-dismiss delay.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Keeps the toast until it is dismissed explicitly.
    pub fn persistent(mut self) -> Self {
        self.duration_ms = Some(0);
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// A toast owned by the queue.
#[derive(Debug, Clone)]
pub struct ToastItem {
    pub id: ToastId,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Auto-dismiss delay; zero means manual dismissal only.
    pub duration_ms: u64,
    pub variant: ToastVariant,
    pub action: Option<ToastAction>,
    pub created_at: DateTime<Utc>,
}

impl ToastItem {
    /// Materializes options into an item, filling defaults.
    pub fn from_options(options: ToastOptions, default_duration_ms: u64) -> Self {
        Self {
            id: options.id.unwrap_or_else(ToastId::generate),
            title: options.title,
            description: options.description,
            duration_ms: options.duration_ms.unwrap_or(default_duration_ms),
            variant: options.variant.unwrap_or_default(),
            action: options.action,
            created_at: Utc::now(),
        }
    }

    /// Returns the auto-dismiss delay, if any.
    pub fn auto_dismiss(&self) -> Option<Duration> {
        (self.duration_ms > 0).then(|| Duration::from_millis(self.duration_ms))
    }
}
