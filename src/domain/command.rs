//! Command palette and menu entries.

use serde::{Deserialize, Serialize};

/// A selectable entry in a command palette or dropdown menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// Id of the owning group. Filled in when the entry joins a group.
    #[serde(default)]
    pub group_id: String,
}

impl CommandEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shortcut: None,
            disabled: false,
            group_id: String::new(),
        }
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Case-insensitive substring match against the label.
    pub fn matches(&self, query_lower: &str) -> bool {
        query_lower.is_empty() || self.label.to_lowercase().contains(query_lower)
    }
}

/// A titled group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(alias = "items")]
    pub entries: Vec<CommandEntry>,
}

impl CommandGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            entries: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends an entry, stamping it with this group's id.
    pub fn entry(mut self, mut entry: CommandEntry) -> Self {
        entry.group_id = self.id.clone();
        self.entries.push(entry);
        self
    }

    /// Re-stamps every entry with this group's id.
    ///
    /// Needed after deserializing input that omits `group_id`.
    pub fn normalize(mut self) -> Self {
        for entry in &mut self.entries {
            entry.group_id = self.id.clone();
        }
        self
    }
}
