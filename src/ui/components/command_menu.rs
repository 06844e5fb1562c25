//! Filterable command list shared by the command dialog.
//!
//! Filtering is a pure function of the groups and the query. The menu keeps
//! the query and a keyboard selection over the visible entries.

use crate::domain::{CommandEntry, CommandGroup};

/// Text hosts show when a query matches nothing.
pub const EMPTY_MESSAGE: &str = "No results found";

/// Placeholder for the search input.
pub const PLACEHOLDER: &str = "Type a command...";

/// A group with at least one visible entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleGroup {
    pub id: String,
    pub title: Option<String>,
    pub entries: Vec<CommandEntry>,
}

/// The filtered view of a command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandView {
    /// Nothing matched; hosts render [`EMPTY_MESSAGE`].
    Empty,
    Groups(Vec<VisibleGroup>),
}

impl CommandView {
    pub fn is_empty(&self) -> bool {
        matches!(self, CommandView::Empty)
    }

    /// Visible entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        let groups: &[VisibleGroup] = match self {
            CommandView::Empty => &[],
            CommandView::Groups(groups) => groups,
        };
        groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries().map(|e| e.label.as_str()).collect()
    }
}

/// Keeps entries whose label contains `query`, ignoring case.
///
/// Groups left without entries are dropped, and a view with no groups
/// collapses to [`CommandView::Empty`].
pub fn filter_groups(groups: &[CommandGroup], query: &str) -> CommandView {
    let query_lower = query.to_lowercase();
    let visible: Vec<VisibleGroup> = groups
        .iter()
        .filter_map(|group| {
            let entries: Vec<CommandEntry> = group
                .entries
                .iter()
                .filter(|e| e.matches(&query_lower))
                .cloned()
                .collect();
            (!entries.is_empty()).then(|| VisibleGroup {
                id: group.id.clone(),
                title: group.title.clone(),
                entries,
            })
        })
        .collect();

    if visible.is_empty() {
        CommandView::Empty
    } else {
        CommandView::Groups(visible)
    }
}

/// Query, filtered view and keyboard selection.
#[derive(Debug, Clone)]
pub struct CommandMenu {
    groups: Vec<CommandGroup>,
    query: String,
    view: CommandView,
    selected: Option<usize>,
}

impl CommandMenu {
    pub fn new(groups: Vec<CommandGroup>) -> Self {
        let groups: Vec<CommandGroup> = groups.into_iter().map(CommandGroup::normalize).collect();
        let mut menu = Self {
            view: filter_groups(&groups, ""),
            groups,
            query: String::new(),
            selected: None,
        };
        menu.selected = menu.first_enabled();
        menu
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the query and refilters. Selection resets to the first
    /// enabled entry.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.view = filter_groups(&self.groups, &self.query);
        self.selected = self.first_enabled();
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Appends typed text to the query.
    pub fn push_str(&mut self, text: &str) {
        let mut query = std::mem::take(&mut self.query);
        query.push_str(text);
        self.set_query(query);
    }

    /// Deletes the last character of the query.
    pub fn backspace(&mut self) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query);
    }

    pub fn view(&self) -> &CommandView {
        &self.view
    }

    pub fn selected_entry(&self) -> Option<&CommandEntry> {
        self.selected.and_then(|i| self.view.entries().nth(i))
    }

    /// Moves to the next enabled entry. Stays put at the end.
    pub fn select_next(&mut self) {
        let start = self.selected.map_or(0, |i| i + 1);
        if let Some(next) = self
            .view
            .entries()
            .enumerate()
            .skip(start)
            .find(|(_, e)| !e.disabled)
            .map(|(i, _)| i)
        {
            self.selected = Some(next);
        }
    }

    /// Moves to the previous enabled entry. Stays put at the start.
    pub fn select_previous(&mut self) {
        let Some(current) = self.selected else {
            return;
        };
        let previous = self
            .view
            .entries()
            .enumerate()
            .take(current)
            .filter(|(_, e)| !e.disabled)
            .map(|(i, _)| i)
            .last();
        if let Some(previous) = previous {
            self.selected = Some(previous);
        }
    }

    /// Id of the selected entry, if it can be activated.
    pub fn activate(&self) -> Option<String> {
        self.selected_entry()
            .filter(|e| !e.disabled)
            .map(|e| e.id.clone())
    }

    /// Id of a visible, enabled entry, as when it is clicked.
    pub fn activate_id(&self, id: &str) -> Option<String> {
        self.view
            .entries()
            .find(|e| e.id == id && !e.disabled)
            .map(|e| e.id.clone())
    }

    fn first_enabled(&self) -> Option<usize> {
        self.view.entries().position(|e| !e.disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file_group() -> CommandGroup {
        CommandGroup::new("file")
            .title("File")
            .entry(CommandEntry::new("new", "New File"))
            .entry(CommandEntry::new("open", "Open File"))
            .entry(CommandEntry::new("save", "Save File"))
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let view = filter_groups(&[file_group()], "Open");
        assert_eq!(view.labels(), vec!["Open File"]);

        let view = filter_groups(&[file_group()], "FILE");
        assert_eq!(view.labels(), vec!["New File", "Open File", "Save File"]);
    }

    #[test]
    fn surrounding_spaces_are_part_of_query() {
        assert_eq!(filter_groups(&[file_group()], "File "), CommandView::Empty);
        assert_eq!(
            filter_groups(&[file_group()], " File").labels(),
            vec!["New File", "Open File", "Save File"]
        );
    }

    #[test]
    fn no_match_gives_empty_marker() {
        assert_eq!(filter_groups(&[file_group()], "zzz"), CommandView::Empty);
    }

    #[test]
    fn empty_groups_are_dropped() {
        let groups = vec![
            file_group(),
            CommandGroup::new("view").entry(CommandEntry::new("zoom", "Zoom In")),
        ];

        let CommandView::Groups(visible) = filter_groups(&groups, "zoom") else {
            panic!("expected matches");
        };
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "view");
    }

    #[test]
    fn selection_skips_disabled_and_clamps() {
        let group = CommandGroup::new("g")
            .entry(CommandEntry::new("a", "Alpha").disabled(true))
            .entry(CommandEntry::new("b", "Beta"))
            .entry(CommandEntry::new("c", "Gamma").disabled(true))
            .entry(CommandEntry::new("d", "Delta"));
        let mut menu = CommandMenu::new(vec![group]);

        assert_eq!(menu.activate().as_deref(), Some("b"));
        menu.select_next();
        assert_eq!(menu.activate().as_deref(), Some("d"));
        menu.select_next();
        assert_eq!(menu.activate().as_deref(), Some("d"));
        menu.select_previous();
        assert_eq!(menu.activate().as_deref(), Some("b"));
        menu.select_previous();
        assert_eq!(menu.activate().as_deref(), Some("b"));
    }

    #[test]
    fn typing_refilters() {
        let mut menu = CommandMenu::new(vec![file_group()]);
        menu.push_str("sa");
        assert_eq!(menu.view().labels(), vec!["Save File"]);

        menu.backspace();
        menu.backspace();
        assert_eq!(menu.query(), "");
        assert_eq!(menu.view().labels().len(), 3);
    }

    #[test]
    fn disabled_entries_cannot_be_clicked() {
        let group = CommandGroup::new("g").entry(CommandEntry::new("x", "Export").disabled(true));
        let menu = CommandMenu::new(vec![group]);

        assert_eq!(menu.activate_id("x"), None);
        assert_eq!(menu.activate(), None);
    }
}
