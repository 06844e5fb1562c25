//! Dropdown menu.
//!
//! The trigger toggles the menu and clicking it again is not an outside
//! click. Items are plain actions, checkbox items, radio items belonging
//! to a named radio group, or submenus.
//!
//! A submenu is a child overlay opened by hovering its item and placed to
//! the right of it. It has its own dismissal layer, so an outside press
//! inside the parent menu closes only the submenu. Closing the parent
//! closes every submenu under it.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::app::Runtime;
use crate::domain::{Align, CommandEntry, ElementId, OverlayId, Placement, Side};
use crate::host::Host;
use crate::overlay::{Activation, Geometry, OverlayConfig, OverlayKind, Result};

use super::OpenOptions;

/// Gap between trigger and menu.
pub const MENU_OFFSET: f32 = 4.0;

/// One row of a dropdown menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action(CommandEntry),
    Checkbox { entry: CommandEntry, checked: bool },
    Radio { group: String, entry: CommandEntry },
    /// The entry id doubles as the host element id of the submenu's
    /// trigger row.
    Submenu {
        entry: CommandEntry,
        surface: ElementId,
        items: Vec<MenuItem>,
    },
}

impl MenuItem {
    pub fn action(id: impl Into<String>, label: impl Into<String>) -> Self {
        MenuItem::Action(CommandEntry::new(id, label))
    }

    pub fn checkbox(id: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        MenuItem::Checkbox {
            entry: CommandEntry::new(id, label),
            checked,
        }
    }

    pub fn radio(group: impl Into<String>, id: impl Into<String>, label: impl Into<String>) -> Self {
        MenuItem::Radio {
            group: group.into(),
            entry: CommandEntry::new(id, label),
        }
    }

    pub fn submenu(
        id: impl Into<String>,
        label: impl Into<String>,
        surface: impl Into<ElementId>,
        items: Vec<MenuItem>,
    ) -> Self {
        MenuItem::Submenu {
            entry: CommandEntry::new(id, label),
            surface: surface.into(),
            items,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.entry_mut().disabled = disabled;
        self
    }

    pub fn entry(&self) -> &CommandEntry {
        match self {
            MenuItem::Action(entry)
            | MenuItem::Checkbox { entry, .. }
            | MenuItem::Radio { entry, .. }
            | MenuItem::Submenu { entry, .. } => entry,
        }
    }

    fn entry_mut(&mut self) -> &mut CommandEntry {
        match self {
            MenuItem::Action(entry)
            | MenuItem::Checkbox { entry, .. }
            | MenuItem::Radio { entry, .. }
            | MenuItem::Submenu { entry, .. } => entry,
        }
    }
}

/// What selecting an item did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownSelection {
    /// An action ran and the menu closed.
    Activated(String),
    Toggled { id: String, checked: bool },
    RadioChanged { group: String, value: String },
}

#[derive(Debug)]
pub struct Dropdown {
    trigger: ElementId,
    surface: ElementId,
    placement: Placement,
    items: Vec<MenuItem>,
    radio_values: BTreeMap<String, String>,
    open: OpenOptions,
}

impl Dropdown {
    pub fn new(trigger: impl Into<ElementId>, surface: impl Into<ElementId>) -> Self {
        Self {
            trigger: trigger.into(),
            surface: surface.into(),
            placement: Placement::new(Side::Bottom, Align::Start),
            items: Vec::new(),
            radio_values: BTreeMap::new(),
            open: OpenOptions::default(),
        }
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    /// Initial value of a radio group.
    pub fn radio_value(mut self, group: impl Into<String>, value: impl Into<String>) -> Self {
        self.radio_values.insert(group.into(), value.into());
        self
    }

    /// Makes the menu controlled by the caller.
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

    pub fn mount<H: Host>(self, rt: &mut Runtime<H>) -> DropdownMenu {
        let config = OverlayConfig::new(
            OverlayKind::Dropdown,
            self.surface,
            Geometry::Anchored {
                placement: self.placement,
                offset: MENU_OFFSET,
            },
        )
        .trigger(self.trigger)
        .open_state(self.open.into_state())
        .activation(Activation::Toggle)
        .focus_trap(false);
        let id = rt.register(config);
        let mut submenus = BTreeMap::new();
        mount_submenus(rt, id, &self.items, &mut submenus);
        DropdownMenu {
            id,
            items: self.items,
            radio_values: self.radio_values,
            submenus,
            query: String::new(),
        }
    }
}

/// Registers a hover-activated child overlay for every submenu under
/// `parent`, depth first.
fn mount_submenus<H: Host>(
    rt: &mut Runtime<H>,
    parent: OverlayId,
    items: &[MenuItem],
    out: &mut BTreeMap<String, OverlayId>,
) {
    for item in items {
        let MenuItem::Submenu {
            entry,
            surface,
            items: children,
        } = item
        else {
            continue;
        };
        let close_delay = rt.settings().hover.close_delay();
        let config = OverlayConfig::new(
            OverlayKind::Dropdown,
            surface.clone(),
            Geometry::Anchored {
                placement: Placement::new(Side::Right, Align::Start),
                offset: MENU_OFFSET,
            },
        )
        .trigger(entry.id.as_str())
        .activation(Activation::Hover {
            open_delay: Duration::ZERO,
            close_delay,
        })
        .focus_trap(false)
        .parent(parent);
        let id = rt.register(config);
        out.insert(entry.id.clone(), id);
        mount_submenus(rt, id, children, out);
    }
}

fn find_mut<'a>(items: &'a mut [MenuItem], id: &str) -> Option<&'a mut MenuItem> {
    for item in items {
        if item.entry().id == id {
            return Some(item);
        }
        if let MenuItem::Submenu { items: children, .. } = item {
            if let Some(found) = find_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn flatten<'a>(items: &'a [MenuItem], out: &mut Vec<&'a MenuItem>) {
    for item in items {
        out.push(item);
        if let MenuItem::Submenu { items: children, .. } = item {
            flatten(children, out);
        }
    }
}

/// A mounted dropdown with its item state.
#[derive(Debug, Clone)]
pub struct DropdownMenu {
    id: OverlayId,
    items: Vec<MenuItem>,
    radio_values: BTreeMap<String, String>,
    submenus: BTreeMap<String, OverlayId>,
    query: String,
}

impl DropdownMenu {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Overlay id of the submenu opened by item `id`.
    pub fn submenu(&self, id: &str) -> Option<OverlayId> {
        self.submenus.get(id).copied()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Top-level items whose label contains the query, ignoring case.
    /// An empty result means hosts render the empty-state marker.
    pub fn visible_items(&self) -> Vec<&MenuItem> {
        let query_lower = self.query.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.entry().matches(&query_lower))
            .collect()
    }

    pub fn is_checked(&self, id: &str) -> bool {
        let mut all = Vec::new();
        flatten(&self.items, &mut all);
        all.into_iter().any(|item| {
            matches!(item, MenuItem::Checkbox { entry, checked: true } if entry.id == id)
        })
    }

    pub fn radio_value(&self, group: &str) -> Option<&str> {
        self.radio_values.get(group).map(String::as_str)
    }

    /// Selects the item `id`.
    ///
    /// Disabled and unknown items are ignored, as is choosing the radio
    /// value a group already has. Only actions close the menu, together
    /// with any open submenu. Selecting a submenu's own row closes that
    /// submenu.
    pub fn select<H: Host>(
        &mut self,
        rt: &mut Runtime<H>,
        id: &str,
    ) -> Result<Option<DropdownSelection>> {
        let Some(item) = find_mut(&mut self.items, id).filter(|item| !item.entry().disabled) else {
            tracing::debug!(menu = %self.id, item = id, "selection ignored");
            return Ok(None);
        };

        let selection = match item {
            MenuItem::Action(entry) => {
                let id = entry.id.clone();
                rt.set_open(self.id, false)?;
                Some(DropdownSelection::Activated(id))
            }
            MenuItem::Checkbox { entry, checked } => {
                *checked = !*checked;
                Some(DropdownSelection::Toggled {
                    id: entry.id.clone(),
                    checked: *checked,
                })
            }
            MenuItem::Radio { group, entry } => {
                if self.radio_values.get(group.as_str()) == Some(&entry.id) {
                    None
                } else {
                    self.radio_values.insert(group.clone(), entry.id.clone());
                    Some(DropdownSelection::RadioChanged {
                        group: group.clone(),
                        value: entry.id.clone(),
                    })
                }
            }
            MenuItem::Submenu { entry, .. } => {
                if let Some(child) = self.submenus.get(&entry.id) {
                    rt.set_open(*child, false)?;
                }
                None
            }
        };
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::domain::{Point, Rect, Viewport};
    use crate::host::MemoryHost;
    use crate::overlay::{HoverTarget, ManualClock, SurfaceLayout};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    fn setup() -> (Runtime<MemoryHost>, DropdownMenu) {
        let mut host = MemoryHost::new(Viewport::new(1000.0, 800.0));
        host.add("menu-button", None)
            .add("page", None)
            .set_rect(&id("menu-button"), Rect::new(20.0, 20.0, 80.0, 30.0));
        host.add_detached("menu");
        let mut rt = Runtime::new(host, Arc::new(ManualClock::new()), Settings::default());
        let menu = Dropdown::new("menu-button", "menu")
            .item(MenuItem::action("profile", "Profile"))
            .item(MenuItem::action("billing", "Billing").disabled(true))
            .item(MenuItem::checkbox("status-bar", "Status Bar", true))
            .item(MenuItem::radio("panel", "top", "Top"))
            .item(MenuItem::radio("panel", "bottom", "Bottom"))
            .radio_value("panel", "top")
            .mount(&mut rt);
        (rt, menu)
    }

    #[test]
    fn trigger_toggles_below_start() {
        let (mut rt, menu) = setup();
        rt.trigger_click(menu.id()).unwrap();
        assert_eq!(
            rt.overlay(menu.id()).unwrap().layout(),
            Some(SurfaceLayout::Anchored {
                anchor: Point::new(20.0, 54.0),
                side: Side::Bottom,
            })
        );

        rt.handle_pointer_down(&id("menu-button"));
        assert!(rt.is_open(menu.id()).unwrap());
        rt.trigger_click(menu.id()).unwrap();
        assert!(!rt.is_open(menu.id()).unwrap());
    }

    #[test]
    fn outside_press_closes() {
        let (mut rt, menu) = setup();
        rt.trigger_click(menu.id()).unwrap();
        assert!(rt.handle_pointer_down(&id("page")));
        assert!(!rt.is_open(menu.id()).unwrap());
    }

    #[test]
    fn action_closes_menu() {
        let (mut rt, mut menu) = setup();
        rt.trigger_click(menu.id()).unwrap();

        assert_eq!(
            menu.select(&mut rt, "profile").unwrap(),
            Some(DropdownSelection::Activated("profile".into()))
        );
        assert!(!rt.is_open(menu.id()).unwrap());
    }

    #[test]
    fn checkbox_and_radio_keep_menu_open() {
        let (mut rt, mut menu) = setup();
        rt.trigger_click(menu.id()).unwrap();

        assert_eq!(
            menu.select(&mut rt, "status-bar").unwrap(),
            Some(DropdownSelection::Toggled {
                id: "status-bar".into(),
                checked: false,
            })
        );
        assert!(!menu.is_checked("status-bar"));

        assert_eq!(menu.select(&mut rt, "top").unwrap(), None);
        assert_eq!(
            menu.select(&mut rt, "bottom").unwrap(),
            Some(DropdownSelection::RadioChanged {
                group: "panel".into(),
                value: "bottom".into(),
            })
        );
        assert_eq!(menu.radio_value("panel"), Some("bottom"));
        assert!(rt.is_open(menu.id()).unwrap());
    }

    #[test]
    fn disabled_items_are_ignored() {
        let (mut rt, mut menu) = setup();
        rt.trigger_click(menu.id()).unwrap();
        assert_eq!(menu.select(&mut rt, "billing").unwrap(), None);
        assert!(rt.is_open(menu.id()).unwrap());
    }

    #[test]
    fn query_filters_items() {
        let (_rt, mut menu) = setup();
        menu.set_query("BOT");
        let labels: Vec<&str> = menu
            .visible_items()
            .iter()
            .map(|item| item.entry().label.as_str())
            .collect();
        assert_eq!(labels, vec!["Bottom"]);

        menu.set_query("zzz");
        assert!(menu.visible_items().is_empty());
    }

    #[test]
    fn query_is_not_trimmed() {
        let (_rt, mut menu) = setup();
        menu.set_query("Top ");
        assert!(menu.visible_items().is_empty());
    }

    fn submenu_setup() -> (Runtime<MemoryHost>, DropdownMenu) {
        let mut host = MemoryHost::new(Viewport::new(1000.0, 800.0));
        host.add("menu-button", None)
            .add("page", None)
            .set_rect(&id("menu-button"), Rect::new(20.0, 20.0, 80.0, 30.0));
        host.add_detached("menu")
            .add("profile", Some(&id("menu")))
            .add("share", Some(&id("menu")))
            .set_rect(&id("share"), Rect::new(20.0, 90.0, 200.0, 30.0));
        host.add_detached("share-menu")
            .add("email", Some(&id("share-menu")));
        let mut rt = Runtime::new(host, Arc::new(ManualClock::new()), Settings::default());
        let menu = Dropdown::new("menu-button", "menu")
            .item(MenuItem::action("profile", "Profile"))
            .item(MenuItem::submenu(
                "share",
                "Share",
                "share-menu",
                vec![
                    MenuItem::action("email", "Email"),
                    MenuItem::checkbox("link", "Copy link", false),
                ],
            ))
            .mount(&mut rt);
        (rt, menu)
    }

    fn open_submenu(rt: &mut Runtime<MemoryHost>, menu: &DropdownMenu) -> OverlayId {
        rt.trigger_click(menu.id()).unwrap();
        let share = menu.submenu("share").unwrap();
        rt.pointer_enter(share, HoverTarget::Trigger).unwrap();
        share
    }

    #[test]
    fn hovering_row_opens_submenu_beside_it() {
        let (mut rt, menu) = submenu_setup();
        let share = open_submenu(&mut rt, &menu);

        assert_eq!(rt.open_overlays(), vec![menu.id(), share]);
        assert_eq!(
            rt.overlay(share).unwrap().layout(),
            Some(SurfaceLayout::Anchored {
                anchor: Point::new(224.0, 105.0),
                side: Side::Right,
            })
        );
        assert_eq!(rt.host().portal_layers(), &[id("menu"), id("share-menu")]);
    }

    #[test]
    fn press_in_parent_closes_only_submenu() {
        let (mut rt, menu) = submenu_setup();
        let share = open_submenu(&mut rt, &menu);

        assert!(rt.handle_pointer_down(&id("profile")));
        assert!(!rt.is_open(share).unwrap());
        assert!(rt.is_open(menu.id()).unwrap());
    }

    #[test]
    fn closing_parent_closes_submenu() {
        let (mut rt, menu) = submenu_setup();
        let share = open_submenu(&mut rt, &menu);

        rt.trigger_click(menu.id()).unwrap();

        assert!(!rt.is_open(share).unwrap());
        assert!(rt.open_overlays().is_empty());
        assert!(rt.host().portal_layers().is_empty());
    }

    #[test]
    fn submenu_items_select_through_parent() {
        let (mut rt, mut menu) = submenu_setup();
        let share = open_submenu(&mut rt, &menu);

        assert_eq!(
            menu.select(&mut rt, "link").unwrap(),
            Some(DropdownSelection::Toggled {
                id: "link".into(),
                checked: true,
            })
        );
        assert!(menu.is_checked("link"));
        assert!(rt.is_open(share).unwrap());

        assert_eq!(
            menu.select(&mut rt, "email").unwrap(),
            Some(DropdownSelection::Activated("email".into()))
        );
        assert!(rt.open_overlays().is_empty());
    }

    #[test]
    fn clicking_submenu_row_closes_it() {
        let (mut rt, mut menu) = submenu_setup();
        let share = open_submenu(&mut rt, &menu);

        assert_eq!(menu.select(&mut rt, "share").unwrap(), None);
        assert!(!rt.is_open(share).unwrap());
        assert!(rt.is_open(menu.id()).unwrap());
    }
}
