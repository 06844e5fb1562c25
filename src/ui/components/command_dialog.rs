//! Command palette dialog.
//!
//! A searchable command list near the top of the viewport. The configured
//! shortcut toggles it, arrow keys move the selection and Enter activates
//! the selected entry.

use crate::app::Runtime;
use crate::domain::{CommandGroup, ElementId, OverlayId};
use crate::host::Host;
use crate::overlay::{Geometry, OverlayConfig, OverlayKind, Result};
use crate::ui::keybindings::{Key, Keystroke};

use super::command_menu::{CommandMenu, CommandView};
use super::OpenOptions;

/// Distance from the top of the viewport.
pub const PALETTE_INSET: f32 = 80.0;

/// Maximum width of the palette surface.
pub const PALETTE_MAX_WIDTH: f32 = 448.0;

const DEFAULT_TITLE: &str = "Command Palette";
const DEFAULT_DESCRIPTION: &str = "Search for a command...";

#[derive(Debug)]
pub struct CommandDialog {
    surface: ElementId,
    trigger: Option<ElementId>,
    groups: Vec<CommandGroup>,
    title: String,
    description: String,
    shortcut: Option<Keystroke>,
    open: OpenOptions,
}

impl CommandDialog {
    pub fn new(surface: impl Into<ElementId>, groups: Vec<CommandGroup>) -> Self {
        Self {
            surface: surface.into(),
            trigger: None,
            groups,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            shortcut: None,
            open: OpenOptions::default(),
        }
    }

    pub fn trigger(mut self, trigger: impl Into<ElementId>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Makes the palette controlled by the caller.
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

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Keystroke that toggles the palette. Defaults to the configured one.
    pub fn shortcut(mut self, shortcut: Keystroke) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn mount<H: Host>(self, rt: &mut Runtime<H>) -> CommandPalette {
        let shortcut = self
            .shortcut
            .unwrap_or_else(|| rt.settings().command_palette.keystroke());
        let mut config = OverlayConfig::new(
            OverlayKind::CommandDialog,
            self.surface,
            Geometry::TopInset {
                inset: PALETTE_INSET,
                max_width: PALETTE_MAX_WIDTH,
            },
        )
        .open_state(self.open.into_state());
        if let Some(trigger) = self.trigger {
            config = config.trigger(trigger);
        }
        CommandPalette {
            id: rt.register(config),
            menu: CommandMenu::new(self.groups),
            title: self.title,
            description: self.description,
            shortcut,
        }
    }
}

/// What the palette did with a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteKey {
    /// Not for the palette or any open overlay.
    Ignored,
    Handled,
    /// An entry was activated and the palette closed.
    Activated(String),
}

/// A mounted command palette.
#[derive(Debug, Clone)]
pub struct CommandPalette {
    id: OverlayId,
    menu: CommandMenu,
    title: String,
    description: String,
    shortcut: Keystroke,
}

impl CommandPalette {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn shortcut(&self) -> Keystroke {
        self.shortcut
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn view(&self) -> &CommandView {
        self.menu.view()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.menu.set_query(query);
    }

    /// Opens with an empty query.
    pub fn open<H: Host>(&mut self, rt: &mut Runtime<H>) -> Result<()> {
        self.menu.clear_query();
        rt.set_open(self.id, true)
    }

    pub fn close<H: Host>(&self, rt: &mut Runtime<H>) -> Result<()> {
        rt.set_open(self.id, false)
    }

    pub fn toggle<H: Host>(&mut self, rt: &mut Runtime<H>) -> Result<()> {
        if rt.is_open(self.id)? {
            self.close(rt)
        } else {
            self.open(rt)
        }
    }

    /// Activates a clicked entry. Returns its id if it was enabled and
    /// visible.
    pub fn click<H: Host>(&mut self, rt: &mut Runtime<H>, entry_id: &str) -> Result<Option<String>> {
        let activated = self.menu.activate_id(entry_id);
        if activated.is_some() {
            self.close(rt)?;
        }
        Ok(activated)
    }

    /// Offers a keystroke to the palette, then to the runtime.
    pub fn handle_key<H: Host>(
        &mut self,
        rt: &mut Runtime<H>,
        keystroke: &Keystroke,
    ) -> Result<PaletteKey> {
        if keystroke.matches(&self.shortcut) {
            self.toggle(rt)?;
            return Ok(PaletteKey::Handled);
        }
        if !rt.is_open(self.id)? {
            return Ok(pass_through(rt, keystroke));
        }

        let modifiers = keystroke.modifiers;
        let typing = !(modifiers.cmd || modifiers.ctrl || modifiers.alt);
        match keystroke.key {
            Key::Up => self.menu.select_previous(),
            Key::Down => self.menu.select_next(),
            Key::Enter => {
                if let Some(id) = self.menu.activate() {
                    self.close(rt)?;
                    return Ok(PaletteKey::Activated(id));
                }
            }
            Key::Backspace => self.menu.backspace(),
            Key::Space if typing => self.menu.push_str(" "),
            Key::Char(c) if typing => {
                let mut buf = [0u8; 4];
                self.menu.push_str(c.encode_utf8(&mut buf));
            }
            _ => return Ok(pass_through(rt, keystroke)),
        }
        Ok(PaletteKey::Handled)
    }
}

fn pass_through<H: Host>(rt: &mut Runtime<H>, keystroke: &Keystroke) -> PaletteKey {
    if rt.handle_key(keystroke) {
        PaletteKey::Handled
    } else {
        PaletteKey::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::domain::{CommandEntry, Point, Viewport};
    use crate::host::MemoryHost;
    use crate::overlay::{ManualClock, SurfaceLayout};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn setup() -> (Runtime<MemoryHost>, CommandPalette) {
        let mut host = MemoryHost::new(Viewport::new(1200.0, 800.0));
        host.add("page", None);
        host.add_detached("palette")
            .add_focusable("palette-input", Some(&ElementId::from("palette")));
        let mut rt = Runtime::new(host, Arc::new(ManualClock::new()), Settings::default());
        let groups = vec![
            CommandGroup::new("file")
                .title("File")
                .entry(CommandEntry::new("new", "New File"))
                .entry(CommandEntry::new("open", "Open File"))
                .entry(CommandEntry::new("save", "Save File").disabled(true)),
            CommandGroup::new("view").entry(CommandEntry::new("zoom", "Zoom In")),
        ];
        let palette = CommandDialog::new("palette", groups).mount(&mut rt);
        (rt, palette)
    }

    fn type_str(rt: &mut Runtime<MemoryHost>, palette: &mut CommandPalette, text: &str) {
        for c in text.chars() {
            palette.handle_key(rt, &Keystroke::char(c)).unwrap();
        }
    }

    #[test]
    fn shortcut_toggles_near_top() {
        let (mut rt, mut palette) = setup();
        assert_eq!(palette.title(), "Command Palette");

        let shortcut = Keystroke::command_k();
        assert_eq!(palette.handle_key(&mut rt, &shortcut).unwrap(), PaletteKey::Handled);
        assert_eq!(
            rt.overlay(palette.id()).unwrap().layout(),
            Some(SurfaceLayout::TopInset {
                anchor: Point::new(600.0, 80.0),
                max_width: 448.0,
            })
        );

        palette.handle_key(&mut rt, &shortcut).unwrap();
        assert!(!rt.is_open(palette.id()).unwrap());
    }

    #[test]
    fn typing_filters_and_enter_activates() {
        let (mut rt, mut palette) = setup();
        palette.open(&mut rt).unwrap();
        type_str(&mut rt, &mut palette, "open");
        assert_eq!(palette.view().labels(), vec!["Open File"]);

        assert_eq!(
            palette.handle_key(&mut rt, &Keystroke::key(Key::Enter)).unwrap(),
            PaletteKey::Activated("open".into())
        );
        assert!(!rt.is_open(palette.id()).unwrap());
    }

    #[test]
    fn arrows_skip_disabled_entries() {
        let (mut rt, mut palette) = setup();
        palette.open(&mut rt).unwrap();
        let down = Keystroke::key(Key::Down);
        palette.handle_key(&mut rt, &down).unwrap();
        palette.handle_key(&mut rt, &down).unwrap();

        assert_eq!(
            palette.menu().selected_entry().map(|e| e.id.as_str()),
            Some("zoom")
        );
    }

    #[test]
    fn reopening_clears_query() {
        let (mut rt, mut palette) = setup();
        palette.open(&mut rt).unwrap();
        type_str(&mut rt, &mut palette, "zzz");
        assert!(palette.view().is_empty());

        palette.handle_key(&mut rt, &Keystroke::key(Key::Escape)).unwrap();
        assert!(!rt.is_open(palette.id()).unwrap());

        palette.open(&mut rt).unwrap();
        assert_eq!(palette.menu().query(), "");
        assert_eq!(palette.view().labels().len(), 4);
    }

    #[test]
    fn typed_query_keeps_case() {
        let (mut rt, mut palette) = setup();
        palette.open(&mut rt).unwrap();
        type_str(&mut rt, &mut palette, "New");

        assert_eq!(palette.menu().query(), "New");
        assert_eq!(palette.view().labels(), vec!["New File"]);
    }

    #[test]
    fn keys_pass_through_while_closed() {
        let (mut rt, mut palette) = setup();
        assert_eq!(
            palette.handle_key(&mut rt, &Keystroke::char('a')).unwrap(),
            PaletteKey::Ignored
        );
        assert_eq!(palette.menu().query(), "");
    }

    #[test]
    fn click_activates_visible_entries() {
        let (mut rt, mut palette) = setup();
        palette.open(&mut rt).unwrap();

        assert_eq!(palette.click(&mut rt, "save").unwrap(), None);
        assert!(rt.is_open(palette.id()).unwrap());
        assert_eq!(palette.click(&mut rt, "zoom").unwrap(), Some("zoom".into()));
        assert!(!rt.is_open(palette.id()).unwrap());
    }

    #[test]
    fn controlled_palette_waits_for_caller() {
        let mut host = MemoryHost::new(Viewport::new(1200.0, 800.0));
        host.add_detached("palette");
        let mut rt = Runtime::new(host, Arc::new(ManualClock::new()), Settings::default());
        let requested = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&requested);
        let mut palette = CommandDialog::new("palette", Vec::new())
            .open(false)
            .on_open_change(move |open| sink.lock().unwrap().push(open))
            .mount(&mut rt);
        let shortcut = Keystroke::command_k();

        palette.handle_key(&mut rt, &shortcut).unwrap();
        assert_eq!(*requested.lock().unwrap(), vec![true]);
        assert!(!rt.is_open(palette.id()).unwrap());

        rt.sync_open(palette.id(), true).unwrap();
        palette.handle_key(&mut rt, &shortcut).unwrap();
        assert_eq!(*requested.lock().unwrap(), vec![true, false]);
        assert!(rt.is_open(palette.id()).unwrap());

        rt.sync_open(palette.id(), false).unwrap();
        assert!(rt.open_overlays().is_empty());
    }
}
