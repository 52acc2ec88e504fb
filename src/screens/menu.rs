//=========================================================================
// Menu Screen
//=========================================================================
//
// One entry per registered screen plus a trailing Exit entry.
//
// Interaction:
//   Up / Down, pointer hover   move the selection
//   Select on a screen entry   1st: show its preview
//                              2nd: launch it (zooming out of the preview)
//   Select on Exit, Cancel     exit the application
//
// Layout (pixels):
// ```text
//   ┌──────────── header ────────────┐
//   │                                │
//   │  [entry]           ┌────────┐  │
//   │  [entry]           │preview │  │
//   │  [Exit ]           └────────┘  │
//   └────────────────────────────────┘
// ```
// Entries slide in from the left and out to the right, offset by the
// squared transition position.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{MessageBoxScreen, PreviewZoom, GLYPH_WIDTH};
use crate::core::content::ContentError;
use crate::core::input::{GestureSet, InputSnapshot, MouseButton};
use crate::core::render::{render_preview, Color, Rect, RenderBackend, RenderError, Texture, Viewport};
use crate::core::screen::{DrawContext, ResourceContext, Screen, ScreenContext, ScreenRegistry, ScreenState};

//=== Layout ==============================================================

const PADDING: f32 = 8.0;
const HEADER_HEIGHT: f32 = 64.0;
const ENTRY_HEIGHT: f32 = 32.0;
const ENTRY_LEFT: f32 = 64.0;
const SLIDE_DISTANCE: f32 = 256.0;
const HEADER_SLIDE: f32 = 100.0;
const PREVIEW_OPACITY: f32 = 0.6;

const HEADER_COLOR: Color = Color::rgba(1.0, 1.0, 1.0, 0x88 as f32 / 255.0);
const ENTRY_COLOR: Color = Color::rgb(0.85, 0.85, 0.9);
const SELECTED_COLOR: Color = Color::rgb(1.0, 0.82, 0.25);

//=== MenuEntry ===========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryKind {
    Screen(String),
    Exit,
}

#[derive(Debug)]
struct MenuEntry {
    title: String,
    kind: EntryKind,
    preview: Option<Texture>,
}

//=== MenuScreen ==========================================================

#[derive(Debug)]
pub struct MenuScreen {
    registry: ScreenRegistry,
    entries: Vec<MenuEntry>,
    selected: usize,
    armed: Option<usize>,
    viewport: Viewport,
}

impl MenuScreen {
    /// Builds the entries from `registry`, in registration order.
    pub fn new(registry: ScreenRegistry) -> Self {
        let mut entries: Vec<MenuEntry> = registry
            .iter()
            .map(|template| MenuEntry {
                title: template.title.clone(),
                kind: EntryKind::Screen(template.key.clone()),
                preview: None,
            })
            .collect();

        entries.push(MenuEntry {
            title: "Exit".to_owned(),
            kind: EntryKind::Exit,
            preview: None,
        });

        Self {
            registry,
            entries,
            selected: 0,
            armed: None,
            viewport: Viewport::new(1, 1),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Entry whose preview is showing, waiting for a second select.
    pub fn armed(&self) -> Option<usize> {
        self.armed
    }

    pub fn preview(&self, index: usize) -> Option<Texture> {
        self.entries.get(index).and_then(|e| e.preview)
    }

    //--- Layout -----------------------------------------------------------

    /// Where entry `index` sits at the given transition position.
    pub fn entry_rect(&self, index: usize, position: f32, state: ScreenState) -> Rect {
        let list_height = self.entries.len() as f32 * ENTRY_HEIGHT;
        let top = HEADER_HEIGHT + (self.viewport.height as f32 - HEADER_HEIGHT - list_height).max(0.0) / 2.0;

        let offset = position * position * SLIDE_DISTANCE;
        let x = match state {
            ScreenState::TransitionOn => ENTRY_LEFT - offset,
            _ => ENTRY_LEFT + offset,
        };

        let title_width = self.entries[index].title.chars().count() as f32 * GLYPH_WIDTH;
        Rect::new(
            x,
            top + index as f32 * ENTRY_HEIGHT,
            title_width + PADDING * 2.0,
            ENTRY_HEIGHT - PADDING,
        )
    }

    /// Right half of the area below the header.
    pub fn preview_rect(&self) -> Rect {
        let width = self.viewport.width as f32 / 2.0;
        let height = self.viewport.height as f32 / 2.0;
        let cy = HEADER_HEIGHT + (self.viewport.height as f32 - HEADER_HEIGHT) / 2.0;
        Rect::centered(self.viewport.width as f32 * 0.75, cy, width, height)
    }

    fn entry_at(&self, point: (f32, f32), position: f32, state: ScreenState) -> Option<usize> {
        (0..self.entries.len()).find(|&i| self.entry_rect(i, position, state).contains(point))
    }

    //--- Actions ----------------------------------------------------------

    fn select(&mut self, index: usize) {
        if index != self.selected {
            self.selected = index;
            self.armed = None;
        }
    }

    fn activate(&mut self, ctx: &mut ScreenContext) {
        let index = self.selected;
        let key = match &self.entries[index].kind {
            EntryKind::Exit => {
                debug!("Exit entry chosen");
                ctx.exit_game();
                return;
            }
            EntryKind::Screen(key) => key.clone(),
        };

        if self.armed != Some(index) {
            self.armed = Some(index);
            return;
        }
        self.armed = None;

        let Some(template) = self.registry.get(&key) else {
            warn!("Menu entry `{}` is no longer registered", key);
            return;
        };

        debug!("Launching `{}` from the menu", key);
        ctx.add(PreviewZoom::from_preview(template.create(), self.preview_rect(), self.viewport));
        if let Some(details) = &template.details {
            ctx.add(MessageBoxScreen::new(details.clone()));
        }
    }
}

impl Screen for MenuScreen {
    fn load_content(&mut self, resources: &mut ResourceContext) -> Result<(), ContentError> {
        self.viewport = resources.viewport;
        let width = (self.viewport.width / 2).max(1);
        let height = (self.viewport.height / 2).max(1);

        for entry in &mut self.entries {
            let EntryKind::Screen(key) = &entry.kind else {
                continue;
            };
            if let Some(template) = self.registry.get(key) {
                let mut screen = template.create();
                entry.preview = Some(render_preview(screen.as_mut(), resources, width, height)?);
            }
        }
        Ok(())
    }

    fn unload_content(&mut self, resources: &mut ResourceContext) {
        for entry in &mut self.entries {
            let Some(preview) = entry.preview.take() else {
                continue;
            };
            if let Err(err) = resources.renderer.destroy_target(preview.target) {
                warn!("Could not release preview of `{}`: {}", entry.title, err);
            }
        }
        self.armed = None;
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext, input: &InputSnapshot) {
        let position = ctx.transition_position();
        let state = ctx.state();
        let count = self.entries.len();

        let hovered = input
            .valid_cursor()
            .and_then(|point| self.entry_at(point, position, state));
        if let Some(index) = hovered {
            self.select(index);
        }

        if input.is_menu_up() {
            self.select((self.selected + count - 1) % count);
        }
        if input.is_menu_down() {
            self.select((self.selected + 1) % count);
        }

        // A click only counts when it lands on an entry.
        let stray_click = input.is_button_pressed(MouseButton::Left) && hovered.is_none();

        if input.is_menu_select() && !stray_click {
            self.activate(ctx);
        } else if input.is_menu_cancel() {
            ctx.exit_game();
        }
    }

    fn has_cursor(&self) -> bool {
        true
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(700)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(700)
    }

    fn enabled_gestures(&self) -> GestureSet {
        GestureSet::MENU
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError> {
        let position = ctx.transition_position();
        let state = ctx.state();

        for index in 0..self.entries.len() {
            let color = if index == self.selected { SELECTED_COLOR } else { ENTRY_COLOR };
            ctx.fill_rect(self.entry_rect(index, position, state), color);
        }

        if let Some(preview) = self.armed.and_then(|i| self.entries[i].preview) {
            ctx.draw_texture(preview, self.preview_rect(), PREVIEW_OPACITY)?;
        }

        let header_y = -position * position * HEADER_SLIDE;
        ctx.fill_rect(
            Rect::new(0.0, header_y, self.viewport.width as f32, HEADER_HEIGHT),
            HEADER_COLOR,
        );
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
