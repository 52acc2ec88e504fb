//=========================================================================
// Message Box Screen
//=========================================================================

use std::time::Duration;

use crate::core::content::ContentError;
use crate::core::input::{InputSnapshot, MouseButton};
use crate::core::render::{Color, Rect, RenderError};
use crate::core::screen::{DrawContext, ResourceContext, Screen, ScreenContext};
use crate::screens::{GLYPH_WIDTH, LINE_HEIGHT};

const H_PAD: f32 = 32.0;
const V_PAD: f32 = 16.0;

/// Popup panel centered on the viewport, dismissed by select, cancel or
/// a left click anywhere.
#[derive(Debug, Clone)]
pub struct MessageBoxScreen {
    message: String,
    text: Rect,
    panel: Rect,
}

impl MessageBoxScreen {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            text: Rect::new(0.0, 0.0, 0.0, 0.0),
            panel: Rect::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Panel placement, valid after `load_content`.
    pub fn panel(&self) -> Rect {
        self.panel
    }
}

impl Screen for MessageBoxScreen {
    fn load_content(&mut self, resources: &mut ResourceContext) -> Result<(), ContentError> {
        let columns = self.message.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let rows = self.message.lines().count().max(1);

        let (cx, cy) = resources.viewport.center();
        let width = columns as f32 * GLYPH_WIDTH;
        let height = rows as f32 * LINE_HEIGHT;

        self.text = Rect::centered(cx, cy, width, height);
        self.panel = Rect::centered(cx, cy, width + H_PAD * 2.0, height + V_PAD * 2.0);
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext, input: &InputSnapshot) {
        if input.is_menu_select() || input.is_menu_cancel() || input.is_button_pressed(MouseButton::Left) {
            ctx.exit_screen();
        }
    }

    fn is_popup(&self) -> bool {
        true
    }

    fn has_cursor(&self) -> bool {
        true
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(400)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(400)
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError> {
        ctx.fill_rect(self.panel, Color::WHITE.faded(2.0 / 3.0));

        // One bar per line, with a one pixel drop shadow.
        for (row, line) in self.message.lines().enumerate() {
            let bar = Rect::new(
                self.text.x,
                self.text.y + row as f32 * LINE_HEIGHT + 2.0,
                line.chars().count() as f32 * GLYPH_WIDTH,
                LINE_HEIGHT - 4.0,
            );
            ctx.fill_rect(bar.translated(1.0, 1.0), Color::BLACK);
            ctx.fill_rect(bar, Color::rgb(0.2, 0.2, 0.25));
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MenuAction;
    use crate::core::screen::ScreenCommand;
    use crate::screens::harness::Harness;

    #[test]
    fn panel_is_centered_and_padded() {
        let mut harness = Harness::new(400, 300);
        let mut screen = MessageBoxScreen::new("ten chars!");

        harness.load(&mut screen).unwrap();

        let panel = screen.panel();
        assert_eq!(panel.width, 10.0 * GLYPH_WIDTH + 2.0 * H_PAD);
        assert_eq!(panel.height, LINE_HEIGHT + 2.0 * V_PAD);
        assert_eq!(panel.center(), (200.0, 150.0));
    }

    #[test]
    fn multiline_message_grows_the_panel() {
        let mut harness = Harness::new(400, 300);
        let mut screen = MessageBoxScreen::new("a\nlonger line\nb");

        harness.load(&mut screen).unwrap();

        assert_eq!(screen.panel().height, 3.0 * LINE_HEIGHT + 2.0 * V_PAD);
        assert_eq!(screen.panel().width, 11.0 * GLYPH_WIDTH + 2.0 * H_PAD);
    }

    #[test]
    fn dismissed_by_select_cancel_or_click() {
        let mut harness = Harness::new(64, 64);
        let mut screen = MessageBoxScreen::new("ok");
        harness.load(&mut screen).unwrap();

        let inputs = [
            InputSnapshot::default().with_action(MenuAction::Select),
            InputSnapshot::default().with_action(MenuAction::Cancel),
            InputSnapshot::default().with_press(MouseButton::Left),
        ];

        for input in &inputs {
            let commands = harness.input(&mut screen, input);
            assert!(matches!(commands.as_slice(), [ScreenCommand::Exit(_)]), "{:?}", input);
        }
    }

    #[test]
    fn other_input_is_ignored() {
        let mut harness = Harness::new(64, 64);
        let mut screen = MessageBoxScreen::new("ok");

        let commands = harness.input(&mut screen, &InputSnapshot::default().with_action(MenuAction::Down));

        assert!(commands.is_empty());
    }

    #[test]
    fn is_a_popup_with_cursor() {
        let screen = MessageBoxScreen::new("x");
        assert!(screen.is_popup());
        assert!(screen.has_cursor());
        assert_eq!(screen.transition_on_time(), Duration::from_millis(400));
    }
}
