//=========================================================================
// Stock Screens
//=========================================================================
//
// Ready-made screens for a menu-driven application.
//
//   BackgroundScreen   gradient backdrop at the bottom of the stack
//   LogoScreen         timed splash, skippable
//   MessageBoxScreen   popup panel dismissed by select/cancel/click
//   MenuScreen         registry-driven entries with previews
//   PreviewZoom        wrapper that zooms a screen out of its preview
//
// None of them draw text; labels are rendered as solid bars sized from
// their character count.
//
//=========================================================================

//=== Module Declarations =================================================

mod background;
mod logo;
mod menu;
mod message_box;
mod preview;

//=== Public API ==========================================================

pub use background::BackgroundScreen;
pub use logo::LogoScreen;
pub use menu::MenuScreen;
pub use message_box::MessageBoxScreen;
pub use preview::PreviewZoom;

/// Width of one character cell in label bars.
pub(crate) const GLYPH_WIDTH: f32 = 8.0;

/// Height of one text line in label bars.
pub(crate) const LINE_HEIGHT: f32 = 16.0;

//=========================================================================
// Test Harness
//=========================================================================
