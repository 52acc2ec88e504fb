//=========================================================================
// Stagehand Demo
//=========================================================================
//
// Background → Menu → Logo splash on top. The menu lists two gradient
// scenes; launching one zooms it out of its preview with a details box.
//
//   RUST_LOG=debug cargo run --bin stagehand-demo
//
//=========================================================================

use std::time::Duration;

use log::{error, info};

use stagehand::prelude::*;

/// Paints a simple two-band stand-in for a logo image.
fn paint_logo(manager: &mut ScreenManager<impl RenderBackend>) -> Result<(), ScreenError> {
    let resources = manager.resources();
    resources
        .content
        .paint_texture(&mut *resources.renderer, "logo", 256, 128, |r| {
            r.clear(Color::rgb(0.95, 0.95, 0.95));
            r.fill_rect(Rect::new(32.0, 40.0, 192.0, 20.0), Color::rgb(0.85, 0.25, 0.2));
            r.fill_rect(Rect::new(32.0, 68.0, 128.0, 20.0), Color::rgb(0.2, 0.3, 0.7));
        })
        .map(|_| ())
        .map_err(|source| ScreenError::ContentLoadFailure {
            screen: "logo".to_owned(),
            source,
        })
}

fn scenes() -> ScreenRegistry {
    let mut registry = ScreenRegistry::new();
    registry
        .register("dusk", "Dusk", || {
            BackgroundScreen::with_colors(Color::rgb(0.25, 0.1, 0.3), Color::rgb(0.95, 0.5, 0.3))
        })
        .with_details("dusk", "Dusk\nPress Enter or click to continue");
    registry
        .register("dawn", "Dawn", || {
            BackgroundScreen::with_colors(Color::rgb(0.5, 0.75, 0.95), Color::rgb(1.0, 0.9, 0.7))
        })
        .with_details("dawn", "Dawn\nEscape closes this box, then returns to the menu");
    registry
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = EngineBuilder::new()
        .with_title("Stagehand Demo")
        .with_fps_overlay(true)
        .build()
        .init(|manager| {
            paint_logo(manager)?;
            manager.add(BackgroundScreen::new())?;
            manager.add(MenuScreen::new(scenes()))?;
            manager.add(LogoScreen::new(Duration::from_secs(3)))?;
            Ok(())
        })
        .and_then(Engine::run);

    match result {
        Ok(()) => info!("Goodbye"),
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    }
}
