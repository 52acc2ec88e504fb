//=========================================================================
// Screen Test Doubles
//=========================================================================
//
// `MockScreen` records every hook call into a shared log and can run a
// scripted closure from `update` / `handle_input`. Several mock screens can
// share one log to assert cross-screen ordering.
//
//=========================================================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{DrawContext, ResourceContext, Screen, ScreenContext, UpdateStatus};
use crate::core::content::ContentError;
use crate::core::input::{GestureSet, InputSnapshot};
use crate::core::render::{Color, RenderError, TransitionEffect};

//=== Hook Log ============================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Hook {
    Load,
    Unload,
    Update(UpdateStatus),
    Input,
    Draw,
}

/// Shared, cloneable view of the hook log.
#[derive(Debug, Clone, Default)]
pub(crate) struct HookLog {
    log: Arc<Mutex<Vec<(String, Hook)>>>,
}

impl HookLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn record(&self, name: &str, hook: Hook) {
        self.log.lock().unwrap().push((name.to_owned(), hook));
    }

    /// Every recorded (screen, hook) pair in call order.
    pub(crate) fn entries(&self) -> Vec<(String, Hook)> {
        self.log.lock().unwrap().clone()
    }

    /// Hooks recorded for one screen.
    pub(crate) fn hooks(&self, name: &str) -> Vec<Hook> {
        self.entries()
            .into_iter()
            .filter(|(n, _)| n == name)
            .map(|(_, h)| h)
            .collect()
    }

    pub(crate) fn count(&self, name: &str, pred: fn(&Hook) -> bool) -> usize {
        self.hooks(name).iter().filter(|h| pred(h)).count()
    }

    pub(crate) fn loads(&self, name: &str) -> usize {
        self.count(name, |h| matches!(h, Hook::Load))
    }

    pub(crate) fn unloads(&self, name: &str) -> usize {
        self.count(name, |h| matches!(h, Hook::Unload))
    }

    pub(crate) fn updates(&self, name: &str) -> usize {
        self.count(name, |h| matches!(h, Hook::Update(_)))
    }

    pub(crate) fn inputs(&self, name: &str) -> usize {
        self.count(name, |h| matches!(h, Hook::Input))
    }

    pub(crate) fn draws(&self, name: &str) -> usize {
        self.count(name, |h| matches!(h, Hook::Draw))
    }

    /// Status passed to the most recent update of `name`.
    pub(crate) fn last_status(&self, name: &str) -> Option<UpdateStatus> {
        self.hooks(name).into_iter().rev().find_map(|h| match h {
            Hook::Update(status) => Some(status),
            _ => None,
        })
    }

    /// Names of screens that received input, in order.
    pub(crate) fn input_order(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(_, h)| *h == Hook::Input)
            .map(|(n, _)| n)
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

//=== MockScreen =========================================================

type Script = Box<dyn FnMut(&mut ScreenContext) + Send>;

pub(crate) struct MockScreen {
    name: String,
    hooks: HookLog,
    popup: bool,
    cursor: bool,
    on_time: Duration,
    off_time: Duration,
    gestures: GestureSet,
    effect: TransitionEffect,
    fill: Option<Color>,
    fail_load: Option<ContentError>,
    on_update: Option<Script>,
    on_input: Option<Script>,
}

impl MockScreen {
    /// A mock screen with its own log.
    pub(crate) fn new(name: &str) -> (Self, HookLog) {
        let hooks = HookLog::new();
        (Self::with_log(name, &hooks), hooks)
    }

    /// A mock screen writing to an existing log.
    pub(crate) fn with_log(name: &str, hooks: &HookLog) -> Self {
        Self {
            name: name.to_owned(),
            hooks: hooks.clone(),
            popup: false,
            cursor: false,
            on_time: Duration::ZERO,
            off_time: Duration::ZERO,
            gestures: GestureSet::empty(),
            effect: TransitionEffect::Fade,
            fill: None,
            fail_load: None,
            on_update: None,
            on_input: None,
        }
    }

    pub(crate) fn popup(mut self) -> Self {
        self.popup = true;
        self
    }

    pub(crate) fn cursor(mut self) -> Self {
        self.cursor = true;
        self
    }

    pub(crate) fn times(mut self, on: Duration, off: Duration) -> Self {
        self.on_time = on;
        self.off_time = off;
        self
    }

    pub(crate) fn gestures(mut self, gestures: GestureSet) -> Self {
        self.gestures = gestures;
        self
    }

    pub(crate) fn effect(mut self, effect: TransitionEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Fills the whole target with `color` when drawn.
    pub(crate) fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub(crate) fn failing_load(mut self, err: ContentError) -> Self {
        self.fail_load = Some(err);
        self
    }

    pub(crate) fn on_update(mut self, script: impl FnMut(&mut ScreenContext) + Send + 'static) -> Self {
        self.on_update = Some(Box::new(script));
        self
    }

    pub(crate) fn on_input(mut self, script: impl FnMut(&mut ScreenContext) + Send + 'static) -> Self {
        self.on_input = Some(Box::new(script));
        self
    }
}

impl Screen for MockScreen {
    fn load_content(&mut self, _resources: &mut ResourceContext) -> Result<(), ContentError> {
        self.hooks.record(&self.name, Hook::Load);
        match self.fail_load.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn unload_content(&mut self, _resources: &mut ResourceContext) {
        self.hooks.record(&self.name, Hook::Unload);
    }

    fn update(&mut self, ctx: &mut ScreenContext, status: UpdateStatus) {
        self.hooks.record(&self.name, Hook::Update(status));
        if let Some(script) = self.on_update.as_mut() {
            script(ctx);
        }
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext, _input: &InputSnapshot) {
        self.hooks.record(&self.name, Hook::Input);
        if let Some(script) = self.on_input.as_mut() {
            script(ctx);
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError> {
        self.hooks.record(&self.name, Hook::Draw);
        if let Some(color) = self.fill {
            let bounds = ctx.viewport().bounds();
            ctx.fill_rect(bounds, color);
        }
        Ok(())
    }

    fn is_popup(&self) -> bool {
        self.popup
    }

    fn has_cursor(&self) -> bool {
        self.cursor
    }

    fn transition_on_time(&self) -> Duration {
        self.on_time
    }

    fn transition_off_time(&self) -> Duration {
        self.off_time
    }

    fn enabled_gestures(&self) -> GestureSet {
        self.gestures
    }

    fn transition_effect(&self) -> TransitionEffect {
        self.effect
    }

    fn name(&self) -> &str {
        &self.name
    }
}
