//=========================================================================
// Screen Manager
//=========================================================================
//
// Owns the screen stack and everything a frame needs to run it.
//
// Lifecycle:
//   new(renderer) → init_content() → add()* → { update(); draw() }* → shutdown()
//
// Update pass (top → bottom over a snapshot of the stack order):
//   1. advance the screen's transition (covered flag from the pass so far)
//   2. Screen::update(status)            → apply queued commands
//   3. FocusPass::observe(state, popup)  → may claim input focus
//   after the pass:
//   4. evict screens whose off transition finished
//   5. focused screen → Screen::handle_input(snapshot) → apply commands
//
// Commands queued from a hook are applied as soon as the hook returns, so
// a screen removed by a sibling is pruned from the remaining traversal and
// never sees another hook call this frame. A recoverable command failure
// is held until the pass has finished and is then returned.
//
// Draw: compositor passes 1 and 2, then the optional fps overlay.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::command::{CommandQueue, ScreenCommand};
use super::context::{ResourceContext, ScreenContext};
use super::stack::{ScreenEntry, ScreenStack};
use super::transition::Outcome;
use super::{Screen, ScreenId, ScreenState};
use crate::core::clock::FrameTime;
use crate::core::content::{ContentCache, ContentError};
use crate::core::error::{InvalidState, ScreenError};
use crate::core::input::{FocusPass, GestureSet, InputRouter};
use crate::core::render::{overlay, FpsCounter, RenderBackend, TransitionCompositor};

//=== ScreenManager =======================================================

pub struct ScreenManager<R: RenderBackend> {
    stack: ScreenStack,
    compositor: TransitionCompositor,
    input: InputRouter,
    renderer: R,
    content: ContentCache,
    commands: CommandQueue,
    fps: FpsCounter,

    next_id: u64,
    exit_requested: bool,
    show_fps: bool,
}

impl<R: RenderBackend> ScreenManager<R> {
    /// Creates an empty manager drawing through `renderer`.
    ///
    /// The content cache starts uninitialized; call
    /// [`init_content`](Self::init_content) before adding screens that
    /// look textures up.
    pub fn new(renderer: R) -> Self {
        let viewport = renderer.viewport();
        Self {
            stack: ScreenStack::new(),
            compositor: TransitionCompositor::new(),
            input: InputRouter::new(viewport),
            renderer,
            content: ContentCache::new(),
            commands: CommandQueue::new(),
            fps: FpsCounter::new(),
            next_id: 1,
            exit_requested: false,
            show_fps: false,
        }
    }

    pub fn init_content(&mut self) -> Result<(), ContentError> {
        self.content.init(&mut self.renderer)
    }

    //=== Stack Operations ================================================

    /// Loads `screen` and pushes it on top of the stack.
    ///
    /// Loading runs synchronously. If it fails the screen is dropped and
    /// the stack is left untouched.
    pub fn add_screen(&mut self, mut screen: Box<dyn Screen>) -> Result<ScreenId, ScreenError> {
        let name = screen.name().to_owned();

        let mut resources = ResourceContext::new(&mut self.content, &mut self.renderer);
        screen
            .load_content(&mut resources)
            .map_err(|source| ScreenError::ContentLoadFailure {
                screen: name.clone(),
                source,
            })?;

        let id = ScreenId(self.next_id);
        self.next_id += 1;
        self.stack.push(ScreenEntry::new(id, screen))?;

        info!("Added screen {} ({})", id, name);
        self.refresh_gestures();
        Ok(id)
    }

    pub fn add<S: Screen + 'static>(&mut self, screen: S) -> Result<ScreenId, ScreenError> {
        self.add_screen(Box::new(screen))
    }

    /// Unloads and evicts a screen immediately, skipping its off
    /// transition. Hands the screen back to the caller.
    pub fn remove_screen(&mut self, id: ScreenId) -> Result<Box<dyn Screen>, ScreenError> {
        let mut entry = self.stack.remove(id)?;

        let mut resources = ResourceContext::new(&mut self.content, &mut self.renderer);
        entry.screen.unload_content(&mut resources);

        info!("Removed screen {} ({})", id, entry.screen.name());
        self.refresh_gestures();
        Ok(entry.screen)
    }

    /// Starts a screen's off transition, or removes it right away when
    /// its off time is zero.
    pub fn exit_screen(&mut self, id: ScreenId) -> Result<(), ScreenError> {
        let entry = self.stack.get_mut(id).ok_or(InvalidState::NotOwned(id))?;

        if entry.transition.off_time().is_zero() {
            self.remove_screen(id)?;
        } else {
            debug!("Screen {} ({}) exiting", id, entry.screen.name());
            entry.transition.begin_exit();
        }
        Ok(())
    }

    /// Exits every screen on the stack.
    pub fn exit_game(&mut self) -> Result<(), ScreenError> {
        info!("Exit requested, closing {} screens", self.stack.len());
        self.exit_requested = true;

        for id in self.stack.ids() {
            self.exit_screen(id)?;
        }
        Ok(())
    }

    /// True once an exit was requested and the stack has drained.
    pub fn is_exit_complete(&self) -> bool {
        self.exit_requested && self.stack.is_empty()
    }

    /// Unloads every remaining screen (top first) and shuts the content
    /// cache down.
    pub fn shutdown(&mut self) {
        for id in self.stack.ids().into_iter().rev() {
            if let Err(err) = self.remove_screen(id) {
                warn!("Failed to remove {} during shutdown: {}", id, err);
            }
        }
        self.content.shutdown();
        info!("Screen manager shut down");
    }

    //=== Frame ===========================================================

    /// Runs one update pass over the stack.
    ///
    /// A recoverable error from a queued command (stale id, failed load)
    /// does not stop the pass: every screen still updates, finished screens
    /// are evicted and the focused screen gets its input. The first such
    /// error is returned afterwards. Any other error returns at once.
    pub fn update(&mut self, time: FrameTime, game_has_focus: bool) -> Result<(), ScreenError> {
        let viewport = self.renderer.viewport();
        let mut pass = FocusPass::new(game_has_focus);
        let mut finished = Vec::new();
        let mut pointer = (false, false);
        let mut deferred = None;

        self.stack.begin_traversal();

        while let Some(id) = self.stack.next_pending() {
            let status = pass.status();

            if let Some(entry) = self.stack.get_mut(id) {
                if entry.transition.advance(time.elapsed, status.covered_by_other_screen) == Outcome::Finished {
                    finished.push(id);
                }

                let mut ctx = ScreenContext::new(
                    id,
                    time,
                    &entry.transition,
                    viewport,
                    &self.content,
                    &mut self.commands,
                );
                entry.screen.update(&mut ctx, status);
            }
            let applied = self.apply_commands();
            defer(&mut deferred, applied)?;

            // The hook may have exited or removed its own screen.
            if let Some(entry) = self.stack.get(id) {
                if pass.observe(id, entry.transition.state(), entry.screen.is_popup()) {
                    pointer = (entry.screen.has_cursor(), entry.screen.has_virtual_stick());
                }
            }
        }

        for id in finished {
            if self.stack.contains(id) {
                self.remove_screen(id)?;
            }
        }

        let focus = pass.focus().filter(|id| self.stack.contains(*id));
        if focus.is_none() {
            pointer = (false, false);
        }
        self.input.set_focus(focus, pointer.0, pointer.1);

        if let Some(id) = focus {
            if let Some(entry) = self.stack.get_mut(id) {
                trace!("Input → {} ({})", id, entry.screen.name());
                let mut ctx = ScreenContext::new(
                    id,
                    time,
                    &entry.transition,
                    viewport,
                    &self.content,
                    &mut self.commands,
                );
                entry.screen.handle_input(&mut ctx, self.input.snapshot());
            }
            let applied = self.apply_commands();
            defer(&mut deferred, applied)?;
        }

        deferred.map_or(Ok(()), Err)
    }

    /// Composites the stack onto the back buffer, then the fps overlay
    /// when it is enabled.
    pub fn draw(&mut self, time: FrameTime) -> Result<(), ScreenError> {
        self.compositor
            .compose(&mut self.stack, &mut self.renderer, &self.content, time)?;

        if self.show_fps {
            overlay::draw_fps(&mut self.renderer, self.fps.fps())?;
        }
        Ok(())
    }

    //--- Frame Rate -------------------------------------------------------

    pub fn set_fps_overlay(&mut self, enabled: bool) {
        self.show_fps = enabled;
    }

    pub fn fps_overlay(&self) -> bool {
        self.show_fps
    }

    /// Counts one frame that took `wall` of real time.
    pub fn record_frame(&mut self, wall: std::time::Duration) {
        self.fps.frame(wall);
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    //--- Internal ---------------------------------------------------------

    /// Drains the command queue. A failing command aborts the batch and
    /// the commands behind it are dropped.
    fn apply_commands(&mut self) -> Result<(), ScreenError> {
        let mut commands = self.commands.take().into_iter();

        while let Some(command) = commands.next() {
            trace!("Applying {:?}", command);

            let result = match command {
                ScreenCommand::Add(screen) => self.add_screen(screen).map(|_| ()),
                ScreenCommand::Remove(id) => self.remove_screen(id).map(|_| ()),
                ScreenCommand::Exit(id) => self.exit_screen(id),
                ScreenCommand::ExitGame => self.exit_game(),
            };

            if let Err(err) = result {
                let dropped: Vec<_> = commands.collect();
                if !dropped.is_empty() {
                    warn!("Dropped {} screen commands after failure: {:?}", dropped.len(), dropped);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Gestures follow whichever screen is on top.
    fn refresh_gestures(&mut self) {
        let gestures = self
            .stack
            .top()
            .map(|entry| entry.screen.enabled_gestures())
            .unwrap_or_else(GestureSet::empty);
        self.input.set_gestures(gestures);
    }

    //=== Queries =========================================================

    /// Ids bottom to top.
    pub fn screens(&self) -> Vec<ScreenId> {
        self.stack.ids()
    }

    pub fn screen(&self, id: ScreenId) -> Option<&dyn Screen> {
        self.stack.get(id).map(|entry| entry.screen.as_ref())
    }

    pub fn state_of(&self, id: ScreenId) -> Option<ScreenState> {
        self.stack.get(id).map(|entry| entry.transition.state())
    }

    pub fn transition_position(&self, id: ScreenId) -> Option<f32> {
        self.stack.get(id).map(|entry| entry.transition.position())
    }

    /// Screen that received input in the last update.
    pub fn focused(&self) -> Option<ScreenId> {
        self.input.focused()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    //=== Accessors =======================================================

    pub fn stack(&self) -> &ScreenStack {
        &self.stack
    }

    pub fn input(&self) -> &InputRouter {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputRouter {
        &mut self.input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn content(&self) -> &ContentCache {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentCache {
        &mut self.content
    }

    /// Content and renderer together, for preloading outside any screen.
    pub fn resources(&mut self) -> ResourceContext<'_> {
        ResourceContext::new(&mut self.content, &mut self.renderer)
    }

    pub fn compositor(&self) -> &TransitionCompositor {
        &self.compositor
    }
}

impl<R: RenderBackend> std::fmt::Debug for ScreenManager<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenManager")
            .field("stack", &self.stack)
            .field("focused", &self.input.focused())
            .field("next_id", &self.next_id)
            .field("exit_requested", &self.exit_requested)
            .finish_non_exhaustive()
    }
}

//=== Deferred Errors =====================================================

/// Keeps the first recoverable error of a pass and lets the pass go on.
fn defer(first: &mut Option<ScreenError>, result: Result<(), ScreenError>) -> Result<(), ScreenError> {
    match result {
        Err(err) if err.is_recoverable() => {
            match first {
                None => *first = Some(err),
                Some(_) => warn!("Further screen command failure this frame: {}", err),
            }
            Ok(())
        }
        other => other,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::BLANK_TEXTURE;
    use crate::core::render::testing::RecordingRenderer;
    use crate::core::render::{Color, SoftwareRenderer, Viewport};
    use crate::core::screen::testing::{Hook, HookLog, MockScreen};
    use crate::core::screen::UpdateStatus;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn frame(n: u64) -> FrameTime {
        FrameTime::new(ms(n), ms(n))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn manager() -> ScreenManager<SoftwareRenderer> {
        let mut manager = ScreenManager::new(SoftwareRenderer::new(Viewport::new(16, 16)));
        manager.init_content().unwrap();
        manager
    }

    /// Runs one update + draw.
    fn tick(manager: &mut ScreenManager<SoftwareRenderer>, elapsed_ms: u64) {
        manager.update(frame(elapsed_ms), true).unwrap();
        manager.draw(frame(elapsed_ms)).unwrap();
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut manager = manager();
        let a = manager.add(MockScreen::new("a").0).unwrap();
        let b = manager.add(MockScreen::new("b").0).unwrap();

        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
        assert_eq!(manager.screens(), vec![a, b]);
    }

    #[test]
    fn add_loads_content_once() {
        let mut manager = manager();
        let (screen, hooks) = MockScreen::new("a");

        manager.add(screen).unwrap();
        tick(&mut manager, 16);

        assert_eq!(hooks.loads("a"), 1);
        assert_eq!(hooks.unloads("a"), 0);
    }

    #[test]
    fn zero_on_time_is_active_after_first_update() {
        let mut manager = manager();
        let id = manager.add(MockScreen::new("a").0).unwrap();

        manager.update(frame(16), true).unwrap();

        assert_eq!(manager.state_of(id), Some(ScreenState::Active));
        assert_eq!(manager.transition_position(id), Some(0.0));
    }

    #[test]
    fn entering_screen_reaches_active() {
        let mut manager = manager();
        let (screen, _) = MockScreen::new("a");
        let id = manager.add(screen.times(ms(100), ms(100))).unwrap();
        assert_eq!(manager.state_of(id), Some(ScreenState::TransitionOn));

        manager.update(frame(40), true).unwrap();
        assert_eq!(manager.state_of(id), Some(ScreenState::TransitionOn));
        assert!(approx(manager.transition_position(id).unwrap(), 0.6));

        manager.update(frame(80), true).unwrap();
        assert_eq!(manager.state_of(id), Some(ScreenState::Active));
    }

    #[test]
    fn exit_runs_off_transition_then_unloads_once() {
        let mut manager = manager();
        let (screen, hooks) = MockScreen::new("a");
        let id = manager.add(screen.times(Duration::ZERO, ms(100))).unwrap();
        manager.update(frame(16), true).unwrap();

        manager.exit_screen(id).unwrap();
        assert_eq!(manager.state_of(id), Some(ScreenState::TransitionOff));

        manager.update(frame(50), true).unwrap();
        assert_eq!(manager.state_of(id), Some(ScreenState::TransitionOff));
        assert!(approx(manager.transition_position(id).unwrap(), 0.5));

        manager.update(frame(60), true).unwrap();
        assert!(manager.is_empty());
        assert_eq!(hooks.unloads("a"), 1);

        hooks.clear();
        tick(&mut manager, 16);
        assert!(hooks.entries().is_empty(), "no hooks after removal");
    }

    #[test]
    fn exit_with_zero_off_time_removes_immediately() {
        let mut manager = manager();
        let (screen, hooks) = MockScreen::new("a");
        let id = manager.add(screen).unwrap();

        manager.exit_screen(id).unwrap();

        assert!(manager.is_empty());
        assert_eq!(hooks.unloads("a"), 1);
    }

    #[test]
    fn exit_from_own_update() {
        let mut manager = manager();
        let (screen, hooks) = MockScreen::new("a");
        manager
            .add(screen.times(Duration::ZERO, ms(100)).on_update(|ctx| {
                if ctx.state() == ScreenState::Active {
                    ctx.exit_screen();
                }
            }))
            .unwrap();

        manager.update(frame(16), true).unwrap();

        // Exiting takes effect before the focus check.
        assert_eq!(manager.focused(), None);
        assert_eq!(hooks.inputs("a"), 0);

        manager.update(frame(200), true).unwrap();
        assert!(manager.is_empty());
        assert_eq!(hooks.unloads("a"), 1);
    }

    #[test]
    fn load_failure_leaves_stack_unchanged() {
        let mut manager = manager();
        let kept = manager.add(MockScreen::new("kept").0).unwrap();

        let (broken, hooks) = MockScreen::new("broken");
        let err = manager
            .add(broken.failing_load(ContentError::MissingTexture("logo".into())))
            .unwrap_err();

        assert!(matches!(err, ScreenError::ContentLoadFailure { ref screen, .. } if screen == "broken"));
        assert!(err.is_recoverable());
        assert_eq!(manager.screens(), vec![kept]);
        assert_eq!(hooks.unloads("broken"), 0);
    }

    #[test]
    fn unknown_ids_are_invalid_state() {
        let mut manager = manager();
        let id = manager.add(MockScreen::new("a").0).unwrap();
        manager.remove_screen(id).unwrap();

        assert!(matches!(
            manager.remove_screen(id),
            Err(ScreenError::InvalidState(InvalidState::NotOwned(_)))
        ));
        assert!(matches!(
            manager.exit_screen(ScreenId(99)),
            Err(ScreenError::InvalidState(InvalidState::NotOwned(_)))
        ));
    }

    #[test]
    fn remove_returns_the_screen() {
        let mut manager = manager();
        let id = manager.add(MockScreen::new("a").0).unwrap();

        let screen = manager.remove_screen(id).unwrap();

        assert_eq!(screen.name(), "a");
    }

    #[test]
    fn exit_game_drains_the_stack() {
        let mut manager = manager();
        let hooks = HookLog::new();
        manager
            .add(MockScreen::with_log("a", &hooks).times(Duration::ZERO, ms(100)))
            .unwrap();
        manager
            .add(MockScreen::with_log("b", &hooks).times(Duration::ZERO, ms(50)))
            .unwrap();

        manager.exit_game().unwrap();
        assert!(!manager.is_exit_complete());

        manager.update(frame(60), true).unwrap();
        assert_eq!(manager.len(), 1);

        manager.update(frame(60), true).unwrap();
        assert!(manager.is_exit_complete());
        assert_eq!(hooks.unloads("a"), 1);
        assert_eq!(hooks.unloads("b"), 1);
    }

    #[test]
    fn empty_stack_is_not_an_exit() {
        assert!(!manager().is_exit_complete());
    }

    #[test]
    fn shutdown_unloads_top_first() {
        let mut manager = manager();
        let hooks = HookLog::new();
        manager.add(MockScreen::with_log("a", &hooks)).unwrap();
        manager.add(MockScreen::with_log("b", &hooks)).unwrap();

        manager.shutdown();

        let unloads: Vec<_> = hooks
            .entries()
            .into_iter()
            .filter(|(_, h)| *h == Hook::Unload)
            .map(|(n, _)| n)
            .collect();
        assert_eq!(unloads, vec!["b", "a"]);
        assert!(!manager.content().is_initialized());
    }

    //=====================================================================
    // Focus & Covering
    //=====================================================================

    #[test]
    fn only_topmost_uncovered_screen_gets_input() {
        let mut manager = manager();
        let hooks = HookLog::new();
        manager.add(MockScreen::with_log("a", &hooks)).unwrap();
        let b = manager.add(MockScreen::with_log("b", &hooks)).unwrap();

        tick(&mut manager, 16);

        assert_eq!(hooks.input_order(), vec!["b"]);
        assert_eq!(manager.focused(), Some(b));
    }

    #[test]
    fn popup_focus_and_cover_flags() {
        let mut manager = manager();
        let hooks = HookLog::new();
        manager.add(MockScreen::with_log("background", &hooks)).unwrap();
        manager.add(MockScreen::with_log("menu", &hooks)).unwrap();
        let popup = manager
            .add(MockScreen::with_log("popup", &hooks).popup().cursor())
            .unwrap();

        manager.update(frame(16), true).unwrap();

        assert_eq!(hooks.input_order(), vec!["popup"]);
        assert_eq!(manager.focused(), Some(popup));
        assert!(manager.input().cursor_visible());

        assert_eq!(hooks.last_status("popup"), Some(UpdateStatus::default()));
        assert_eq!(
            hooks.last_status("menu"),
            Some(UpdateStatus {
                other_screen_has_focus: true,
                covered_by_other_screen: false,
            })
        );
        assert_eq!(
            hooks.last_status("background"),
            Some(UpdateStatus {
                other_screen_has_focus: true,
                covered_by_other_screen: true,
            })
        );
    }

    #[test]
    fn updates_run_top_down() {
        let mut manager = manager();
        let hooks = HookLog::new();
        manager.add(MockScreen::with_log("bottom", &hooks)).unwrap();
        manager.add(MockScreen::with_log("top", &hooks)).unwrap();
        hooks.clear();

        manager.update(frame(16), true).unwrap();

        let order: Vec<_> = hooks
            .entries()
            .into_iter()
            .filter(|(_, h)| matches!(h, Hook::Update(_)))
            .map(|(n, _)| n)
            .collect();
        assert_eq!(order, vec!["top", "bottom"]);
    }

    #[test]
    fn no_window_focus_means_no_input() {
        let mut manager = manager();
        let (screen, hooks) = MockScreen::new("a");
        manager.add(screen.cursor()).unwrap();

        manager.update(frame(16), false).unwrap();

        assert_eq!(hooks.inputs("a"), 0);
        assert_eq!(manager.focused(), None);
        assert!(!manager.input().cursor_visible());
        assert!(hooks.last_status("a").unwrap().other_screen_has_focus);
    }

    #[test]
    fn exiting_top_hands_focus_down_the_same_frame() {
        let mut manager = manager();
        let hooks = HookLog::new();
        let a = manager.add(MockScreen::with_log("a", &hooks)).unwrap();
        let b = manager
            .add(MockScreen::with_log("b", &hooks).times(Duration::ZERO, ms(100)))
            .unwrap();
        tick(&mut manager, 16);
        hooks.clear();

        manager.exit_screen(b).unwrap();
        manager.update(frame(16), true).unwrap();

        assert_eq!(hooks.input_order(), vec!["a"]);
        assert_eq!(manager.focused(), Some(a));
    }

    #[test]
    fn at_most_one_input_per_frame() {
        let mut manager = manager();
        let hooks = HookLog::new();
        let mut ids = Vec::new();

        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            let mut screen = MockScreen::with_log(name, &hooks).times(ms(30), ms(30));
            if i % 2 == 1 {
                screen = screen.popup();
            }
            ids.push(manager.add(screen).unwrap());

            for _ in 0..3 {
                hooks.clear();
                tick(&mut manager, 16);
                assert!(hooks.input_order().len() <= 1);
            }
        }

        for id in ids.into_iter().rev() {
            manager.exit_screen(id).unwrap();
            for _ in 0..3 {
                hooks.clear();
                tick(&mut manager, 16);
                assert!(hooks.input_order().len() <= 1);
            }
        }
        assert!(manager.is_empty());
    }

    #[test]
    fn covered_screen_hides_then_returns() {
        let mut manager = manager();
        let (lower, hooks) = MockScreen::new("lower");
        let lower = manager.add(lower.times(ms(100), ms(100))).unwrap();
        tick(&mut manager, 200);
        assert_eq!(manager.state_of(lower), Some(ScreenState::Active));

        let upper = manager.add(MockScreen::new("upper").0).unwrap();
        manager.update(frame(50), true).unwrap();
        assert_eq!(manager.state_of(lower), Some(ScreenState::TransitionOff));

        manager.update(frame(60), true).unwrap();
        assert_eq!(manager.state_of(lower), Some(ScreenState::Hidden));

        hooks.clear();
        manager.draw(frame(16)).unwrap();
        assert_eq!(hooks.draws("lower"), 0);
        assert_eq!(hooks.updates("lower"), 0);

        manager.remove_screen(upper).unwrap();
        manager.update(frame(200), true).unwrap();
        assert_eq!(manager.state_of(lower), Some(ScreenState::Active));
        assert_eq!(hooks.inputs("lower"), 1);
    }

    #[test]
    fn hidden_screens_still_update() {
        let mut manager = manager();
        let (lower, hooks) = MockScreen::new("lower");
        manager.add(lower).unwrap();
        manager.add(MockScreen::new("upper").0).unwrap();

        manager.update(frame(16), true).unwrap();
        manager.update(frame(16), true).unwrap();

        assert_eq!(hooks.updates("lower"), 2);
        assert_eq!(hooks.inputs("lower"), 0);
    }

    //=====================================================================
    // Mutation During Traversal
    //=====================================================================

    #[test]
    fn upper_removing_lower_skips_its_hooks() {
        let mut manager = manager();
        let hooks = HookLog::new();
        let lower = manager.add(MockScreen::with_log("lower", &hooks)).unwrap();

        let mut done = false;
        manager
            .add(MockScreen::with_log("upper", &hooks).on_update(move |ctx| {
                if !done {
                    ctx.remove_screen(lower);
                    done = true;
                }
            }))
            .unwrap();
        hooks.clear();

        manager.update(frame(16), true).unwrap();

        assert_eq!(hooks.hooks("lower"), vec![Hook::Unload]);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn lower_removing_upper_withdraws_its_focus() {
        let mut manager = manager();
        let hooks = HookLog::new();
        let upper_id = ScreenId(2);

        let mut done = false;
        manager
            .add(MockScreen::with_log("lower", &hooks).on_update(move |ctx| {
                if !done {
                    ctx.remove_screen(upper_id);
                    done = true;
                }
            }))
            .unwrap();
        let upper = manager.add(MockScreen::with_log("upper", &hooks)).unwrap();
        assert_eq!(upper, upper_id);
        hooks.clear();

        manager.update(frame(16), true).unwrap();

        assert_eq!(hooks.updates("upper"), 1);
        assert_eq!(hooks.inputs("upper"), 0);
        assert_eq!(hooks.unloads("upper"), 1);
        assert_eq!(manager.focused(), None);
    }

    #[test]
    fn screens_added_mid_pass_wait_for_next_frame() {
        let mut manager = manager();
        let hooks = HookLog::new();
        let child_hooks = hooks.clone();

        let mut spawned = false;
        manager
            .add(MockScreen::with_log("parent", &hooks).on_update(move |ctx| {
                if !spawned {
                    ctx.add(MockScreen::with_log("child", &child_hooks));
                    spawned = true;
                }
            }))
            .unwrap();

        manager.update(frame(16), true).unwrap();
        assert_eq!(manager.len(), 2);
        assert_eq!(hooks.hooks("child"), vec![Hook::Load]);

        manager.update(frame(16), true).unwrap();
        assert_eq!(hooks.updates("child"), 1);
        assert_eq!(hooks.inputs("child"), 1);
    }

    #[test]
    fn input_hook_commands_are_applied() {
        let mut manager = manager();
        let (screen, hooks) = MockScreen::new("a");
        manager.add(screen.on_input(|ctx| ctx.exit_game())).unwrap();

        manager.update(frame(16), true).unwrap();

        assert!(manager.is_exit_complete());
        assert_eq!(hooks.unloads("a"), 1);
    }

    #[test]
    fn failing_command_drops_the_rest() {
        let mut manager = manager();
        let hooks = HookLog::new();
        let spawned = hooks.clone();

        manager
            .add(MockScreen::with_log("a", &hooks).on_update(move |ctx| {
                ctx.remove_screen(ScreenId(42));
                ctx.add(MockScreen::with_log("never", &spawned));
            }))
            .unwrap();

        let err = manager.update(frame(16), true).unwrap_err();

        assert!(matches!(err, ScreenError::InvalidState(InvalidState::NotOwned(_))));
        assert_eq!(hooks.loads("never"), 0);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn stale_command_does_not_stall_the_pass() {
        let mut manager = manager();
        let hooks = HookLog::new();
        manager.add(MockScreen::with_log("lower", &hooks)).unwrap();
        let upper = manager
            .add(MockScreen::with_log("upper", &hooks).popup().on_update(|ctx| {
                ctx.remove_screen(ScreenId(42));
            }))
            .unwrap();

        for _ in 0..5 {
            let err = manager.update(frame(16), true).unwrap_err();
            assert!(matches!(err, ScreenError::InvalidState(InvalidState::NotOwned(_))));
        }

        assert_eq!(hooks.updates("upper"), 5);
        assert_eq!(hooks.updates("lower"), 5);
        assert_eq!(hooks.inputs("upper"), 5);
        assert_eq!(hooks.inputs("lower"), 0);
        assert_eq!(manager.focused(), Some(upper));
    }

    #[test]
    fn finished_screens_are_evicted_despite_a_stale_command() {
        let mut manager = manager();
        let hooks = HookLog::new();
        let lower = manager
            .add(MockScreen::with_log("lower", &hooks).on_update(|ctx| ctx.remove_screen(ScreenId(42))))
            .unwrap();
        let upper = manager
            .add(MockScreen::with_log("upper", &hooks).times(Duration::ZERO, ms(10)))
            .unwrap();
        manager.exit_screen(upper).unwrap();

        assert!(manager.update(frame(16), true).is_err());

        assert_eq!(manager.screens(), vec![lower]);
        assert_eq!(hooks.unloads("upper"), 1);
    }

    #[test]
    fn fps_overlay_is_drawn_after_the_stack() {
        let mut manager = ScreenManager::new(SoftwareRenderer::new(Viewport::new(64, 48)));
        manager.init_content().unwrap();
        manager.add(MockScreen::new("a").0.fill(Color::rgb(0.0, 0.0, 1.0))).unwrap();
        manager.set_fps_overlay(true);
        for _ in 0..50 {
            manager.record_frame(ms(20));
        }

        tick(&mut manager, 16);

        let (x, y) = overlay::FPS_ORIGIN;
        assert_eq!(manager.fps(), 50);
        assert_eq!(manager.renderer().pixel(None, x as u32, y as u32), Some(Color::WHITE));
        assert_eq!(manager.renderer().pixel(None, 0, 0), Some(Color::rgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn fps_overlay_is_off_by_default() {
        let mut manager = ScreenManager::new(SoftwareRenderer::new(Viewport::new(64, 48)));
        manager.init_content().unwrap();
        manager.add(MockScreen::new("a").0.fill(Color::rgb(0.0, 0.0, 1.0))).unwrap();

        tick(&mut manager, 16);

        let (x, y) = overlay::FPS_ORIGIN;
        assert!(!manager.fps_overlay());
        assert_eq!(manager.renderer().pixel(None, x as u32, y as u32), Some(Color::rgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn hooks_see_their_own_id() {
        let mut manager = manager();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        let id = manager
            .add(MockScreen::new("a").0.on_update(move |ctx| {
                *sink.lock().unwrap() = Some(ctx.id());
            }))
            .unwrap();
        manager.update(frame(16), true).unwrap();

        assert_eq!(*seen.lock().unwrap(), Some(id));
    }

    //=====================================================================
    // Gestures
    //=====================================================================

    #[test]
    fn gestures_follow_the_top_screen() {
        let mut manager = manager();
        manager
            .add(MockScreen::new("menu").0.gestures(GestureSet::MENU))
            .unwrap();
        assert_eq!(manager.input().gestures(), GestureSet::MENU);

        let top = manager
            .add(MockScreen::new("game").0.gestures(GestureSet::PINCH))
            .unwrap();
        assert_eq!(manager.input().gestures(), GestureSet::PINCH);

        manager.remove_screen(top).unwrap();
        assert_eq!(manager.input().gestures(), GestureSet::MENU);
    }

    //=====================================================================
    // Drawing
    //=====================================================================

    #[test]
    fn two_transitioning_screens_fade_independently() {
        let mut manager = ScreenManager::new(RecordingRenderer::new(Viewport::new(8, 8)));
        let lower = manager
            .add(MockScreen::new("lower").0.times(ms(1000), ms(1000)))
            .unwrap();
        manager.update(frame(650), true).unwrap();

        let upper = manager
            .add(MockScreen::new("upper").0.popup().times(ms(1000), ms(1000)))
            .unwrap();
        manager.update(frame(100), true).unwrap();

        assert!(approx(manager.transition_position(lower).unwrap(), 0.25));
        assert!(approx(manager.transition_position(upper).unwrap(), 0.9));

        manager.draw(frame(100)).unwrap();

        assert_eq!(manager.renderer().created(), 2);
        assert_eq!(manager.compositor().pool().last_frame_slots(), 2);

        let opacities = manager.renderer().composite_opacities();
        assert!(approx(opacities[0], 0.75), "got {:?}", opacities);
        assert!(approx(opacities[1], 0.10), "got {:?}", opacities);
    }

    #[test]
    fn slot_pool_is_reused_across_frames() {
        let mut manager = ScreenManager::new(RecordingRenderer::new(Viewport::new(8, 8)));
        manager
            .add(MockScreen::new("a").0.times(ms(1000), ms(1000)))
            .unwrap();
        manager
            .add(MockScreen::new("b").0.popup().times(ms(1000), ms(1000)))
            .unwrap();

        for _ in 0..3 {
            manager.update(frame(100), true).unwrap();
            manager.draw(frame(100)).unwrap();
        }
        assert_eq!(manager.compositor().pool().allocated(), 2);

        manager.update(frame(1000), true).unwrap();
        manager.renderer_mut().reset();
        manager.draw(frame(16)).unwrap();

        assert_eq!(manager.compositor().pool().last_frame_slots(), 0);
        assert_eq!(manager.compositor().pool().allocated(), 2);
        assert!(manager.renderer().composite_opacities().is_empty());
    }

    #[test]
    fn slot_exhaustion_surfaces_from_draw() {
        let renderer = SoftwareRenderer::new(Viewport::new(8, 8)).with_target_limit(1);
        let mut manager = ScreenManager::new(renderer);
        manager.init_content().unwrap();
        manager
            .add(MockScreen::new("a").0.times(ms(100), ms(100)))
            .unwrap();

        manager.update(frame(16), true).unwrap();
        let err = manager.draw(frame(16)).unwrap_err();

        assert!(matches!(err, ScreenError::ResourceExhaustion(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn active_screen_draws_to_back_buffer() {
        let mut manager = manager();
        manager
            .add(MockScreen::new("a").0.fill(Color::WHITE))
            .unwrap();

        tick(&mut manager, 16);

        assert_eq!(manager.renderer().pixel(None, 0, 0), Some(Color::WHITE));
        assert!(manager.content().contains(BLANK_TEXTURE));
    }
}
