//! Application state - screens, navigation and the game session behind one surface
//!
//! The binary drives this with two calls: [`App::handle`] for every player command
//! and [`App::tick`] once per fixed timestep. Rendering reads [`App::snapshot`].

use log::{debug, info};

use crate::difficulty::EngineParams;
use crate::nav::{Applied, Destination, NavigationState, PendingChange};
use crate::screens::{Action, Screen, ScreenCatalog, TargetKind};
use crate::search::MoveEngine;
use crate::session::{result_label, GameSession, SessionTuning};
use crate::snapshot::FrameSnapshot;
use crate::types::{GameMode, ScreenId, Side, Theme, UiCommand, TRANSITION_STEP};

/// Choices made on the setup screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Mode of the last game set up; a rematch returns to its screen
    pub mode: Option<GameMode>,
    pub first: Side,
    pub difficulty: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: None,
            first: Side::A,
            difficulty: 0,
        }
    }
}

pub struct App {
    catalog: ScreenCatalog,
    nav: NavigationState,
    session: GameSession,
    settings: Settings,
    focus: usize,
    /// Target activation held back while a game screen blocks input
    deferred: Option<(ScreenId, usize)>,
    quit: bool,
}

impl App {
    pub fn new(seed: u32, tuning: SessionTuning) -> Self {
        Self::with_catalog(ScreenCatalog::standard(), seed, tuning)
    }

    pub fn with_catalog(catalog: ScreenCatalog, seed: u32, tuning: SessionTuning) -> Self {
        let nav = NavigationState::new(ScreenId::Menu, &catalog.ids());
        Self {
            catalog,
            nav,
            session: GameSession::new(seed, tuning),
            settings: Settings::default(),
            focus: 0,
            deferred: None,
            quit: false,
        }
    }

    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &ScreenCatalog {
        &self.catalog
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.nav.set_theme(theme);
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.catalog.get(self.nav.current())
    }

    fn target_count(&self) -> usize {
        self.current_screen().map_or(0, |s| s.targets.len())
    }

    /// Apply one player command.
    pub fn handle(&mut self, command: UiCommand) {
        let on_game = self.nav.current().is_game();
        match command {
            UiCommand::FocusNext => {
                let n = self.target_count();
                if n > 0 {
                    self.focus = (self.focus + 1) % n;
                }
            }
            UiCommand::FocusPrev => {
                let n = self.target_count();
                if n > 0 {
                    self.focus = (self.focus + n - 1) % n;
                }
            }
            UiCommand::Activate => self.activate(self.focus),
            UiCommand::ActivateTarget(index) => {
                self.focus = index;
                self.activate(index);
            }
            UiCommand::Escape => {
                if let Some(index) = self.current_screen().and_then(|s| s.escape) {
                    self.activate(index);
                }
            }
            UiCommand::SliderStep(delta) => {
                let value = self.settings.difficulty as i16 + delta as i16;
                self.set_slider(self.focus, value);
            }
            UiCommand::SliderSet { target, value } => self.set_slider(target, value as i16),
            UiCommand::HoverColumn(column) if on_game => self.session.hover_column(column),
            UiCommand::HoverStep(delta) if on_game => self.session.hover_step(delta),
            UiCommand::DropColumn(column) if on_game => {
                self.session.drop_column(column);
            }
            UiCommand::DropHovered if on_game => {
                self.session.drop_hovered();
            }
            UiCommand::HoverColumn(_)
            | UiCommand::HoverStep(_)
            | UiCommand::DropColumn(_)
            | UiCommand::DropHovered => {}
        }
    }

    fn set_slider(&mut self, index: usize, value: i16) {
        let Some(target) = self.current_screen().and_then(|s| s.target(index)) else {
            return;
        };
        if let TargetKind::Slider { min, max } = target.kind {
            self.settings.difficulty = value.clamp(min as i16, max as i16) as u8;
            debug!(
                "app: difficulty {} -> {:?}",
                self.settings.difficulty,
                EngineParams::for_difficulty(self.settings.difficulty)
            );
        }
    }

    fn activate(&mut self, index: usize) {
        let screen = self.nav.current();
        let Some(target) = self.current_screen().and_then(|s| s.target(index)).copied() else {
            return;
        };

        if screen.is_game() && self.session.input_blocked() {
            debug!("app: '{}' deferred until input unblocks", target.label);
            self.deferred = Some((screen, index));
            return;
        }
        if target.is_slider() {
            return;
        }

        if let Some(action) = target.action {
            self.run(action);
        }
        if let Some(destination) = target.destination {
            self.nav.begin(PendingChange::to(destination));
        }
    }

    fn run(&mut self, action: Action) {
        debug!("app: action {action:?}");
        match action {
            Action::ResetScores => self.session.reset_scores(),
            Action::SetMode(mode) => self.settings.mode = Some(mode),
            Action::SetFirstPlayer(side) => self.settings.first = side,
            Action::Rematch => {
                let screen = self.settings.mode.map_or(ScreenId::Menu, |m| m.screen());
                self.nav
                    .begin(PendingChange::with_reset(Destination::GoTo(screen)));
            }
            Action::Exit => self.quit = true,
        }
    }

    /// Advance one fixed timestep.
    pub fn tick(&mut self, engine: &mut dyn MoveEngine) {
        if let Some(applied) = self.nav.advance(TRANSITION_STEP) {
            self.on_applied(applied, engine);
        }

        if let Some(mode) = self.nav.current().game_mode() {
            if !self.session.started() {
                self.settings.mode = Some(mode);
                self.session.enter(
                    mode,
                    self.settings.first,
                    EngineParams::for_difficulty(self.settings.difficulty),
                );
            }
            self.session.tick(engine);
            if let Some(change) = self.session.take_nav_request() {
                self.nav.begin(change);
            }
        }

        self.replay_deferred();
    }

    fn on_applied(&mut self, applied: Applied, engine: &mut dyn MoveEngine) {
        let forfeited = applied.previous == ScreenId::Forfeit && applied.current == ScreenId::Menu;
        if applied.change.reset_game || forfeited {
            info!(
                "app: resetting game ({})",
                if forfeited { "forfeit" } else { "rematch/end" }
            );
            engine.cancel();
            self.session.reset();
        }
        if applied.screen_changed() {
            self.focus = 0;
        }
    }

    fn replay_deferred(&mut self) {
        let Some((screen, index)) = self.deferred else {
            return;
        };
        if screen != self.nav.current() {
            self.deferred = None;
        } else if !self.session.input_blocked() {
            self.deferred = None;
            self.activate(index);
        }
    }

    /// Frame state for the view, `None` only if the current screen is not in the
    /// catalog.
    pub fn snapshot(&self) -> Option<FrameSnapshot<'_>> {
        let screen = self.current_screen()?;
        let session = &self.session;
        Some(FrameSnapshot {
            screen,
            theme: self.nav.theme(),
            transition: self.nav.progress(),
            focus: self.focus,
            difficulty: self.settings.difficulty,
            board: session.board(),
            piece: session.animated_piece().copied(),
            hover: session.hover(),
            turn: session.turn(),
            mode: session.mode(),
            thinking: session.is_thinking(),
            scores: session.scores(),
            banner: session.banner(),
            last_result: session.last_result().map(|(m, r)| result_label(m, r)),
            input_blocked: session.input_blocked(),
        })
    }
}
