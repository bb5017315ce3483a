//! Navigation state machine - back-stack, slide transition and deferred apply
//!
//! Screen changes never happen at the moment a target is activated. Activation
//! records a [`PendingChange`] and restarts the slide transition; the change is
//! applied once, when the slide first covers the screen completely
//! (`TRANSITION_FRAME_WIDTH`), and the transition returns to idle at twice that.
//!
//! ```text
//! Idle (-1) --begin--> Transitioning (0 .. 2*W) --progress >= 2*W--> Idle
//!                            |
//!                            +-- progress >= W, not yet applied: apply pending once
//! ```

use log::{debug, info, warn};
use thiserror::Error;

use crate::types::{ScreenId, Theme, TRANSITION_FRAME_WIDTH};

/// Local navigation faults. None of them are fatal; the caller logs and stays put.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("screen '{0}' does not exist")]
    UnknownScreen(String),
    #[error("theme '{0}' does not exist")]
    UnknownTheme(String),
    #[error("back requested with an empty back-stack")]
    EmptyBackStack,
}

/// Where an activated target leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Push the current screen and switch to another one
    GoTo(ScreenId),
    /// Pop the back-stack
    Back,
    /// Swap the visual theme, screen and stack untouched
    ThemeOnly(Theme),
}

impl Destination {
    /// Resolve a screen by name.
    pub fn screen(name: &str) -> Result<Self, NavError> {
        ScreenId::from_str(name)
            .map(Destination::GoTo)
            .ok_or_else(|| NavError::UnknownScreen(name.to_string()))
    }

    /// Resolve a theme by name.
    pub fn theme(name: &str) -> Result<Self, NavError> {
        Theme::from_str(name)
            .map(Destination::ThemeOnly)
            .ok_or_else(|| NavError::UnknownTheme(name.to_string()))
    }
}

/// A change waiting for the transition midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingChange {
    pub destination: Destination,
    /// Reset the game session at the instant the change is applied.
    /// Set by a rematch and by the end-of-game switch to the end screen.
    pub reset_game: bool,
}

impl PendingChange {
    pub fn to(destination: Destination) -> Self {
        Self {
            destination,
            reset_game: false,
        }
    }

    pub fn with_reset(destination: Destination) -> Self {
        Self {
            destination,
            reset_game: true,
        }
    }
}

/// Report of an applied change, handed to the owner of the game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub change: PendingChange,
    pub previous: ScreenId,
    pub current: ScreenId,
}

impl Applied {
    pub fn screen_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Current screen, history, theme and the transition timer.
#[derive(Debug, Clone)]
pub struct NavigationState {
    current: ScreenId,
    back_stack: Vec<ScreenId>,
    /// -1 when idle, else 0 ..= 2 * TRANSITION_FRAME_WIDTH
    progress: i32,
    pending: Option<PendingChange>,
    applied_this_transition: bool,
    theme: Theme,
    known: Vec<ScreenId>,
}

const FRAME: i32 = TRANSITION_FRAME_WIDTH as i32;

impl NavigationState {
    /// Start idle on `start`. `known` lists the screens `GoTo` may reach.
    pub fn new(start: ScreenId, known: &[ScreenId]) -> Self {
        Self {
            current: start,
            back_stack: Vec::new(),
            progress: -1,
            pending: None,
            applied_this_transition: false,
            theme: Theme::default(),
            known: known.to_vec(),
        }
    }

    pub fn current(&self) -> ScreenId {
        self.current
    }

    pub fn back_stack(&self) -> &[ScreenId] {
        &self.back_stack
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Set the theme immediately, outside any transition (startup configuration).
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn pending(&self) -> Option<&PendingChange> {
        self.pending.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.progress >= 0
    }

    /// Transition progress, `None` when idle
    pub fn progress(&self) -> Option<u32> {
        u32::try_from(self.progress).ok()
    }

    pub fn applied_this_transition(&self) -> bool {
        self.applied_this_transition
    }

    /// Record a pending change and (re)start the slide.
    ///
    /// Re-entrant: a second activation during a running transition restarts the
    /// progress and replaces the pending change, including its reset flag.
    pub fn begin(&mut self, change: PendingChange) {
        if self.pending.is_some() && self.is_transitioning() {
            debug!("nav: replacing pending {:?} with {:?}", self.pending, change);
        }
        self.pending = Some(change);
        self.progress = 0;
        self.applied_this_transition = false;
    }

    /// Advance the slide by `step` units.
    ///
    /// The midpoint check runs before the idle check, so a single coarse step that
    /// jumps from before the midpoint to past the end still applies exactly once.
    pub fn advance(&mut self, step: u32) -> Option<Applied> {
        if self.progress < 0 {
            return None;
        }
        let step = i32::try_from(step).unwrap_or(i32::MAX);
        self.progress = self.progress.saturating_add(step);

        let mut applied = None;
        if self.progress >= FRAME && !self.applied_this_transition {
            if let Some(change) = self.pending {
                self.applied_this_transition = true;
                applied = Some(self.apply(change));
            }
        }

        if self.progress >= 2 * FRAME {
            self.progress = -1;
            self.applied_this_transition = false;
        }
        applied
    }

    fn apply(&mut self, change: PendingChange) -> Applied {
        let previous = self.current;
        match change.destination {
            Destination::Back => match self.back_stack.pop() {
                Some(screen) => self.current = screen,
                None => debug!("nav: {}", NavError::EmptyBackStack),
            },
            Destination::GoTo(screen) => {
                if self.known.contains(&screen) {
                    self.back_stack.push(self.current);
                    self.current = screen;
                } else {
                    warn!(
                        "nav: {}",
                        NavError::UnknownScreen(screen.as_str().to_string())
                    );
                }
            }
            Destination::ThemeOnly(theme) => self.theme = theme,
        }

        info!(
            "nav: applied {:?} ({} -> {}, depth {})",
            change.destination,
            previous.as_str(),
            self.current.as_str(),
            self.back_stack.len()
        );
        Applied {
            change,
            previous,
            current: self.current,
        }
    }
}
