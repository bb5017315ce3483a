//! Full game flows driven through `App`, with a scripted engine.

use std::collections::VecDeque;

use tui_connect4::core::{App, EngineFault, MoveEngine, SearchRequest, SessionTuning, TurnPhase};
use tui_connect4::types::{GameMode, ScreenId, Side, UiCommand};

/// Answers queries from a script, one reply per submitted request.
#[derive(Default)]
struct Scripted {
    replies: VecDeque<Result<u8, EngineFault>>,
    requests: Vec<SearchRequest>,
    outstanding: bool,
    cancels: usize,
}

impl Scripted {
    fn with(replies: &[Result<u8, EngineFault>]) -> Self {
        Self {
            replies: replies.iter().cloned().collect(),
            ..Self::default()
        }
    }
}

impl MoveEngine for Scripted {
    fn submit(&mut self, request: SearchRequest) {
        self.requests.push(request);
        self.outstanding = true;
    }

    fn poll(&mut self) -> Option<Result<u8, EngineFault>> {
        if !self.outstanding {
            return None;
        }
        self.outstanding = false;
        Some(
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(EngineFault::Unavailable("script exhausted".into()))),
        )
    }

    fn cancel(&mut self) {
        self.outstanding = false;
        self.cancels += 1;
    }
}

const LIMIT: usize = 5_000;

fn app() -> App {
    App::new(7, SessionTuning::from_millis(500, 50))
}

fn tick_until(app: &mut App, engine: &mut Scripted, what: &str, done: impl Fn(&App) -> bool) {
    for _ in 0..LIMIT {
        if done(app) {
            return;
        }
        app.tick(engine);
    }
    panic!("timed out waiting for {what}");
}

fn settle(app: &mut App, engine: &mut Scripted) {
    tick_until(app, engine, "transition", |a| !a.nav().is_transitioning());
}

fn press(app: &mut App, engine: &mut Scripted, label: &str) {
    let index = app
        .current_screen()
        .and_then(|s| s.targets.iter().position(|t| t.label == label))
        .unwrap_or_else(|| panic!("no target {label:?} on {:?}", app.nav().current()));
    app.handle(UiCommand::ActivateTarget(index));
    settle(app, engine);
}

/// Drop into `column` and wait until the board accepts input again.
fn play(app: &mut App, engine: &mut Scripted, column: u8) {
    let before = app.session().placed();
    app.handle(UiCommand::DropColumn(column));
    tick_until(app, engine, "drop to settle", |a| !a.session().input_blocked());
    assert!(
        app.session().placed() > before,
        "column {column} was not played"
    );
}

fn start_duo(app: &mut App, engine: &mut Scripted) {
    press(app, engine, "Start Game");
    press(app, engine, "2 Players");
    press(app, engine, "Player 1");
}

#[test]
fn test_two_player_game_to_end_screen_and_rematch() {
    let mut app = app();
    let mut engine = Scripted::default();
    start_duo(&mut app, &mut engine);

    assert_eq!(app.nav().current(), ScreenId::DuoGame);
    assert!(app.session().started());
    assert_eq!(app.session().mode(), GameMode::TwoPlayer);
    assert_eq!(app.session().turn(), Side::A);

    for column in [0, 6, 0, 6, 0, 6] {
        play(&mut app, &mut engine, column);
    }
    app.handle(UiCommand::DropColumn(0));
    tick_until(&mut app, &mut engine, "result banner", |a| {
        a.session().banner().is_some()
    });
    assert_eq!(app.session().banner(), Some("Player 1 Wins!"));
    assert_eq!(app.session().scores(), [1, 0]);

    // Input is ignored while the result is shown.
    app.handle(UiCommand::DropColumn(3));
    assert_eq!(app.session().placed(), 7);

    tick_until(&mut app, &mut engine, "end screen", |a| {
        a.nav().current() == ScreenId::EndScreen && !a.nav().is_transitioning()
    });
    assert!(!app.session().started());
    assert_eq!(app.session().board().piece_count(), 0);
    let snap = app.snapshot().unwrap();
    assert_eq!(snap.last_result, Some("Player 1 Wins!"));
    assert!(engine.requests.is_empty());

    press(&mut app, &mut engine, "Play Again");
    assert_eq!(app.nav().current(), ScreenId::DuoGame);
    assert!(app.session().started());
    assert_eq!(app.session().board().piece_count(), 0);
    assert_eq!(app.session().scores(), [1, 0]);
}

#[test]
fn test_player_two_can_move_first() {
    let mut app = app();
    let mut engine = Scripted::default();
    press(&mut app, &mut engine, "Start Game");
    press(&mut app, &mut engine, "2 Players");
    press(&mut app, &mut engine, "Player 2");

    assert_eq!(app.session().turn(), Side::B);
    play(&mut app, &mut engine, 4);
    assert_eq!(app.session().board().cell(4, 0), Some(Side::B));
    assert_eq!(app.session().turn(), Side::A);
}

fn start_solo(app: &mut App, engine: &mut Scripted, first: &str, difficulty: u8) {
    press(app, engine, "Start Game");
    press(app, engine, "1 Player");
    press(app, engine, first);
    assert_eq!(app.nav().current(), ScreenId::SelectDifficulty);
    app.handle(UiCommand::SliderSet {
        target: 0,
        value: difficulty,
    });
    press(app, engine, "Start");
    assert_eq!(app.nav().current(), ScreenId::SoloGame);
}

#[test]
fn test_solo_probe_then_search() {
    let mut app = app();
    let mut engine = Scripted::with(&[Ok(0), Ok(0)]);
    start_solo(&mut app, &mut engine, "Player", 100);

    play(&mut app, &mut engine, 3);

    let budgets: Vec<u32> = engine.requests.iter().map(|r| r.budget_ms).collect();
    assert_eq!(budgets, vec![500, 10_000]);
    assert!(engine.requests.iter().all(|r| r.to_move == Side::B));
    assert_eq!(app.session().board().cell(3, 0), Some(Side::A));
    assert_eq!(app.session().board().cell(0, 0), Some(Side::B));
    assert_eq!(app.session().turn(), Side::A);
    assert_eq!(app.session().phase(), TurnPhase::AwaitingMove);
}

#[test]
fn test_solo_engine_opens_in_center() {
    let mut app = app();
    let mut engine = Scripted::default();
    start_solo(&mut app, &mut engine, "Computer", 100);

    tick_until(&mut app, &mut engine, "opening move", |a| {
        !a.session().input_blocked()
    });
    assert_eq!(app.session().board().cell(3, 0), Some(Side::B));
    assert!(engine.requests.is_empty());
    assert_eq!(app.session().turn(), Side::A);
}

#[test]
fn test_human_cannot_drop_for_the_engine() {
    let mut app = app();
    // No replies: the engine stays silent after the probe is submitted.
    let mut engine = Scripted::default();
    start_solo(&mut app, &mut engine, "Player", 100);

    app.handle(UiCommand::DropColumn(3));
    tick_until(&mut app, &mut engine, "probe", |a| a.session().is_thinking());
    engine.outstanding = false;
    for _ in 0..50 {
        app.tick(&mut engine);
    }
    assert!(app.session().is_thinking());
    app.handle(UiCommand::DropColumn(4));
    assert_eq!(app.session().placed(), 1);
    assert!(app.snapshot().unwrap().thinking);
}

#[test]
fn test_engine_timeout_falls_back_and_still_searches() {
    let mut app = app();
    let mut engine = Scripted::with(&[Err(EngineFault::Timeout { budget_ms: 500 }), Ok(5)]);
    start_solo(&mut app, &mut engine, "Player", 100);

    play(&mut app, &mut engine, 3);
    assert_eq!(engine.requests.len(), 2);
    assert_eq!(app.session().board().cell(5, 0), Some(Side::B));
}

#[test]
fn test_out_of_range_reply_plays_a_legal_column() {
    let mut app = app();
    let mut engine = Scripted::with(&[Ok(42), Ok(9)]);
    start_solo(&mut app, &mut engine, "Player", 100);

    play(&mut app, &mut engine, 3);
    assert_eq!(app.session().placed(), 2);
    assert_eq!(app.session().board().bits(Side::B).count_ones(), 1);
}

#[test]
fn test_forfeit_resets_game_and_keeps_scores() {
    let mut app = app();
    let mut engine = Scripted::default();
    start_duo(&mut app, &mut engine);
    play(&mut app, &mut engine, 2);
    play(&mut app, &mut engine, 2);

    press(&mut app, &mut engine, "Exit Game");
    assert_eq!(app.nav().current(), ScreenId::Forfeit);
    // The game is kept while the player decides.
    assert_eq!(app.session().placed(), 2);

    press(&mut app, &mut engine, "No, continue game");
    assert_eq!(app.nav().current(), ScreenId::DuoGame);
    assert_eq!(app.session().placed(), 2);

    press(&mut app, &mut engine, "Exit Game");
    press(&mut app, &mut engine, "Yes, forfeit and return");
    assert_eq!(app.nav().current(), ScreenId::Menu);
    assert!(!app.session().started());
    assert_eq!(app.session().board().piece_count(), 0);
    assert_eq!(engine.cancels, 1);
}

#[test]
fn test_exit_during_drop_is_deferred() {
    let mut app = app();
    let mut engine = Scripted::default();
    start_duo(&mut app, &mut engine);

    app.handle(UiCommand::DropColumn(1));
    app.handle(UiCommand::Escape);
    assert!(app.has_deferred());
    assert!(!app.nav().is_transitioning());

    tick_until(&mut app, &mut engine, "deferred exit", |a| !a.has_deferred());
    assert_eq!(app.session().placed(), 1);
    assert!(app.nav().is_transitioning());
    settle(&mut app, &mut engine);
    assert_eq!(app.nav().current(), ScreenId::Forfeit);
}

#[test]
fn test_reset_score_from_menu() {
    let mut app = app();
    let mut engine = Scripted::default();
    start_duo(&mut app, &mut engine);
    for column in [0, 1, 0, 1, 0, 1] {
        play(&mut app, &mut engine, column);
    }
    app.handle(UiCommand::DropColumn(0));
    tick_until(&mut app, &mut engine, "end screen", |a| {
        a.nav().current() == ScreenId::EndScreen && !a.nav().is_transitioning()
    });
    assert_eq!(app.session().scores(), [1, 0]);

    press(&mut app, &mut engine, "Reset Score");
    assert_eq!(app.session().scores(), [0, 0]);
    assert_eq!(app.nav().current(), ScreenId::EndScreen);

    press(&mut app, &mut engine, "Main Menu");
    assert_eq!(app.nav().current(), ScreenId::Menu);
}

#[test]
fn test_quit_confirmation() {
    let mut app = app();
    let mut engine = Scripted::default();
    press(&mut app, &mut engine, "Exit");
    assert_eq!(app.nav().current(), ScreenId::QuitScreen);

    press(&mut app, &mut engine, "No, Go Back");
    assert_eq!(app.nav().current(), ScreenId::Menu);
    assert!(!app.should_quit());

    press(&mut app, &mut engine, "Exit");
    app.handle(UiCommand::Activate);
    assert!(app.should_quit());
}
