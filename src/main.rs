//! Terminal Connect Four runner (default binary).
//!
//! Drives the core with a fixed-timestep accumulator: wall-clock time is banked and
//! spent in `TICK_MS` steps, so animation and transition speed do not depend on how
//! often the terminal is redrawn. Rendering uses crossterm and the framebuffer view.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};

use tui_connect4::config::AppConfig;
use tui_connect4::core::App;
use tui_connect4::engine::EngineWorker;
use tui_connect4::input::{handle_key_event, handle_mouse_event, should_quit};
use tui_connect4::logging;
use tui_connect4::term::{
    fingerprint, FrameBuffer, HitMap, RenderThrottle, ScreenView, TerminalRenderer, Viewport,
};
use tui_connect4::types::TICK_MS;

/// Cap on ticks replayed after a stall.
const MAX_CATCH_UP_TICKS: u32 = 200;
/// Repaint interval of an unchanged screen.
const IDLE_REPAINT_MS: u64 = 1000;

fn main() -> Result<()> {
    let path = AppConfig::config_path();
    let mut config = AppConfig::load_or_default(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    config.apply_env().context("applying environment overrides")?;

    let level = logging::init(&config.log).context("starting the logger")?;
    info!("config {} (log level {level})", path.display());

    let mut worker = EngineWorker::start(config.backend(), config.timeout_slack())
        .context("starting the engine worker")?;
    info!("engine: {}", worker.backend().describe());

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, &mut worker);

    // Always try to restore terminal state.
    let _ = term.exit();
    info!("exit");
    logging::flush();
    result
}

fn seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: &AppConfig, worker: &mut EngineWorker) -> Result<()> {
    let mut app = App::new(seed(), config.tuning());
    app.set_theme(config.theme());

    let view = ScreenView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut hits = HitMap::new();
    let mut throttle = RenderThrottle::new(config.ui.frame_ms, IDLE_REPAINT_MS);

    let tick = Duration::from_millis(TICK_MS as u64);
    let started = Instant::now();
    let mut last = Instant::now();
    let mut bank = Duration::ZERO;

    loop {
        // Tick.
        let now = Instant::now();
        bank += now - last;
        last = now;

        let mut ticks = 0;
        while bank >= tick && ticks < MAX_CATCH_UP_TICKS {
            app.tick(&mut *worker);
            bank -= tick;
            ticks += 1;
        }
        if ticks == MAX_CATCH_UP_TICKS {
            debug!("dropping {:?} of backlog", bank);
            bank = Duration::ZERO;
        }

        if app.should_quit() {
            return Ok(());
        }

        // Render.
        if let Some(snap) = app.snapshot() {
            let now_ms = started.elapsed().as_millis() as u64;
            if throttle.should_render(now_ms, fingerprint(&snap)) {
                let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
                view.render_into(&snap, Viewport::new(w, h), &mut fb, &mut hits);
                term.draw_swap(&mut fb)?;
            }
        }

        // Input with timeout until next tick.
        let timeout = tick.saturating_sub(bank);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    let game_screen = app.current_screen().is_some_and(|s| s.id.is_game());
                    if let Some(command) = handle_key_event(key, game_screen) {
                        app.handle(command);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(command) = handle_mouse_event(mouse).and_then(|p| hits.resolve(p)) {
                        app.handle(command);
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                    throttle.invalidate();
                }
                _ => {}
            }
        }
    }
}
