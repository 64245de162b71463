//! Terminal 2048 runner (default binary).
//!
//! Uses crossterm for input and a framebuffer-based renderer. The game itself
//! runs in a session: every swipe comes back as an `Animate` event, the tiles
//! slide for `SLIDE_MS`, and only then is the turn committed.
//!
//! Set `TUI2048_LOG_PATH` to write logs to a file (the terminal belongs to the
//! renderer); see the adapter crate for the other environment variables.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use simplelog::{Config, LevelFilter, WriteLogger};

use tui_2048::adapter::{AnimationDone, PresentationEvent, Session, SessionCommand};
use tui_2048::core::{GameSnapshot, TurnPlan};
use tui_2048::input::{handle_key_event, should_quit};
use tui_2048::term::{BoardView, FrameBuffer, HudView, Motion, TerminalRenderer, TileSprites, Viewport};
use tui_2048::types::{GameAction, FRAME_MS, MAX_GRID_SIZE, MIN_GRID_SIZE, SLIDE_MS};

/// A turn being shown before it is committed
struct Slide {
    plan: TurnPlan,
    done: Option<AnimationDone>,
    started: Instant,
}

impl Slide {
    fn progress(&self) -> f32 {
        self.started.elapsed().as_secs_f32() * 1000.0 / SLIDE_MS as f32
    }
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var("TUI2048_LOG_PATH").ok().filter(|p| !p.trim().is_empty()) else {
        return Ok(());
    };
    let file = File::create(path.trim()).with_context(|| format!("cannot create log file {path}"))?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), file)?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let session = Session::start_from_env()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut session: Session) -> Result<()> {
    let view = BoardView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snapshot = GameSnapshot::default();
    let mut sprites = TileSprites::for_grid(session.config().game.grid_size);
    let mut next_grid_size = session.config().game.grid_size;
    let mut slide: Option<Slide> = None;
    let frame = Duration::from_millis(FRAME_MS as u64);

    loop {
        // Session events.
        while let Some(ev) = session.try_recv() {
            match ev {
                PresentationEvent::Started {
                    snapshot: snap,
                    spawned,
                } => {
                    sprites.reset(snap.size, &spawned);
                    next_grid_size = snap.size;
                    snapshot = snap;
                }
                PresentationEvent::Animate { plan, done } => {
                    slide = Some(Slide {
                        plan,
                        done: Some(done),
                        started: Instant::now(),
                    });
                }
                PresentationEvent::TurnCommitted {
                    report,
                    snapshot: snap,
                } => {
                    sprites.apply_report(&report);
                    snapshot = snap;
                    slide = None;
                }
                PresentationEvent::GameEnded { outcome } => {
                    log::info!("game ended: {}", outcome.as_str());
                }
            }
        }

        // Release the driver once the slide has played out; keep drawing the
        // final positions until the commit arrives.
        if let Some(s) = slide.as_mut() {
            if s.progress() >= 1.0 {
                if let Some(done) = s.done.take() {
                    let _ = done.send(());
                }
            }
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let motion = slide.as_ref().map(|s| Motion {
            plan: &s.plan,
            progress: s.progress(),
        });
        let hud = HudView { next_grid_size };
        view.render_into(&snapshot, &sprites, motion, Some(&hud), Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input.
        if !event::poll(frame)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    // Releases a pending `done` so an in-flight turn commits.
                    drop(slide.take());
                    session.shutdown();
                    return Ok(());
                }
                match handle_key_event(key) {
                    Some(GameAction::Move(dir)) => {
                        session.submit(SessionCommand::Move(dir));
                    }
                    Some(GameAction::Restart) => {
                        session.submit(SessionCommand::Restart {
                            grid_size: Some(next_grid_size),
                        });
                    }
                    Some(GameAction::GrowGrid) => {
                        next_grid_size = (next_grid_size + 1).min(MAX_GRID_SIZE);
                    }
                    Some(GameAction::ShrinkGrid) => {
                        next_grid_size = next_grid_size.saturating_sub(1).max(MIN_GRID_SIZE);
                    }
                    None => {}
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
