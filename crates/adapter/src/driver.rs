//! Turn driver - runs the turn controller against an async presentation layer.
//!
//! For every swipe that moves something the driver hands the plan to the
//! presentation layer and waits for its completion signal before committing.
//! Commands that arrive meanwhile are drained and dropped; the controller is
//! not `Idle`, so they could not be accepted anyway.

use rand::Rng;
use tokio::sync::{mpsc, oneshot};

use crate::core::GameState;
use crate::events::{GameEndRecord, JournalRecord, PresentationEvent, SessionCommand, TurnRecord};
use crate::types::TurnPhase;

/// Drive `game` until the command channel closes; returns the final state.
pub async fn run_driver<R: Rng>(
    mut game: GameState<R>,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: mpsc::UnboundedSender<PresentationEvent>,
    journal_tx: Option<mpsc::UnboundedSender<JournalRecord>>,
) -> GameState<R> {
    game.start();
    send_started(&game, &event_tx);

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            SessionCommand::Move(direction) => {
                let Some(plan) = game.submit_direction(direction) else {
                    continue;
                };

                let (done_tx, done_rx) = oneshot::channel();
                // A closed event channel drops `done_tx`, which reads as done.
                let _ = event_tx.send(PresentationEvent::Animate {
                    plan,
                    done: done_tx,
                });
                wait_for_animation(done_rx, &mut cmd_rx).await;

                let Some(report) = game.finish_turn() else {
                    log::error!("turn driver: no turn in flight after animation");
                    continue;
                };
                let snapshot = game.snapshot();
                if let Some(tx) = journal_tx.as_ref() {
                    let _ = tx.send(JournalRecord::Turn(TurnRecord::new(&report, &snapshot)));
                }
                let _ = event_tx.send(PresentationEvent::TurnCommitted { report, snapshot });

                if let Some(outcome) = game.take_game_ended() {
                    if let Some(tx) = journal_tx.as_ref() {
                        let _ = tx.send(JournalRecord::GameEnd(GameEndRecord {
                            episode: game.episode_id(),
                            turn: game.turn(),
                            outcome: outcome.as_str().to_string(),
                            max_tile: game.grid().max_value(),
                        }));
                    }
                    let _ = event_tx.send(PresentationEvent::GameEnded { outcome });
                }
            }
            SessionCommand::Restart { grid_size } => {
                if !matches!(game.phase(), TurnPhase::Idle | TurnPhase::GameOver(_)) {
                    continue;
                }
                match game.restart(grid_size) {
                    Ok(()) => send_started(&game, &event_tx),
                    Err(e) => log::warn!("restart rejected: {e}"),
                }
            }
        }
    }

    log::debug!("turn driver stopped after episode {}", game.episode_id());
    game
}

fn send_started<R: Rng>(game: &GameState<R>, event_tx: &mpsc::UnboundedSender<PresentationEvent>) {
    let _ = event_tx.send(PresentationEvent::Started {
        snapshot: game.snapshot(),
        spawned: game.start_spawns().to_vec(),
    });
}

/// Wait for the presentation layer, dropping commands until it is done.
async fn wait_for_animation(
    mut done: oneshot::Receiver<()>,
    cmd_rx: &mut mpsc::Receiver<SessionCommand>,
) {
    loop {
        tokio::select! {
            // Sent or dropped: turns cannot be cancelled either way.
            _ = &mut done => return,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => log::debug!("ignoring {cmd:?} during animation"),
                None => {
                    let _ = done.await;
                    return;
                }
            },
        }
    }
}
