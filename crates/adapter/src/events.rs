//! Messages between the game loop, the turn driver and the journal.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::core::{GameSnapshot, SpawnedTile, TileMove, TurnPlan, TurnReport};
use crate::types::{Direction, GameOutcome, Position};

/// Command from the game loop into the turn driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Move(Direction),
    /// Start a fresh game, optionally with a new grid size
    Restart { grid_size: Option<u8> },
}

/// Completion handle for an animation; send or drop it when the slide is done
pub type AnimationDone = oneshot::Sender<()>;

/// Event from the turn driver to the presentation layer
#[derive(Debug)]
pub enum PresentationEvent {
    /// A game began; `spawned` are its opening tiles
    Started {
        snapshot: GameSnapshot,
        spawned: Vec<SpawnedTile>,
    },
    /// Animate the plan, then signal (or drop) `done`
    Animate {
        plan: TurnPlan,
        done: AnimationDone,
    },
    TurnCommitted {
        report: TurnReport,
        snapshot: GameSnapshot,
    },
    GameEnded { outcome: GameOutcome },
}

// ============== Journal records ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub row: u8,
    pub col: u8,
}

impl From<Position> for CellRecord {
    fn from(p: Position) -> Self {
        Self {
            row: p.row,
            col: p.col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub tile_id: u32,
    pub from: CellRecord,
    pub to: CellRecord,
    pub merged_into: Option<u32>,
}

impl From<&TileMove> for MoveRecord {
    fn from(m: &TileMove) -> Self {
        Self {
            tile_id: m.id.0,
            from: m.from.into(),
            to: m.to.into(),
            merged_into: m.merged_into.map(|id| id.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub tile_id: u32,
    pub at: CellRecord,
    pub value: u32,
}

/// One committed turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub episode: u32,
    pub turn: u32,
    pub direction: String,
    pub moves: Vec<MoveRecord>,
    pub spawned: Option<SpawnRecord>,
    pub tile_count: u32,
    pub max_tile: u32,
}

impl TurnRecord {
    pub fn new(report: &TurnReport, snapshot: &GameSnapshot) -> Self {
        Self {
            episode: snapshot.episode_id,
            turn: report.turn,
            direction: report.direction.as_str().to_string(),
            moves: report.moves.iter().map(MoveRecord::from).collect(),
            spawned: report.spawned.map(|s| SpawnRecord {
                tile_id: s.id.0,
                at: s.position.into(),
                value: s.value,
            }),
            tile_count: snapshot.tile_count,
            max_tile: snapshot.max_tile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEndRecord {
    pub episode: u32,
    pub turn: u32,
    pub outcome: String,
    pub max_tile: u32,
}

/// A journal line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalRecord {
    Turn(TurnRecord),
    GameEnd(GameEndRecord),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    #[test]
    fn test_turn_record_json_shape() {
        let mut game = GameState::new(7);
        game.start();
        let report = Direction::ALL
            .into_iter()
            .find_map(|d| game.play(d))
            .unwrap();
        let record = JournalRecord::Turn(TurnRecord::new(&report, &game.snapshot()));

        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["type"], "turn");
        assert_eq!(v["turn"], 1);
        let moves = v["moves"].as_array().unwrap();
        assert_eq!(moves.len(), report.moves.len());
        assert!(moves[0].get("tile_id").is_some());
        assert!(moves[0]["from"].get("row").is_some());
        assert!(moves[0].get("merged_into").is_some());
    }

    #[test]
    fn test_game_end_record_parses_back() {
        let line = r#"{"type":"game_end","episode":2,"turn":40,"outcome":"lost","max_tile":128}"#;
        let record: JournalRecord = serde_json::from_str(line).unwrap();
        assert_eq!(
            record,
            JournalRecord::GameEnd(GameEndRecord {
                episode: 2,
                turn: 40,
                outcome: "lost".to_string(),
                max_tile: 128,
            })
        );
    }
}
