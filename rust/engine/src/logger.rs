use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::piece::{Direction, PieceId, Player};

/// The history line appended to the game state after every legal move,
/// e.g. `A's PA1 moved F`.
pub fn format_history_entry(player: Player, piece: PieceId, direction: Direction) -> String {
    format!("{player}'s {piece} moved {direction}")
}

/// One applied move, as persisted to the match log.
/// Serialized as a JSONL line per move for replay and analysis.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based position of the move in the game.
    pub seq: u32,
    /// The side that moved.
    pub player: Player,
    /// Label of the moved piece.
    pub piece: String,
    /// Direction code the mover submitted.
    pub direction: Direction,
    /// Label of the opposing piece removed by this move, if any.
    #[serde(default)]
    pub captured: Option<String>,
    /// Winner token when this move ended the game.
    #[serde(default)]
    pub winner: Option<Player>,
    /// Timestamp when the move was applied (RFC3339).
    #[serde(default)]
    pub ts: Option<String>,
}

/// Append-only JSONL writer for [`MoveRecord`]s.
pub struct MatchLogger {
    writer: Option<BufWriter<File>>,
    seq: u32,
}

impl MatchLogger {
    /// Open (truncating) the log file, creating parent directories as needed.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            seq: 0,
        })
    }

    /// A logger that numbers records but writes nowhere. Used by tests.
    pub fn sink() -> Self {
        Self {
            writer: None,
            seq: 0,
        }
    }

    /// Next move sequence number (1-based).
    pub fn next_seq(&mut self) -> u32 {
        self.seq += 1;
        self.seq
    }

    /// Write one record as a JSONL line, injecting the timestamp when the
    /// caller left it unset.
    pub fn write(&mut self, record: &MoveRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
