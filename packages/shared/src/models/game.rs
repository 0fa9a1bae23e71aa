use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::board::{Board, Cell, Marker};

/// Stored in `Result` when neither player completed a line.
pub const TIE_RESULT: &str = "Tie";
/// Stored in `Turn` once a game is finished.
pub const NO_TURN: &str = "N/A";

/// Lifecycle stage of a game. Transitions only move forward:
/// `Pending -> InProgress -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Pending,
    InProgress,
    Finished,
}

impl GameStatus {
    pub const ALL: [GameStatus; 3] = [
        GameStatus::Pending,
        GameStatus::InProgress,
        GameStatus::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Pending => "PENDING",
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::Finished => "FINISHED",
        }
    }

    /// Leading part of the `StatusDate` sort key for this status.
    pub fn key_prefix(&self) -> String {
        format!("{}_", self.as_str())
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current time truncated to the precision kept in the `StatusDate` key.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Status and the moment it was entered.
///
/// Only the storage layer joins the two into the `StatusDate` index key
/// (`IN_PROGRESS_2026-10-18T10:00:00.000000Z`). The timestamp has a fixed
/// width, so keys of one status sort chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDate {
    pub status: GameStatus,
    pub at: DateTime<Utc>,
}

impl StatusDate {
    pub fn new(status: GameStatus, at: DateTime<Utc>) -> Self {
        StatusDate { status, at }
    }

    /// Stamp for a transition out of a stage entered at `previous`.
    /// Never earlier than `previous`, even if the local clock is behind.
    pub fn after(status: GameStatus, previous: DateTime<Utc>) -> Self {
        StatusDate::new(status, timestamp_now().max(previous))
    }

    pub fn to_key(&self) -> String {
        format!(
            "{}{}",
            self.status.key_prefix(),
            self.at.to_rfc3339_opts(SecondsFormat::Micros, true)
        )
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidGameRecord> {
        let (status, rest) = GameStatus::ALL
            .iter()
            .find_map(|status| {
                raw.strip_prefix(status.key_prefix().as_str())
                    .map(|rest| (*status, rest))
            })
            .ok_or_else(|| InvalidGameRecord(format!("unknown status in StatusDate '{}'", raw)))?;

        let at = DateTime::parse_from_rfc3339(rest)
            .map_err(|e| InvalidGameRecord(format!("bad timestamp in StatusDate '{}': {}", raw, e)))?
            .with_timezone(&Utc);

        Ok(StatusDate { status, at })
    }
}

/// Stored outcome of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Winner(String),
    Tie,
}

impl GameResult {
    pub fn as_attribute(&self) -> &str {
        match self {
            GameResult::Winner(user) => user,
            GameResult::Tie => TIE_RESULT,
        }
    }

    pub fn from_attribute(raw: String) -> Self {
        if raw == TIE_RESULT {
            GameResult::Tie
        } else {
            GameResult::Winner(raw)
        }
    }
}

/// A result seen from one player's side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGameRecord(pub String);

impl fmt::Display for InvalidGameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid game record: {}", self.0)
    }
}

impl std::error::Error for InvalidGameRecord {}

/// One game as seen by the engine. Returned values are snapshots; re-fetch
/// to observe later moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub game_id: String,
    pub host_id: String,
    pub opponent_id: String,
    /// Participant playing `O`; always the host.
    pub o_user: String,
    /// Who may move next; `None` once finished.
    pub turn: Option<String>,
    pub status: GameStatus,
    pub status_at: DateTime<Utc>,
    pub board: Board,
    pub result: Option<GameResult>,
}

impl Game {
    /// A fresh invite from `host_id` to `opponent_id`. The invitee moves first.
    pub fn new(host_id: &str, opponent_id: &str) -> Self {
        Game {
            game_id: Uuid::new_v4().to_string(),
            host_id: host_id.to_string(),
            opponent_id: opponent_id.to_string(),
            o_user: host_id.to_string(),
            turn: Some(opponent_id.to_string()),
            status: GameStatus::Pending,
            status_at: timestamp_now(),
            board: Board::new(),
            result: None,
        }
    }

    pub fn status_date(&self) -> StatusDate {
        StatusDate::new(self.status, self.status_at)
    }

    pub fn is_participant(&self, user: &str) -> bool {
        user == self.host_id || user == self.opponent_id
    }

    pub fn marker_for(&self, user: &str) -> Marker {
        if user == self.o_user {
            Marker::O
        } else {
            Marker::X
        }
    }

    /// The other participant. Anyone who is not the host is answered with the host.
    pub fn opposing_player(&self, user: &str) -> &str {
        if user == self.host_id {
            &self.opponent_id
        } else {
            &self.host_id
        }
    }

    /// Stored result from `viewer`'s side, `None` while unresolved.
    pub fn result_for(&self, viewer: &str) -> Option<Outcome> {
        match self.result.as_ref()? {
            GameResult::Tie => Some(Outcome::Tie),
            GameResult::Winner(winner) if winner == viewer => Some(Outcome::Win),
            GameResult::Winner(_) => Some(Outcome::Lose),
        }
    }

    /// Turn holder with their marker, e.g. `bob (X)`.
    pub fn turn_label(&self) -> Option<String> {
        if self.result.is_some() {
            return None;
        }
        self.turn
            .as_ref()
            .map(|user| format!("{} ({})", user, self.marker_for(user)))
    }
}

/// Attribute layout of a `Games` table item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameItem {
    pub game_id: String,
    pub host_id: String,
    pub opponent_id: String,
    pub status_date: String,
    pub o_user: String,
    pub turn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_left: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_middle: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_right: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_left: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_middle: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_right: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_middle: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl From<&Game> for GameItem {
    fn from(game: &Game) -> Self {
        let cell = |cell: Cell| game.board.get(cell);
        GameItem {
            game_id: game.game_id.clone(),
            host_id: game.host_id.clone(),
            opponent_id: game.opponent_id.clone(),
            status_date: game.status_date().to_key(),
            o_user: game.o_user.clone(),
            turn: game.turn.clone().unwrap_or_else(|| NO_TURN.to_string()),
            top_left: cell(Cell::TopLeft),
            top_middle: cell(Cell::TopMiddle),
            top_right: cell(Cell::TopRight),
            middle_left: cell(Cell::MiddleLeft),
            middle_middle: cell(Cell::MiddleMiddle),
            middle_right: cell(Cell::MiddleRight),
            bottom_left: cell(Cell::BottomLeft),
            bottom_middle: cell(Cell::BottomMiddle),
            bottom_right: cell(Cell::BottomRight),
            result: game.result.as_ref().map(|r| r.as_attribute().to_string()),
        }
    }
}

impl TryFrom<GameItem> for Game {
    type Error = InvalidGameRecord;

    fn try_from(item: GameItem) -> Result<Self, Self::Error> {
        let status_date = StatusDate::parse(&item.status_date)?;
        let board = Board::from_cells([
            item.top_left,
            item.top_middle,
            item.top_right,
            item.middle_left,
            item.middle_middle,
            item.middle_right,
            item.bottom_left,
            item.bottom_middle,
            item.bottom_right,
        ]);
        let turn = if item.turn == NO_TURN {
            None
        } else {
            Some(item.turn)
        };

        Ok(Game {
            game_id: item.game_id,
            host_id: item.host_id,
            opponent_id: item.opponent_id,
            o_user: item.o_user,
            turn,
            status: status_date.status,
            status_at: status_date.at,
            board,
            result: item.result.map(GameResult::from_attribute),
        })
    }
}
