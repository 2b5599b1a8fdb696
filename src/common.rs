//! Common types for tic-tac-toe: participants, cells, outcomes and move results.

use core::fmt;

/// One of the two participants in a match.
///
/// The engine treats this as an opaque identifier; wire codes and display
/// marks are mapped here so that the boundary layers agree on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "net", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    /// Moves first. Wire code `0`, displayed as `O`.
    A,
    /// Wire code `1`, displayed as `X`.
    B,
}

impl Player {
    /// Map a wire code to a participant. Only `0` and `1` are valid.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Player::A),
            1 => Some(Player::B),
            _ => None,
        }
    }

    /// Wire code of this participant.
    pub fn code(self) -> i32 {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }

    /// The opponent of this participant.
    pub fn other(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Display mark placed on the board.
    pub fn mark(self) -> char {
        match self {
            Player::A => 'O',
            Player::B => 'X',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// State of a single board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "net", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Empty,
    Taken(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Participant occupying this square, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Taken(p) => Some(p),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        Cell::Taken(player)
    }
}

/// Classification of the match as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "net", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    #[default]
    Undecided,
    Winner(Player),
    Draw,
}

impl Outcome {
    /// Wire code: `-1` undecided, `0`/`1` winning player, `2` draw.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Undecided => -1,
            Outcome::Winner(p) => p.code(),
            Outcome::Draw => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Outcome::Undecided),
            2 => Some(Outcome::Draw),
            other => Player::from_code(other).map(Outcome::Winner),
        }
    }

    /// `true` once the match has a winner or is drawn.
    pub fn is_decided(self) -> bool {
        !matches!(self, Outcome::Undecided)
    }
}

/// Result of a single move attempt.
///
/// Everything except `OutOfBounds` is an ordinary game-rule answer that the
/// caller is expected to handle by trying again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "net", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveResult {
    Success,
    OutOfBounds,
    SquareTaken,
    WrongTurn,
    GameFinished,
}

impl MoveResult {
    pub fn is_success(self) -> bool {
        matches!(self, MoveResult::Success)
    }
}

impl fmt::Display for MoveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveResult::Success => write!(f, "Move accepted."),
            MoveResult::OutOfBounds => write!(f, "Position outside board."),
            MoveResult::SquareTaken => write!(f, "Square already taken."),
            MoveResult::WrongTurn => write!(f, "Not your turn."),
            MoveResult::GameFinished => write!(f, "Game has finished."),
        }
    }
}

/// Errors returned by [`Board`](crate::Board) accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Coordinate outside the 3x3 grid.
    #[error("position ({row}, {column}) is outside the board")]
    OutOfBounds { row: usize, column: usize },
}
