//! Marks and the 3x3 board.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{error::ValueObjectError, value_object::CellPosition};

/// Player symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Always moves first.
    X,
    O,
}

impl Mark {
    pub const ALL: [Mark; 2] = [Mark::X, Mark::O];

    /// The opponent's mark.
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mark {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Mark::X),
            "O" | "o" => Ok(Mark::O),
            other => Err(ValueObjectError::UnknownMark(other.to_string())),
        }
    }
}

/// 3x3 grid of optional marks, row-major.
///
/// Serialized as a nested array with `null` for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([[Option<Mark>; 3]; 3]);

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: [[Option<Mark>; 3]; 3]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[[Option<Mark>; 3]; 3] {
        &self.0
    }

    pub fn get(&self, pos: CellPosition) -> Option<Mark> {
        self.0[pos.row()][pos.col()]
    }

    pub fn is_cell_empty(&self, pos: CellPosition) -> bool {
        self.get(pos).is_none()
    }

    /// Returns a copy of this board with `mark` placed at `pos`.
    ///
    /// The receiver is left untouched; other readers may still hold it.
    pub fn with_mark(&self, pos: CellPosition, mark: Mark) -> Self {
        let mut rows = self.0;
        rows[pos.row()][pos.col()] = Some(mark);
        Self(rows)
    }

    pub fn cells(&self) -> impl Iterator<Item = Option<Mark>> + '_ {
        self.0.iter().flatten().copied()
    }
}
