use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbol placed in a cell. The host always plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn opponent(self) -> Marker {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::X => "X",
            Marker::O => "O",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the nine squares. Variant names double as the stored attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    TopLeft,
    TopMiddle,
    TopRight,
    MiddleLeft,
    MiddleMiddle,
    MiddleRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl Cell {
    /// Row-major order, matching `Board` indexing.
    pub const ALL: [Cell; 9] = [
        Cell::TopLeft,
        Cell::TopMiddle,
        Cell::TopRight,
        Cell::MiddleLeft,
        Cell::MiddleMiddle,
        Cell::MiddleRight,
        Cell::BottomLeft,
        Cell::BottomMiddle,
        Cell::BottomRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn attribute_name(self) -> &'static str {
        match self {
            Cell::TopLeft => "TopLeft",
            Cell::TopMiddle => "TopMiddle",
            Cell::TopRight => "TopRight",
            Cell::MiddleLeft => "MiddleLeft",
            Cell::MiddleMiddle => "MiddleMiddle",
            Cell::MiddleRight => "MiddleRight",
            Cell::BottomLeft => "BottomLeft",
            Cell::BottomMiddle => "BottomMiddle",
            Cell::BottomRight => "BottomRight",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCellError(pub String);

impl fmt::Display for ParseCellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown cell position: {}", self.0)
    }
}

impl std::error::Error for ParseCellError {}

impl FromStr for Cell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cell::ALL
            .into_iter()
            .find(|cell| cell.attribute_name() == s)
            .ok_or_else(|| ParseCellError(s.to_string()))
    }
}

/// Rows, columns, then diagonals.
pub const LINES: [[Cell; 3]; 8] = [
    [Cell::TopLeft, Cell::TopMiddle, Cell::TopRight],
    [Cell::MiddleLeft, Cell::MiddleMiddle, Cell::MiddleRight],
    [Cell::BottomLeft, Cell::BottomMiddle, Cell::BottomRight],
    [Cell::TopLeft, Cell::MiddleLeft, Cell::BottomLeft],
    [Cell::TopMiddle, Cell::MiddleMiddle, Cell::BottomMiddle],
    [Cell::TopRight, Cell::MiddleRight, Cell::BottomRight],
    [Cell::TopLeft, Cell::MiddleMiddle, Cell::BottomRight],
    [Cell::TopRight, Cell::MiddleMiddle, Cell::BottomLeft],
];

/// Snapshot of the nine cells of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Marker>; 9],
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn from_cells(cells: [Option<Marker>; 9]) -> Self {
        Board { cells }
    }

    pub fn get(&self, cell: Cell) -> Option<Marker> {
        self.cells[cell.index()]
    }

    pub fn set(&mut self, cell: Cell, marker: Marker) {
        self.cells[cell.index()] = Some(marker);
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// True when any of the eight lines is filled with `marker`.
    pub fn has_line(&self, marker: Marker) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|cell| self.get(*cell) == Some(marker)))
    }

    /// Display form used by clients: `"X"`, `"O"` or `" "` per cell.
    pub fn to_strings(&self) -> Vec<&'static str> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(" ", Marker::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse_round_trips_attribute_names() {
        for cell in Cell::ALL {
            assert_eq!(cell.attribute_name().parse::<Cell>().unwrap(), cell);
        }
    }

    #[test]
    fn test_cell_parse_rejects_unknown_position() {
        let err = "Centre".parse::<Cell>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown cell position: Centre");
    }

    #[test]
    fn test_cell_index_is_row_major() {
        assert_eq!(Cell::TopLeft.index(), 0);
        assert_eq!(Cell::MiddleMiddle.index(), 4);
        assert_eq!(Cell::BottomRight.index(), 8);
    }

    #[test]
    fn test_board_has_line_diagonal() {
        let mut board = Board::new();
        board.set(Cell::TopRight, Marker::O);
        board.set(Cell::MiddleMiddle, Marker::O);
        board.set(Cell::BottomLeft, Marker::O);

        assert!(board.has_line(Marker::O));
        assert!(!board.has_line(Marker::X));
        assert!(!board.is_full());
    }

    #[test]
    fn test_board_to_strings_marks_blanks() {
        let mut board = Board::new();
        board.set(Cell::TopLeft, Marker::X);
        board.set(Cell::BottomRight, Marker::O);

        assert_eq!(
            board.to_strings(),
            vec!["X", " ", " ", " ", " ", " ", " ", " ", "O"]
        );
    }

    #[test]
    fn test_marker_opponent() {
        assert_eq!(Marker::X.opponent(), Marker::O);
        assert_eq!(Marker::O.opponent(), Marker::X);
    }
}
