use crate::models::board::{Board, Marker};
use crate::models::game::Outcome;

#[derive(Clone, Default)]
pub struct TicTacToeService;

impl TicTacToeService {
    /// Evaluates `board` from `viewer`'s side: `Win` if any line is all the
    /// viewer's marker, `Lose` if any line is all the other marker, `Tie` when
    /// the board is full without a line, otherwise `None`.
    ///
    /// The same board reads as `Win` for one player and `Lose` for the other,
    /// so callers must pass whoever is looking at the game.
    pub fn detect_result(board: &Board, o_user: &str, viewer: &str) -> Option<Outcome> {
        let mine = if viewer == o_user { Marker::O } else { Marker::X };

        if board.has_line(mine) {
            Some(Outcome::Win)
        } else if board.has_line(mine.opponent()) {
            Some(Outcome::Lose)
        } else if board.is_full() {
            Some(Outcome::Tie)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const O_USER: &str = "alice";
    const X_USER: &str = "bob";

    /// `X`, `O`, anything else blank; row-major.
    fn board(layout: &str) -> Board {
        let mut cells = [None; 9];
        for (cell, ch) in cells.iter_mut().zip(layout.chars()) {
            *cell = match ch {
                'X' => Some(Marker::X),
                'O' => Some(Marker::O),
                _ => None,
            };
        }
        Board::from_cells(cells)
    }

    #[test_case("XXX_O___O", X_USER, Some(Outcome::Win); "top row seen by x")]
    #[test_case("XXX_O___O", O_USER, Some(Outcome::Lose); "top row seen by o")]
    #[test_case("XOXXXOOXO", X_USER, Some(Outcome::Tie); "full board seen by x")]
    #[test_case("XOXXXOOXO", O_USER, Some(Outcome::Tie); "full board seen by o")]
    #[test_case("O_X_OX__O", O_USER, Some(Outcome::Win); "diagonal")]
    #[test_case("X_OX_OX__", X_USER, Some(Outcome::Win); "left column")]
    #[test_case("XXXOOXOXO", X_USER, Some(Outcome::Win); "full board with a line")]
    #[test_case("_________", X_USER, None; "empty board")]
    #[test_case("XO_XO____", O_USER, None; "game in progress")]
    fn test_detect_result(layout: &str, viewer: &str, expected: Option<Outcome>) {
        assert_eq!(
            TicTacToeService::detect_result(&board(layout), O_USER, viewer),
            expected
        );
    }

    #[test]
    fn test_non_participant_reads_as_x() {
        assert_eq!(
            TicTacToeService::detect_result(&board("XXX_O___O"), O_USER, "carol"),
            Some(Outcome::Win)
        );
    }

    #[test]
    fn test_every_full_board_without_line_is_tie() {
        let mut ties = 0;
        for bits in 0u16..512 {
            let mut cells = [None; 9];
            for (i, cell) in cells.iter_mut().enumerate() {
                *cell = Some(if bits & (1 << i) == 0 { Marker::X } else { Marker::O });
            }
            let board = Board::from_cells(cells);
            if board.has_line(Marker::X) || board.has_line(Marker::O) {
                continue;
            }
            ties += 1;
            for viewer in [X_USER, O_USER] {
                assert_eq!(
                    TicTacToeService::detect_result(&board, O_USER, viewer),
                    Some(Outcome::Tie)
                );
            }
        }
        assert!(ties > 0);
    }

    fn any_board() -> impl Strategy<Value = Board> {
        proptest::array::uniform9(prop_oneof![
            Just(None),
            Just(Some(Marker::X)),
            Just(Some(Marker::O)),
        ])
        .prop_map(Board::from_cells)
    }

    proptest! {
        #[test]
        fn prop_single_line_owner_wins(board in any_board()) {
            let x_line = board.has_line(Marker::X);
            let o_line = board.has_line(Marker::O);
            prop_assume!(x_line != o_line);

            let (winner, loser) = if x_line { (X_USER, O_USER) } else { (O_USER, X_USER) };
            prop_assert_eq!(TicTacToeService::detect_result(&board, O_USER, winner), Some(Outcome::Win));
            prop_assert_eq!(TicTacToeService::detect_result(&board, O_USER, loser), Some(Outcome::Lose));
        }

        #[test]
        fn prop_open_board_without_line_is_undecided(board in any_board()) {
            prop_assume!(!board.is_full());
            prop_assume!(!board.has_line(Marker::X) && !board.has_line(Marker::O));

            prop_assert_eq!(TicTacToeService::detect_result(&board, O_USER, X_USER), None);
            prop_assert_eq!(TicTacToeService::detect_result(&board, O_USER, O_USER), None);
        }
    }
}
