use alloc::collections::BTreeSet;
use smallvec::{smallvec, SmallVec};

use crate::*;

/// Paired ray directions for the four line axes: horizontal, vertical, and
/// the two diagonals.
const AXES: [[(isize, isize); 2]; 4] = [
    [(1, 0), (-1, 0)],
    [(0, 1), (0, -1)],
    [(1, 1), (-1, -1)],
    [(1, -1), (-1, 1)],
];

/// Qualifying runs found through a single placement.
///
/// Keeps both the de-duplicated cell union (a cell can sit on several
/// qualifying runs at once) and the individual run lengths, which is what
/// scoring works from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunHit {
    cells: BTreeSet<Coord2>,
    run_lengths: SmallVec<[u8; 4]>,
}

impl RunHit {
    pub fn is_empty(&self) -> bool {
        self.run_lengths.is_empty()
    }

    /// Union of every qualifying run's cells, each cell once.
    pub fn cells(&self) -> &BTreeSet<Coord2> {
        &self.cells
    }

    pub fn run_lengths(&self) -> &[u8] {
        &self.run_lengths
    }

    /// Points awarded for the hit: each run is scored by its own length and
    /// simultaneous runs are summed.
    pub fn points(&self, min_run: u8) -> u32 {
        self.run_lengths
            .iter()
            .map(|&len| run_points(len, min_run))
            .sum()
    }
}

/// Score of a single cleared run of `len` cells: 10 for the minimum length,
/// plus 2 per extra cell.
pub const fn run_points(len: u8, min_run: u8) -> u32 {
    10 + (len.saturating_sub(min_run) as u32) * 2
}

/// Finds every run of at least `min_run` same-colored cells passing through
/// `coords` along the four axes. Detection only: the board is never mutated,
/// clearing is the caller's job. Probing an empty or out-of-range cell
/// yields an empty hit.
pub fn matched_runs(board: &Board, coords: Coord2, min_run: u8) -> RunHit {
    let Ok(Some(color)) = board.get(coords) else {
        return RunHit::default();
    };

    let mut hit = RunHit::default();
    for axis in AXES {
        let mut run: SmallVec<[Coord2; 16]> = smallvec![coords];
        for delta in axis {
            let mut cursor = apply_delta(coords, delta, board.size());
            while let Some(pos) = cursor {
                if board[pos] != Some(color) {
                    break;
                }
                run.push(pos);
                cursor = apply_delta(pos, delta, board.size());
            }
        }

        if run.len() >= usize::from(min_run) {
            hit.run_lengths.push(run.len().try_into().unwrap());
            hit.cells.extend(run.iter().copied());
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(balls: &[(Coord2, BallColor)]) -> Board {
        let mut board = Board::new((9, 9));
        for &(coords, color) in balls {
            board.set(coords, Some(color)).unwrap();
        }
        board
    }

    #[test]
    fn four_in_a_row_is_below_threshold() {
        use BallColor::Red;
        let board = board_with(&[
            ((2, 4), Red),
            ((3, 4), Red),
            ((4, 4), Red),
            ((5, 4), Red),
        ]);

        assert!(matched_runs(&board, (5, 4), 5).is_empty());
    }

    #[test]
    fn completing_a_horizontal_run_of_five_scores_ten() {
        use BallColor::Red;
        let board = board_with(&[
            ((2, 4), Red),
            ((3, 4), Red),
            ((4, 4), Red),
            ((5, 4), Red),
            ((6, 4), Red),
        ]);

        let hit = matched_runs(&board, (6, 4), 5);

        assert_eq!(
            hit.cells().iter().copied().collect::<alloc::vec::Vec<_>>(),
            [(2, 4), (3, 4), (4, 4), (5, 4), (6, 4)]
        );
        assert_eq!(hit.run_lengths(), [5]);
        assert_eq!(hit.points(5), 10);
    }

    #[test]
    fn filling_a_gap_joins_both_sides_of_the_run() {
        use BallColor::Green;
        let board = board_with(&[
            ((1, 1), Green),
            ((2, 2), Green),
            ((3, 3), Green),
            ((5, 5), Green),
            ((6, 6), Green),
            ((4, 4), Green),
        ]);

        let hit = matched_runs(&board, (4, 4), 5);

        assert_eq!(hit.cells().len(), 6);
        assert_eq!(hit.run_lengths(), [6]);
        assert_eq!(hit.points(5), 12);
    }

    #[test]
    fn crossing_runs_are_unioned_and_scored_separately() {
        use BallColor::Blue;
        let mut balls = alloc::vec::Vec::new();
        for x in 2..=6 {
            balls.push(((x, 4), Blue));
        }
        for y in 0..=3 {
            balls.push(((6, y), Blue));
        }
        let board = board_with(&balls);

        let hit = matched_runs(&board, (6, 4), 5);

        // 5 horizontal + 5 vertical sharing the placement cell
        assert_eq!(hit.cells().len(), 9);
        assert_eq!(hit.run_lengths().len(), 2);
        assert_eq!(hit.points(5), 20);
    }

    #[test]
    fn different_colors_break_the_run() {
        use BallColor::{Red, Yellow};
        let board = board_with(&[
            ((2, 4), Red),
            ((3, 4), Red),
            ((4, 4), Yellow),
            ((5, 4), Red),
            ((6, 4), Red),
        ]);

        assert!(matched_runs(&board, (5, 4), 5).is_empty());
    }

    #[test]
    fn detection_never_mutates_the_board() {
        use BallColor::Red;
        let board = board_with(&[
            ((2, 4), Red),
            ((3, 4), Red),
            ((4, 4), Red),
            ((5, 4), Red),
            ((6, 4), Red),
        ]);
        let before = board.clone();

        let _ = matched_runs(&board, (6, 4), 5);

        assert_eq!(board, before);
    }

    #[test]
    fn empty_or_out_of_range_probe_yields_empty_hit() {
        let board = Board::new((9, 9));

        assert!(matched_runs(&board, (4, 4), 5).is_empty());
        assert!(matched_runs(&board, (20, 20), 5).is_empty());
    }

    #[test]
    fn run_points_reward_longer_runs() {
        assert_eq!(run_points(5, 5), 10);
        assert_eq!(run_points(6, 5), 12);
        assert_eq!(run_points(9, 5), 18);
    }
}
