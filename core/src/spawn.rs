use alloc::vec::Vec;
use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// A planned but not yet materialized spawn: where the next ball will appear
/// and which color it will have.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnHint {
    pub coords: Coord2,
    pub color: BallColor,
}

/// Upcoming spawn batch: the preview colors shown to the player, plus the
/// subset of them that got a pre-assigned target cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPlan {
    pub colors: SmallVec<[BallColor; 3]>,
    pub hints: SmallVec<[SpawnHint; 3]>,
}

/// Draws `preview` colors independently and uniformly from `palette`
/// (repeats allowed), then binds up to `min(preview, empty cells)` of them
/// to target cells drawn without replacement. Colors beyond the available
/// empty cells keep no target and drop out of the plan.
pub fn plan_next<R: Rng>(
    board: &Board,
    palette: &[BallColor],
    preview: u8,
    rng: &mut R,
) -> SpawnPlan {
    let mut plan = SpawnPlan::default();
    if palette.is_empty() {
        log::warn!("spawn palette is empty, nothing to plan");
        return plan;
    }

    for _ in 0..preview {
        plan.colors.push(palette[rng.random_range(0..palette.len())]);
    }

    let mut empty = board.empty_cells();
    for &color in plan.colors.iter().take(empty.len()) {
        let idx = rng.random_range(0..empty.len());
        let coords = empty.swap_remove(idx);
        plan.hints.push(SpawnHint { coords, color });
    }
    plan
}

/// Writes the plan onto the board. A hint whose target cell got occupied in
/// the meantime is redirected to a fresh random empty cell; with no empty
/// cell left the hint is skipped. Returns exactly the coordinates that
/// received a ball.
pub fn materialize<R: Rng>(
    board: &mut Board,
    plan: &SpawnPlan,
    rng: &mut R,
) -> SmallVec<[Coord2; 3]> {
    let mut filled = SmallVec::new();
    for hint in &plan.hints {
        let coords = if board.is_empty_at(hint.coords) {
            hint.coords
        } else {
            let empty = board.empty_cells();
            if empty.is_empty() {
                log::debug!("board full, dropping spawn hint at {:?}", hint.coords);
                continue;
            }
            empty[rng.random_range(0..empty.len())]
        };
        board[coords] = Some(hint.color);
        filled.push(coords);
    }
    filled
}

/// Scatters `count` balls of independently random colors over random empty
/// cells, bypassing the preview flow. Used for the opening batch.
pub fn scatter<R: Rng>(
    board: &mut Board,
    palette: &[BallColor],
    count: CellCount,
    rng: &mut R,
) -> Vec<Coord2> {
    let mut filled = Vec::new();
    if palette.is_empty() {
        log::warn!("spawn palette is empty, nothing to scatter");
        return filled;
    }

    let mut empty = board.empty_cells();
    let count = count.min(empty.len().try_into().unwrap());
    for _ in 0..count {
        let color = palette[rng.random_range(0..palette.len())];
        let idx = rng.random_range(0..empty.len());
        let coords = empty.swap_remove(idx);
        board[coords] = Some(color);
        filled.push(coords);
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use smallvec::smallvec;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn plan_binds_every_preview_color_when_space_allows() {
        let board = Board::new((9, 9));

        let plan = plan_next(&board, &BallColor::PALETTE, 3, &mut rng());

        assert_eq!(plan.colors.len(), 3);
        assert_eq!(plan.hints.len(), 3);
        for (hint, &color) in plan.hints.iter().zip(plan.colors.iter()) {
            assert!(board.is_empty_at(hint.coords));
            assert_eq!(hint.color, color);
        }
    }

    #[test]
    fn plan_targets_are_distinct() {
        let board = Board::new((9, 9));

        let plan = plan_next(&board, &BallColor::PALETTE, 3, &mut rng());

        assert_ne!(plan.hints[0].coords, plan.hints[1].coords);
        assert_ne!(plan.hints[0].coords, plan.hints[2].coords);
        assert_ne!(plan.hints[1].coords, plan.hints[2].coords);
    }

    #[test]
    fn plan_on_a_nearly_full_board_keeps_colors_but_drops_targets() {
        let mut board = Board::new((3, 3));
        for coords in board.empty_cells() {
            board.set(coords, Some(BallColor::Red)).unwrap();
        }
        board.set((1, 1), None).unwrap();

        let plan = plan_next(&board, &BallColor::PALETTE, 3, &mut rng());

        assert_eq!(plan.colors.len(), 3);
        assert_eq!(plan.hints.len(), 1);
        assert_eq!(plan.hints[0].coords, (1, 1));

        let filled = materialize(&mut board, &plan, &mut rng());

        assert_eq!(filled.as_slice(), [(1, 1)]);
        assert!(board.is_full());
    }

    #[test]
    fn materialize_fills_exactly_the_hinted_cells() {
        let mut board = Board::new((9, 9));
        let plan = plan_next(&board, &BallColor::PALETTE, 3, &mut rng());

        let filled = materialize(&mut board, &plan, &mut rng());

        assert_eq!(filled.len(), 3);
        for (hint, &coords) in plan.hints.iter().zip(filled.iter()) {
            assert_eq!(coords, hint.coords);
            assert_eq!(board.get(coords), Ok(Some(hint.color)));
        }
    }

    #[test]
    fn occupied_target_is_redirected_to_a_fresh_empty_cell() {
        let mut board = Board::new((3, 3));
        for coords in board.empty_cells() {
            board.set(coords, Some(BallColor::Red)).unwrap();
        }
        board.set((2, 2), None).unwrap();
        let plan = SpawnPlan {
            colors: smallvec![BallColor::Cyan],
            hints: smallvec![SpawnHint {
                coords: (0, 0),
                color: BallColor::Cyan,
            }],
        };

        let filled = materialize(&mut board, &plan, &mut rng());

        assert_eq!(filled.as_slice(), [(2, 2)]);
        assert_eq!(board.get((2, 2)), Ok(Some(BallColor::Cyan)));
        assert_eq!(board.get((0, 0)), Ok(Some(BallColor::Red)));
    }

    #[test]
    fn hint_without_any_empty_cell_is_skipped() {
        let mut board = Board::new((2, 2));
        for coords in board.empty_cells() {
            board.set(coords, Some(BallColor::Red)).unwrap();
        }
        let plan = SpawnPlan {
            colors: smallvec![BallColor::Cyan],
            hints: smallvec![SpawnHint {
                coords: (0, 0),
                color: BallColor::Cyan,
            }],
        };

        let filled = materialize(&mut board, &plan, &mut rng());

        assert!(filled.is_empty());
        assert_eq!(board.get((0, 0)), Ok(Some(BallColor::Red)));
    }

    #[test]
    fn scatter_is_capped_by_the_empty_cell_count() {
        let mut board = Board::new((2, 2));
        board.set((0, 0), Some(BallColor::Red)).unwrap();

        let filled = scatter(&mut board, &BallColor::PALETTE, 10, &mut rng());

        assert_eq!(filled.len(), 3);
        assert!(board.is_full());
    }

    #[test]
    fn scatter_places_on_previously_empty_cells_only() {
        let mut board = Board::new((9, 9));
        board.set((4, 4), Some(BallColor::Red)).unwrap();

        let filled = scatter(&mut board, &BallColor::PALETTE, 5, &mut rng());

        assert_eq!(filled.len(), 5);
        assert!(!filled.contains(&(4, 4)));
        assert_eq!(board.empty_cells().len(), 81 - 6);
    }
}
