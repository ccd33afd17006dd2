//! Battle system constants - fixed board geometry and deployment layout
//!
//! Tunable combat numbers live in `CombatConfig`; these never change.

/// Board edge length in cells
pub const BOARD_SIZE: usize = 8;

/// Edge length of the generated terrain quadrant
pub const QUADRANT_SIZE: usize = BOARD_SIZE / 2;

/// Maximum number of equipped skills per participant
pub const MAX_EQUIPPED_SKILLS: usize = 4;

/// Percentage rolls are drawn uniformly from `0..ROLL_SCALE`
pub const ROLL_SCALE: i32 = 100;

/// Home rows for side A, filled in order (bottom of the board)
pub const SIDE_A_ROWS: [i32; 2] = [7, 6];

/// Home rows for side B, filled in order (top of the board)
pub const SIDE_B_ROWS: [i32; 2] = [0, 1];

/// Column fill order inside a home row, centre-out
pub const DEPLOYMENT_COLUMNS: [i32; 8] = [3, 4, 2, 5, 1, 6, 0, 7];

/// Participants a side can deploy
pub const DEPLOYMENT_CAPACITY: usize = SIDE_A_ROWS.len() * DEPLOYMENT_COLUMNS.len();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_rows_do_not_overlap() {
        for row in SIDE_A_ROWS {
            assert!(!SIDE_B_ROWS.contains(&row));
        }
    }

    #[test]
    fn test_deployment_columns_cover_board() {
        let mut columns = DEPLOYMENT_COLUMNS;
        columns.sort_unstable();
        assert_eq!(columns, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_quadrant_is_half_board() {
        assert_eq!(QUADRANT_SIZE * 2, BOARD_SIZE);
    }
}
