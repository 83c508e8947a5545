use super::config::{BaseTemplate, TraditionalParams};

/// Front-loaded winner-takes-more table, 1st place first. Positions past the end score 0.
pub const WINNER_TAKES_MORE_POINTS: [i64; 30] = [
    100, 85, 75, 67, 60, 54, 49, 45, 41, 38, 35, 32, 30, 28, 26, 24, 22, 20, 18, 16, 14, 12, 10,
    8, 6, 5, 4, 3, 2, 1,
];

/// Build a finishing-position table (index 0 = 1st place) of `field_size_hint` entries.
///
/// `params` only applies to the traditional template; defaults are used when absent.
pub fn generate_points_table(
    template: BaseTemplate,
    field_size_hint: usize,
    params: Option<&TraditionalParams>,
) -> Vec<i64> {
    let params = params.copied().unwrap_or_default();
    (1..=field_size_hint as u32)
        .map(|position| match template {
            BaseTemplate::Traditional => traditional_points(position, &params),
            BaseTemplate::WinnerTakesMore => winner_takes_more_points(position),
        })
        .collect()
}

/// `first_place_points - (position - 1) * step`, floored at 0.
pub fn traditional_points(position: u32, params: &TraditionalParams) -> i64 {
    if position == 0 {
        return 0;
    }
    let drop = params.step.saturating_mul(i64::from(position - 1));
    params.first_place_points.saturating_sub(drop).max(0)
}

pub fn winner_takes_more_points(position: u32) -> i64 {
    match position {
        0 => 0,
        p => WINNER_TAKES_MORE_POINTS
            .get(p as usize - 1)
            .copied()
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traditional_table() {
        let params = TraditionalParams {
            first_place_points: 100,
            step: 5,
        };
        let table = generate_points_table(BaseTemplate::Traditional, 100, Some(&params));
        assert_eq!(table.len(), 100);
        assert_eq!(&table[0..4], &[100, 95, 90, 85]);
    }

    #[test]
    fn test_traditional_floors_at_zero() {
        let table = generate_points_table(BaseTemplate::Traditional, 25, None);
        assert_eq!(table[20], 0);
        assert_eq!(table[24], 0);
    }

    #[test]
    fn test_traditional_monotonic() {
        let params = TraditionalParams {
            first_place_points: 50,
            step: 3,
        };
        let table = generate_points_table(BaseTemplate::Traditional, 40, Some(&params));
        for pair in table.windows(2) {
            assert!(pair[0] >= pair[1]);
            assert!(pair[1] >= 0);
        }
    }

    #[test]
    fn test_traditional_zero_step_is_flat() {
        let params = TraditionalParams {
            first_place_points: 10,
            step: 0,
        };
        assert_eq!(
            generate_points_table(BaseTemplate::Traditional, 3, Some(&params)),
            vec![10, 10, 10]
        );
    }

    #[test]
    fn test_winner_takes_more_table() {
        let table = generate_points_table(BaseTemplate::WinnerTakesMore, 32, None);
        assert_eq!(&table[0..30], &WINNER_TAKES_MORE_POINTS);
        assert_eq!(table[30], 0);
        assert_eq!(table[31], 0);
        assert_eq!(&table[0..5], &[100, 85, 75, 67, 60]);
    }

    #[test]
    fn test_winner_takes_more_strictly_decreasing() {
        for pair in WINNER_TAKES_MORE_POINTS.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_empty_table() {
        assert!(generate_points_table(BaseTemplate::Traditional, 0, None).is_empty());
    }

    #[test]
    fn test_position_zero_scores_nothing() {
        assert_eq!(traditional_points(0, &TraditionalParams::default()), 0);
        assert_eq!(winner_takes_more_points(0), 0);
    }
}
