use super::config::{MedianField, PScoreParams};
use crate::score::ScoreType;

/// Finishers the median is taken over, from a field ranked best first.
///
/// `TopHalf` keeps the better `ceil(n / 2)` finishers, `All` keeps everyone.
pub fn select_median_population(ranked: &[i64], field: MedianField) -> &[i64] {
    match field {
        MedianField::TopHalf => &ranked[..ranked.len().div_ceil(2)],
        MedianField::All => ranked,
    }
}

/// Population-relative points curve fitted to one event's finishers.
///
/// The best performance scores 100 and the reference median scores 50;
/// everything else moves linearly with its distance from the best.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PScoreCurve {
    best: i64,
    score_type: ScoreType,
    /// Distance from the best that is worth 50 points
    spread: f64,
}

impl PScoreCurve {
    /// Fit to the raw finisher values (any order). `None` without finishers.
    pub fn fit(values: &[i64], score_type: ScoreType, field: MedianField) -> Option<Self> {
        let mut ranked = values.to_vec();
        match score_type {
            ScoreType::Min => ranked.sort_unstable(),
            ScoreType::Max => ranked.sort_unstable_by(|a, b| b.cmp(a)),
        }
        let best = *ranked.first()?;
        let worst = *ranked.last()?;

        let population = select_median_population(&ranked, field);
        let median = match field {
            MedianField::TopHalf => population.last().map(|v| *v as f64)?,
            MedianField::All => statistical_median(population)?,
        };

        let mut curve = Self {
            best,
            score_type,
            spread: 0.0,
        };
        curve.spread = curve.distance(median);
        // Median tied with the best: anchor 50 points on the worst finisher instead
        if curve.spread <= 0.0 {
            curve.spread = curve.distance(worst as f64);
        }
        Some(curve)
    }

    pub fn points(&self, value: i64, params: &PScoreParams) -> f64 {
        let distance = self.distance(value as f64);
        let raw = if self.spread > 0.0 {
            100.0 - distance * 50.0 / self.spread
        } else if distance <= 0.0 {
            100.0
        } else {
            0.0
        };
        let rounded = round_points(raw);
        if params.allow_negatives {
            rounded
        } else {
            rounded.max(0.0)
        }
    }

    fn distance(&self, value: f64) -> f64 {
        match self.score_type {
            ScoreType::Min => value - self.best as f64,
            ScoreType::Max => self.best as f64 - value,
        }
    }
}

/// Round to 2 decimal places.
pub fn round_points(points: f64) -> f64 {
    (points * 100.0).round() / 100.0
}

fn statistical_median(sorted: &[i64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2] as f64)
    } else {
        Some((sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(allow_negatives: bool, median_field: MedianField) -> PScoreParams {
        PScoreParams {
            allow_negatives,
            median_field,
        }
    }

    fn score_all(values: &[i64], score_type: ScoreType, params: &PScoreParams) -> Vec<f64> {
        let curve = PScoreCurve::fit(values, score_type, params.median_field).unwrap();
        values.iter().map(|v| curve.points(*v, params)).collect()
    }

    #[test]
    fn test_select_top_half() {
        assert_eq!(select_median_population(&[1, 2, 3, 4], MedianField::TopHalf), &[1, 2]);
        assert_eq!(select_median_population(&[1, 2, 3, 4, 5], MedianField::TopHalf), &[1, 2, 3]);
        assert_eq!(select_median_population(&[1, 2, 3, 4], MedianField::All), &[1, 2, 3, 4]);
        assert!(select_median_population(&[], MedianField::TopHalf).is_empty());
    }

    #[test]
    fn test_time_top_half() {
        let p = params(true, MedianField::TopHalf);
        let points = score_all(&[100_000, 200_000, 300_000, 400_000], ScoreType::Min, &p);
        assert_eq!(points, vec![100.0, 50.0, 0.0, -50.0]);
    }

    #[test]
    fn test_six_athletes_top_half_boundary() {
        let p = params(true, MedianField::TopHalf);
        let points = score_all(&[10, 20, 30, 40, 50, 60], ScoreType::Min, &p);
        assert_eq!(points[2], 50.0);
        assert_eq!(points[1], 75.0);
    }

    #[test]
    fn test_reps_top_half() {
        let p = params(true, MedianField::TopHalf);
        let points = score_all(&[50, 40, 30], ScoreType::Max, &p);
        assert_eq!(points, vec![100.0, 50.0, 0.0]);
    }

    #[test]
    fn test_all_field_median_rounded() {
        let p = params(true, MedianField::All);
        let points = score_all(&[100, 200, 300, 400], ScoreType::Min, &p);
        assert_eq!(points, vec![100.0, 66.67, 33.33, 0.0]);
    }

    #[test]
    fn test_no_negatives_clamps() {
        let p = params(false, MedianField::TopHalf);
        let points = score_all(&[100, 200, 300, 400], ScoreType::Min, &p);
        assert_eq!(points, vec![100.0, 50.0, 0.0, 0.0]);
        assert!(points.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn test_better_than_median_above_fifty() {
        let p = params(true, MedianField::All);
        let values = [300, 310, 320, 400, 500];
        let curve = PScoreCurve::fit(&values, ScoreType::Min, p.median_field).unwrap();
        assert_eq!(curve.points(320, &p), 50.0);
        assert!(curve.points(319, &p) > 50.0);
        assert!(curve.points(321, &p) < 50.0);
    }

    #[test]
    fn test_ties_with_best_share_hundred() {
        let p = params(true, MedianField::TopHalf);
        let points = score_all(&[100, 100, 200, 300], ScoreType::Min, &p);
        assert_eq!(points[0], 100.0);
        assert_eq!(points[1], 100.0);
        assert_eq!(points[3], 50.0);
    }

    #[test]
    fn test_single_athlete() {
        let p = params(true, MedianField::TopHalf);
        assert_eq!(score_all(&[42], ScoreType::Max, &p), vec![100.0]);
    }

    #[test]
    fn test_everyone_tied() {
        let p = params(true, MedianField::All);
        let curve = PScoreCurve::fit(&[7, 7, 7], ScoreType::Max, p.median_field).unwrap();
        assert_eq!(curve.points(7, &p), 100.0);
        assert_eq!(curve.points(6, &p), 0.0);
    }

    #[test]
    fn test_empty_field() {
        assert!(PScoreCurve::fit(&[], ScoreType::Min, MedianField::All).is_none());
    }

    #[test]
    fn test_unsorted_input() {
        let p = params(true, MedianField::TopHalf);
        let points = score_all(&[300, 100, 400, 200], ScoreType::Min, &p);
        assert_eq!(points, vec![0.0, 100.0, -50.0, 50.0]);
    }
}
