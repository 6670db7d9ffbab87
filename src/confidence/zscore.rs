//! Statistical separation of the best score from its competitors.

use crate::util::math::mean_std;

/// Standard deviations below which scores are treated as identical.
const MIN_STDDEV: f64 = 0.001;

/// Returns how many standard deviations `best` lies below the mean of `scores`.
///
/// Scores are dissimilarities, so larger values mean a clearer winner. Fewer
/// than two scores, or scores that are all (nearly) equal, yield `0`.
pub fn z_score(best: f64, scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let Some((mean, std)) = mean_std(scores) else {
        return 0.0;
    };
    if std < MIN_STDDEV {
        return 0.0;
    }
    (mean - best) / std
}

#[cfg(test)]
mod tests {
    use super::z_score;

    #[test]
    fn separated_winner_scores_high() {
        let scores = [2.0, 10.0, 10.0, 10.0];
        let z = z_score(2.0, &scores);
        // mean 8, std sqrt(12)
        assert!((z - 6.0 / 12.0f64.sqrt()).abs() < 1e-12);
    }
}
