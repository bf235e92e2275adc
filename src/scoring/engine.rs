use chrono::NaiveDate;

use crate::store::types::TestRecord;

/// One test's contribution to a weighted score
#[derive(Debug, Clone)]
pub struct TestContribution {
    pub test_id: u64,
    pub test_date: NaiveDate,
    pub score: f64,
    /// Decay weight applied to this test's raw score
    pub weight: f64,
    /// weight * score
    pub weighted: f64,
}

#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: Vec<TestContribution>,
}

/// Calculate a team's time-decayed weighted score.
///
/// Each test is weighted by `lambda ^ (age_in_days / 7)` relative to `today`
/// and the weighted sum is normalized by `(1 - lambda)`, so with a weekly
/// test cadence the result stays on a comparable scale to raw scores.
/// Future-dated tests get weights above 1 rather than being clamped.
///
/// `lambda` is the current global value; the per-test `lambda_value`
/// snapshot is audit data and plays no part here.
pub fn weighted_score(tests: &[TestRecord], lambda: f64, today: NaiveDate) -> ScoreResult {
    if tests.is_empty() {
        return ScoreResult {
            score: 0.0,
            breakdown: Vec::new(),
        };
    }

    // Re-sort by date so the breakdown is deterministic for any input order
    let mut ordered: Vec<&TestRecord> = tests.iter().collect();
    ordered.sort_by_key(|t| t.test_date);

    let mut weighted_sum = 0.0;
    let mut breakdown = Vec::with_capacity(ordered.len());

    for test in ordered {
        let days = (today - test.test_date).num_days() as f64;
        let exponent = days / 7.0;
        let weight = lambda.powf(exponent);
        let weighted = weight * test.score;
        weighted_sum += weighted;

        breakdown.push(TestContribution {
            test_id: test.id,
            test_date: test.test_date,
            score: test.score,
            weight,
            weighted,
        });
    }

    let normalizer = 1.0 - lambda;
    ScoreResult {
        score: normalizer * weighted_sum,
        breakdown,
    }
}
