use chrono::NaiveDate;

use crate::error::DomainResult;
use crate::scoring::weighted_score;
use crate::store::types::Team;
use crate::store::EntityStore;

/// A team's place in the current rankings
#[derive(Debug, Clone)]
pub struct RankedTeam {
    pub team: Team,
    pub weighted_score: f64,
    pub test_count: usize,
    /// 1-based position after sorting. Dense: equal scores still get
    /// consecutive distinct positions, never a shared rank.
    pub position: usize,
}

/// Rank every team in the store by time-decayed weighted score.
///
/// Sort key is weighted score descending; ties break by team name ascending
/// so repeated calls over the same data produce identical output.
pub fn rank_teams(store: &dyn EntityStore, today: NaiveDate) -> DomainResult<Vec<RankedTeam>> {
    let lambda = store.lambda();

    let mut ranked: Vec<RankedTeam> = Vec::new();
    for team in store.list_teams() {
        let tests = store.list_tests_for_team(team.id)?;
        let result = weighted_score(&tests, lambda, today);
        ranked.push(RankedTeam {
            team,
            weighted_score: result.score,
            test_count: tests.len(),
            position: 0,
        });
    }

    ranked.sort_by(|a, b| {
        let score_cmp = b
            .weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal);
        if score_cmp != std::cmp::Ordering::Equal {
            return score_cmp;
        }
        a.team.name.cmp(&b.team.name)
    });

    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.position = i + 1;
    }

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn store_with_teams(names: &[&str]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for name in names {
            store.create_team(name).unwrap();
        }
        store
    }

    #[test]
    fn test_rank_empty_store() {
        let store = MemoryStore::new();
        assert!(rank_teams(&store, today()).unwrap().is_empty());
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let mut store = store_with_teams(&["Alpha", "Bravo"]);
        store.set_lambda(0.9).unwrap();
        store.create_test(1, None, 50.0, today()).unwrap();
        store.create_test(2, None, 90.0, today()).unwrap();

        let ranked = rank_teams(&store, today()).unwrap();
        assert_eq!(ranked[0].team.name, "Bravo");
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[1].team.name, "Alpha");
        assert_eq!(ranked[1].position, 2);
    }

    #[test]
    fn test_teams_without_tests_score_zero() {
        let store = store_with_teams(&["Alpha"]);
        let ranked = rank_teams(&store, today()).unwrap();
        assert_eq!(ranked[0].weighted_score, 0.0);
        assert_eq!(ranked[0].test_count, 0);
        assert_eq!(ranked[0].position, 1);
    }

    #[test]
    fn test_tie_breaks_by_name_ascending() {
        let mut store = store_with_teams(&["Charlie", "Alpha", "Bravo"]);
        store.set_lambda(0.9).unwrap();
        for id in [1, 2, 3] {
            store.create_test(id, None, 80.0, today()).unwrap();
        }

        let ranked = rank_teams(&store, today()).unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.team.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn test_dense_positions_for_equal_scores() {
        let mut store = store_with_teams(&["Alpha", "Bravo"]);
        store.create_test(1, None, 80.0, today()).unwrap();
        store.create_test(2, None, 80.0, today()).unwrap();

        let ranked = rank_teams(&store, today()).unwrap();
        // No shared ranks: 1 then 2, not 1 and 1
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[1].position, 2);
    }

    #[test]
    fn test_rank_is_idempotent_without_writes() {
        let mut store = store_with_teams(&["Alpha", "Bravo"]);
        store.set_lambda(0.8).unwrap();
        store
            .create_test(1, None, 80.0, today() - Duration::days(7))
            .unwrap();
        store.create_test(2, None, 75.0, today()).unwrap();

        let first = rank_teams(&store, today()).unwrap();
        let second = rank_teams(&store, today()).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.team.id, b.team.id);
            assert_eq!(a.weighted_score, b.weighted_score);
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Team Alpha, lambda 0.9, tests {80, 14 days ago} and {90, today}
        // expects 0.1 * (0.9^2 * 80 + 90) = 15.48
        let mut store = store_with_teams(&["Alpha"]);
        store.set_lambda(0.9).unwrap();
        store
            .create_test(1, None, 80.0, today() - Duration::days(14))
            .unwrap();
        store.create_test(1, None, 90.0, today()).unwrap();

        let ranked = rank_teams(&store, today()).unwrap();
        assert_eq!(ranked[0].test_count, 2);
        assert!((ranked[0].weighted_score - 15.48).abs() < 1e-9);
    }
}
