use chrono::NaiveDate;

use super::types::{Discipline, StoreState, Team, TestRecord};
use super::EntityStore;
use crate::error::DomainResult;

/// In-memory entity store. Nothing survives the process; useful for tests
/// and for embedding callers that handle persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: StoreState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: StoreState::new(),
        }
    }

    /// Access the underlying state (for snapshotting or persistence)
    pub fn state(&self) -> &StoreState {
        &self.state
    }
}

impl From<StoreState> for MemoryStore {
    fn from(state: StoreState) -> Self {
        Self { state }
    }
}

impl EntityStore for MemoryStore {
    fn lambda(&self) -> f64 {
        self.state.lambda()
    }

    fn set_lambda(&mut self, value: f64) -> DomainResult<f64> {
        self.state.set_lambda(value)
    }

    fn create_team(&mut self, name: &str) -> DomainResult<Team> {
        self.state.create_team(name)
    }

    fn delete_team(&mut self, id: u64) -> DomainResult<Team> {
        self.state.delete_team(id)
    }

    fn create_discipline(&mut self, name: &str) -> DomainResult<Discipline> {
        self.state.create_discipline(name)
    }

    fn rename_discipline(&mut self, id: u64, name: &str) -> DomainResult<Discipline> {
        self.state.rename_discipline(id, name)
    }

    fn delete_discipline(&mut self, id: u64) -> DomainResult<Discipline> {
        self.state.delete_discipline(id)
    }

    fn discipline_test_count(&self, id: u64) -> DomainResult<usize> {
        self.state.discipline_test_count(id)
    }

    fn create_test(
        &mut self,
        team_id: u64,
        discipline_id: Option<u64>,
        score: f64,
        test_date: NaiveDate,
    ) -> DomainResult<TestRecord> {
        self.state.create_test(team_id, discipline_id, score, test_date)
    }

    fn list_teams(&self) -> Vec<Team> {
        self.state.list_teams()
    }

    fn list_disciplines(&self) -> Vec<Discipline> {
        self.state.list_disciplines()
    }

    fn list_tests_for_team(&self, team_id: u64) -> DomainResult<Vec<TestRecord>> {
        self.state.list_tests_for_team(team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        let team = store.create_team("Alpha").unwrap();
        store
            .create_test(team.id, None, 80.0, "2025-01-01".parse().unwrap())
            .unwrap();

        assert_eq!(store.list_teams().len(), 1);
        assert_eq!(store.list_tests_for_team(team.id).unwrap().len(), 1);
    }

    #[test]
    fn test_from_state_preserves_contents() {
        let mut state = StoreState::new();
        state.create_team("Alpha").unwrap();
        state.set_lambda(0.9).unwrap();

        let store = MemoryStore::from(state);
        assert_eq!(store.lambda(), 0.9);
        assert_eq!(store.list_teams()[0].name, "Alpha");
    }
}
