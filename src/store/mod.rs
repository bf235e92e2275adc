pub mod memory;
pub mod storage;
pub mod types;

pub use memory::MemoryStore;
pub use storage::{get_data_path, load_state, save_state, JsonStore};
pub use types::{Discipline, StoreState, Team, TestRecord, DEFAULT_LAMBDA, LAMBDA_MAX, LAMBDA_MIN};

use chrono::NaiveDate;

use crate::error::DomainResult;

/// Storage seam for the entity model. Scoring and ranking only ever see this
/// trait, so a durable backend and the in-memory one are interchangeable.
///
/// Mutations take `&mut self`; the exclusive borrow serializes writers, and
/// every implementation keeps multi-step mutations all-or-nothing.
pub trait EntityStore {
    /// Current global decay parameter (default 0.95 if never set)
    fn lambda(&self) -> f64;

    /// Replace the global decay parameter, last write wins
    fn set_lambda(&mut self, value: f64) -> DomainResult<f64>;

    fn create_team(&mut self, name: &str) -> DomainResult<Team>;

    /// Delete a team and, atomically, every test it owns
    fn delete_team(&mut self, id: u64) -> DomainResult<Team>;

    fn create_discipline(&mut self, name: &str) -> DomainResult<Discipline>;

    fn rename_discipline(&mut self, id: u64, name: &str) -> DomainResult<Discipline>;

    /// Delete a discipline; refused while any test references it
    fn delete_discipline(&mut self, id: u64) -> DomainResult<Discipline>;

    fn discipline_test_count(&self, id: u64) -> DomainResult<usize>;

    /// Record a test, snapshotting the current lambda into the record
    fn create_test(
        &mut self,
        team_id: u64,
        discipline_id: Option<u64>,
        score: f64,
        test_date: NaiveDate,
    ) -> DomainResult<TestRecord>;

    /// All teams, ordered by name ascending
    fn list_teams(&self) -> Vec<Team>;

    /// All disciplines, ordered by name ascending
    fn list_disciplines(&self) -> Vec<Discipline>;

    /// A team's tests, ordered by test date ascending
    fn list_tests_for_team(&self, team_id: u64) -> DomainResult<Vec<TestRecord>>;
}
