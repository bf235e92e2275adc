use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Decay parameter used when no explicit value has ever been set.
pub const DEFAULT_LAMBDA: f64 = 0.95;

/// Inclusive bounds accepted for the global decay parameter.
pub const LAMBDA_MIN: f64 = 0.1;
pub const LAMBDA_MAX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discipline {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A single scored observation. Append-only: once recorded it is never
/// mutated, only removed as part of a team cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: u64,
    pub team_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline_id: Option<u64>,
    pub score: f64,
    pub test_date: NaiveDate,
    /// Snapshot of the global lambda at insertion time. Audit/display only;
    /// scoring always uses the current global value.
    pub lambda_value: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub version: u32,
    #[serde(default = "default_lambda")]
    pub global_lambda: f64,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
    #[serde(default)]
    pub tests: Vec<TestRecord>,
    #[serde(default = "first_id")]
    pub next_team_id: u64,
    #[serde(default = "first_id")]
    pub next_discipline_id: u64,
    #[serde(default = "first_id")]
    pub next_test_id: u64,
}

fn default_lambda() -> f64 {
    DEFAULT_LAMBDA
}

fn first_id() -> u64 {
    1
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    /// Create a new empty state with version 1 and the default lambda
    pub fn new() -> Self {
        Self {
            version: 1,
            global_lambda: DEFAULT_LAMBDA,
            teams: Vec::new(),
            disciplines: Vec::new(),
            tests: Vec::new(),
            next_team_id: 1,
            next_discipline_id: 1,
            next_test_id: 1,
        }
    }

    /// Current global decay parameter
    pub fn lambda(&self) -> f64 {
        self.global_lambda
    }

    /// Replace the global decay parameter (last write wins).
    /// Future test creations snapshot the new value.
    pub fn set_lambda(&mut self, value: f64) -> DomainResult<f64> {
        if !(LAMBDA_MIN..=LAMBDA_MAX).contains(&value) {
            return Err(DomainError::validation(
                "Lambda must be between 0.1 and 1.0",
            ));
        }
        self.global_lambda = value;
        Ok(value)
    }

    pub fn create_team(&mut self, name: &str) -> DomainResult<Team> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Team name is required"));
        }
        if self.teams.iter().any(|t| t.name == name) {
            return Err(DomainError::conflict("Team name already exists"));
        }

        let team = Team {
            id: self.next_team_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.next_team_id += 1;
        self.teams.push(team.clone());
        Ok(team)
    }

    /// Delete a team and every test it owns. Returns the removed team.
    pub fn delete_team(&mut self, id: u64) -> DomainResult<Team> {
        let pos = self
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DomainError::not_found("Team not found"))?;

        let team = self.teams.remove(pos);
        self.tests.retain(|t| t.team_id != id);
        Ok(team)
    }

    pub fn create_discipline(&mut self, name: &str) -> DomainResult<Discipline> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Discipline name is required"));
        }
        if self.disciplines.iter().any(|d| d.name == name) {
            return Err(DomainError::conflict("Discipline name already exists"));
        }

        let discipline = Discipline {
            id: self.next_discipline_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.next_discipline_id += 1;
        self.disciplines.push(discipline.clone());
        Ok(discipline)
    }

    pub fn rename_discipline(&mut self, id: u64, name: &str) -> DomainResult<Discipline> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Discipline name is required"));
        }
        let pos = self
            .disciplines
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DomainError::not_found("Discipline not found"))?;
        if self.disciplines.iter().any(|d| d.name == name && d.id != id) {
            return Err(DomainError::conflict("Discipline name already exists"));
        }

        self.disciplines[pos].name = name.to_string();
        Ok(self.disciplines[pos].clone())
    }

    /// Delete a discipline. Refused while any test references it; the
    /// referential guard is deliberately asymmetric from the team cascade.
    pub fn delete_discipline(&mut self, id: u64) -> DomainResult<Discipline> {
        let pos = self
            .disciplines
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DomainError::not_found("Discipline not found"))?;

        if self.tests.iter().any(|t| t.discipline_id == Some(id)) {
            return Err(DomainError::conflict(
                "Cannot delete discipline with associated tests",
            ));
        }
        Ok(self.disciplines.remove(pos))
    }

    pub fn discipline_test_count(&self, id: u64) -> DomainResult<usize> {
        if !self.disciplines.iter().any(|d| d.id == id) {
            return Err(DomainError::not_found("Discipline not found"));
        }
        Ok(self
            .tests
            .iter()
            .filter(|t| t.discipline_id == Some(id))
            .count())
    }

    /// Record a test score. Snapshots the current global lambda into the
    /// record. Validate-first: a failed call leaves the state untouched.
    pub fn create_test(
        &mut self,
        team_id: u64,
        discipline_id: Option<u64>,
        score: f64,
        test_date: NaiveDate,
    ) -> DomainResult<TestRecord> {
        if score < 0.0 {
            return Err(DomainError::validation("Score must be non-negative"));
        }
        if !self.teams.iter().any(|t| t.id == team_id) {
            return Err(DomainError::not_found("Team not found"));
        }
        if let Some(did) = discipline_id {
            if !self.disciplines.iter().any(|d| d.id == did) {
                return Err(DomainError::not_found("Discipline not found"));
            }
        }
        // At most one test per (team, discipline, date) tuple
        if self.tests.iter().any(|t| {
            t.team_id == team_id && t.discipline_id == discipline_id && t.test_date == test_date
        }) {
            return Err(DomainError::conflict(
                "Test already recorded for this team, discipline and date",
            ));
        }

        let test = TestRecord {
            id: self.next_test_id,
            team_id,
            discipline_id,
            score,
            test_date,
            lambda_value: self.global_lambda,
            created_at: Utc::now(),
        };
        self.next_test_id += 1;
        self.tests.push(test.clone());
        Ok(test)
    }

    /// All teams, ordered by name ascending
    pub fn list_teams(&self) -> Vec<Team> {
        let mut teams = self.teams.clone();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }

    /// All disciplines, ordered by name ascending
    pub fn list_disciplines(&self) -> Vec<Discipline> {
        let mut disciplines = self.disciplines.clone();
        disciplines.sort_by(|a, b| a.name.cmp(&b.name));
        disciplines
    }

    /// A team's tests, ordered by test date ascending
    pub fn list_tests_for_team(&self, team_id: u64) -> DomainResult<Vec<TestRecord>> {
        if !self.teams.iter().any(|t| t.id == team_id) {
            return Err(DomainError::not_found("Team not found"));
        }
        let mut tests: Vec<TestRecord> = self
            .tests
            .iter()
            .filter(|t| t.team_id == team_id)
            .cloned()
            .collect();
        tests.sort_by_key(|t| t.test_date);
        Ok(tests)
    }
}
