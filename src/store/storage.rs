use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::types::{Discipline, StoreState, Team, TestRecord};
use super::EntityStore;
use crate::error::DomainResult;

/// Get the default store file path (~/.config/podium/store.json)
pub fn get_data_path() -> PathBuf {
    crate::config::get_config_dir().join("store.json")
}

/// Load store state from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_state(path: &Path) -> Result<StoreState> {
    if !path.exists() {
        return Ok(StoreState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open store file at {}", path.display()))?;

    let state: StoreState = serde_json::from_reader(file).context("Failed to load store state")?;

    // Version check
    if state.version != 1 {
        anyhow::bail!("Unsupported store version: {}", state.version);
    }

    Ok(state)
}

/// Save store state to a JSON file atomically
///
/// Uses atomic-write-file so the file is never left in a corrupted state.
/// Creates the parent directory if it doesn't exist.
pub fn save_state(path: &Path, state: &StoreState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize store state")?;

    file.commit().context("Failed to save store state")?;

    Ok(())
}

/// File-backed entity store. State is loaded once at open and written back
/// atomically after every successful mutation; mutations run on a scratch
/// copy, so neither memory nor disk ever holds a half-applied write.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: StoreState,
}

impl JsonStore {
    /// Open a store at the given path, creating an empty one if absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = load_state(&path)?;
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut StoreState) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut next = self.state.clone();
        let out = op(&mut next)?;
        save_state(&self.path, &next)?;
        self.state = next;
        Ok(out)
    }
}

impl EntityStore for JsonStore {
    fn lambda(&self) -> f64 {
        self.state.lambda()
    }

    fn set_lambda(&mut self, value: f64) -> DomainResult<f64> {
        self.mutate(|s| s.set_lambda(value))
    }

    fn create_team(&mut self, name: &str) -> DomainResult<Team> {
        self.mutate(|s| s.create_team(name))
    }

    fn delete_team(&mut self, id: u64) -> DomainResult<Team> {
        self.mutate(|s| s.delete_team(id))
    }

    fn create_discipline(&mut self, name: &str) -> DomainResult<Discipline> {
        self.mutate(|s| s.create_discipline(name))
    }

    fn rename_discipline(&mut self, id: u64, name: &str) -> DomainResult<Discipline> {
        self.mutate(|s| s.rename_discipline(id, name))
    }

    fn delete_discipline(&mut self, id: u64) -> DomainResult<Discipline> {
        self.mutate(|s| s.delete_discipline(id))
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
        self.mutate(|s| s.create_test(team_id, discipline_id, score, test_date))
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
