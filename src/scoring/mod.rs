pub mod engine;

pub use engine::{weighted_score, ScoreResult, TestContribution};
