use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::ranking::RankedTeam;
use crate::scoring::TestContribution;
use crate::store::types::{Discipline, Team, TestRecord};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a weighted score for display
/// Compact notation above 1k (1.5k, 2.3M), two decimals below
pub fn format_score(score: f64) -> String {
    let formatted = if score >= 1_000_000.0 {
        format!("{:.1}M", score / 1_000_000.0)
    } else if score >= 1_000.0 {
        format!("{:.1}k", score / 1_000.0)
    } else {
        format!("{:.2}", score)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

/// Format rankings as a table with columns: Position, Score, Name, Tests
/// No headers (minimal format); position and score right-aligned
pub fn format_rankings_table(ranked: &[RankedTeam], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No teams found.".to_string();
    }

    let term_width = get_terminal_width();
    let score_width = 8;
    let separator = "  ";

    ranked
        .iter()
        .map(|entry| {
            let position_str = format!("{:>2}.", entry.position);
            let score_padded = format!(
                "{:>width$}",
                format_score(entry.weighted_score),
                width = score_width
            );
            let tests_str = format!(
                "({} {})",
                entry.test_count,
                if entry.test_count == 1 { "test" } else { "tests" }
            );

            let fixed_width = 3 + 1 + score_width + separator.len() * 2 + tests_str.len();
            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&entry.team.name, width - fixed_width)
                } else {
                    truncate_name(&entry.team.name, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                entry.team.name.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    position_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    tests_str.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    position_str, score_padded, separator, name, separator, tests_str
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format per-test contributions for verbose ranking output, one line each
pub fn format_contributions(breakdown: &[TestContribution], use_colors: bool) -> String {
    breakdown
        .iter()
        .map(|c| {
            let line = format!(
                "  {}  score {:>6.1}  weight {:.4}  -> {:.2}",
                c.test_date, c.score, c.weight, c.weighted
            );
            if use_colors {
                line.dimmed().to_string()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format teams one per line: "{id}. {name} (since {date})"
pub fn format_team_list(teams: &[Team], use_colors: bool) -> String {
    if teams.is_empty() {
        return "No teams found.".to_string();
    }

    teams
        .iter()
        .map(|team| {
            let id_str = format!("{:>3}.", team.id);
            let since_str = format!("(since {})", team.created_at.date_naive());
            if use_colors {
                format!(
                    "{} {} {}",
                    id_str.dimmed(),
                    team.name.bold(),
                    since_str.dimmed()
                )
            } else {
                format!("{} {} {}", id_str, team.name, since_str)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format disciplines one per line, same shape as the team list
pub fn format_discipline_list(disciplines: &[Discipline], use_colors: bool) -> String {
    if disciplines.is_empty() {
        return "No disciplines found.".to_string();
    }

    disciplines
        .iter()
        .map(|d| {
            let id_str = format!("{:>3}.", d.id);
            if use_colors {
                format!("{} {}", id_str.dimmed(), d.name.bold())
            } else {
                format!("{} {}", id_str, d.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a team's test history, one line per test:
/// "{date}  score {score}  (lambda {snapshot})"
pub fn format_test_list(tests: &[TestRecord], use_colors: bool) -> String {
    if tests.is_empty() {
        return "No tests recorded.".to_string();
    }

    tests
        .iter()
        .map(|test| {
            let score_str = format!("{:>6.1}", test.score);
            let lambda_str = format!("(lambda {})", test.lambda_value);
            if use_colors {
                format!(
                    "{}  score {}  {}",
                    test.test_date,
                    score_str.bold(),
                    lambda_str.dimmed()
                )
            } else {
                format!("{}  score {}  {}", test.test_date, score_str, lambda_str)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}
