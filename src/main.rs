use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use podium::error::{DomainError, DomainResult};
use podium::ranking::rank_teams;
use podium::scoring::weighted_score;
use podium::store::{get_data_path, EntityStore, JsonStore};
use podium::{config, output};

// One exit code per domain error kind, plus storage/config failures
const EXIT_SUCCESS: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;
const EXIT_CONFLICT: i32 = 3;
const EXIT_STORAGE: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show team rankings by weighted score (default if no subcommand)
    Rankings,
    /// Manage teams
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },
    /// Manage disciplines
    Discipline {
        #[command(subcommand)]
        command: DisciplineCommands,
    },
    /// Record test scores
    Test {
        #[command(subcommand)]
        command: TestCommands,
    },
    /// Inspect or change the global decay parameter
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum TeamCommands {
    /// Create a team
    Add { name: String },
    /// Delete a team and all of its tests
    Rm { id: u64 },
    /// List teams by name
    List,
    /// Show a team's test history
    Tests { id: u64 },
}

#[derive(Subcommand, Debug)]
enum DisciplineCommands {
    /// Create a discipline
    Add { name: String },
    /// Rename a discipline
    Rename { id: u64, name: String },
    /// Delete a discipline (refused while tests reference it)
    Rm { id: u64 },
    /// List disciplines by name
    List,
    /// Show how many tests reference a discipline
    TestCount { id: u64 },
}

#[derive(Subcommand, Debug)]
enum TestCommands {
    /// Record a test score for a team
    Add {
        /// Team id the score belongs to
        #[arg(long)]
        team: u64,
        /// Discipline id, if the score belongs to a discipline
        #[arg(long)]
        discipline: Option<u64>,
        /// Score achieved (non-negative)
        #[arg(long)]
        score: f64,
        /// Test date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the current global lambda
    Get,
    /// Set the global lambda (0.1 to 1.0)
    Set { lambda: f64 },
}

#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(about = "Team test-score tracking and time-decayed rankings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to config file (defaults to ~/.config/podium/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the store file (overrides config)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Rankings);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let app_config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_STORAGE);
        }
    };

    let data_path = cli
        .data
        .or(app_config.data_path)
        .unwrap_or_else(get_data_path);

    if cli.verbose {
        eprintln!("Using store at {}", data_path.display());
    }

    let mut store = match JsonStore::open(&data_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Store error: {}", e);
            std::process::exit(EXIT_STORAGE);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} teams, {} disciplines (lambda {})",
            store.list_teams().len(),
            store.list_disciplines().len(),
            store.lambda()
        );
    }

    let use_colors = output::should_use_colors();
    match run(&mut store, command, cli.json, use_colors, cli.verbose) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            if cli.json {
                println!("{}", json!({ "error": e.to_string() }));
            } else {
                eprintln!("Error: {}", e);
            }
            std::process::exit(exit_code(&e));
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("domain types serialize")
    );
}

fn exit_code(err: &DomainError) -> i32 {
    match err {
        DomainError::Validation(_) => EXIT_VALIDATION,
        DomainError::NotFound(_) => EXIT_NOT_FOUND,
        DomainError::Conflict(_) => EXIT_CONFLICT,
        DomainError::Storage(_) => EXIT_STORAGE,
    }
}

fn run(
    store: &mut JsonStore,
    command: Commands,
    as_json: bool,
    use_colors: bool,
    verbose: bool,
) -> DomainResult<()> {
    match command {
        Commands::Rankings => {
            let today = Utc::now().date_naive();
            let ranked = rank_teams(store, today)?;

            if as_json {
                let payload: Vec<_> = ranked
                    .iter()
                    .map(|r| {
                        json!({
                            "id": r.team.id,
                            "name": r.team.name,
                            "weighted_score": r.weighted_score,
                            "test_count": r.test_count,
                            "position": r.position,
                        })
                    })
                    .collect();
                print_json(&payload);
            } else if verbose {
                let lambda = store.lambda();
                for entry in &ranked {
                    println!(
                        "{}. {} - {} ({} tests)",
                        entry.position,
                        entry.team.name,
                        output::format_score(entry.weighted_score),
                        entry.test_count
                    );
                    let tests = store.list_tests_for_team(entry.team.id)?;
                    let result = weighted_score(&tests, lambda, today);
                    if !result.breakdown.is_empty() {
                        println!("{}", output::format_contributions(&result.breakdown, use_colors));
                    }
                }
            } else {
                println!("{}", output::format_rankings_table(&ranked, use_colors));
            }
        }
        Commands::Team { command } => match command {
            TeamCommands::Add { name } => {
                let team = store.create_team(&name)?;
                if as_json {
                    print_json(&team);
                } else {
                    println!("Created team '{}' (id {})", team.name, team.id);
                }
            }
            TeamCommands::Rm { id } => {
                let team = store.delete_team(id)?;
                let message = format!("Team '{}' deleted successfully", team.name);
                if as_json {
                    println!("{}", json!({ "message": message }));
                } else {
                    println!("{}", message);
                }
            }
            TeamCommands::List => {
                let teams = store.list_teams();
                if as_json {
                    print_json(&teams);
                } else {
                    println!("{}", output::format_team_list(&teams, use_colors));
                }
            }
            TeamCommands::Tests { id } => {
                let team = store
                    .list_teams()
                    .into_iter()
                    .find(|t| t.id == id)
                    .ok_or_else(|| DomainError::not_found("Team not found"))?;
                let tests = store.list_tests_for_team(id)?;
                if as_json {
                    let payload = json!({ "team_name": team.name, "tests": tests });
                    print_json(&payload);
                } else {
                    println!("Tests for '{}':", team.name);
                    println!("{}", output::format_test_list(&tests, use_colors));
                }
            }
        },
        Commands::Discipline { command } => match command {
            DisciplineCommands::Add { name } => {
                let discipline = store.create_discipline(&name)?;
                if as_json {
                    print_json(&discipline);
                } else {
                    println!(
                        "Created discipline '{}' (id {})",
                        discipline.name, discipline.id
                    );
                }
            }
            DisciplineCommands::Rename { id, name } => {
                let discipline = store.rename_discipline(id, &name)?;
                let message = format!("Discipline '{}' updated successfully", discipline.name);
                if as_json {
                    println!(
                        "{}",
                        json!({
                            "message": message,
                            "id": discipline.id,
                            "name": discipline.name,
                        })
                    );
                } else {
                    println!("{}", message);
                }
            }
            DisciplineCommands::Rm { id } => {
                let discipline = store.delete_discipline(id)?;
                let message = format!("Discipline '{}' deleted successfully", discipline.name);
                if as_json {
                    println!("{}", json!({ "message": message }));
                } else {
                    println!("{}", message);
                }
            }
            DisciplineCommands::List => {
                let disciplines = store.list_disciplines();
                if as_json {
                    print_json(&disciplines);
                } else {
                    println!(
                        "{}",
                        output::format_discipline_list(&disciplines, use_colors)
                    );
                }
            }
            DisciplineCommands::TestCount { id } => {
                let count = store.discipline_test_count(id)?;
                if as_json {
                    println!("{}", json!({ "test_count": count }));
                } else {
                    println!("{}", count);
                }
            }
        },
        Commands::Test { command } => match command {
            TestCommands::Add {
                team,
                discipline,
                score,
                date,
            } => {
                let test = store.create_test(team, discipline, score, date)?;
                if as_json {
                    print_json(&test);
                } else {
                    println!(
                        "Recorded score {} for team {} on {} (lambda {})",
                        test.score, test.team_id, test.test_date, test.lambda_value
                    );
                }
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Get => {
                let lambda = store.lambda();
                if as_json {
                    println!("{}", json!({ "global_lambda": lambda }));
                } else {
                    println!("{}", lambda);
                }
            }
            ConfigCommands::Set { lambda } => {
                let value = store.set_lambda(lambda)?;
                if as_json {
                    println!(
                        "{}",
                        json!({ "message": "Configuration updated", "global_lambda": value })
                    );
                } else {
                    println!("Set lambda to {}", value);
                }
            }
        },
    }

    Ok(())
}
