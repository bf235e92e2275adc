pub mod formatter;

pub use formatter::{
    format_contributions, format_discipline_list, format_rankings_table, format_score,
    format_team_list, format_test_list, should_use_colors,
};
