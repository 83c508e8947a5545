pub mod formatter;

pub use formatter::{
    format_event_table, format_event_tsv, format_points, format_points_table, format_row_errors,
    format_standings_table, format_standings_tsv, should_use_colors,
};
