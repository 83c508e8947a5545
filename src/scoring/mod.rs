pub mod config;
pub mod engine;
pub mod points;
pub mod policy;
pub mod pscore;
pub mod standings;
pub mod status;
pub mod validation;

pub use config::*;
pub use engine::{calculate_event_points, EventEntry, EventPlacement, EventResult};
pub use points::{generate_points_table, WINNER_TAKES_MORE_POINTS};
pub use policy::{apply_override, BaseTable, PointsPolicy};
pub use pscore::{select_median_population, PScoreCurve};
pub use standings::{apply_tiebreakers, compute_standings, AthleteTotals, Standing};
pub use status::{resolve_statuses, Treatment};
pub use validation::validate_scoring;
