pub mod codec;
pub mod compare;
pub mod format;
pub mod rounds;
pub mod sort;
pub mod tiebreak;
pub mod types;

pub use codec::{decode_score, encode_score, parse_score, DecodeOptions, ParseResult};
pub use compare::{compare_scores, compute_sort_key};
pub use format::{format_score, format_score_with_tiebreak, FormatOptions};
pub use rounds::{aggregate_values, encode_rounds, format_rounds, Aggregation, RoundInput, RoundsResult};
pub use sort::{assign_ranks, find_rank, sort_indices, sort_scores};
pub use tiebreak::{decode_tiebreak, encode_tiebreak, parse_tiebreak};
pub use types::{Scheme, Score, ScoreStatus, ScoreType, Tiebreak, TiebreakScheme, TimeCap};
