//! Competition scoring and leaderboard engine.
//!
//! Raw performances are encoded by [`score`], ordered by the comparator and
//! sorter, and turned into event points and standings by [`scoring`].

pub mod config;
pub mod error;
pub mod event;
pub mod output;
pub mod score;
pub mod scoring;

pub use error::{ParseError, Result, ScoringError};
