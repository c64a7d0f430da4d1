//! # Decision Analysis
//!
//! Read-only passes over committed plays:
//!
//! - [`rubric`]: static (initiating, responding) -> quality table
//! - [`decision`]: per-player and per-team grades from each play's first transition
//! - [`predictor`]: next-action suggestions from historical transitions
//! - [`summary`]: per-game tag counts
//!
//! Every pass starts from the same reconstruction: group tag rows by play and
//! order each group by recorded position.

pub mod decision;
pub mod predictor;
pub mod rubric;
pub mod sequences;
pub mod summary;

pub use decision::{
    analyze_sequences, player_decision_quality, team_decision_quality, AggregatedQuality,
    DecisionBreakdown, DecisionCell, DecisionQualityReport, Grade, PlayerQuality,
    TeamQualityReport,
};
pub use predictor::{next_tag_suggestions, rank_next_actions, TagSuggestion};
pub use rubric::{classify, Classification, Quality, DEFENSIVE_STARTER, OFFENSIVE_STARTERS};
pub use sequences::{reconstruct, TagSequence};
pub use summary::{game_tag_summary, GameTagSummary};
