//! # hoops_core - Basketball Play Tagging and Decision Analysis
//!
//! Captures basketball possessions as ordered tag sequences and grades the
//! decisions they record.
//!
//! ## Features
//! - Validated capture flow graph (embedded YAML) driving per-session navigation
//! - Atomic play commits with 1..N contiguous tag positions
//! - Situational context inference from a static glossary
//! - Decision-quality grading and next-action suggestions over stored plays
//! - Record store with an optional checksummed snapshot file
//! - JSON API for UI integration

#![allow(clippy::too_many_arguments)]

pub mod analysis;
pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod flow;
pub mod models;
pub mod service;
pub mod store;
pub mod vocabulary;

pub use api::{
    get_flow_state_json, get_next_tag_suggestions_json, get_player_decision_quality_json,
    submit_sequence_json,
};
pub use capture::{CaptureError, CaptureSession, ChooseOutcome, GameClock, SequenceRecorder};
pub use config::{CaptureConfig, ConfigError};
pub use error::{CoreError, Result};
pub use flow::{FlowError, FlowGraph, FlowOption, FlowState};
pub use service::TaggingService;
pub use store::{MemoryStore, RecordStore, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
