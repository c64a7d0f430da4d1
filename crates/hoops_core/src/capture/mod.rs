//! # Play Capture
//!
//! Everything between a tagger clicking actions and a play landing in the
//! record store:
//!
//! - [`SequenceRecorder`]: the pending, 1-based contiguous list of entries
//! - [`CaptureSession`]: flow navigation, preconditions, handoff auto-commit
//! - [`commit`]: context inference and the atomic write
//! - [`GameClock`]: the period/time stamp attached to each play

pub mod clock;
pub mod commit;
pub mod glossary;
pub mod quick;
pub mod recorder;
pub mod session;

pub use clock::{format_game_time, parse_game_time, GameClock};
pub use commit::{build_new_play, submit_sequence, CommitRequest};
pub use glossary::{ContextGlossary, GlossaryEntry, InferredContext};
pub use quick::{quick_sequence, QuickSequence, QUICK_SEQUENCES};
pub use recorder::{SequenceEntry, SequenceRecorder};
pub use session::{CaptureSession, ChooseOutcome, SelectedPlayer};

use std::fmt;
use thiserror::Error;

use crate::flow::FlowError;
use crate::store::StoreError;

/// Input the tagger still has to supply before recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    PlayerNotSelected,
    GameTimeNotSet,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::PlayerNotSelected => write!(f, "no player selected"),
            Precondition::GameTimeNotSet => write!(f, "no game time set"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Precondition failed: {0}")]
    Precondition(Precondition),

    #[error("Invalid game time '{0}'")]
    InvalidGameTime(String),

    #[error("Invalid quarter {0}")]
    InvalidQuarter(u8),

    #[error("'{action}' is not offered in state '{state}'")]
    IllegalAction { state: String, action: String },

    #[error("Unknown tag '{0}'")]
    UnknownTag(String),

    #[error("Unknown quick sequence '{0}'")]
    UnknownQuickSequence(String),

    #[error("No pending entry at position {0}")]
    InvalidPosition(usize),

    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("Sequence positions are not contiguous: {0}")]
    NonContiguous(String),

    #[error("Commit failed: {0}")]
    Commit(#[source] StoreError),

    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl CaptureError {
    /// Rejections the caller fixes by supplying missing or corrected input.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CaptureError::Precondition(_)
                | CaptureError::InvalidGameTime(_)
                | CaptureError::InvalidQuarter(_)
        )
    }

    /// Persistence failures after which the pending sequence is still intact.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CaptureError::Commit(_))
    }
}
