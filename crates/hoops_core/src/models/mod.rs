//! Record types shared by the capture flow, the record store and analysis.

pub mod ids;
pub mod records;

pub use ids::{GameId, PlayId, PlayTagId, PlayerId, TagId, TeamId, UserId};
pub use records::{
    check_contiguous, Game, NewGame, NewPlay, NewPlayTag, NewPlayer, NewTag, NewTeam, Play,
    PlayTag, PlayTagContext, Player, Tag, TagCategory, Team,
};

/// Identity of the tagger acting in a session, stamped on every committed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggerIdentity {
    pub user_id: UserId,
}

impl TaggerIdentity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
