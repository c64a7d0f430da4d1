use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GameId, PlayId, PlayTagId, PlayerId, TagId, TeamId, UserId};

// ============================================================================
// Tag vocabulary
// ============================================================================

/// Broad grouping of a tag, used for summaries and UI menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum TagCategory {
    Offense,
    Defense,
    Transition,
    Passing,
    Shot,
    Outcome,
    Rebound,
    Foul,
    Turnover,
}

impl TagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Offense => "Offense",
            TagCategory::Defense => "Defense",
            TagCategory::Transition => "Transition",
            TagCategory::Passing => "Passing",
            TagCategory::Shot => "Shot",
            TagCategory::Outcome => "Outcome",
            TagCategory::Rebound => "Rebound",
            TagCategory::Foul => "Foul",
            TagCategory::Turnover => "Turnover",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named, categorized action label. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub category: TagCategory,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTag {
    pub name: String,
    pub category: TagCategory,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Roster and schedule
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub team_id: TeamId,
    pub name: String,
    #[serde(default)]
    pub jersey_number: Option<u8>,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
}

// ============================================================================
// Plays
// ============================================================================

/// Structured context stamped on every persisted tag of a play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayTagContext {
    /// Action name as it was selected
    pub action: String,
    /// 1-based position inside the play. Missing on legacy rows.
    #[serde(default)]
    pub sequence: Option<u32>,
    pub total_actions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possession_type: Option<String>,
}

impl PlayTagContext {
    /// Position used for ordering; a missing sequence reads as position 1.
    pub fn position(&self) -> u32 {
        self.sequence.unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayTag {
    pub id: PlayTagId,
    pub play_id: PlayId,
    pub tag_id: TagId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub context: PlayTagContext,
    pub confidence: f32,
    pub created_by_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayTag {
    pub tag_id: TagId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub context: PlayTagContext,
    pub confidence: f32,
}

/// One possession-level event with its ordered tags.
///
/// Written once, together with all of its tags, and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub id: PlayId,
    pub game_id: GameId,
    pub quarter: u8,
    pub game_time: String,
    pub description: String,
    pub created_by_id: UserId,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<PlayTag>,
}

impl Play {
    /// Tags ordered by their recorded position.
    pub fn ordered_tags(&self) -> Vec<&PlayTag> {
        let mut tags: Vec<&PlayTag> = self.tags.iter().collect();
        tags.sort_by_key(|t| t.context.position());
        tags
    }

    /// Action names in recorded order.
    pub fn actions(&self) -> Vec<String> {
        self.ordered_tags().into_iter().map(|t| t.context.action.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlay {
    pub game_id: GameId,
    pub quarter: u8,
    pub game_time: String,
    pub description: String,
    pub created_by_id: UserId,
    pub tags: Vec<NewPlayTag>,
}

/// Check that positions are exactly `1..=n` with `n == total_actions` on every row.
///
/// Returns a description of the first violation found.
pub fn check_contiguous<'a, I>(contexts: I) -> Result<(), String>
where
    I: IntoIterator<Item = &'a PlayTagContext>,
{
    let contexts: Vec<&PlayTagContext> = contexts.into_iter().collect();
    let n = contexts.len() as u32;
    if n == 0 {
        return Err("play has no tags".to_string());
    }

    let mut seen = vec![false; n as usize];
    for ctx in &contexts {
        if ctx.total_actions != n {
            return Err(format!(
                "tag '{}' reports totalActions {} but play has {} tags",
                ctx.action, ctx.total_actions, n
            ));
        }
        let Some(seq) = ctx.sequence else {
            return Err(format!("tag '{}' has no sequence position", ctx.action));
        };
        if seq == 0 || seq > n {
            return Err(format!("tag '{}' position {} outside 1..={}", ctx.action, seq, n));
        }
        let slot = &mut seen[(seq - 1) as usize];
        if *slot {
            return Err(format!("duplicate position {}", seq));
        }
        *slot = true;
    }
    Ok(())
}
