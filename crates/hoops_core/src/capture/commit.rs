//! Turning a pending sequence into a persisted play.

use super::clock::GameClock;
use super::glossary::ContextGlossary;
use super::recorder::SequenceEntry;
use super::CaptureError;
use crate::config::CaptureConfig;
use crate::models::{
    check_contiguous, GameId, NewPlay, NewPlayTag, Play, PlayTagContext, PlayerId, TaggerIdentity,
    TeamId,
};
use crate::store::RecordStore;

/// Everything `submit_sequence` needs for one play.
#[derive(Debug, Clone)]
pub struct CommitRequest<'a> {
    pub game_id: GameId,
    pub quarter: u8,
    pub game_time: &'a str,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub entries: &'a [SequenceEntry],
}

/// Build the insertable play: one tag row per entry, inferred context on all.
pub fn build_new_play(
    request: &CommitRequest<'_>,
    identity: &TaggerIdentity,
    glossary: &ContextGlossary,
    config: &CaptureConfig,
) -> Result<NewPlay, CaptureError> {
    if request.entries.is_empty() {
        return Err(CaptureError::NothingToCommit);
    }
    let clock = GameClock::parse(request.quarter, request.game_time, config)?;

    let total_actions = request.entries.len() as u32;
    let inferred = glossary.infer(request.entries.iter().map(|e| e.action_name.as_str()));

    let tags: Vec<NewPlayTag> = request
        .entries
        .iter()
        .map(|entry| NewPlayTag {
            tag_id: entry.tag.id,
            player_id: request.player_id,
            team_id: request.team_id,
            context: PlayTagContext {
                action: entry.action_name.clone(),
                sequence: Some(entry.position_index),
                total_actions,
                coverage_type: inferred.coverage_type.clone(),
                possession_type: inferred.possession_type.clone(),
            },
            confidence: config.default_confidence,
        })
        .collect();

    check_contiguous(tags.iter().map(|t| &t.context)).map_err(CaptureError::NonContiguous)?;

    let description = request
        .entries
        .iter()
        .map(|e| e.action_name.as_str())
        .collect::<Vec<_>>()
        .join(" → ");

    Ok(NewPlay {
        game_id: request.game_id,
        quarter: clock.quarter,
        game_time: clock.game_time(),
        description,
        created_by_id: identity.user_id,
        tags,
    })
}

/// Validate, infer context and write the play in one atomic store call.
pub fn submit_sequence(
    store: &dyn RecordStore,
    identity: &TaggerIdentity,
    request: &CommitRequest<'_>,
    config: &CaptureConfig,
) -> Result<Play, CaptureError> {
    let new_play = build_new_play(request, identity, ContextGlossary::builtin(), config)?;
    store.create_play(new_play).map_err(|e| {
        log::warn!("Commit of {} actions failed: {}", request.entries.len(), e);
        CaptureError::Commit(e)
    })
}
