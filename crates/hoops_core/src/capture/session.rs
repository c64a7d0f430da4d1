//! One tagger's capture session.
//!
//! A session owns its navigation state, history and pending sequence. Nothing
//! here is shared between sessions except the record store handle and the
//! read-only flow graph and config.

use std::sync::Arc;

use super::clock::GameClock;
use super::commit::{submit_sequence, CommitRequest};
use super::quick::quick_sequence;
use super::recorder::{SequenceEntry, SequenceRecorder};
use super::{CaptureError, Precondition};
use crate::analysis::{next_tag_suggestions, TagSuggestion};
use crate::config::CaptureConfig;
use crate::flow::{FlowGraph, FlowOption, NextStep, INITIAL_STATE};
use crate::models::{GameId, Play, PlayerId, Tag, TaggerIdentity, TeamId};
use crate::store::{RecordStore, StoreResult};
use crate::vocabulary::TagVocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedPlayer {
    pub player_id: PlayerId,
    pub team_id: TeamId,
}

/// Result of a successful [`CaptureSession::choose`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChooseOutcome {
    /// Moved to another state; the pending sequence grew by one.
    Advanced { state: String },
    /// Walk ended without a handoff; back at the entry state, sequence kept.
    Ended,
    /// Handoff action committed the sequence.
    Committed(Box<Play>),
}

pub struct CaptureSession {
    store: Arc<dyn RecordStore>,
    graph: Arc<FlowGraph>,
    vocabulary: TagVocabulary,
    config: Arc<CaptureConfig>,
    identity: TaggerIdentity,
    game_id: GameId,
    current_state: String,
    history: Vec<String>,
    recorder: SequenceRecorder,
    player: Option<SelectedPlayer>,
    clock: Option<GameClock>,
}

impl CaptureSession {
    pub fn new(
        store: Arc<dyn RecordStore>,
        graph: Arc<FlowGraph>,
        vocabulary: TagVocabulary,
        config: Arc<CaptureConfig>,
        identity: TaggerIdentity,
        game_id: GameId,
    ) -> Self {
        Self {
            store,
            graph,
            vocabulary,
            config,
            identity,
            game_id,
            current_state: INITIAL_STATE.to_string(),
            history: Vec::new(),
            recorder: SequenceRecorder::new(),
            player: None,
            clock: None,
        }
    }

    pub fn select_player(&mut self, player_id: PlayerId, team_id: TeamId) {
        self.player = Some(SelectedPlayer { player_id, team_id });
    }

    /// Set the clock from tagger input. Invalid input leaves the old clock.
    pub fn set_game_time(&mut self, quarter: u8, game_time: &str) -> Result<(), CaptureError> {
        self.clock = Some(GameClock::parse(quarter, game_time, &self.config)?);
        Ok(())
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn player(&self) -> Option<SelectedPlayer> {
        self.player
    }

    pub fn clock(&self) -> Option<GameClock> {
        self.clock
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn pending(&self) -> &[SequenceEntry] {
        self.recorder.entries()
    }

    pub fn offered_options(&self) -> Result<&[FlowOption], CaptureError> {
        Ok(&self.graph.state(&self.current_state)?.options)
    }

    fn ready(&self) -> Result<(SelectedPlayer, GameClock), CaptureError> {
        let player = self.player.ok_or(CaptureError::Precondition(Precondition::PlayerNotSelected))?;
        let clock = self.clock.ok_or(CaptureError::Precondition(Precondition::GameTimeNotSet))?;
        Ok((player, clock))
    }

    fn resolve(&self, action_name: &str) -> Result<Tag, CaptureError> {
        self.vocabulary
            .resolve(action_name)
            .cloned()
            .ok_or_else(|| CaptureError::UnknownTag(action_name.to_string()))
    }

    fn reset_navigation(&mut self) {
        self.current_state = INITIAL_STATE.to_string();
        self.history.clear();
    }

    /// Record one offered action and follow its edge.
    ///
    /// A handoff action commits the whole pending sequence. If that commit
    /// fails the handoff entry is dropped again and navigation is unchanged,
    /// so choosing the same action retries the commit.
    pub fn choose(&mut self, action_name: &str) -> Result<ChooseOutcome, CaptureError> {
        self.ready()?;
        let state = self.graph.state(&self.current_state)?;
        let option = state.option(action_name).ok_or_else(|| CaptureError::IllegalAction {
            state: self.current_state.clone(),
            action: action_name.to_string(),
        })?;
        let next = option.next.clone();
        let tag = self.resolve(action_name)?;

        self.recorder.push(tag);
        log::debug!(
            "{} -> '{}' (position {})",
            self.current_state,
            action_name,
            self.recorder.len()
        );

        if self.config.is_handoff(action_name) {
            return match self.commit() {
                Ok(play) => Ok(ChooseOutcome::Committed(Box::new(play))),
                Err(err) => {
                    self.recorder.pop();
                    log::warn!("Handoff '{}' not committed: {}", action_name, err);
                    Err(err)
                }
            };
        }

        match next {
            NextStep::State(key) => {
                let previous = std::mem::replace(&mut self.current_state, key.clone());
                self.history.push(previous);
                Ok(ChooseOutcome::Advanced { state: key })
            }
            NextStep::End => {
                self.reset_navigation();
                Ok(ChooseOutcome::Ended)
            }
        }
    }

    /// Undo the last navigation step. Recorded entries are not touched.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current_state = previous;
                true
            }
            None => false,
        }
    }

    /// Drop the pending entry at 1-based `position`.
    pub fn remove(&mut self, position: usize) -> Result<SequenceEntry, CaptureError> {
        self.recorder.remove(position)
    }

    /// Append actions without checking flow legality. All names must resolve.
    pub fn apply_quick_sequence(&mut self, names: &[&str]) -> Result<usize, CaptureError> {
        self.ready()?;
        let tags = names.iter().map(|n| self.resolve(n)).collect::<Result<Vec<_>, _>>()?;
        let added = tags.len();
        self.recorder.extend(tags);
        Ok(added)
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<usize, CaptureError> {
        let preset =
            quick_sequence(name).ok_or_else(|| CaptureError::UnknownQuickSequence(name.to_string()))?;
        self.apply_quick_sequence(preset.actions)
    }

    /// Persist the pending sequence as one play.
    ///
    /// On success the sequence clears, the clock runs down one step and
    /// navigation returns to the entry state. On failure nothing changes.
    pub fn commit(&mut self) -> Result<Play, CaptureError> {
        let (player, mut clock) = self.ready()?;
        let game_time = clock.game_time();
        let request = CommitRequest {
            game_id: self.game_id,
            quarter: clock.quarter,
            game_time: &game_time,
            player_id: player.player_id,
            team_id: player.team_id,
            entries: self.recorder.entries(),
        };
        let play = submit_sequence(self.store.as_ref(), &self.identity, &request, &self.config)?;

        log::info!("Committed play {} ({} tags) at {}", play.id, play.tags.len(), clock);
        self.recorder.clear();
        clock.tick(&self.config);
        self.clock = Some(clock);
        self.reset_navigation();
        Ok(play)
    }

    /// Clear navigation and the pending sequence; player and clock are kept.
    pub fn reset(&mut self) {
        self.recorder.clear();
        self.reset_navigation();
    }

    /// Likely next actions after the last pending entry.
    pub fn suggestions(&self) -> StoreResult<Vec<TagSuggestion>> {
        match self.recorder.last() {
            Some(last) => {
                next_tag_suggestions(self.store.as_ref(), &last.action_name, self.config.suggestion_limit)
            }
            None => Ok(Vec::new()),
        }
    }
}
