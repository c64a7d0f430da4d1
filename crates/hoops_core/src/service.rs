//! # Tagging Service
//!
//! Typed entry point shared by the JSON API and the CLI. Holds the store
//! handle, the validated flow graph, the config and the acting tagger.

use std::sync::Arc;

use crate::analysis::{
    game_tag_summary, next_tag_suggestions, player_decision_quality, team_decision_quality,
    DecisionQualityReport, GameTagSummary, TagSuggestion, TeamQualityReport,
};
use crate::capture::{self, CaptureError, CaptureSession, CommitRequest, SequenceRecorder};
use crate::config::CaptureConfig;
use crate::error::{CoreError, Result};
use crate::flow::{FlowGraph, FlowState};
use crate::models::{GameId, Play, PlayerId, TaggerIdentity, TeamId};
use crate::store::{load_vocabulary, RecordStore};

pub struct TaggingService {
    store: Arc<dyn RecordStore>,
    graph: Arc<FlowGraph>,
    config: Arc<CaptureConfig>,
    identity: TaggerIdentity,
}

impl TaggingService {
    /// Service over the built-in capture flow.
    pub fn new(store: Arc<dyn RecordStore>, config: CaptureConfig, identity: TaggerIdentity) -> Self {
        Self {
            store,
            graph: Arc::new(FlowGraph::builtin().clone()),
            config: Arc::new(config),
            identity,
        }
    }

    pub fn with_graph(mut self, graph: FlowGraph) -> Self {
        self.graph = Arc::new(graph);
        self
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn identity(&self) -> TaggerIdentity {
        self.identity
    }

    /// Commit a complete sequence of action names as one play.
    ///
    /// Names are resolved against the store's vocabulary; flow legality is not
    /// checked, only that every name is a known tag.
    pub fn submit_sequence<S: AsRef<str>>(
        &self,
        game_id: GameId,
        quarter: u8,
        game_time: &str,
        player_id: PlayerId,
        team_id: TeamId,
        actions: &[S],
    ) -> Result<Play> {
        let vocabulary = load_vocabulary(self.store())?;
        let mut recorder = SequenceRecorder::new();
        for action in actions {
            let name = action.as_ref();
            let tag = vocabulary
                .resolve(name)
                .cloned()
                .ok_or_else(|| CaptureError::UnknownTag(name.to_string()))?;
            recorder.push(tag);
        }

        let request = CommitRequest {
            game_id,
            quarter,
            game_time,
            player_id,
            team_id,
            entries: recorder.entries(),
        };
        let play = capture::submit_sequence(self.store(), &self.identity, &request, &self.config)?;
        log::info!("Submitted play {} for player {} ({} tags)", play.id, player_id, play.tags.len());
        Ok(play)
    }

    pub fn player_decision_quality(
        &self,
        player_id: PlayerId,
        game_id: Option<GameId>,
    ) -> Result<DecisionQualityReport> {
        if self.store.player(player_id)?.is_none() {
            return Err(CoreError::not_found("Player", player_id));
        }
        if let Some(game_id) = game_id {
            self.require_game(game_id)?;
        }
        Ok(player_decision_quality(self.store(), player_id, game_id)?)
    }

    pub fn team_decision_quality(
        &self,
        team_id: TeamId,
        game_id: Option<GameId>,
    ) -> Result<TeamQualityReport> {
        if self.store.team(team_id)?.is_none() {
            return Err(CoreError::not_found("Team", team_id));
        }
        if let Some(game_id) = game_id {
            self.require_game(game_id)?;
        }
        Ok(team_decision_quality(self.store(), team_id, game_id)?)
    }

    /// At most `suggestion_limit` likely next actions after `last_tag_name`.
    pub fn next_tag_suggestions(&self, last_tag_name: &str) -> Result<Vec<TagSuggestion>> {
        Ok(next_tag_suggestions(self.store(), last_tag_name, self.config.suggestion_limit)?)
    }

    pub fn flow_state(&self, key: &str) -> Result<FlowState> {
        Ok(self.graph.state(key)?.clone())
    }

    pub fn game_summary(&self, game_id: GameId) -> Result<GameTagSummary> {
        self.require_game(game_id)?;
        Ok(game_tag_summary(self.store(), game_id)?)
    }

    /// Fresh capture session for one game, with its own navigation state.
    pub fn open_session(&self, game_id: GameId) -> Result<CaptureSession> {
        self.require_game(game_id)?;
        let vocabulary = load_vocabulary(self.store())?;
        Ok(CaptureSession::new(
            Arc::clone(&self.store),
            Arc::clone(&self.graph),
            vocabulary,
            Arc::clone(&self.config),
            self.identity,
            game_id,
        ))
    }

    fn require_game(&self, game_id: GameId) -> Result<()> {
        match self.store.game(game_id)? {
            Some(_) => Ok(()),
            None => Err(CoreError::not_found("Game", game_id)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{Game, NewGame, NewPlayer, NewTeam, Player, Team, UserId};
    use crate::store::{seed_vocabulary, MemoryStore};

    pub struct Court {
        pub service: TaggingService,
        pub home: Team,
        pub game: Game,
        pub guard: Player,
        pub center: Player,
    }

    pub fn court() -> Court {
        let store = Arc::new(MemoryStore::new());
        seed_vocabulary(store.as_ref()).unwrap();
        let home = store.create_team(NewTeam { name: "Hawks".into(), abbreviation: Some("HAW".into()) }).unwrap();
        let away = store.create_team(NewTeam { name: "Owls".into(), abbreviation: None }).unwrap();
        let guard = store
            .create_player(NewPlayer { team_id: home.id, name: "Guard".into(), jersey_number: Some(1), position: Some("PG".into()) })
            .unwrap();
        let center = store
            .create_player(NewPlayer { team_id: home.id, name: "Center".into(), jersey_number: Some(34), position: Some("C".into()) })
            .unwrap();
        let game = store
            .create_game(NewGame {
                home_team_id: home.id,
                away_team_id: away.id,
                scheduled_at: chrono::Utc::now(),
                location: Some("Home Gym".into()),
            })
            .unwrap();
        let service = TaggingService::new(store, CaptureConfig::default(), TaggerIdentity::new(UserId::new()));
        Court { service, home, game, guard, center }
    }
}
