//! Table set shared by every store backend.
//!
//! All validation happens before the first write of an operation, so a failed
//! operation leaves the tables untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};
use super::{PlayTagFilter, PlayTagRow};
use crate::models::{
    check_contiguous, Game, GameId, NewGame, NewPlay, NewPlayer, NewTag, NewTeam, Play, PlayId,
    PlayTag, PlayTagId, Player, PlayerId, Tag, TagId, Team, TeamId,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreTables {
    pub(crate) tags: Vec<Tag>,
    pub(crate) teams: Vec<Team>,
    pub(crate) players: Vec<Player>,
    pub(crate) games: Vec<Game>,
    /// Commit order
    pub(crate) plays: Vec<Play>,
}

impl StoreTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play_count(&self) -> usize {
        self.plays.len()
    }

    // ========================
    // Tags
    // ========================

    pub fn insert_tag(&mut self, new: NewTag) -> StoreResult<Tag> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(StoreError::Invariant("tag name must not be empty".into()));
        }
        if self.tags.iter().any(|t| t.name == name) {
            return Err(StoreError::Duplicate { kind: "tag", key: name.to_string() });
        }
        let tag = Tag {
            id: TagId::new(),
            name: name.to_string(),
            category: new.category,
            is_active: new.is_active,
        };
        self.tags.push(tag.clone());
        Ok(tag)
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    // ========================
    // Teams
    // ========================

    pub fn insert_team(&mut self, new: NewTeam) -> StoreResult<Team> {
        let team = Team { id: TeamId::new(), name: new.name, abbreviation: new.abbreviation };
        self.teams.push(team.clone());
        Ok(team)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn replace_team(&mut self, team: Team) -> StoreResult<Team> {
        let slot = self
            .teams
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or_else(|| StoreError::not_found("team", team.id))?;
        *slot = team.clone();
        Ok(team)
    }

    pub fn remove_team(&mut self, id: TeamId) -> StoreResult<()> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("team", id))?;

        if self.players.iter().any(|p| p.team_id == id) {
            return Err(StoreError::Conflict(format!("team {} still has players", id)));
        }
        if self.games.iter().any(|g| g.home_team_id == id || g.away_team_id == id) {
            return Err(StoreError::Conflict(format!("team {} is scheduled in games", id)));
        }
        if self.all_play_tags().any(|pt| pt.team_id == id) {
            return Err(StoreError::Conflict(format!("team {} has committed plays", id)));
        }
        self.teams.remove(idx);
        Ok(())
    }

    // ========================
    // Players
    // ========================

    pub fn insert_player(&mut self, new: NewPlayer) -> StoreResult<Player> {
        if self.team(new.team_id).is_none() {
            return Err(StoreError::not_found("team", new.team_id));
        }
        let player = Player {
            id: PlayerId::new(),
            team_id: new.team_id,
            name: new.name,
            jersey_number: new.jersey_number,
            position: new.position,
        };
        self.players.push(player.clone());
        Ok(player)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn players(&self, team_id: Option<TeamId>) -> Vec<Player> {
        self.players
            .iter()
            .filter(|p| team_id.map_or(true, |t| p.team_id == t))
            .cloned()
            .collect()
    }

    pub fn replace_player(&mut self, player: Player) -> StoreResult<Player> {
        if self.team(player.team_id).is_none() {
            return Err(StoreError::not_found("team", player.team_id));
        }
        let slot = self
            .players
            .iter_mut()
            .find(|p| p.id == player.id)
            .ok_or_else(|| StoreError::not_found("player", player.id))?;
        *slot = player.clone();
        Ok(player)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> StoreResult<()> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("player", id))?;
        if self.all_play_tags().any(|pt| pt.player_id == id) {
            return Err(StoreError::Conflict(format!("player {} has committed plays", id)));
        }
        self.players.remove(idx);
        Ok(())
    }

    // ========================
    // Games
    // ========================

    fn check_game_teams(&self, home: TeamId, away: TeamId) -> StoreResult<()> {
        if home == away {
            return Err(StoreError::Invariant("a game needs two different teams".into()));
        }
        for id in [home, away] {
            if self.team(id).is_none() {
                return Err(StoreError::not_found("team", id));
            }
        }
        Ok(())
    }

    pub fn insert_game(&mut self, new: NewGame) -> StoreResult<Game> {
        self.check_game_teams(new.home_team_id, new.away_team_id)?;
        let game = Game {
            id: GameId::new(),
            home_team_id: new.home_team_id,
            away_team_id: new.away_team_id,
            scheduled_at: new.scheduled_at,
            location: new.location,
        };
        self.games.push(game.clone());
        Ok(game)
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn replace_game(&mut self, game: Game) -> StoreResult<Game> {
        self.check_game_teams(game.home_team_id, game.away_team_id)?;
        let slot = self
            .games
            .iter_mut()
            .find(|g| g.id == game.id)
            .ok_or_else(|| StoreError::not_found("game", game.id))?;
        *slot = game.clone();
        Ok(game)
    }

    pub fn remove_game(&mut self, id: GameId) -> StoreResult<()> {
        let idx = self
            .games
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| StoreError::not_found("game", id))?;
        if self.plays.iter().any(|p| p.game_id == id) {
            return Err(StoreError::Conflict(format!("game {} has committed plays", id)));
        }
        self.games.remove(idx);
        Ok(())
    }

    // ========================
    // Plays
    // ========================

    /// Validate a play and every tag row, then store them together.
    pub fn insert_play(&mut self, new: NewPlay) -> StoreResult<Play> {
        if self.game(new.game_id).is_none() {
            return Err(StoreError::not_found("game", new.game_id));
        }
        if new.quarter == 0 {
            return Err(StoreError::Invariant("quarter is 1-based".into()));
        }
        check_contiguous(new.tags.iter().map(|t| &t.context)).map_err(StoreError::Invariant)?;

        for row in &new.tags {
            if self.tag(row.tag_id).is_none() {
                return Err(StoreError::not_found("tag", row.tag_id));
            }
            if self.player(row.player_id).is_none() {
                return Err(StoreError::not_found("player", row.player_id));
            }
            if self.team(row.team_id).is_none() {
                return Err(StoreError::not_found("team", row.team_id));
            }
        }

        let play_id = PlayId::new();
        let tags = new
            .tags
            .into_iter()
            .map(|row| PlayTag {
                id: PlayTagId::new(),
                play_id,
                tag_id: row.tag_id,
                player_id: row.player_id,
                team_id: row.team_id,
                context: row.context,
                confidence: row.confidence,
                created_by_id: new.created_by_id,
            })
            .collect();

        let play = Play {
            id: play_id,
            game_id: new.game_id,
            quarter: new.quarter,
            game_time: new.game_time,
            description: new.description,
            created_by_id: new.created_by_id,
            created_at: Utc::now(),
            tags,
        };
        self.plays.push(play.clone());
        Ok(play)
    }

    pub fn play(&self, id: PlayId) -> Option<&Play> {
        self.plays.iter().find(|p| p.id == id)
    }

    pub fn plays_for_game(&self, game_id: GameId) -> Vec<Play> {
        self.plays.iter().filter(|p| p.game_id == game_id).cloned().collect()
    }

    fn all_play_tags(&self) -> impl Iterator<Item = &PlayTag> {
        self.plays.iter().flat_map(|p| p.tags.iter())
    }

    pub fn play_tag_rows(&self, filter: &PlayTagFilter) -> Vec<PlayTagRow> {
        self.plays
            .iter()
            .flat_map(|play| {
                play.tags.iter().map(move |pt| {
                    let tag = self.tag(pt.tag_id);
                    PlayTagRow {
                        play_tag_id: pt.id,
                        play_id: play.id,
                        game_id: play.game_id,
                        quarter: play.quarter,
                        tag_id: pt.tag_id,
                        tag_name: tag
                            .map(|t| t.name.clone())
                            .unwrap_or_else(|| pt.context.action.clone()),
                        tag_category: tag.map(|t| t.category),
                        player_id: pt.player_id,
                        team_id: pt.team_id,
                        context: pt.context.clone(),
                        confidence: pt.confidence,
                    }
                })
            })
            .filter(|row| filter.matches(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewPlayTag, PlayTagContext, TagCategory, UserId};

    struct Fixture {
        tables: StoreTables,
        tag: Tag,
        team: Team,
        opponent: Team,
        player: Player,
        game: Game,
    }

    fn fixture() -> Fixture {
        let mut tables = StoreTables::new();
        let tag = tables
            .insert_tag(NewTag {
                name: "Isolation".into(),
                category: TagCategory::Offense,
                is_active: true,
            })
            .unwrap();
        let team = tables.insert_team(NewTeam { name: "Hawks".into(), abbreviation: None }).unwrap();
        let opponent =
            tables.insert_team(NewTeam { name: "Owls".into(), abbreviation: None }).unwrap();
        let player = tables
            .insert_player(NewPlayer {
                team_id: team.id,
                name: "Guard".into(),
                jersey_number: Some(3),
                position: None,
            })
            .unwrap();
        let game = tables
            .insert_game(NewGame {
                home_team_id: team.id,
                away_team_id: opponent.id,
                scheduled_at: Utc::now(),
                location: None,
            })
            .unwrap();
        Fixture { tables, tag, team, opponent, player, game }
    }

    fn row(f: &Fixture, sequence: Option<u32>, total: u32) -> NewPlayTag {
        NewPlayTag {
            tag_id: f.tag.id,
            player_id: f.player.id,
            team_id: f.team.id,
            context: PlayTagContext {
                action: "Isolation".into(),
                sequence,
                total_actions: total,
                coverage_type: None,
                possession_type: None,
            },
            confidence: 1.0,
        }
    }

    fn new_play(f: &Fixture, tags: Vec<NewPlayTag>) -> NewPlay {
        NewPlay {
            game_id: f.game.id,
            quarter: 1,
            game_time: "11:40".into(),
            description: "Isolation".into(),
            created_by_id: UserId::new(),
            tags,
        }
    }

    #[test]
    fn test_duplicate_tag_name_rejected() {
        let mut f = fixture();
        let err = f
            .tables
            .insert_tag(NewTag { name: "Isolation".into(), category: TagCategory::Offense, is_active: true })
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[test]
    fn test_insert_play_stamps_ids() {
        let mut f = fixture();
        let play = f.tables.insert_play(new_play(&f, vec![row(&f, Some(1), 1)])).unwrap();
        assert_eq!(play.tags.len(), 1);
        assert_eq!(play.tags[0].play_id, play.id);
        assert_eq!(play.tags[0].created_by_id, play.created_by_id);
        assert_eq!(f.tables.play_count(), 1);
    }

    #[test]
    fn test_gapped_play_leaves_tables_untouched() {
        let mut f = fixture();
        let before = f.tables.clone();
        let bad = new_play(&f, vec![row(&f, Some(1), 2), row(&f, Some(3), 2)]);
        assert!(matches!(f.tables.insert_play(bad), Err(StoreError::Invariant(_))));
        assert_eq!(f.tables, before);
    }

    #[test]
    fn test_unknown_references_rejected() {
        let mut f = fixture();
        let mut bad = row(&f, Some(1), 1);
        bad.player_id = PlayerId::new();
        let err = f.tables.insert_play(new_play(&f, vec![bad])).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "player", .. }));
        assert_eq!(f.tables.play_count(), 0);
    }

    #[test]
    fn test_referenced_records_cannot_be_deleted() {
        let mut f = fixture();
        f.tables.insert_play(new_play(&f, vec![row(&f, Some(1), 1)])).unwrap();

        assert!(matches!(f.tables.remove_game(f.game.id), Err(StoreError::Conflict(_))));
        assert!(matches!(f.tables.remove_player(f.player.id), Err(StoreError::Conflict(_))));
        assert!(matches!(f.tables.remove_team(f.opponent.id), Err(StoreError::Conflict(_))));
    }

    #[test]
    fn test_rows_filter_and_join() {
        let mut f = fixture();
        f.tables.insert_play(new_play(&f, vec![row(&f, Some(1), 1)])).unwrap();

        let rows = f.tables.play_tag_rows(&PlayTagFilter::for_player(f.player.id));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag_name, "Isolation");
        assert_eq!(rows[0].tag_category, Some(TagCategory::Offense));
        assert_eq!(rows[0].game_id, f.game.id);

        let none = f.tables.play_tag_rows(&PlayTagFilter::for_player(PlayerId::new()));
        assert!(none.is_empty());
        let other_game =
            f.tables.play_tag_rows(&PlayTagFilter::all().in_game(Some(GameId::new())));
        assert!(other_game.is_empty());
    }

    #[test]
    fn test_game_requires_two_known_teams() {
        let mut f = fixture();
        let same = NewGame {
            home_team_id: f.team.id,
            away_team_id: f.team.id,
            scheduled_at: Utc::now(),
            location: None,
        };
        assert!(matches!(f.tables.insert_game(same), Err(StoreError::Invariant(_))));
    }
}
