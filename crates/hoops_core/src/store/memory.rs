use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::error::{StoreError, StoreResult};
use super::snapshot::SnapshotFile;
use super::tables::StoreTables;
use super::{PlayTagFilter, PlayTagRow, RecordStore};
use crate::models::{
    Game, GameId, NewGame, NewPlay, NewPlayer, NewTag, NewTeam, Play, PlayId, Player, PlayerId,
    Tag, TagId, Team, TeamId,
};

/// In-process record store, optionally mirrored to a snapshot file.
///
/// With a snapshot attached, every mutation is applied to a staged copy of
/// the tables, written to disk, and only then made visible. A failed write
/// leaves both the file and the in-memory tables unchanged.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<StoreTables>,
    snapshot: Option<SnapshotFile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: StoreTables) -> Self {
        Self { tables: RwLock::new(tables), snapshot: None }
    }

    /// Open (or create on first write) a snapshot-backed store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let file = SnapshotFile::new(path.as_ref());
        let tables = file.read()?.unwrap_or_default();
        log::info!(
            "Opened record store {} ({} plays)",
            file.path().display(),
            tables.play_count()
        );
        Ok(Self { tables: RwLock::new(tables), snapshot: Some(file) })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_ref().map(|f| f.path())
    }

    /// Copy of the current tables.
    pub fn export(&self) -> StoreResult<StoreTables> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreTables>> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreTables>> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut StoreTables) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.write()?;
        match &self.snapshot {
            None => op(&mut *guard),
            Some(file) => {
                let mut staged = guard.clone();
                let out = op(&mut staged)?;
                file.write(&staged)?;
                *guard = staged;
                Ok(out)
            }
        }
    }
}

impl RecordStore for MemoryStore {
    fn create_tag(&self, tag: NewTag) -> StoreResult<Tag> {
        self.mutate(|t| t.insert_tag(tag))
    }

    fn tag(&self, id: TagId) -> StoreResult<Option<Tag>> {
        Ok(self.read()?.tag(id).cloned())
    }

    fn tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>> {
        Ok(self.read()?.tag_by_name(name).cloned())
    }

    fn tags(&self) -> StoreResult<Vec<Tag>> {
        Ok(self.read()?.tags().to_vec())
    }

    fn create_team(&self, team: NewTeam) -> StoreResult<Team> {
        self.mutate(|t| t.insert_team(team))
    }

    fn team(&self, id: TeamId) -> StoreResult<Option<Team>> {
        Ok(self.read()?.team(id).cloned())
    }

    fn teams(&self) -> StoreResult<Vec<Team>> {
        Ok(self.read()?.teams().to_vec())
    }

    fn update_team(&self, team: Team) -> StoreResult<Team> {
        self.mutate(|t| t.replace_team(team))
    }

    fn delete_team(&self, id: TeamId) -> StoreResult<()> {
        self.mutate(|t| t.remove_team(id))
    }

    fn create_player(&self, player: NewPlayer) -> StoreResult<Player> {
        self.mutate(|t| t.insert_player(player))
    }

    fn player(&self, id: PlayerId) -> StoreResult<Option<Player>> {
        Ok(self.read()?.player(id).cloned())
    }

    fn players(&self, team_id: Option<TeamId>) -> StoreResult<Vec<Player>> {
        Ok(self.read()?.players(team_id))
    }

    fn update_player(&self, player: Player) -> StoreResult<Player> {
        self.mutate(|t| t.replace_player(player))
    }

    fn delete_player(&self, id: PlayerId) -> StoreResult<()> {
        self.mutate(|t| t.remove_player(id))
    }

    fn create_game(&self, game: NewGame) -> StoreResult<Game> {
        self.mutate(|t| t.insert_game(game))
    }

    fn game(&self, id: GameId) -> StoreResult<Option<Game>> {
        Ok(self.read()?.game(id).cloned())
    }

    fn games(&self) -> StoreResult<Vec<Game>> {
        Ok(self.read()?.games().to_vec())
    }

    fn update_game(&self, game: Game) -> StoreResult<Game> {
        self.mutate(|t| t.replace_game(game))
    }

    fn delete_game(&self, id: GameId) -> StoreResult<()> {
        self.mutate(|t| t.remove_game(id))
    }

    fn create_play(&self, play: NewPlay) -> StoreResult<Play> {
        let play = self.mutate(|t| t.insert_play(play))?;
        log::info!("Committed play {} with {} tags", play.id, play.tags.len());
        Ok(play)
    }

    fn play(&self, id: PlayId) -> StoreResult<Option<Play>> {
        Ok(self.read()?.play(id).cloned())
    }

    fn plays_for_game(&self, game_id: GameId) -> StoreResult<Vec<Play>> {
        Ok(self.read()?.plays_for_game(game_id))
    }

    fn play_tags(&self, filter: &PlayTagFilter) -> StoreResult<Vec<PlayTagRow>> {
        Ok(self.read()?.play_tag_rows(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_vocabulary;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_crud_roundtrip() {
        let store = MemoryStore::new();
        let mut team = store.create_team(NewTeam { name: "Hawks".into(), abbreviation: None }).unwrap();
        team.abbreviation = Some("HWK".into());
        store.update_team(team.clone()).unwrap();
        assert_eq!(store.team(team.id).unwrap().unwrap().abbreviation.as_deref(), Some("HWK"));

        let player = store
            .create_player(NewPlayer {
                team_id: team.id,
                name: "Wing".into(),
                jersey_number: Some(11),
                position: Some("SF".into()),
            })
            .unwrap();
        assert_eq!(store.players(Some(team.id)).unwrap().len(), 1);
        assert!(store.players(Some(TeamId::new())).unwrap().is_empty());

        store.delete_player(player.id).unwrap();
        store.delete_team(team.id).unwrap();
        assert!(store.teams().unwrap().is_empty());
        assert!(matches!(store.delete_team(team.id), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_snapshot_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hoops.snap");

        let (team_id, tag_count) = {
            let store = MemoryStore::open(&path).unwrap();
            let count = seed_vocabulary(&store).unwrap();
            let team = store.create_team(NewTeam { name: "Hawks".into(), abbreviation: None }).unwrap();
            (team.id, count)
        };

        let reopened = MemoryStore::open(&path).unwrap();
        assert_eq!(reopened.tags().unwrap().len(), tag_count);
        assert!(reopened.team(team_id).unwrap().is_some());
        assert_eq!(reopened.snapshot_path(), Some(path.as_path()));
    }

    #[test]
    fn test_failed_mutation_not_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hoops.snap");
        let store = MemoryStore::open(&path).unwrap();

        let team = store.create_team(NewTeam { name: "Hawks".into(), abbreviation: None }).unwrap();
        let bad_game = NewGame {
            home_team_id: team.id,
            away_team_id: TeamId::new(),
            scheduled_at: Utc::now(),
            location: None,
        };
        assert!(store.create_game(bad_game).is_err());

        let reopened = MemoryStore::open(&path).unwrap();
        assert!(reopened.games().unwrap().is_empty());
        assert_eq!(reopened.teams().unwrap().len(), 1);
    }
}
