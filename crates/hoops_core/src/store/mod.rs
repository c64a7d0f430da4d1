//! # Record Store
//!
//! Storage seam for tags, roster, games and committed plays. The capture and
//! analysis code only ever talks to [`RecordStore`]; [`MemoryStore`] is the
//! bundled implementation, optionally backed by a snapshot file
//! (MessagePack + LZ4 + SHA-256, written atomically).

pub mod error;
pub mod memory;
pub mod snapshot;
mod tables;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use snapshot::{decode_snapshot, encode_snapshot, SnapshotFile, StoreSnapshot, SNAPSHOT_VERSION};
pub use tables::StoreTables;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{
    Game, GameId, NewGame, NewPlay, NewPlayer, NewTag, NewTeam, Play, PlayId, PlayTagContext,
    PlayTagId, Player, PlayerId, Tag, TagCategory, TagId, Team, TeamId,
};
use crate::vocabulary::{default_new_tags, TagVocabulary};

/// Filter for [`RecordStore::play_tags`]. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayTagFilter {
    pub player_id: Option<PlayerId>,
    pub team_id: Option<TeamId>,
    pub game_id: Option<GameId>,
}

impl PlayTagFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_player(player_id: PlayerId) -> Self {
        Self { player_id: Some(player_id), ..Self::default() }
    }

    pub fn for_team(team_id: TeamId) -> Self {
        Self { team_id: Some(team_id), ..Self::default() }
    }

    pub fn in_game(mut self, game_id: Option<GameId>) -> Self {
        self.game_id = game_id;
        self
    }

    pub fn matches(&self, row: &PlayTagRow) -> bool {
        self.player_id.map_or(true, |p| p == row.player_id)
            && self.team_id.map_or(true, |t| t == row.team_id)
            && self.game_id.map_or(true, |g| g == row.game_id)
    }
}

/// A persisted play tag joined with its play and tag records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayTagRow {
    pub play_tag_id: PlayTagId,
    pub play_id: PlayId,
    pub game_id: GameId,
    pub quarter: u8,
    pub tag_id: TagId,
    pub tag_name: String,
    pub tag_category: Option<TagCategory>,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub context: PlayTagContext,
    pub confidence: f32,
}

/// CRUD and query surface consumed by the capture and analysis code.
///
/// `create_play` is all-or-nothing: either the play and every one of its tag
/// rows are stored, or nothing is.
pub trait RecordStore: Send + Sync {
    // Tags
    fn create_tag(&self, tag: NewTag) -> StoreResult<Tag>;
    fn tag(&self, id: TagId) -> StoreResult<Option<Tag>>;
    fn tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>>;
    fn tags(&self) -> StoreResult<Vec<Tag>>;

    // Teams
    fn create_team(&self, team: NewTeam) -> StoreResult<Team>;
    fn team(&self, id: TeamId) -> StoreResult<Option<Team>>;
    fn teams(&self) -> StoreResult<Vec<Team>>;
    fn update_team(&self, team: Team) -> StoreResult<Team>;
    fn delete_team(&self, id: TeamId) -> StoreResult<()>;

    // Players
    fn create_player(&self, player: NewPlayer) -> StoreResult<Player>;
    fn player(&self, id: PlayerId) -> StoreResult<Option<Player>>;
    fn players(&self, team_id: Option<TeamId>) -> StoreResult<Vec<Player>>;
    fn update_player(&self, player: Player) -> StoreResult<Player>;
    fn delete_player(&self, id: PlayerId) -> StoreResult<()>;

    // Games
    fn create_game(&self, game: NewGame) -> StoreResult<Game>;
    fn game(&self, id: GameId) -> StoreResult<Option<Game>>;
    fn games(&self) -> StoreResult<Vec<Game>>;
    fn update_game(&self, game: Game) -> StoreResult<Game>;
    fn delete_game(&self, id: GameId) -> StoreResult<()>;

    // Plays
    fn create_play(&self, play: NewPlay) -> StoreResult<Play>;
    fn play(&self, id: PlayId) -> StoreResult<Option<Play>>;
    fn plays_for_game(&self, game_id: GameId) -> StoreResult<Vec<Play>>;

    /// Tag rows matching `filter`, in commit order.
    fn play_tags(&self, filter: &PlayTagFilter) -> StoreResult<Vec<PlayTagRow>>;
}

/// Insert the built-in tag catalog, skipping names already present.
///
/// Returns the number of tags created.
pub fn seed_vocabulary(store: &dyn RecordStore) -> StoreResult<usize> {
    let mut created = 0;
    for tag in default_new_tags() {
        if store.tag_by_name(&tag.name)?.is_none() {
            store.create_tag(tag)?;
            created += 1;
        }
    }
    if created > 0 {
        log::info!("Seeded {} vocabulary tags", created);
    }
    Ok(created)
}

/// Vocabulary view over the store's current tags.
pub fn load_vocabulary(store: &dyn RecordStore) -> StoreResult<TagVocabulary> {
    Ok(TagVocabulary::new(store.tags()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::DEFAULT_TAGS;

    #[test]
    fn test_seed_is_idempotent() {
        let store = MemoryStore::new();
        assert_eq!(seed_vocabulary(&store).unwrap(), DEFAULT_TAGS.len());
        assert_eq!(seed_vocabulary(&store).unwrap(), 0);

        let vocab = load_vocabulary(&store).unwrap();
        assert_eq!(vocab.len(), DEFAULT_TAGS.len());
        assert!(vocab.contains("Double Teamed"));
    }

    #[test]
    fn test_filter_builders() {
        let player = PlayerId::new();
        let game = GameId::new();
        let filter = PlayTagFilter::for_player(player).in_game(Some(game));
        assert_eq!(filter.player_id, Some(player));
        assert_eq!(filter.game_id, Some(game));
        assert_eq!(filter.team_id, None);
        assert_eq!(PlayTagFilter::all(), PlayTagFilter::default());
    }
}
