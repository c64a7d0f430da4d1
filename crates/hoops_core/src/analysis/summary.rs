use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::GameId;
use crate::store::{PlayTagFilter, RecordStore, StoreResult};

/// Tag counts across all committed plays of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameTagSummary {
    pub game_id: GameId,
    pub play_count: usize,
    pub tag_count: usize,
    pub by_tag: BTreeMap<String, u32>,
    pub by_category: BTreeMap<String, u32>,
}

pub fn game_tag_summary(store: &dyn RecordStore, game_id: GameId) -> StoreResult<GameTagSummary> {
    let play_count = store.plays_for_game(game_id)?.len();
    let rows = store.play_tags(&PlayTagFilter::all().in_game(Some(game_id)))?;

    let mut by_tag = BTreeMap::new();
    let mut by_category = BTreeMap::new();
    for row in &rows {
        *by_tag.entry(row.tag_name.clone()).or_insert(0) += 1;
        let category = row.tag_category.map_or("Uncategorized", |c| c.as_str());
        *by_category.entry(category.to_string()).or_insert(0) += 1;
    }

    Ok(GameTagSummary { game_id, play_count, tag_count: rows.len(), by_tag, by_category })
}
