use std::collections::HashMap;

use crate::models::{GameId, PlayId};
use crate::store::PlayTagRow;

/// One persisted play's tag rows, ordered by recorded position.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSequence {
    pub play_id: PlayId,
    pub game_id: GameId,
    pub rows: Vec<PlayTagRow>,
}

impl TagSequence {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.tag_name.as_str())
    }

    /// Tags at positions 1 and 2, if the play has at least two.
    pub fn first_pair(&self) -> Option<(&str, &str)> {
        match self.rows.as_slice() {
            [first, second, ..] => Some((first.tag_name.as_str(), second.tag_name.as_str())),
            _ => None,
        }
    }
}

/// Group rows by play and order each group by position.
///
/// Groups come back in the order their first row appears. Rows without a
/// recorded position sort as position 1; the sort is stable, so ties keep
/// commit order.
pub fn reconstruct(rows: Vec<PlayTagRow>) -> Vec<TagSequence> {
    let mut index: HashMap<PlayId, usize> = HashMap::new();
    let mut sequences: Vec<TagSequence> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.play_id).or_insert_with(|| {
            sequences.push(TagSequence { play_id: row.play_id, game_id: row.game_id, rows: Vec::new() });
            sequences.len() - 1
        });
        sequences[slot].rows.push(row);
    }

    for sequence in &mut sequences {
        sequence.rows.sort_by_key(|r| r.context.position());
    }
    sequences
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{PlayTagContext, PlayTagId, PlayerId, TagId, TeamId};
    use crate::store::PlayTagRow;

    use super::*;

    /// Rows for one play, positions 1..=n, attributed to `player`.
    pub fn play_rows(player: PlayerId, team: TeamId, game: GameId, names: &[&str]) -> Vec<PlayTagRow> {
        let play_id = PlayId::new();
        names
            .iter()
            .enumerate()
            .map(|(i, name)| PlayTagRow {
                play_tag_id: PlayTagId::new(),
                play_id,
                game_id: game,
                quarter: 1,
                tag_id: TagId::new(),
                tag_name: (*name).to_string(),
                tag_category: None,
                player_id: player,
                team_id: team,
                context: PlayTagContext {
                    action: (*name).to_string(),
                    sequence: Some(i as u32 + 1),
                    total_actions: names.len() as u32,
                    coverage_type: None,
                    possession_type: None,
                },
                confidence: 1.0,
            })
            .collect()
    }
}
