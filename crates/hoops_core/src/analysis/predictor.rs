use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::sequences::{reconstruct, TagSequence};
use crate::store::{PlayTagFilter, RecordStore, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TagSuggestion {
    pub name: String,
    pub count: u32,
}

/// Rank the actions that historically followed `last`.
///
/// Every adjacent pair in every sequence counts, not just the first one.
/// Ties keep the order in which the follower was first seen.
pub fn rank_next_actions<'a, I>(sequences: I, last: &str, limit: usize) -> Vec<TagSuggestion>
where
    I: IntoIterator<Item = &'a TagSequence>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<TagSuggestion> = Vec::new();

    for sequence in sequences {
        for pair in sequence.rows.windows(2) {
            if pair[0].tag_name != last {
                continue;
            }
            let next = pair[1].tag_name.as_str();
            match index.get(next) {
                Some(&i) => ranked[i].count += 1,
                None => {
                    index.insert(next, ranked.len());
                    ranked.push(TagSuggestion { name: next.to_string(), count: 1 });
                }
            }
        }
    }

    // stable: equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Suggestions for the next action, recomputed from every stored play.
pub fn next_tag_suggestions(
    store: &dyn RecordStore,
    last: &str,
    limit: usize,
) -> StoreResult<Vec<TagSuggestion>> {
    let sequences = reconstruct(store.play_tags(&PlayTagFilter::all())?);
    let ranked = rank_next_actions(&sequences, last, limit);
    log::debug!("{} suggestion(s) after '{}' from {} plays", ranked.len(), last, sequences.len());
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sequences::fixtures::play_rows;
    use crate::models::{GameId, PlayerId, TeamId};

    fn history(plays: &[&[&str]]) -> Vec<TagSequence> {
        let (player, team, game) = (PlayerId::new(), TeamId::new(), GameId::new());
        reconstruct(plays.iter().flat_map(|names| play_rows(player, team, game, names)).collect())
    }

    fn suggestion(name: &str, count: u32) -> TagSuggestion {
        TagSuggestion { name: name.to_string(), count }
    }

    #[test]
    fn test_ranks_by_frequency() {
        let seqs = history(&[
            &["Pick and Roll", "Drive to Basket"],
            &["Pick and Roll", "Drive to Basket"],
            &["Pick and Roll", "Pull Up Shot"],
        ]);
        assert_eq!(
            rank_next_actions(&seqs, "Pick and Roll", 3),
            vec![suggestion("Drive to Basket", 2), suggestion("Pull Up Shot", 1)]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order_and_limit() {
        let seqs = history(&[
            &["Isolation", "Pass Out"],
            &["Isolation", "Drive to Basket"],
            &["Isolation", "Turnover"],
            &["Isolation", "Pull Up Shot"],
            &["Isolation", "Pull Up Shot"],
        ]);
        assert_eq!(
            rank_next_actions(&seqs, "Isolation", 3),
            vec![
                suggestion("Pull Up Shot", 2),
                suggestion("Pass Out", 1),
                suggestion("Drive to Basket", 1),
            ]
        );
    }

    #[test]
    fn test_counts_pairs_beyond_the_first() {
        let seqs = history(&[&["Post Up", "Kick Out", "Catch and Shoot", "Made Shot"]]);
        assert_eq!(rank_next_actions(&seqs, "Catch and Shoot", 3), vec![suggestion("Made Shot", 1)]);
        assert!(rank_next_actions(&seqs, "Made Shot", 3).is_empty());
    }
}
