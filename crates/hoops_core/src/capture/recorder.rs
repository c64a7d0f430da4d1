use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::CaptureError;
use crate::models::Tag;

/// One pending selection. `position_index` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequenceEntry {
    pub tag: Tag,
    pub action_name: String,
    pub position_index: u32,
}

/// The play being built.
///
/// Positions always run `1..=len` with no gaps: appends take the next position
/// and removals renumber whatever follows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceRecorder {
    entries: Vec<SequenceEntry>,
}

impl SequenceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag) -> &SequenceEntry {
        let position_index = self.entries.len() as u32 + 1;
        self.entries.push(SequenceEntry { action_name: tag.name.clone(), tag, position_index });
        &self.entries[self.entries.len() - 1]
    }

    pub fn extend(&mut self, tags: impl IntoIterator<Item = Tag>) {
        for tag in tags {
            self.push(tag);
        }
    }

    /// Drop the most recent entry.
    pub fn pop(&mut self) -> Option<SequenceEntry> {
        self.entries.pop()
    }

    /// Remove the entry at 1-based `position` and renumber the rest.
    pub fn remove(&mut self, position: usize) -> Result<SequenceEntry, CaptureError> {
        if position == 0 || position > self.entries.len() {
            return Err(CaptureError::InvalidPosition(position));
        }
        let removed = self.entries.remove(position - 1);
        self.renumber();
        Ok(removed)
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.position_index = i as u32 + 1;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[SequenceEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&SequenceEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.action_name.as_str()).collect()
    }

    pub fn is_contiguous(&self) -> bool {
        self.entries.iter().enumerate().all(|(i, e)| e.position_index == i as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::TagVocabulary;
    use proptest::prelude::*;

    fn tags(names: &[&str]) -> Vec<Tag> {
        let vocab = TagVocabulary::builtin();
        names.iter().map(|n| vocab.resolve(n).unwrap().clone()).collect()
    }

    #[test]
    fn test_push_assigns_next_position() {
        let mut rec = SequenceRecorder::new();
        rec.extend(tags(&["Pick and Roll", "Pass to Roller"]));
        assert_eq!(rec.entries()[1].position_index, 2);
        assert_eq!(rec.last().unwrap().action_name, "Pass to Roller");
    }

    #[test]
    fn test_remove_renumbers() {
        let mut rec = SequenceRecorder::new();
        rec.extend(tags(&["Post Up", "Double Teamed", "Pass Out", "Catch and Shoot"]));

        let removed = rec.remove(2).unwrap();
        assert_eq!(removed.action_name, "Double Teamed");
        assert_eq!(rec.action_names(), vec!["Post Up", "Pass Out", "Catch and Shoot"]);
        assert!(rec.is_contiguous());
        assert_eq!(rec.entries()[2].position_index, 3);
    }

    #[test]
    fn test_remove_out_of_range_leaves_entries() {
        let mut rec = SequenceRecorder::new();
        rec.extend(tags(&["Isolation"]));
        assert!(matches!(rec.remove(0), Err(CaptureError::InvalidPosition(0))));
        assert!(matches!(rec.remove(2), Err(CaptureError::InvalidPosition(2))));
        assert_eq!(rec.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_positions_stay_contiguous(
            len in 1usize..12,
            removals in proptest::collection::vec(0usize..12, 0..6)
        ) {
            let vocab = TagVocabulary::builtin();
            let mut rec = SequenceRecorder::new();
            rec.extend(vocab.tags().iter().take(len).cloned());

            for r in removals {
                if rec.is_empty() {
                    break;
                }
                let before = rec.len();
                let _ = rec.remove(r % before + 1);
                prop_assert_eq!(rec.len(), before - 1);
                prop_assert!(rec.is_contiguous());
            }
        }
    }
}
