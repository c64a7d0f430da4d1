//! # Tag Vocabulary
//!
//! The finite catalog of action tags a tagger can record. The built-in catalog
//! is seeded into the record store once; sessions then resolve action names
//! against whatever the store holds.

use std::collections::HashMap;

use crate::models::{NewTag, Tag, TagCategory, TagId};

/// Built-in catalog: every action offered by the capture flow.
pub const DEFAULT_TAGS: &[(&str, TagCategory)] = &[
    // Play starters
    ("Isolation", TagCategory::Offense),
    ("Pick and Roll", TagCategory::Offense),
    ("Post Up", TagCategory::Offense),
    ("Spot Up", TagCategory::Offense),
    ("Transition", TagCategory::Transition),
    ("Double Teamed", TagCategory::Defense),
    ("Timeout", TagCategory::Offense),
    // Half-court actions
    ("Drive to Basket", TagCategory::Offense),
    ("Reject Screen", TagCategory::Offense),
    ("Post Move", TagCategory::Offense),
    ("Split Double", TagCategory::Offense),
    ("Pick Up Dribble", TagCategory::Defense),
    ("Shot Fake Drive", TagCategory::Offense),
    ("Reset Offense", TagCategory::Offense),
    ("Pull Back", TagCategory::Transition),
    // Passing
    ("Pass Out", TagCategory::Passing),
    ("Pass to Roller", TagCategory::Passing),
    ("Kick Out", TagCategory::Passing),
    ("Swing Pass", TagCategory::Passing),
    ("Extra Pass", TagCategory::Passing),
    ("Pass Ahead", TagCategory::Passing),
    // Shots
    ("Pull Up Shot", TagCategory::Shot),
    ("Step Back Three", TagCategory::Shot),
    ("Fadeaway", TagCategory::Shot),
    ("Fast Break Layup", TagCategory::Shot),
    ("Pull Up Three", TagCategory::Shot),
    ("Forced Shot", TagCategory::Shot),
    ("Catch and Shoot", TagCategory::Shot),
    ("Layup", TagCategory::Shot),
    ("Dunk", TagCategory::Shot),
    ("Floater", TagCategory::Shot),
    // Outcomes
    ("Made Shot", TagCategory::Outcome),
    ("Missed Shot", TagCategory::Outcome),
    ("Blocked Shot", TagCategory::Outcome),
    ("And One", TagCategory::Outcome),
    ("Free Throws Made", TagCategory::Outcome),
    ("Free Throws Missed", TagCategory::Outcome),
    ("Turnover", TagCategory::Turnover),
    // Rebounds
    ("Offensive Rebound", TagCategory::Rebound),
    ("Defensive Rebound", TagCategory::Rebound),
    // Fouls
    ("Drew Foul", TagCategory::Foul),
    ("Shooting Foul", TagCategory::Foul),
    ("Non-Shooting Foul", TagCategory::Foul),
];

/// Built-in catalog as insertable records.
pub fn default_new_tags() -> Vec<NewTag> {
    DEFAULT_TAGS
        .iter()
        .map(|(name, category)| NewTag {
            name: (*name).to_string(),
            category: *category,
            is_active: true,
        })
        .collect()
}

/// Name-indexed view over a set of tags.
#[derive(Debug, Clone, Default)]
pub struct TagVocabulary {
    tags: Vec<Tag>,
    by_name: HashMap<String, usize>,
}

impl TagVocabulary {
    pub fn new(tags: Vec<Tag>) -> Self {
        let by_name = tags.iter().enumerate().map(|(i, t)| (t.name.clone(), i)).collect();
        Self { tags, by_name }
    }

    /// Built-in catalog with freshly generated ids; for offline checks.
    pub fn builtin() -> Self {
        Self::new(
            default_new_tags()
                .into_iter()
                .map(|t| Tag {
                    id: TagId::new(),
                    name: t.name,
                    category: t.category,
                    is_active: t.is_active,
                })
                .collect(),
        )
    }

    /// Active tag with the given name.
    pub fn resolve(&self, name: &str) -> Option<&Tag> {
        self.by_name.get(name).map(|&i| &self.tags[i]).filter(|t| t.is_active)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_unique() {
        let names: HashSet<_> = DEFAULT_TAGS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), DEFAULT_TAGS.len());
    }

    #[test]
    fn test_resolve_skips_inactive() {
        let mut vocab = TagVocabulary::builtin();
        assert!(vocab.contains("Pick and Roll"));
        assert!(!vocab.contains("Alley Oop"));

        vocab.tags[0].is_active = false;
        let first = vocab.tags[0].name.clone();
        assert!(vocab.resolve(&first).is_none());
    }
}
