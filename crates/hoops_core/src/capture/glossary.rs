//! Situational context inference.
//!
//! The glossary maps action names to a coverage and/or possession type. For a
//! committed sequence the *last* action (in sequence order) with a glossary
//! entry decides the context, and that context is stamped on every tag of the
//! play, including tags that have no entry of their own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Default glossary (compile-time embedded)
pub const CONTEXT_GLOSSARY_YAML: &str = include_str!("../../data/context_glossary.yaml");

static BUILTIN_GLOSSARY: OnceLock<ContextGlossary> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub action: String,
    #[serde(default)]
    pub coverage_type: Option<String>,
    #[serde(default)]
    pub possession_type: Option<String>,
}

/// Context stamped onto every tag of a committed play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredContext {
    pub coverage_type: Option<String>,
    pub possession_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlossaryDocument {
    entries: Vec<GlossaryEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ContextGlossary {
    entries: HashMap<String, GlossaryEntry>,
}

impl ContextGlossary {
    pub fn new(entries: Vec<GlossaryEntry>) -> Self {
        // a repeated action keeps its later definition
        let entries = entries.into_iter().map(|e| (e.action.clone(), e)).collect();
        Self { entries }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let doc: GlossaryDocument = serde_yaml::from_str(yaml)?;
        Ok(Self::new(doc.entries))
    }

    /// Embedded default glossary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded YAML is invalid (a build defect, covered by tests).
    pub fn builtin() -> &'static ContextGlossary {
        BUILTIN_GLOSSARY.get_or_init(|| {
            Self::from_yaml_str(CONTEXT_GLOSSARY_YAML)
                .expect("embedded context_glossary.yaml is invalid")
        })
    }

    pub fn entry(&self, action: &str) -> Option<&GlossaryEntry> {
        self.entries.get(action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context for a whole sequence: the last matching entry wins, as a unit.
    pub fn infer<'a, I>(&self, actions: I) -> InferredContext
    where
        I: IntoIterator<Item = &'a str>,
    {
        actions
            .into_iter()
            .filter_map(|action| self.entry(action))
            .last()
            .map(|entry| InferredContext {
                coverage_type: entry.coverage_type.clone(),
                possession_type: entry.possession_type.clone(),
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_glossary_loads() {
        let glossary = ContextGlossary::builtin();
        assert!(!glossary.is_empty());
        let entry = glossary.entry("Double Teamed").unwrap();
        assert_eq!(entry.coverage_type.as_deref(), Some("Double Team"));
    }

    #[test]
    fn test_no_match_yields_empty_context() {
        let ctx = ContextGlossary::builtin().infer(["Layup", "Made Shot"]);
        assert_eq!(ctx, InferredContext::default());
    }

    #[test]
    fn test_last_match_wins_as_a_unit() {
        let glossary = ContextGlossary::new(vec![
            GlossaryEntry {
                action: "Pick and Roll".into(),
                coverage_type: Some("Drop".into()),
                possession_type: Some("Half Court".into()),
            },
            GlossaryEntry {
                action: "Transition".into(),
                coverage_type: None,
                possession_type: Some("Transition".into()),
            },
        ]);

        let ctx = glossary.infer(["Pick and Roll", "Layup", "Transition", "Made Shot"]);
        // the later entry has no coverage and clears the earlier one
        assert_eq!(ctx.coverage_type, None);
        assert_eq!(ctx.possession_type.as_deref(), Some("Transition"));

        let ctx = glossary.infer(["Transition", "Pick and Roll"]);
        assert_eq!(ctx.coverage_type.as_deref(), Some("Drop"));
        assert_eq!(ctx.possession_type.as_deref(), Some("Half Court"));
    }
}
