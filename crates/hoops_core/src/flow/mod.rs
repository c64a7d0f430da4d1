//! # Capture Flow Graph
//!
//! State machine behind the tagging UI. Each state offers a fixed menu of
//! actions; each action either leads to another state or ends the walk and
//! returns the session to [`INITIAL_STATE`].
//!
//! ```rust
//! use hoops_core::flow::{FlowGraph, INITIAL_STATE};
//!
//! let graph = FlowGraph::builtin();
//! let start = graph.state(INITIAL_STATE).unwrap();
//! assert!(start.option("Pick and Roll").is_some());
//! ```

mod loader;

pub use loader::{builtin_graph, CAPTURE_FLOW_YAML};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::vocabulary::TagVocabulary;

/// Key of the single entry state.
pub const INITIAL_STATE: &str = "initial";
/// Terminal sentinel accepted in place of a state key.
pub const END_MARKER: &str = "end";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Flow definition parse error: {0}")]
    Parse(String),

    #[error("Flow must define exactly one '{INITIAL_STATE}' state")]
    MissingInitial,

    #[error("'{END_MARKER}' is reserved and cannot name a flow state")]
    ReservedKey,

    #[error("Duplicate flow state '{0}'")]
    DuplicateState(String),

    #[error("Flow state '{0}' offers no options")]
    EmptyState(String),

    #[error("State '{state}' offers '{action}' more than once")]
    DuplicateAction { state: String, action: String },

    #[error("Option '{action}' in state '{state}' points to undefined state '{target}'")]
    DanglingReference { state: String, action: String, target: String },

    #[error("Unknown flow state '{0}'")]
    UnknownState(String),
}

/// Where an option leads once chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NextStep {
    State(String),
    #[default]
    End,
}

impl From<String> for NextStep {
    fn from(raw: String) -> Self {
        let key = raw.trim();
        if key.is_empty() || key == END_MARKER {
            NextStep::End
        } else {
            NextStep::State(key.to_string())
        }
    }
}

impl From<NextStep> for String {
    fn from(next: NextStep) -> Self {
        match next {
            NextStep::State(key) => key,
            NextStep::End => END_MARKER.to_string(),
        }
    }
}

/// One selectable action in a state's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowOption {
    #[serde(alias = "action")]
    pub action_name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, rename = "nextStateKey", alias = "next")]
    #[schemars(with = "String")]
    pub next: NextStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<FlowOption>,
}

impl FlowState {
    pub fn option(&self, action_name: &str) -> Option<&FlowOption> {
        self.options.iter().find(|o| o.action_name == action_name)
    }
}

/// Validated capture flow: every `next` resolves, exactly one entry state.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    states: HashMap<String, FlowState>,
    /// Definition order, for listings
    order: Vec<String>,
}

impl FlowGraph {
    /// Build and validate a graph from a list of states.
    pub fn new(states: Vec<FlowState>) -> Result<Self, FlowError> {
        let mut map = HashMap::with_capacity(states.len());
        let mut order = Vec::with_capacity(states.len());

        for state in states {
            if map.contains_key(&state.key) {
                return Err(FlowError::DuplicateState(state.key));
            }
            order.push(state.key.clone());
            map.insert(state.key.clone(), state);
        }

        let graph = Self { states: map, order };
        graph.validate()?;
        Ok(graph)
    }

    /// Parse a YAML flow document (`states: [...]`).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FlowError> {
        loader::parse_flow_yaml(yaml)
    }

    /// Embedded default flow, parsed once.
    pub fn builtin() -> &'static FlowGraph {
        builtin_graph()
    }

    fn validate(&self) -> Result<(), FlowError> {
        if !self.states.contains_key(INITIAL_STATE) {
            return Err(FlowError::MissingInitial);
        }

        if self.states.contains_key(END_MARKER) {
            return Err(FlowError::ReservedKey);
        }

        for key in &self.order {
            let state = &self.states[key];
            if state.options.is_empty() {
                return Err(FlowError::EmptyState(key.clone()));
            }

            let mut seen = std::collections::HashSet::new();
            for option in &state.options {
                if !seen.insert(option.action_name.as_str()) {
                    return Err(FlowError::DuplicateAction {
                        state: key.clone(),
                        action: option.action_name.clone(),
                    });
                }
                if let NextStep::State(target) = &option.next {
                    if !self.states.contains_key(target) {
                        return Err(FlowError::DanglingReference {
                            state: key.clone(),
                            action: option.action_name.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn state(&self, key: &str) -> Result<&FlowState, FlowError> {
        self.states.get(key).ok_or_else(|| FlowError::UnknownState(key.to_string()))
    }

    pub fn initial(&self) -> &FlowState {
        // presence checked in validate()
        &self.states[INITIAL_STATE]
    }

    pub fn contains(&self, key: &str) -> bool {
        self.states.contains_key(key)
    }

    /// States in definition order.
    pub fn states(&self) -> impl Iterator<Item = &FlowState> {
        self.order.iter().map(move |k| &self.states[k])
    }

    /// Action names used by the flow that the vocabulary cannot resolve.
    pub fn unknown_actions(&self, vocabulary: &TagVocabulary) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for state in self.states() {
            for option in &state.options {
                if !vocabulary.contains(&option.action_name)
                    && !missing.contains(&option.action_name)
                {
                    missing.push(option.action_name.clone());
                }
            }
        }
        missing
    }
}
