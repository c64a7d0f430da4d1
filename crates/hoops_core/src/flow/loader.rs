//! Flow definition loading.
//!
//! The default flow ships as YAML embedded at compile time and is parsed on
//! first use.

use serde::Deserialize;
use std::sync::OnceLock;

use super::{FlowError, FlowGraph, FlowState};

/// Default capture flow (compile-time embedded)
pub const CAPTURE_FLOW_YAML: &str = include_str!("../../data/capture_flow.yaml");

static BUILTIN_FLOW: OnceLock<FlowGraph> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct FlowDocument {
    states: Vec<FlowState>,
}

pub(super) fn parse_flow_yaml(yaml: &str) -> Result<FlowGraph, FlowError> {
    let doc: FlowDocument =
        serde_yaml::from_str(yaml).map_err(|e| FlowError::Parse(e.to_string()))?;
    let graph = FlowGraph::new(doc.states)?;
    log::debug!("Loaded capture flow with {} states", graph.order.len());
    Ok(graph)
}

/// Embedded default flow.
///
/// # Panics
///
/// Panics if the embedded YAML is invalid. The data is compiled in and covered
/// by tests, so this indicates a broken build rather than a runtime condition.
pub fn builtin_graph() -> &'static FlowGraph {
    BUILTIN_FLOW.get_or_init(|| {
        parse_flow_yaml(CAPTURE_FLOW_YAML).expect("embedded capture_flow.yaml is invalid")
    })
}
