use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::error_codes;
use crate::analysis::{DecisionQualityReport, TagSuggestion};
use crate::capture::CaptureError;
use crate::error::CoreError;
use crate::flow::{FlowError, FlowState};
use crate::models::{GameId, Play, PlayerId, TeamId};
use crate::service::TaggingService;
use crate::store::StoreError;

pub const SCHEMA_VERSION: u8 = 1;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn core_error_code(err: &CoreError) -> &'static str {
    match err {
        CoreError::Capture(e) if e.is_precondition() => error_codes::PRECONDITION_FAILED,
        CoreError::Capture(CaptureError::IllegalAction { .. }) => error_codes::ILLEGAL_ACTION,
        CoreError::Capture(CaptureError::UnknownTag(_))
        | CoreError::Capture(CaptureError::UnknownQuickSequence(_)) => error_codes::UNKNOWN_TAG,
        CoreError::Capture(CaptureError::NothingToCommit) => error_codes::NOTHING_TO_COMMIT,
        CoreError::Capture(CaptureError::NonContiguous(_))
        | CoreError::Capture(CaptureError::InvalidPosition(_)) => error_codes::INVALID_SEQUENCE,
        CoreError::Capture(CaptureError::Commit(StoreError::NotFound { .. })) => error_codes::NOT_FOUND,
        CoreError::Capture(CaptureError::Commit(_)) => error_codes::COMMIT_FAILED,
        CoreError::Capture(CaptureError::Flow(_)) | CoreError::Flow(FlowError::UnknownState(_)) => {
            error_codes::UNKNOWN_STATE
        }
        CoreError::Capture(_) => error_codes::INVALID_REQUEST,
        CoreError::Flow(_) => error_codes::CONFIG_ERROR,
        CoreError::Config(_) => error_codes::CONFIG_ERROR,
        CoreError::NotFound { .. } | CoreError::Store(StoreError::NotFound { .. }) => {
            error_codes::NOT_FOUND
        }
        CoreError::Store(_) => error_codes::STORE_ERROR,
        CoreError::InvalidParameter(_) => error_codes::INVALID_REQUEST,
    }
}

fn fail(operation: &str, err: CoreError) -> String {
    let code = core_error_code(&err);
    warn!(operation, code, "request failed: {}", err);
    err_code(code, err)
}

fn parse_request<'a, T: Deserialize<'a>>(request_json: &'a str) -> Result<T, String> {
    serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("Invalid JSON request: {}", e)))
}

fn check_version(version: u8) -> Result<(), String> {
    if version == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA_VERSION,
            format!("expected {SCHEMA_VERSION}, got {version}"),
        ))
    }
}

fn to_json<T: Serialize>(response: &T) -> Result<String, String> {
    serde_json::to_string(response).map_err(|e| err_code(error_codes::SERIALIZATION_FAILED, e))
}

// ============================================================================
// submitSequence
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSequenceRequest {
    #[serde(alias = "schema_version")]
    pub schema_version: u8,
    pub game_id: GameId,
    pub quarter: u8,
    /// `M:SS` remaining in the period
    pub game_time: String,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    /// Action names in recorded order
    pub sequence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSequenceResponse {
    pub schema_version: u8,
    pub play: Play,
}

pub fn submit_sequence_json(service: &TaggingService, request_json: &str) -> Result<String, String> {
    let request: SubmitSequenceRequest = parse_request(request_json)?;
    check_version(request.schema_version)?;
    debug!(game = %request.game_id, actions = request.sequence.len(), "submitSequence");

    let play = service
        .submit_sequence(
            request.game_id,
            request.quarter,
            &request.game_time,
            request.player_id,
            request.team_id,
            &request.sequence,
        )
        .map_err(|e| fail("submitSequence", e))?;

    info!(play = %play.id, tags = play.tags.len(), "sequence submitted");
    to_json(&SubmitSequenceResponse { schema_version: SCHEMA_VERSION, play })
}

// ============================================================================
// getPlayerDecisionQuality
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionQualityRequest {
    #[serde(alias = "schema_version")]
    pub schema_version: u8,
    pub player_id: PlayerId,
    #[serde(default)]
    pub game_id: Option<GameId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionQualityResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub report: DecisionQualityReport,
}

pub fn get_player_decision_quality_json(
    service: &TaggingService,
    request_json: &str,
) -> Result<String, String> {
    let request: DecisionQualityRequest = parse_request(request_json)?;
    check_version(request.schema_version)?;

    let report = service
        .player_decision_quality(request.player_id, request.game_id)
        .map_err(|e| fail("getPlayerDecisionQuality", e))?;

    debug!(
        player = %request.player_id,
        decisions = report.aggregate.total_decisions,
        grade = %report.aggregate.grade,
        "decision quality computed"
    );
    to_json(&DecisionQualityResponse { schema_version: SCHEMA_VERSION, report })
}

// ============================================================================
// getNextTagSuggestions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
    #[serde(alias = "schema_version")]
    pub schema_version: u8,
    pub last_tag_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub schema_version: u8,
    pub suggestions: Vec<TagSuggestion>,
}

pub fn get_next_tag_suggestions_json(
    service: &TaggingService,
    request_json: &str,
) -> Result<String, String> {
    let request: SuggestionsRequest = parse_request(request_json)?;
    check_version(request.schema_version)?;

    let suggestions = service
        .next_tag_suggestions(&request.last_tag_name)
        .map_err(|e| fail("getNextTagSuggestions", e))?;
    to_json(&SuggestionsResponse { schema_version: SCHEMA_VERSION, suggestions })
}

// ============================================================================
// getFlowState
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowStateRequest {
    #[serde(alias = "schema_version")]
    pub schema_version: u8,
    pub state_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowStateResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub state: FlowState,
}

pub fn get_flow_state_json(service: &TaggingService, request_json: &str) -> Result<String, String> {
    let request: FlowStateRequest = parse_request(request_json)?;
    check_version(request.schema_version)?;

    let state = service.flow_state(&request.state_key).map_err(|e| fail("getFlowState", e))?;
    to_json(&FlowStateResponse { schema_version: SCHEMA_VERSION, state })
}

/// JSON schemas of every request and response type, keyed by type name.
pub fn api_schemas() -> BTreeMap<&'static str, RootSchema> {
    BTreeMap::from([
        ("SubmitSequenceRequest", schema_for!(SubmitSequenceRequest)),
        ("SubmitSequenceResponse", schema_for!(SubmitSequenceResponse)),
        ("DecisionQualityRequest", schema_for!(DecisionQualityRequest)),
        ("DecisionQualityResponse", schema_for!(DecisionQualityResponse)),
        ("SuggestionsRequest", schema_for!(SuggestionsRequest)),
        ("SuggestionsResponse", schema_for!(SuggestionsResponse)),
        ("FlowStateRequest", schema_for!(FlowStateRequest)),
        ("FlowStateResponse", schema_for!(FlowStateResponse)),
    ])
}
