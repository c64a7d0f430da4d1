//! JSON API: `&str -> Result<String, String>` entry points over
//! [`TaggingService`](crate::service::TaggingService).
//!
//! Every request carries `schemaVersion` (currently [`SCHEMA_VERSION`]);
//! errors are `CODE: message` strings with a code from [`error_codes`].

pub mod json_api;

pub use json_api::{
    api_schemas, get_flow_state_json, get_next_tag_suggestions_json,
    get_player_decision_quality_json, submit_sequence_json, DecisionQualityRequest,
    DecisionQualityResponse, FlowStateRequest, FlowStateResponse, SubmitSequenceRequest,
    SubmitSequenceResponse, SuggestionsRequest, SuggestionsResponse, SCHEMA_VERSION,
};

/// Stable error code prefixes for JSON API failures.
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNSUPPORTED_SCHEMA_VERSION: &str = "UNSUPPORTED_SCHEMA_VERSION";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const PRECONDITION_FAILED: &str = "PRECONDITION_FAILED";
    pub const ILLEGAL_ACTION: &str = "ILLEGAL_ACTION";
    pub const UNKNOWN_TAG: &str = "UNKNOWN_TAG";
    pub const NOTHING_TO_COMMIT: &str = "NOTHING_TO_COMMIT";
    pub const INVALID_SEQUENCE: &str = "INVALID_SEQUENCE";
    pub const COMMIT_FAILED: &str = "COMMIT_FAILED";
    pub const STORE_ERROR: &str = "STORE_ERROR";
    pub const UNKNOWN_STATE: &str = "UNKNOWN_STATE";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const SERIALIZATION_FAILED: &str = "SERIALIZATION_FAILED";
}
