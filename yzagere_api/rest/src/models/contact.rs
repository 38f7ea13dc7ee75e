use serde::Serialize;
use yzagere_models::contact::{FieldErrors, RelayResponse};

/// Relay endpoint response carrying per-field details when the submission was
/// rejected.
#[derive(Debug, Serialize)]
pub struct ApiRelayResponse {
    #[serde(flatten)]
    pub response: RelayResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}
