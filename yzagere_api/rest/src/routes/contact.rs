use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use tracing::{debug, error};
use yzagere_core_contact_contracts::{ContactRelayError, ContactService, RelayOutcome};
use yzagere_models::contact::{ContactFormFields, RelayResponse};

use super::error;
use crate::{models::contact::ApiRelayResponse, RestServerConfig};

pub const THANK_YOU_MESSAGE: &str =
    "Thank you for contacting us! We'll get back to you within 24 hours.";

pub fn router(service: Arc<impl ContactService>, config: Arc<RestServerConfig>) -> Router<()> {
    Router::new()
        .route(
            "/contact",
            routing::post(submit).fallback(method_not_allowed),
        )
        .with_state(ContactState { service, config })
}

struct ContactState<S> {
    service: Arc<S>,
    config: Arc<RestServerConfig>,
}

impl<S> Clone for ContactState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: Arc::clone(&self.config),
        }
    }
}

async fn submit<S: ContactService>(State(state): State<ContactState<S>>, body: Bytes) -> Response {
    let fields = serde_json::from_slice::<ContactFormFields>(&body).unwrap_or_else(|err| {
        debug!("treating unparsable contact body as empty: {err}");
        ContactFormFields::default()
    });

    match state.service.relay(fields).await {
        Ok(RelayOutcome::Delivered) => {
            Json(RelayResponse::ok_with_message(THANK_YOU_MESSAGE)).into_response()
        }
        Ok(RelayOutcome::Dropped(_)) => Json(RelayResponse::ok()).into_response(),
        Err(err @ (ContactRelayError::MissingRequiredFields | ContactRelayError::InvalidEmail)) => {
            error(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(ContactRelayError::Invalid(fields)) => (
            StatusCode::BAD_REQUEST,
            Json(ApiRelayResponse {
                response: RelayResponse::error("Invalid submission"),
                fields: Some(fields),
            }),
        )
            .into_response(),
        Err(ContactRelayError::Send) => {
            error!("smtp server did not accept the lead notification");
            delivery_failed(&state.config)
        }
        Err(ContactRelayError::Other(err)) => {
            error!("Failed to relay lead: {err:#}");
            delivery_failed(&state.config)
        }
    }
}

async fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

fn delivery_failed(config: &RestServerConfig) -> Response {
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!(
            "Failed to send message. Please try again or call us directly at {}.",
            config.fallback_phone
        ),
    )
}
