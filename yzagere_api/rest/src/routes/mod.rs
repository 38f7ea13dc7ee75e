use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use yzagere_models::contact::RelayResponse;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn error(code: StatusCode, error: impl Into<String>) -> Response {
    (code, Json(RelayResponse::error(error))).into_response()
}
