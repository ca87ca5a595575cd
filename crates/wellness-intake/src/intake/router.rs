use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::domain::{ConsultationRequestCreate, ContactSubmissionCreate, ValidationError};
use super::notify::Notifier;
use super::service::{IntakeError, IntakeService};
use super::store::RecordStore;

/// Greeting served from the API root.
pub const GREETING: &str = "Amal Josh Wellness API - Transforming Lives Naturally";

#[derive(Debug, Serialize)]
pub(crate) struct GreetingResponse {
    pub(crate) message: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) timestamp: DateTime<Utc>,
}

/// Router builder exposing the intake endpoints under `/api`.
pub fn intake_router<S, N>(service: Arc<IntakeService<S, N>>) -> Router
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    Router::new()
        .route("/api", get(root_handler))
        .route("/api/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/contact", post(contact_handler::<S, N>))
        .route("/api/consultation", post(consultation_handler::<S, N>))
        .route("/api/contact-forms", get(contact_forms_handler::<S, N>))
        .route("/api/consultations", get(consultations_handler::<S, N>))
        .with_state(service)
}

pub(crate) async fn root_handler() -> Json<GreetingResponse> {
    Json(GreetingResponse { message: GREETING })
}

/// Liveness only; never touches the store.
pub(crate) async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

pub(crate) async fn contact_handler<S, N>(
    State(service): State<Arc<IntakeService<S, N>>>,
    body: Bytes,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    const OPERATION: &str = "create_contact_form";
    const DETAIL: &str = "Failed to submit contact form";

    let submission: ContactSubmissionCreate = match decode_payload(&body) {
        Ok(submission) => submission,
        Err(err) => return failure_response(OPERATION, DETAIL, err.into()),
    };

    match service.submit_contact(submission).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => failure_response(OPERATION, DETAIL, err),
    }
}

pub(crate) async fn consultation_handler<S, N>(
    State(service): State<Arc<IntakeService<S, N>>>,
    body: Bytes,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    const OPERATION: &str = "create_consultation_request";
    const DETAIL: &str = "Failed to submit consultation request";

    let request: ConsultationRequestCreate = match decode_payload(&body) {
        Ok(request) => request,
        Err(err) => return failure_response(OPERATION, DETAIL, err.into()),
    };

    match service.request_consultation(request).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => failure_response(OPERATION, DETAIL, err),
    }
}

pub(crate) async fn contact_forms_handler<S, N>(
    State(service): State<Arc<IntakeService<S, N>>>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    match service.recent_contacts().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => failure_response("list_contact_forms", "Failed to fetch contact forms", err),
    }
}

pub(crate) async fn consultations_handler<S, N>(
    State(service): State<Arc<IntakeService<S, N>>>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    match service.recent_consultations().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => failure_response("list_consultations", "Failed to fetch consultations", err),
    }
}

/// Decode a creation payload whatever the declared content type; every
/// syntax or schema problem becomes a [`ValidationError`].
fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, ValidationError> {
    serde_json::from_slice(body).map_err(|err| ValidationError::Payload(err.to_string()))
}

fn failure_response(operation: &'static str, detail: &'static str, err: IntakeError) -> Response {
    match err {
        IntakeError::Validation(error) => {
            tracing::warn!(operation, error = %error, "rejected submission");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        IntakeError::Storage(error) => {
            tracing::error!(operation, error = %error, "record store operation failed");
            let payload = json!({ "error": detail });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
