use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::intake::domain::{
    ConsultationRequestCreate, ContactSubmission, ContactSubmissionCreate, EmailAddress,
};
use crate::intake::notify::Notifier;
use crate::intake::store::{
    Collection, MemoryStore, RecordStore, StorageError, StoredDocument,
};
use crate::intake::{intake_router, IntakeService};

pub(super) fn contact_submission() -> ContactSubmissionCreate {
    ContactSubmissionCreate {
        full_name: "Jane Doe".to_string(),
        email: EmailAddress::parse("jane@example.com").expect("valid email"),
        phone: "555-1234".to_string(),
        health_concern: None,
        health_goals: "more energy".to_string(),
    }
}

pub(super) fn consultation_request() -> ConsultationRequestCreate {
    ConsultationRequestCreate {
        name: "Sam Patel".to_string(),
        email: EmailAddress::parse("sam@example.com").expect("valid email"),
        phone: "555-9876".to_string(),
        preferred_date: Some("next Tuesday morning".to_string()),
        message: Some("Interested in a nutrition plan".to_string()),
    }
}

/// Forwards every notified record to a channel the test can await.
#[derive(Clone)]
pub(super) struct RecordingNotifier {
    sender: UnboundedSender<ContactSubmission>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, record: &ContactSubmission) -> bool {
        self.sender.send(record.clone()).is_ok()
    }
}

pub(super) fn recording_notifier() -> (RecordingNotifier, UnboundedReceiver<ContactSubmission>) {
    let (sender, receiver) = unbounded_channel();
    (RecordingNotifier { sender }, receiver)
}

pub(super) struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _record: &ContactSubmission) -> bool {
        false
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn insert(
        &self,
        _collection: Collection,
        _document: StoredDocument,
    ) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }

    async fn list_recent(
        &self,
        _collection: Collection,
        _limit: usize,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }

    async fn close(&self) {}
}

pub(super) type MemoryService = IntakeService<MemoryStore, RecordingNotifier>;

pub(super) fn build_service() -> (
    MemoryService,
    MemoryStore,
    UnboundedReceiver<ContactSubmission>,
) {
    let store = MemoryStore::default();
    let (notifier, notifications) = recording_notifier();
    let service = IntakeService::new(Arc::new(store.clone()), Arc::new(notifier));
    (service, store, notifications)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    intake_router(Arc::new(service))
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
