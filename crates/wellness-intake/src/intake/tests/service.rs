use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use crate::intake::domain::{CONSULTATION_INITIAL_STATUS, CONTACT_INITIAL_STATUS};
use crate::intake::store::{Collection, RecordStore, LIST_LIMIT};
use crate::intake::{IntakeError, IntakeService, MemoryStore};

#[tokio::test]
async fn submit_contact_assigns_identity_and_notifies() {
    let (service, store, mut notifications) = build_service();

    let record = service
        .submit_contact(contact_submission())
        .await
        .expect("submission succeeds");

    assert!(!record.id.as_str().is_empty());
    assert_eq!(record.status, CONTACT_INITIAL_STATUS);
    assert_eq!(record.full_name, "Jane Doe");
    assert_eq!(record.email.as_str(), "jane@example.com");
    assert_eq!(store.len(Collection::ContactForms), 1);

    let notified = tokio::time::timeout(Duration::from_secs(1), notifications.recv())
        .await
        .expect("notification dispatched")
        .expect("channel open");
    assert_eq!(notified, record);
}

#[tokio::test]
async fn consultation_requests_start_pending_with_distinct_ids() {
    let (service, store, mut notifications) = build_service();

    let first = service
        .request_consultation(consultation_request())
        .await
        .expect("first request stored");
    let second = service
        .request_consultation(consultation_request())
        .await
        .expect("second request stored");

    assert_eq!(first.status, CONSULTATION_INITIAL_STATUS);
    assert_eq!(second.status, CONSULTATION_INITIAL_STATUS);
    assert_ne!(first.id, second.id);
    assert_eq!(store.len(Collection::ConsultationRequests), 2);
    assert!(
        notifications.try_recv().is_err(),
        "consultations do not trigger the contact notifier"
    );
}

#[tokio::test]
async fn recent_consultations_are_newest_first_and_capped() {
    let (service, _, _) = build_service();

    for _ in 0..(LIST_LIMIT + 5) {
        service
            .request_consultation(consultation_request())
            .await
            .expect("request stored");
    }

    let recent = service
        .recent_consultations()
        .await
        .expect("list succeeds");

    assert_eq!(recent.len(), LIST_LIMIT);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp));
}

#[tokio::test]
async fn created_contact_round_trips_through_listing() {
    let (service, _, _) = build_service();

    let mut submission = contact_submission();
    submission.health_concern = Some("poor sleep".to_string());
    let created = service
        .submit_contact(submission)
        .await
        .expect("submission succeeds");

    let listed = service.recent_contacts().await.expect("list succeeds");
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn storage_failures_surface_as_storage_errors() {
    let service = IntakeService::new(Arc::new(UnavailableStore), Arc::new(FailingNotifier));

    let err = service
        .submit_contact(contact_submission())
        .await
        .expect_err("write fails");
    assert!(matches!(err, IntakeError::Storage(_)));

    let err = service
        .recent_contacts()
        .await
        .expect_err("read fails");
    assert!(matches!(err, IntakeError::Storage(_)));
}

#[tokio::test]
async fn failed_notification_does_not_fail_submission() {
    let store = MemoryStore::default();
    let service = IntakeService::new(Arc::new(store.clone()), Arc::new(FailingNotifier));

    let record = service
        .submit_contact(contact_submission())
        .await
        .expect("submission still succeeds");

    assert_eq!(record.status, CONTACT_INITIAL_STATUS);
    assert_eq!(store.len(Collection::ContactForms), 1);
}

#[tokio::test]
async fn closed_store_rejects_reads() {
    let (service, store, _) = build_service();
    store.close().await;

    assert!(matches!(
        service.recent_consultations().await,
        Err(IntakeError::Storage(_))
    ));
}
