use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{
    ConsultationRequest, ConsultationRequestCreate, ContactSubmission, ContactSubmissionCreate,
    RecordId, ValidationError,
};
use super::notify::{dispatch, Notifier};
use super::store::{RecordStore, RecordStoreExt, StorageError, LIST_LIMIT};

/// Service composing the record store and the contact notification hook.
pub struct IntakeService<S: ?Sized, N: ?Sized> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> IntakeService<S, N>
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Store a contact submission and hand it to the notifier.
    pub async fn submit_contact(
        &self,
        submission: ContactSubmissionCreate,
    ) -> Result<ContactSubmission, IntakeError> {
        let (id, timestamp) = server_identity();
        let record = ContactSubmission::from_submission(submission, id, timestamp);

        self.store.insert_record(&record).await?;
        dispatch(self.notifier.clone(), record.clone());

        Ok(record)
    }

    /// Store a consultation request.
    pub async fn request_consultation(
        &self,
        request: ConsultationRequestCreate,
    ) -> Result<ConsultationRequest, IntakeError> {
        let (id, timestamp) = server_identity();
        let record = ConsultationRequest::from_submission(request, id, timestamp);

        self.store.insert_record(&record).await?;
        Ok(record)
    }

    /// Newest contact submissions first, capped at [`LIST_LIMIT`].
    pub async fn recent_contacts(&self) -> Result<Vec<ContactSubmission>, IntakeError> {
        let records: Vec<ContactSubmission> = self.store.list_recent_records(LIST_LIMIT).await?;
        Ok(records)
    }

    pub async fn recent_consultations(&self) -> Result<Vec<ConsultationRequest>, IntakeError> {
        let records: Vec<ConsultationRequest> =
            self.store.list_recent_records(LIST_LIMIT).await?;
        Ok(records)
    }
}

fn server_identity() -> (RecordId, DateTime<Utc>) {
    (RecordId::generate(), Utc::now())
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
