//! Contact and consultation intake: payload validation, record storage, and
//! the HTTP surface that ties them together.

pub mod domain;
pub mod notify;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ConsultationRequest, ConsultationRequestCreate, ContactSubmission, ContactSubmissionCreate,
    EmailAddress, RecordId, ValidationError,
};
pub use notify::{LogNotifier, Notifier};
pub use router::intake_router;
pub use service::{IntakeError, IntakeService};
pub use store::{
    Collection, MemoryStore, PostgresStore, RecordStore, RecordStoreExt, StorageError,
    StoreHandle, LIST_LIMIT,
};
