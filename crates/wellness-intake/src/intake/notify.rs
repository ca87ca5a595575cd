use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use super::domain::ContactSubmission;

/// Outbound hook run after a contact submission is stored (e-mail, SMS, ...).
///
/// Implementations report delivery with the returned flag and must not panic;
/// a panic is still contained by [`dispatch`].
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, record: &ContactSubmission) -> bool;
}

/// Default notifier: records the submission in the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, record: &ContactSubmission) -> bool {
        tracing::info!(
            record_id = %record.id,
            "new contact form submission from {} ({})",
            record.full_name,
            record.email
        );
        true
    }
}

/// Run the notifier on its own task so the response never waits on it.
pub fn dispatch<N>(notifier: Arc<N>, record: ContactSubmission) -> JoinHandle<()>
where
    N: Notifier + ?Sized + 'static,
{
    tokio::spawn(async move {
        let record_id = record.id.clone();
        let delivery = tokio::spawn(async move { notifier.notify(&record).await }).await;

        match delivery {
            Ok(true) => tracing::debug!(%record_id, "contact notification delivered"),
            Ok(false) => tracing::warn!(%record_id, "contact notification was not delivered"),
            Err(err) => tracing::error!(%record_id, error = %err, "contact notification task failed"),
        }
    })
}
