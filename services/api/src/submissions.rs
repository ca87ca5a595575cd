use clap::{Args, ValueEnum};
use std::fmt::Write as _;
use wellness_intake::config::AppConfig;
use wellness_intake::error::AppError;
use wellness_intake::intake::store;
use wellness_intake::intake::{
    ConsultationRequest, ContactSubmission, RecordStore, RecordStoreExt, LIST_LIMIT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SubmissionKind {
    /// Contact form submissions
    Contacts,
    /// Consultation requests
    Consultations,
}

#[derive(Args, Debug)]
pub(crate) struct SubmissionsArgs {
    /// Which collection to print
    #[arg(value_enum)]
    pub(crate) kind: SubmissionKind,
    /// Number of records to show (newest first, at most 100)
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
}

pub(crate) async fn run_submissions_listing(args: SubmissionsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = store::connect(&config.store).await?;
    let limit = args.limit.min(LIST_LIMIT);

    let rendered = match args.kind {
        SubmissionKind::Contacts => {
            let records: Vec<ContactSubmission> = store.list_recent_records(limit).await?;
            render_contacts(&records)
        }
        SubmissionKind::Consultations => {
            let records: Vec<ConsultationRequest> = store.list_recent_records(limit).await?;
            render_consultations(&records)
        }
    };

    store.close().await;
    print!("{rendered}");
    Ok(())
}

fn render_contacts(records: &[ContactSubmission]) -> String {
    if records.is_empty() {
        return "No contact submissions recorded.\n".to_string();
    }

    let mut out = format!("Contact submissions ({} newest first)\n", records.len());
    for record in records {
        let _ = writeln!(
            out,
            "- {} | {} | {} <{}> | {} | status {}",
            record.timestamp.format("%Y-%m-%d %H:%M UTC"),
            record.id,
            record.full_name,
            record.email,
            record.phone,
            record.status
        );
        if let Some(concern) = &record.health_concern {
            let _ = writeln!(out, "    concern: {concern}");
        }
        let _ = writeln!(out, "    goals: {}", record.health_goals);
    }
    out
}

fn render_consultations(records: &[ConsultationRequest]) -> String {
    if records.is_empty() {
        return "No consultation requests recorded.\n".to_string();
    }

    let mut out = format!("Consultation requests ({} newest first)\n", records.len());
    for record in records {
        let _ = writeln!(
            out,
            "- {} | {} | {} <{}> | {} | status {}",
            record.timestamp.format("%Y-%m-%d %H:%M UTC"),
            record.id,
            record.name,
            record.email,
            record.phone,
            record.status
        );
        if let Some(date) = &record.preferred_date {
            let _ = writeln!(out, "    preferred date: {date}");
        }
        if let Some(message) = &record.message {
            let _ = writeln!(out, "    message: {message}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wellness_intake::intake::{
        ConsultationRequestCreate, ContactSubmissionCreate, EmailAddress, RecordId,
    };

    #[test]
    fn empty_collections_render_placeholder() {
        assert_eq!(render_contacts(&[]), "No contact submissions recorded.\n");
        assert_eq!(
            render_consultations(&[]),
            "No consultation requests recorded.\n"
        );
    }

    #[test]
    fn contact_rows_include_optional_concern() {
        let record = ContactSubmission::from_submission(
            ContactSubmissionCreate {
                full_name: "Jane Doe".to_string(),
                email: EmailAddress::parse("jane@example.com").unwrap(),
                phone: "555-1234".to_string(),
                health_concern: Some("fatigue".to_string()),
                health_goals: "more energy".to_string(),
            },
            RecordId("c-1".to_string()),
            Utc.with_ymd_and_hms(2025, 4, 2, 14, 5, 0).unwrap(),
        );

        let rendered = render_contacts(&[record]);
        assert!(rendered.starts_with("Contact submissions (1 newest first)"));
        assert!(rendered.contains(
            "- 2025-04-02 14:05 UTC | c-1 | Jane Doe <jane@example.com> | 555-1234 | status new"
        ));
        assert!(rendered.contains("concern: fatigue"));
        assert!(rendered.contains("goals: more energy"));
    }

    #[test]
    fn consultation_rows_skip_missing_fields() {
        let record = ConsultationRequest::from_submission(
            ConsultationRequestCreate {
                name: "Sam Patel".to_string(),
                email: EmailAddress::parse("sam@example.com").unwrap(),
                phone: "555-9876".to_string(),
                preferred_date: None,
                message: Some("Evenings".to_string()),
            },
            RecordId("r-1".to_string()),
            Utc.with_ymd_and_hms(2025, 4, 3, 9, 0, 0).unwrap(),
        );

        let rendered = render_consultations(&[record]);
        assert!(rendered.contains("status pending"));
        assert!(!rendered.contains("preferred date"));
        assert!(rendered.contains("message: Evenings"));
    }
}
