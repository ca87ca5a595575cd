use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status assigned to every freshly stored contact submission.
pub const CONTACT_INITIAL_STATUS: &str = "new";
/// Status assigned to every freshly stored consultation request.
pub const CONSULTATION_INITIAL_STATUS: &str = "pending";

/// Server-generated identifier shared by both record kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Syntactically checked e-mail address. Stored exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;

// Internationalized addresses are accepted: letters and digits from any script.
fn local_part_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+(?:\.[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+)*$")
            .expect("local part pattern compiles")
    })
}

fn domain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?\.)+\p{L}(?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?$",
        )
        .expect("domain pattern compiles")
    })
}

impl EmailAddress {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let invalid = |reason: &'static str| ValidationError::InvalidEmail {
            value: raw.clone(),
            reason,
        };

        if raw.len() > MAX_EMAIL_LENGTH {
            return Err(invalid("address is too long"));
        }
        let (local, domain) = raw
            .rsplit_once('@')
            .ok_or_else(|| invalid("missing '@' separator"))?;
        if local.is_empty() || local.len() > MAX_LOCAL_PART_LENGTH {
            return Err(invalid("local part must be between 1 and 64 characters"));
        }
        if !local_part_pattern().is_match(local) {
            return Err(invalid("local part contains invalid characters"));
        }
        if !domain_pattern().is_match(domain) {
            return Err(invalid("domain is not a valid host name"));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload a visitor submits through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmissionCreate {
    pub full_name: String,
    pub email: EmailAddress,
    pub phone: String,
    #[serde(default)]
    pub health_concern: Option<String>,
    pub health_goals: String,
}

/// Stored contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: RecordId,
    pub full_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub health_concern: Option<String>,
    pub health_goals: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl ContactSubmission {
    pub fn from_submission(
        input: ContactSubmissionCreate,
        id: RecordId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let ContactSubmissionCreate {
            full_name,
            email,
            phone,
            health_concern,
            health_goals,
        } = input;

        Self {
            id,
            full_name,
            email,
            phone,
            health_concern,
            health_goals,
            timestamp,
            status: CONTACT_INITIAL_STATUS.to_string(),
        }
    }
}

/// Payload a visitor submits when booking a consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRequestCreate {
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    #[serde(default)]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Stored consultation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub id: RecordId,
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub preferred_date: Option<String>,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl ConsultationRequest {
    pub fn from_submission(
        input: ConsultationRequestCreate,
        id: RecordId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let ConsultationRequestCreate {
            name,
            email,
            phone,
            preferred_date,
            message,
        } = input;

        Self {
            id,
            name,
            email,
            phone,
            preferred_date,
            message,
            timestamp,
            status: CONSULTATION_INITIAL_STATUS.to_string(),
        }
    }
}

/// Rejection raised before a submission reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("value is not a valid email address: {reason} ('{value}')")]
    InvalidEmail { value: String, reason: &'static str },
    #[error("invalid request body: {0}")]
    Payload(String),
}
