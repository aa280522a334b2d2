use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message submitted through the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form payload. Validated by the API before it reaches storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Successful contact submission body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Validation failure body: the first offending field and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    pub field: String,
}

const MAX_NAME_LEN: usize = 100;
const MAX_MESSAGE_LEN: usize = 5000;

impl CreateMessageInput {
    /// Check fields in form order and report the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("name", "Name is required"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::new("name", "Name is too long"));
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ValidationError::new("email", "Invalid email address"));
        }
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ValidationError::new("message", "Message is required"));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ValidationError::new("message", "Message is too long"));
        }
        Ok(())
    }
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            message: message.to_string(),
            field: field.to_string(),
        }
    }
}

/// `local@domain.tld` with no whitespace. Deliverability is not our concern.
fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
