use serde::{Deserialize, Serialize};

/// A certification or course credential.
///
/// Dates are kept as the issuer prints them ("Jan 2025", "2024-11-03").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: i64,
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub credential_id: Option<String>,
    #[serde(default)]
    pub credential_url: Option<String>,
}

/// Input for creating a certification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificationInput {
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
}
