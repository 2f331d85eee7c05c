//! Lead capture domain types
//!
//! Contact details a visitor leaves on a public profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lead entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for capturing a lead
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureLeadRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl CaptureLeadRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if !non_blank(&self.email) && !non_blank(&self.phone) {
            return Err("An email or phone number is required".to_string());
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !email.contains('@') {
                return Err("Email address is invalid".to_string());
            }
        }
        Ok(())
    }
}

/// Response DTO for lead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Lead> for LeadResponse {
    fn from(l: Lead) -> Self {
        Self {
            id: l.id,
            name: l.name,
            email: l.email,
            phone: l.phone,
            company: l.company,
            message: l.message,
            created_at: l.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>, phone: Option<&str>) -> CaptureLeadRequest {
        CaptureLeadRequest {
            name: "Sam".into(),
            email: email.map(Into::into),
            phone: phone.map(Into::into),
            company: None,
            message: None,
        }
    }

    #[test]
    fn requires_a_contact_method() {
        assert!(request(None, None).validate().is_err());
        assert!(request(Some(" "), None).validate().is_err());
        assert!(request(Some("sam@example.com"), None).validate().is_ok());
        assert!(request(None, Some("+1 555 0100")).validate().is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(request(Some("sam.example.com"), None).validate().is_err());
    }

    #[test]
    fn requires_name() {
        let mut req = request(Some("sam@example.com"), None);
        req.name = "".into();
        assert!(req.validate().is_err());
    }
}
