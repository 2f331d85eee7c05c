//! Organization domain types
//!
//! Companies that group member profiles under a branded page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Member role enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl Default for MemberRole {
    fn default() -> Self {
        Self::Member
    }
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "owner" => Self::Owner,
            "admin" => Self::Admin,
            _ => Self::Member,
        }
    }

    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

/// Organization entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Team member as listed on the company page and in team management
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub profile_id: Uuid,
    pub slug: String,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
    pub role: MemberRole,
}

/// Public company page
#[derive(Debug, Clone, Serialize)]
pub struct CompanyPageResponse {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub members: Vec<MemberResponse>,
}

/// Request DTO for adding a member
#[derive(Debug, Clone, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
    #[serde(default)]
    pub role: MemberRole,
}

impl AddMemberRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("A valid email is required".to_string());
        }
        if self.role == MemberRole::Owner {
            return Err("An organization has exactly one owner".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_owner_and_admin_manage_members() {
        assert!(MemberRole::Owner.can_manage_members());
        assert!(MemberRole::Admin.can_manage_members());
        assert!(!MemberRole::Member.can_manage_members());
    }

    #[test]
    fn cannot_add_second_owner() {
        let req = AddMemberRequest {
            email: "a@b.com".into(),
            role: MemberRole::Owner,
        };
        assert!(req.validate().is_err());
    }
}
