//! Profile domain types
//!
//! The digital business card: identity and contact fields stored in the
//! profiles table, published under a unique slug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::links::LinkResponse;
use super::organizations::MemberRole;

pub const SLUG_MIN_LEN: usize = 3;
pub const SLUG_MAX_LEN: usize = 40;

/// User profile entity
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub id: Uuid,
    pub slug: String,
    pub email: String,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub organization_id: Option<Uuid>,
    pub member_role: Option<MemberRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Name shown on the card, falling back to the slug
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.slug,
        }
    }
}

/// Request DTO for updating a profile
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Response DTO for profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub slug: String,
    pub email: String,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub organization_id: Option<Uuid>,
    pub public_url: String,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn from_profile(p: Profile, public_base_url: &str) -> Self {
        Self {
            public_url: public_url(public_base_url, &p.slug),
            id: p.id,
            slug: p.slug,
            email: p.email,
            full_name: p.full_name,
            title: p.title,
            company: p.company,
            phone: p.phone,
            website: p.website,
            bio: p.bio,
            avatar_url: p.avatar_url,
            organization_id: p.organization_id,
            updated_at: p.updated_at,
        }
    }
}

/// Public card view: profile plus its ordered links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfileResponse {
    pub profile: ProfileResponse,
    pub links: Vec<LinkResponse>,
}

pub fn public_url(base: &str, slug: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), slug)
}

/// Slugs are lowercase ASCII letters, digits and dashes, not starting with a dash
pub fn validate_slug(slug: &str) -> Result<(), String> {
    let len = slug.len();
    if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
        return Err(format!(
            "Slug must be between {} and {} characters",
            SLUG_MIN_LEN, SLUG_MAX_LEN
        ));
    }
    if slug.starts_with('-') {
        return Err("Slug cannot start with a dash".to_string());
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Slug may only contain lowercase letters, digits and dashes".to_string());
    }
    Ok(())
}

/// Initial slug for a new account, derived from the email local part plus a
/// short random suffix
pub fn slug_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut base: String = local
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    base = base.trim_matches('-').to_string();
    base.truncate(SLUG_MAX_LEN - 7);
    if base.len() < SLUG_MIN_LEN {
        base = "card".to_string();
    }

    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", base.trim_end_matches('-'), &suffix[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(validate_slug("jane-doe").is_ok());
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug("-jane").is_err());
        assert!(validate_slug("Jane").is_err());
        assert!(validate_slug("jane_doe").is_err());
        assert!(validate_slug(&"a".repeat(41)).is_err());
    }

    #[test]
    fn slug_from_email_is_valid() {
        for email in ["Jane.Doe@example.com", "x@y.z", "--@a.b", "a+b+c@mail.org"] {
            let slug = slug_from_email(email);
            assert!(validate_slug(&slug).is_ok(), "{slug} from {email}");
        }
        assert!(slug_from_email("jane.doe@example.com").starts_with("jane-doe-"));
    }

    #[test]
    fn display_name_falls_back_to_slug() {
        let mut profile = Profile {
            slug: "jane-doe".into(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "jane-doe");
        profile.full_name = Some("Jane Doe".into());
        assert_eq!(profile.display_name(), "Jane Doe");
    }

    #[test]
    fn public_url_joins_without_double_slash() {
        assert_eq!(public_url("https://card.link/p/", "jane"), "https://card.link/p/jane");
    }
}
