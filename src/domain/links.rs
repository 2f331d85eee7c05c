//! Profile link domain types
//!
//! Outbound links (social accounts, contact methods, custom URLs) shown on a
//! public profile in a user-defined order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

/// Link type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Website,
    Email,
    Phone,
    Whatsapp,
    Linkedin,
    Twitter,
    Instagram,
    Facebook,
    Tiktok,
    Youtube,
    Github,
    Calendly,
    Custom,
}

impl Default for LinkType {
    fn default() -> Self {
        Self::Website
    }
}

impl LinkType {
    pub const ALL: [LinkType; 13] = [
        Self::Website,
        Self::Email,
        Self::Phone,
        Self::Whatsapp,
        Self::Linkedin,
        Self::Twitter,
        Self::Instagram,
        Self::Facebook,
        Self::Tiktok,
        Self::Youtube,
        Self::Github,
        Self::Calendly,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Whatsapp => "whatsapp",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Tiktok => "tiktok",
            Self::Youtube => "youtube",
            Self::Github => "github",
            Self::Calendly => "calendly",
            Self::Custom => "custom",
        }
    }

    /// Label shown when the user left the label empty
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Whatsapp => "WhatsApp",
            Self::Linkedin => "LinkedIn",
            Self::Twitter => "Twitter",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
            Self::Tiktok => "TikTok",
            Self::Youtube => "YouTube",
            Self::Github => "GitHub",
            Self::Calendly => "Calendly",
            Self::Custom => "Link",
        }
    }

    /// Email and phone values are addresses/numbers, not URLs
    pub fn expects_url(&self) -> bool {
        !matches!(self, Self::Email | Self::Phone)
    }

    /// Social network links, exported as `X-SOCIALPROFILE` vCard entries
    pub fn is_social(&self) -> bool {
        matches!(
            self,
            Self::Linkedin
                | Self::Twitter
                | Self::Instagram
                | Self::Facebook
                | Self::Tiktok
                | Self::Youtube
                | Self::Github
        )
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown link type: {0}")]
pub struct UnknownLinkType(pub String);

impl FromStr for LinkType {
    type Err = UnknownLinkType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownLinkType(s.to_string()))
    }
}

/// Profile link entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
    pub order: u32,
}

impl Link {
    /// New unsaved link with a client-generated id
    pub fn new(link_type: LinkType, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            link_type,
            label: label.into(),
            url: url.into(),
            order: 0,
        }
    }

    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            self.link_type.default_label()
        } else {
            &self.label
        }
    }

    pub fn url_check(&self) -> UrlCheck {
        check_url(self.link_type, &self.url)
    }
}

/// Result of the advisory URL syntax check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlCheck {
    Valid,
    Invalid,
    /// Empty value or a type that does not hold a URL
    NotApplicable,
}

impl UrlCheck {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }
}

/// Attempt to parse `value` as a URL. Never blocks a write.
pub fn check_url(link_type: LinkType, value: &str) -> UrlCheck {
    if !link_type.expects_url() || value.trim().is_empty() {
        return UrlCheck::NotApplicable;
    }
    match Url::parse(value.trim()) {
        Ok(_) => UrlCheck::Valid,
        Err(_) => UrlCheck::Invalid,
    }
}

/// Editable link attributes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkField {
    Type,
    Label,
    Url,
}

impl FromStr for LinkField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type" => Ok(Self::Type),
            "label" => Ok(Self::Label),
            "url" => Ok(Self::Url),
            other => Err(other.to_string()),
        }
    }
}

/// Persisted link row as stored in `profile_links`
#[derive(Debug, Clone, Serialize)]
pub struct StoredLink {
    pub id: Uuid,
    pub profile_id: Uuid,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub label: String,
    pub url: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

impl From<StoredLink> for Link {
    fn from(s: StoredLink) -> Self {
        Self {
            id: s.id,
            link_type: s.link_type,
            label: s.label,
            url: s.url,
            order: s.order,
        }
    }
}

/// Request DTO for a link in a full replace
#[derive(Debug, Clone, Deserialize)]
pub struct LinkInput {
    #[serde(rename = "type", default)]
    pub link_type: LinkType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
}

/// Request DTO for replacing the whole link list
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceLinksRequest {
    pub links: Vec<LinkInput>,
}

/// Request DTO for appending a link
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddLinkRequest {
    #[serde(rename = "type", default)]
    pub link_type: Option<LinkType>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Request DTO for a single-field update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLinkRequest {
    pub field: String,
    pub value: String,
}

/// Request DTO for a drag-reorder
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderLinksRequest {
    pub from_index: usize,
    pub to_index: usize,
}

/// Response DTO for a link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub label: String,
    pub display_label: String,
    pub url: String,
    pub order: u32,
    pub url_valid: bool,
}

impl From<&Link> for LinkResponse {
    fn from(l: &Link) -> Self {
        Self {
            id: l.id,
            link_type: l.link_type,
            label: l.label.clone(),
            display_label: l.display_label().to_string(),
            url: l.url.clone(),
            order: l.order,
            url_valid: !l.url_check().is_invalid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_type_round_trips_through_str() {
        for t in LinkType::ALL {
            assert_eq!(t.as_str().parse::<LinkType>().unwrap(), t);
        }
        assert!("myspace".parse::<LinkType>().is_err());
    }

    #[test]
    fn empty_label_falls_back_to_type_default() {
        let link = Link::new(LinkType::Linkedin, "  ", "https://linkedin.com/in/x");
        assert_eq!(link.display_label(), "LinkedIn");

        let link = Link::new(LinkType::Custom, "", "https://example.com");
        assert_eq!(link.display_label(), "Link");

        let link = Link::new(LinkType::Github, "Code", "https://github.com/x");
        assert_eq!(link.display_label(), "Code");
    }

    #[test]
    fn url_check_skips_email_and_phone() {
        assert_eq!(check_url(LinkType::Email, "a@b.com"), UrlCheck::NotApplicable);
        assert_eq!(check_url(LinkType::Phone, "+1 555"), UrlCheck::NotApplicable);
        assert_eq!(check_url(LinkType::Website, ""), UrlCheck::NotApplicable);
        assert_eq!(check_url(LinkType::Website, "not a url"), UrlCheck::Invalid);
        assert_eq!(
            check_url(LinkType::Website, "https://example.com"),
            UrlCheck::Valid
        );
    }

    #[test]
    fn link_serializes_type_field_in_snake_case() {
        let link = Link::new(LinkType::Whatsapp, "", "https://wa.me/1");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["type"], "whatsapp");
    }
}
