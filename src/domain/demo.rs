//! Demo mode context
//!
//! Created once at startup when demo mode is enabled and owned by the
//! application state. Holds fixture data and an in-memory link store so the
//! link editor can be exercised without an account.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analytics::{fill_daily_series, window_start, AnalyticsSummary, SourceCount, ViewSource};
use super::links::{Link, LinkType};
use super::profiles::Profile;
use crate::store::MemoryLinkRepository;

/// Demo session role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DemoRole {
    User,
    Admin,
}

impl DemoRole {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    /// Demo links live in one shared in-memory store; only admins rewrite them
    pub fn can_edit_links(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoSessionResponse {
    pub role: DemoRole,
    pub profile_id: Uuid,
}

pub struct DemoContext {
    pub role: DemoRole,
    pub profile: Profile,
    pub links: MemoryLinkRepository,
}

impl DemoContext {
    pub fn new(role: DemoRole) -> Self {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            slug: "demo-alex".to_string(),
            email: "alex@demo.cardlink.app".to_string(),
            full_name: Some("Alex Morgan".to_string()),
            title: Some("Head of Partnerships".to_string()),
            company: Some("Northwind Labs".to_string()),
            phone: Some("+1 555 0142".to_string()),
            website: Some("https://northwind.example".to_string()),
            bio: Some("Connecting teams with the tools they love.".to_string()),
            avatar_url: None,
            organization_id: None,
            member_role: None,
            created_at: now,
            updated_at: now,
        };

        let links = MemoryLinkRepository::new();
        links.seed(profile.id, fixture_links());

        tracing::info!(role = ?role, profile_id = %profile.id, "Demo mode initialized");

        Self {
            role,
            profile,
            links,
        }
    }

    pub fn session(&self) -> DemoSessionResponse {
        DemoSessionResponse {
            role: self.role,
            profile_id: self.profile.id,
        }
    }

    /// Canned seven-day dashboard data
    pub fn analytics(&self) -> AnalyticsSummary {
        let days = 7;
        let start = window_start(Utc::now(), days);
        let canned = [12_i64, 18, 9, 22, 30, 14, 25];
        let counts: Vec<_> = canned
            .iter()
            .enumerate()
            .map(|(i, views)| (start + Duration::days(i as i64), *views))
            .collect();
        let daily = fill_daily_series(start, days, &counts);
        let total_views = daily.iter().map(|d| d.views).sum();

        AnalyticsSummary {
            days,
            total_views,
            total_leads: 6,
            views_by_source: vec![
                SourceCount { source: ViewSource::Nfc, views: 61 },
                SourceCount { source: ViewSource::Qr, views: 43 },
                SourceCount { source: ViewSource::Link, views: 19 },
                SourceCount { source: ViewSource::Direct, views: 7 },
            ],
            daily,
        }
    }
}

impl Drop for DemoContext {
    fn drop(&mut self) {
        tracing::debug!(profile_id = %self.profile.id, "Demo mode torn down");
    }
}

fn fixture_links() -> Vec<Link> {
    vec![
        Link::new(LinkType::Linkedin, "", "https://linkedin.com/in/alex-morgan"),
        Link::new(LinkType::Email, "Work email", "alex@demo.cardlink.app"),
        Link::new(LinkType::Calendly, "Book a call", "https://calendly.com/alex-morgan"),
        Link::new(LinkType::Github, "", "https://github.com/alexmorgan"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LinkRepository;

    #[tokio::test]
    async fn fixture_links_are_densely_ordered() {
        let demo = DemoContext::new(DemoRole::User);
        let links = demo.links.list_for_profile(demo.profile.id).await.unwrap();

        assert_eq!(links.len(), 4);
        for (i, link) in links.iter().enumerate() {
            assert_eq!(link.order, i as u32);
        }
    }

    #[test]
    fn canned_analytics_sum_matches_series() {
        let demo = DemoContext::new(DemoRole::Admin);
        let summary = demo.analytics();
        assert_eq!(summary.daily.len(), 7);
        assert_eq!(summary.total_views, 130);
    }

    #[test]
    fn role_parsing_defaults_to_user() {
        assert_eq!(DemoRole::from_str("ADMIN"), DemoRole::Admin);
        assert_eq!(DemoRole::from_str("guest"), DemoRole::User);
    }

    #[test]
    fn only_admin_edits_demo_links() {
        assert!(DemoRole::Admin.can_edit_links());
        assert!(!DemoRole::User.can_edit_links());
    }
}
