//! vCard 3.0 generation

use super::CRLF;
use crate::domain::links::{Link, LinkType};
use crate::domain::profiles::Profile;

/// Non-blank value, kept as typed except that embedded line breaks become
/// the two characters `\n` so each property stays on one line
fn present(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.replace('\r', "").replace('\n', "\\n"))
}

/// Render a profile as a vCard 3.0 document.
///
/// Field lines follow the order `FN, TITLE, ORG, EMAIL, TEL, URL, NOTE`;
/// empty fields are left out. Values are written literally apart from
/// line breaks, which are escaped.
pub fn profile_vcard(profile: &Profile, links: &[Link]) -> String {
    let website = present(profile.website.as_deref()).or_else(|| {
        links
            .iter()
            .find(|l| l.link_type == LinkType::Website)
            .and_then(|l| present(Some(l.url.as_str())))
    });

    let fields = [
        ("FN", present(Some(profile.display_name()))),
        ("TITLE", present(profile.title.as_deref())),
        ("ORG", present(profile.company.as_deref())),
        ("EMAIL", present(Some(profile.email.as_str()))),
        ("TEL", present(profile.phone.as_deref())),
        ("URL", website),
        ("NOTE", present(profile.bio.as_deref())),
    ];

    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];
    lines.extend(
        fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}:{}", name, v))),
    );
    lines.extend(
        links
            .iter()
            .filter(|l| l.link_type.is_social())
            .filter_map(|l| {
                present(Some(l.url.as_str()))
                    .map(|url| format!("X-SOCIALPROFILE;TYPE={}:{}", l.link_type, url))
            }),
    );
    lines.push("END:VCARD".to_string());

    let mut out = lines.join(CRLF);
    out.push_str(CRLF);
    out
}

/// File name offered for the download
pub fn vcard_filename(profile: &Profile) -> String {
    format!("{}.vcf", profile.slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            slug: "jane".into(),
            email: "jane@example.com".into(),
            full_name: Some("Jane Doe".into()),
            ..Default::default()
        }
    }

    #[test]
    fn omits_missing_fields() {
        let card = profile_vcard(&profile(), &[]);
        assert_eq!(
            card,
            "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Jane Doe\r\nEMAIL:jane@example.com\r\nEND:VCARD\r\n"
        );
    }

    #[test]
    fn url_falls_back_to_first_website_link() {
        let links = [
            Link::new(LinkType::Github, "", "https://github.com/jane"),
            Link::new(LinkType::Website, "", "https://jane.dev"),
            Link::new(LinkType::Website, "", "https://second.dev"),
        ];
        let card = profile_vcard(&profile(), &links);
        assert!(card.contains("\r\nURL:https://jane.dev\r\n"));
        assert!(!card.contains("second.dev"));
        assert!(card.contains("X-SOCIALPROFILE;TYPE=github:https://github.com/jane"));
    }

    #[test]
    fn line_breaks_are_escaped() {
        let p = Profile {
            bio: Some("Line one\r\nLine two".into()),
            ..profile()
        };
        let card = profile_vcard(&p, &[]);
        assert!(card.contains("\r\nNOTE:Line one\\nLine two\r\n"));
    }

    #[test]
    fn filename_uses_slug() {
        assert_eq!(vcard_filename(&profile()), "jane.vcf");
    }
}
