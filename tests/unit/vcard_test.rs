//! Unit tests for vCard generation.

use cardlink_backend::domain::{Link, LinkType, Profile};
use cardlink_backend::export::profile_vcard;
use rstest::rstest;

fn full_profile() -> Profile {
    Profile {
        slug: "jane-doe".into(),
        email: "jane@example.com".into(),
        full_name: Some("Jane Doe".into()),
        title: Some("CTO".into()),
        company: Some("Acme".into()),
        phone: Some("+1 555 0100".into()),
        website: Some("https://jane.dev".into()),
        bio: Some("Builds things".into()),
        ..Default::default()
    }
}

fn field_lines(card: &str) -> Vec<&str> {
    card.split("\r\n")
        .filter(|l| !l.is_empty())
        .filter(|l| !matches!(*l, "BEGIN:VCARD" | "VERSION:3.0" | "END:VCARD"))
        .filter(|l| !l.starts_with("X-SOCIALPROFILE"))
        .collect()
}

#[test]
fn test_fields_appear_once_in_fixed_order() {
    let card = profile_vcard(&full_profile(), &[]);

    assert_eq!(
        field_lines(&card),
        vec![
            "FN:Jane Doe",
            "TITLE:CTO",
            "ORG:Acme",
            "EMAIL:jane@example.com",
            "TEL:+1 555 0100",
            "URL:https://jane.dev",
            "NOTE:Builds things",
        ]
    );
}

#[test]
fn test_card_is_framed_and_crlf_terminated() {
    let card = profile_vcard(&full_profile(), &[]);

    assert!(card.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
    assert!(card.ends_with("END:VCARD\r\n"));
    assert!(!card.replace("\r\n", "").contains('\n'));
}

#[rstest]
#[case::no_title(Profile { title: None, ..full_profile() }, "TITLE:")]
#[case::no_company(Profile { company: Some(String::new()), ..full_profile() }, "ORG:")]
#[case::no_phone(Profile { phone: None, ..full_profile() }, "TEL:")]
#[case::no_bio(Profile { bio: None, ..full_profile() }, "NOTE:")]
fn test_empty_fields_are_omitted(#[case] profile: Profile, #[case] prefix: &str) {
    let card = profile_vcard(&profile, &[]);
    assert!(field_lines(&card).iter().all(|l| !l.starts_with(prefix)));
    assert_eq!(field_lines(&card).len(), 6);
}

#[test]
fn test_url_falls_back_to_website_link() {
    let profile = Profile {
        website: None,
        ..full_profile()
    };
    let links = vec![
        Link::new(LinkType::Github, "", "https://github.com/jane"),
        Link::new(LinkType::Website, "", "https://portfolio.example"),
    ];

    let card = profile_vcard(&profile, &links);

    assert!(field_lines(&card).contains(&"URL:https://portfolio.example"));
    assert!(card.contains("X-SOCIALPROFILE;TYPE=github:https://github.com/jane\r\n"));
}

// ─── Multi-line values ───

#[rstest]
#[case::bio(Profile { bio: Some("Line one\nLine two".into()), ..full_profile() }, "NOTE:Line one\\nLine two")]
#[case::crlf_bio(Profile { bio: Some("Line one\r\nLine two".into()), ..full_profile() }, "NOTE:Line one\\nLine two")]
#[case::title(Profile { title: Some("CTO\nCo-founder".into()), ..full_profile() }, "TITLE:CTO\\nCo-founder")]
fn test_line_breaks_keep_one_line_per_field(#[case] profile: Profile, #[case] expected: &str) {
    let card = profile_vcard(&profile, &[]);

    let lines: Vec<&str> = card.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert!(lines.iter().all(|l| l.contains(':')), "stray line in {:?}", lines);
    assert_eq!(field_lines(&card).len(), 7);
    assert!(field_lines(&card).contains(&expected));
}

#[test]
fn test_values_are_written_untrimmed() {
    let profile = Profile {
        company: Some("  Acme  ".into()),
        ..full_profile()
    };
    let card = profile_vcard(&profile, &[]);
    assert!(field_lines(&card).contains(&"ORG:  Acme  "));
}
