//! Unit tests for saving links through the editor into a repository.
//!
//! Covers replace-all round trips, the partial-failure window of the
//! non-atomic default `replace_all`, and advisory URL validation.

use cardlink_backend::domain::{EditorState, Link, LinkEditor, LinkField, LinkType};
use cardlink_backend::store::{LinkRepository, MemoryLinkRepository};
use rstest::{fixture, rstest};
use uuid::Uuid;

#[fixture]
fn repo() -> MemoryLinkRepository {
    MemoryLinkRepository::new()
}

fn tuples(links: &[Link]) -> Vec<(LinkType, String, String)> {
    links
        .iter()
        .map(|l| (l.link_type, l.url.clone(), l.label.clone()))
        .collect()
}

// ─── Replace-all round trip ───

#[rstest]
#[tokio::test]
async fn test_save_then_load_returns_same_links(repo: MemoryLinkRepository) {
    let profile_id = Uuid::new_v4();
    let mut editor = LinkEditor::with_links(
        profile_id,
        vec![
            Link::new(LinkType::Email, "", "a@b.com"),
            Link::new(LinkType::Linkedin, "", "https://linkedin.com/in/x"),
        ],
    );
    let expected = tuples(editor.links());

    editor.save(&repo).await.unwrap();
    assert_eq!(editor.state(), &EditorState::Clean);

    let loaded = LinkEditor::load(&repo, profile_id).await.unwrap();
    assert_eq!(tuples(loaded.links()), expected);
    assert_eq!(loaded.links()[0].order, 0);
    assert_eq!(loaded.links()[1].order, 1);
}

#[rstest]
#[tokio::test]
async fn test_save_replaces_previous_rows(repo: MemoryLinkRepository) {
    let profile_id = Uuid::new_v4();
    repo.seed(
        profile_id,
        vec![
            Link::new(LinkType::Github, "", "https://github.com/old"),
            Link::new(LinkType::Twitter, "", "https://x.com/old"),
            Link::new(LinkType::Website, "", "https://old.example"),
        ],
    );

    let mut editor = LinkEditor::load(&repo, profile_id).await.unwrap();
    let first = editor.links()[0].id;
    editor.remove(first).unwrap();
    editor.reorder(1, 0).unwrap();
    editor.save(&repo).await.unwrap();

    assert_eq!(repo.row_count(profile_id), 2);
    let loaded = repo.list_for_profile(profile_id).await.unwrap();
    assert_eq!(loaded[0].url, "https://old.example");
    assert_eq!(loaded[1].url, "https://x.com/old");
}

#[rstest]
#[tokio::test]
async fn test_saving_empty_list_clears_profile(repo: MemoryLinkRepository) {
    let profile_id = Uuid::new_v4();
    repo.seed(profile_id, vec![Link::new(LinkType::Website, "", "https://a.example")]);

    let mut editor = LinkEditor::new(profile_id);
    let saved = editor.save(&repo).await.unwrap();

    assert!(saved.is_empty());
    assert_eq!(repo.row_count(profile_id), 0);
}

#[rstest]
#[tokio::test]
async fn test_profiles_are_isolated(repo: MemoryLinkRepository) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    repo.seed(bob, vec![Link::new(LinkType::Website, "", "https://bob.example")]);

    let mut editor = LinkEditor::with_links(alice, vec![Link::new(LinkType::Phone, "", "+1 555")]);
    editor.save(&repo).await.unwrap();

    assert_eq!(repo.row_count(alice), 1);
    assert_eq!(repo.row_count(bob), 1);
}

// ─── Partial failure ───

#[rstest]
#[tokio::test]
async fn test_insert_failure_after_delete_leaves_zero_links(repo: MemoryLinkRepository) {
    let profile_id = Uuid::new_v4();
    repo.seed(
        profile_id,
        vec![
            Link::new(LinkType::Website, "", "https://a.example"),
            Link::new(LinkType::Github, "", "https://github.com/a"),
        ],
    );

    let mut editor = LinkEditor::load(&repo, profile_id).await.unwrap();
    editor.add();
    repo.fail_next_insert();

    let result = editor.save(&repo).await;

    assert!(result.is_err());
    assert!(matches!(editor.state(), EditorState::Error(_)));
    // In-memory list survives so the save can be retried
    assert_eq!(editor.len(), 3);
    assert_eq!(repo.row_count(profile_id), 0);

    editor.save(&repo).await.unwrap();
    assert_eq!(repo.row_count(profile_id), 3);
    assert_eq!(editor.state(), &EditorState::Clean);
}

#[rstest]
#[tokio::test]
async fn test_delete_failure_keeps_existing_rows(repo: MemoryLinkRepository) {
    let profile_id = Uuid::new_v4();
    repo.seed(profile_id, vec![Link::new(LinkType::Website, "", "https://a.example")]);

    let mut editor = LinkEditor::load(&repo, profile_id).await.unwrap();
    editor.add();
    repo.fail_next_delete();

    assert!(editor.save(&repo).await.is_err());
    assert_eq!(repo.row_count(profile_id), 1);
}

// ─── Advisory URL validation ───

#[rstest]
#[case(LinkType::Website, "not a url", true)]
#[case(LinkType::Linkedin, "https://linkedin.com/in/x", false)]
#[case(LinkType::Website, "", false)]
#[tokio::test]
async fn test_invalid_url_is_flagged_but_persisted(
    repo: MemoryLinkRepository,
    #[case] link_type: LinkType,
    #[case] url: &str,
    #[case] flagged: bool,
) {
    let profile_id = Uuid::new_v4();
    let mut editor = LinkEditor::new(profile_id);
    let id = editor.add();
    editor.update(id, LinkField::Type, link_type.as_str()).unwrap();
    editor.update(id, LinkField::Url, url).unwrap();

    assert_eq!(editor.links()[0].url, url);
    assert_eq!(editor.invalid_urls().contains(&id), flagged);

    editor.save(&repo).await.unwrap();
    let loaded = repo.list_for_profile(profile_id).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].url, url);
}
