//! Link list editor
//!
//! Holds a profile's links in memory while they are added, edited, removed
//! and reordered, and writes the whole list back with a replace-all save.
//!
//! After every structural change `order` equals the link's index.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::links::{Link, LinkField, LinkType, UrlCheck};
use crate::store::{LinkRepository, StoreError};

/// Editor lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum EditorState {
    Clean,
    Dirty,
    Saving,
    Error(String),
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("link {0} not found")]
    LinkNotFound(Uuid),

    #[error("index {index} out of range for {len} links")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown link field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field:?}: {reason}")]
    InvalidValue { field: LinkField, reason: String },

    #[error("failed to save links: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct LinkEditor {
    profile_id: Uuid,
    links: Vec<Link>,
    state: EditorState,
}

impl LinkEditor {
    /// Empty editor for a profile with no links yet
    pub fn new(profile_id: Uuid) -> Self {
        Self::with_links(profile_id, Vec::new())
    }

    /// Editor over an already persisted list. Orders are renumbered from
    /// the given sequence.
    pub fn with_links(profile_id: Uuid, links: Vec<Link>) -> Self {
        let mut editor = Self {
            profile_id,
            links,
            state: EditorState::Clean,
        };
        editor.renumber();
        editor
    }

    /// Load the persisted list for `profile_id`
    pub async fn load(
        repo: &dyn LinkRepository,
        profile_id: Uuid,
    ) -> Result<Self, EditorError> {
        let links = repo.list_for_profile(profile_id).await?;
        Ok(Self::with_links(profile_id, links))
    }

    pub fn profile_id(&self) -> Uuid {
        self.profile_id
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn into_links(self) -> Vec<Link> {
        self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.state, EditorState::Dirty | EditorState::Error(_))
    }

    /// Append a blank website link. Returns its client id.
    pub fn add(&mut self) -> Uuid {
        let mut link = Link::new(LinkType::Website, "", "");
        link.order = self.links.len() as u32;
        let id = link.id;
        self.links.push(link);
        self.mark_dirty();
        id
    }

    /// Replace a single editable field. Does not touch `order`.
    ///
    /// A malformed URL is stored as typed; see [`LinkEditor::invalid_urls`].
    pub fn update(&mut self, id: Uuid, field: LinkField, value: &str) -> Result<(), EditorError> {
        let link = self
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(EditorError::LinkNotFound(id))?;

        match field {
            LinkField::Type => {
                link.link_type = value.parse().map_err(|e: super::links::UnknownLinkType| {
                    EditorError::InvalidValue {
                        field,
                        reason: e.to_string(),
                    }
                })?;
            }
            LinkField::Label => link.label = value.to_string(),
            LinkField::Url => link.url = value.to_string(),
        }

        self.mark_dirty();
        Ok(())
    }

    /// Same as [`LinkEditor::update`] with the field given by name
    pub fn update_named(&mut self, id: Uuid, field: &str, value: &str) -> Result<(), EditorError> {
        let field: LinkField = field.parse().map_err(EditorError::UnknownField)?;
        self.update(id, field, value)
    }

    /// Delete a link and compact the remaining orders
    pub fn remove(&mut self, id: Uuid) -> Result<Link, EditorError> {
        let index = self
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or(EditorError::LinkNotFound(id))?;

        let removed = self.links.remove(index);
        self.renumber();
        self.mark_dirty();
        Ok(removed)
    }

    /// Move the link at `from` to `to` (array move, not swap)
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.links.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditorError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let link = self.links.remove(from);
        self.links.insert(to, link);
        self.renumber();
        self.mark_dirty();
        Ok(())
    }

    /// Links whose URL fails the advisory syntax check
    pub fn invalid_urls(&self) -> Vec<Uuid> {
        self.links
            .iter()
            .filter(|l| l.url_check() == UrlCheck::Invalid)
            .map(|l| l.id)
            .collect()
    }

    /// Persist the current list with replace-all semantics.
    ///
    /// On failure the in-memory list is left as it was and the state
    /// becomes `Error`, so the save can simply be retried.
    pub async fn save(&mut self, repo: &dyn LinkRepository) -> Result<Vec<Link>, EditorError> {
        self.state = EditorState::Saving;

        let outgoing: Vec<Link> = self
            .links
            .iter()
            .enumerate()
            .map(|(i, l)| Link {
                order: i as u32,
                ..l.clone()
            })
            .collect();

        match repo.replace_all(self.profile_id, &outgoing).await {
            Ok(saved) => {
                tracing::debug!(
                    profile_id = %self.profile_id,
                    count = saved.len(),
                    "Saved profile links"
                );
                self.links = saved;
                self.renumber();
                self.state = EditorState::Clean;
                Ok(self.links.clone())
            }
            Err(e) => {
                tracing::error!(profile_id = %self.profile_id, error = %e, "Failed to save links");
                self.state = EditorState::Error(e.to_string());
                Err(e.into())
            }
        }
    }

    fn renumber(&mut self) {
        for (i, link) in self.links.iter_mut().enumerate() {
            link.order = i as u32;
        }
    }

    fn mark_dirty(&mut self) {
        self.state = EditorState::Dirty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLinkRepository;

    fn editor_with(labels: &[&str]) -> LinkEditor {
        let links = labels
            .iter()
            .map(|l| Link::new(LinkType::Custom, *l, format!("https://example.com/{l}")))
            .collect();
        LinkEditor::with_links(Uuid::new_v4(), links)
    }

    fn labels(editor: &LinkEditor) -> Vec<&str> {
        editor.links().iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn add_appends_blank_website_link() {
        let mut editor = editor_with(&["a"]);
        let id = editor.add();

        let added = editor.links().last().unwrap();
        assert_eq!(added.id, id);
        assert_eq!(added.link_type, LinkType::Website);
        assert!(added.label.is_empty());
        assert!(added.url.is_empty());
        assert_eq!(added.order, 1);
        assert_eq!(editor.state(), &EditorState::Dirty);
    }

    #[test]
    fn reorder_moves_rather_than_swaps() {
        let mut editor = editor_with(&["a", "b", "c", "d"]);
        editor.reorder(0, 2).unwrap();
        assert_eq!(labels(&editor), ["b", "c", "a", "d"]);

        editor.reorder(3, 0).unwrap();
        assert_eq!(labels(&editor), ["d", "b", "c", "a"]);

        let orders: Vec<u32> = editor.links().iter().map(|l| l.order).collect();
        assert_eq!(orders, [0, 1, 2, 3]);
    }

    #[test]
    fn reorder_to_same_index_keeps_editor_clean() {
        let mut editor = editor_with(&["a", "b"]);
        editor.reorder(1, 1).unwrap();
        assert_eq!(editor.state(), &EditorState::Clean);
    }

    #[test]
    fn reorder_rejects_out_of_range_index() {
        let mut editor = editor_with(&["a", "b"]);
        let err = editor.reorder(0, 2).unwrap_err();
        assert!(matches!(err, EditorError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn remove_compacts_orders() {
        let mut editor = editor_with(&["a", "b", "c"]);
        let id = editor.links()[1].id;
        editor.remove(id).unwrap();

        assert_eq!(labels(&editor), ["a", "c"]);
        assert_eq!(editor.links()[1].order, 1);
    }

    #[test]
    fn update_does_not_renumber() {
        let mut editor = editor_with(&["a", "b"]);
        let id = editor.links()[1].id;
        editor.update(id, LinkField::Label, "renamed").unwrap();
        assert_eq!(editor.links()[1].label, "renamed");
        assert_eq!(editor.links()[1].order, 1);
    }

    #[test]
    fn update_rejects_unknown_field_and_type() {
        let mut editor = editor_with(&["a"]);
        let id = editor.links()[0].id;

        assert!(matches!(
            editor.update_named(id, "order", "5"),
            Err(EditorError::UnknownField(_))
        ));
        assert!(matches!(
            editor.update(id, LinkField::Type, "myspace"),
            Err(EditorError::InvalidValue { .. })
        ));
        assert!(matches!(
            editor.update(Uuid::new_v4(), LinkField::Url, "x"),
            Err(EditorError::LinkNotFound(_))
        ));
    }

    #[tokio::test]
    async fn failed_save_keeps_links_and_records_error() {
        let repo = MemoryLinkRepository::new();
        let mut editor = editor_with(&["a", "b"]);
        let before = editor.links().to_vec();

        repo.fail_next_delete();
        assert!(editor.save(&repo).await.is_err());

        assert_eq!(editor.links(), before.as_slice());
        assert!(matches!(editor.state(), EditorState::Error(_)));
        assert!(editor.is_dirty());

        editor.save(&repo).await.unwrap();
        assert_eq!(editor.state(), &EditorState::Clean);
        assert_eq!(repo.row_count(editor.profile_id()), 2);
    }
}
