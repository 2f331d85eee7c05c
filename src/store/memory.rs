//! In-memory link repository
//!
//! Backs demo mode and tests. Uses the trait's non-atomic `replace_all`, and
//! can be told to fail the next delete or insert.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use super::{LinkRepository, StoreError, StoreResult};
use crate::domain::links::Link;

#[derive(Default)]
struct Faults {
    fail_delete: AtomicBool,
    fail_insert: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MemoryLinkRepository {
    rows: Arc<RwLock<HashMap<Uuid, Vec<Link>>>>,
    faults: Arc<Faults>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile's links, renumbering them densely
    pub fn seed(&self, profile_id: Uuid, links: Vec<Link>) {
        let links = links
            .into_iter()
            .enumerate()
            .map(|(i, mut l)| {
                l.order = i as u32;
                l
            })
            .collect();
        self.rows.write().insert(profile_id, links);
    }

    pub fn fail_next_delete(&self) {
        self.faults.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_insert(&self) {
        self.faults.fail_insert.store(true, Ordering::SeqCst);
    }

    pub fn row_count(&self, profile_id: Uuid) -> usize {
        self.rows.read().get(&profile_id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn list_for_profile(&self, profile_id: Uuid) -> StoreResult<Vec<Link>> {
        let mut links = self
            .rows
            .read()
            .get(&profile_id)
            .cloned()
            .unwrap_or_default();
        links.sort_by_key(|l| l.order);
        Ok(links)
    }

    async fn delete_for_profile(&self, profile_id: Uuid) -> StoreResult<()> {
        if self.faults.fail_delete.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected delete failure".into()));
        }
        self.rows.write().remove(&profile_id);
        Ok(())
    }

    async fn insert_batch(&self, profile_id: Uuid, links: &[Link]) -> StoreResult<Vec<Link>> {
        if self.faults.fail_insert.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected insert failure".into()));
        }

        // Store assigns its own ids
        let inserted: Vec<Link> = links
            .iter()
            .map(|l| Link {
                id: Uuid::new_v4(),
                ..l.clone()
            })
            .collect();

        self.rows
            .write()
            .entry(profile_id)
            .or_default()
            .extend(inserted.iter().cloned());

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::links::LinkType;

    #[tokio::test]
    async fn insert_assigns_new_ids() {
        let repo = MemoryLinkRepository::new();
        let profile_id = Uuid::new_v4();
        let link = Link::new(LinkType::Website, "Site", "https://example.com");

        let saved = repo.insert_batch(profile_id, &[link.clone()]).await.unwrap();

        assert_eq!(saved.len(), 1);
        assert_ne!(saved[0].id, link.id);
        assert_eq!(saved[0].url, link.url);
    }

    #[tokio::test]
    async fn injected_faults_fire_once() {
        let repo = MemoryLinkRepository::new();
        let profile_id = Uuid::new_v4();

        repo.fail_next_delete();
        assert!(repo.delete_for_profile(profile_id).await.is_err());
        assert!(repo.delete_for_profile(profile_id).await.is_ok());
    }

    #[tokio::test]
    async fn profiles_are_isolated() {
        let repo = MemoryLinkRepository::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        repo.seed(a, vec![Link::new(LinkType::Email, "", "a@b.com")]);
        repo.seed(b, vec![Link::new(LinkType::Phone, "", "+1")]);

        repo.delete_for_profile(a).await.unwrap();

        assert_eq!(repo.row_count(a), 0);
        assert_eq!(repo.row_count(b), 1);
    }
}
