//! Link persistence
//!
//! The `LinkRepository` trait is the contract the link editor saves through.
//! `replace_all` defaults to two independent calls (delete, then insert);
//! a backend that can do better overrides it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::links::Link;

pub use memory::MemoryLinkRepository;
pub use postgres::PgLinkRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    CorruptRow(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Links of a profile ordered by `order` ascending
    async fn list_for_profile(&self, profile_id: Uuid) -> StoreResult<Vec<Link>>;

    /// `DELETE FROM profile_links WHERE profile_id = $1`
    async fn delete_for_profile(&self, profile_id: Uuid) -> StoreResult<()>;

    /// Insert `links` as given. Returns rows with store-assigned ids.
    async fn insert_batch(&self, profile_id: Uuid, links: &[Link]) -> StoreResult<Vec<Link>>;

    /// Replace the whole link set of a profile.
    ///
    /// Not atomic: if the delete succeeds and the insert fails the profile
    /// is left with no links.
    async fn replace_all(&self, profile_id: Uuid, links: &[Link]) -> StoreResult<Vec<Link>> {
        self.delete_for_profile(profile_id).await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }
        self.insert_batch(profile_id, links).await
    }
}
