//! PostgreSQL link repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{LinkRepository, StoreError, StoreResult};
use crate::domain::links::{Link, LinkType, StoredLink};

/// Database row for profile link
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    profile_id: Uuid,
    link_type: String,
    url: String,
    label: Option<String>,
    position: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for StoredLink {
    type Error = StoreError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let link_type: LinkType = row
            .link_type
            .parse()
            .map_err(|e| StoreError::CorruptRow(format!("profile_links {}: {}", row.id, e)))?;

        Ok(Self {
            id: row.id,
            profile_id: row.profile_id,
            link_type,
            label: row.label.unwrap_or_default(),
            url: row.url,
            order: row.position.max(0) as u32,
            created_at: row.created_at,
        })
    }
}

fn rows_to_links(rows: Vec<LinkRow>) -> StoreResult<Vec<Link>> {
    let mut links = rows
        .into_iter()
        .map(|row| StoredLink::try_from(row).map(Link::from))
        .collect::<StoreResult<Vec<_>>>()?;
    links.sort_by_key(|l| l.order);
    Ok(links)
}

async fn delete_with<'e>(executor: impl PgExecutor<'e>, profile_id: Uuid) -> StoreResult<()> {
    sqlx::query("DELETE FROM profile_links WHERE profile_id = $1")
        .bind(profile_id)
        .execute(executor)
        .await?;
    Ok(())
}

async fn insert_with<'e>(
    executor: impl PgExecutor<'e>,
    profile_id: Uuid,
    links: &[Link],
) -> StoreResult<Vec<Link>> {
    let types: Vec<String> = links.iter().map(|l| l.link_type.as_str().to_string()).collect();
    let urls: Vec<String> = links.iter().map(|l| l.url.clone()).collect();
    let labels: Vec<String> = links.iter().map(|l| l.label.clone()).collect();
    let orders: Vec<i32> = links.iter().map(|l| l.order as i32).collect();

    let rows = sqlx::query_as::<_, LinkRow>(
        r#"
        INSERT INTO profile_links (profile_id, type, url, label, "order")
        SELECT $1, t.type, t.url, t.label, t.ord
        FROM UNNEST($2::text[], $3::text[], $4::text[], $5::int4[]) AS t(type, url, label, ord)
        RETURNING id, profile_id, type AS link_type, url, label, "order" AS position, created_at
        "#,
    )
    .bind(profile_id)
    .bind(&types)
    .bind(&urls)
    .bind(&labels)
    .bind(&orders)
    .fetch_all(executor)
    .await?;

    rows_to_links(rows)
}

#[derive(Clone)]
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn list_for_profile(&self, profile_id: Uuid) -> StoreResult<Vec<Link>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, profile_id, type AS link_type, url, label, "order" AS position, created_at
            FROM profile_links
            WHERE profile_id = $1
            ORDER BY "order" ASC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        rows_to_links(rows)
    }

    async fn delete_for_profile(&self, profile_id: Uuid) -> StoreResult<()> {
        delete_with(&self.pool, profile_id).await
    }

    async fn insert_batch(&self, profile_id: Uuid, links: &[Link]) -> StoreResult<Vec<Link>> {
        insert_with(&self.pool, profile_id, links).await
    }

    /// Delete and insert inside one transaction
    async fn replace_all(&self, profile_id: Uuid, links: &[Link]) -> StoreResult<Vec<Link>> {
        let mut tx = self.pool.begin().await?;

        delete_with(&mut *tx, profile_id).await?;
        let saved = if links.is_empty() {
            Vec::new()
        } else {
            insert_with(&mut *tx, profile_id, links).await?
        };

        tx.commit().await?;

        tracing::debug!(%profile_id, count = saved.len(), "Replaced profile links");
        Ok(saved)
    }
}
