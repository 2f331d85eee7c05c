//! Redis caching for profile reads.
//!
//! Public card pages are read far more often than they are edited, so the
//! rendered profile (with links) is cached per slug and dropped whenever the
//! owner saves. Cache errors are logged and treated as misses.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Redis cache client with connection pooling.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    pub async fn new(redis_url: &str, default_ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!("Redis cache connected");

        Ok(Self {
            conn,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        })
    }

    #[instrument(skip(self), fields(cache_hit))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();

        let hit = match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key = key, error = %e, "Failed to deserialize cached value");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!(key = key, error = %e, "Redis get error");
                None
            }
        };

        tracing::Span::current().record("cache_hit", hit.is_some());
        debug!(key = key, hit = hit.is_some(), "Cache lookup");
        hit
    }

    /// Set with the configured default TTL
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    #[instrument(skip(self, value))]
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let mut conn = self.conn.clone();

        let data = serde_json::to_string(value).context("Failed to serialize value for cache")?;

        conn.set_ex::<_, _, ()>(key, data, ttl.as_secs())
            .await
            .context("Failed to set cache value")?;

        debug!(key = key, ttl_secs = ttl.as_secs(), "Cached value");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, keys: &[String]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();

        let deleted: i32 = conn.del(keys).await.context("Failed to delete cache keys")?;

        debug!(deleted = deleted, "Cache delete");
        Ok(deleted.max(0) as usize)
    }

    /// Delete all keys matching a pattern (e.g., "analytics:profile:123:*").
    #[instrument(skip(self))]
    pub async fn delete_pattern(&self, pattern: &str) -> Result<usize> {
        let mut conn = self.conn.clone();

        // SCAN rather than KEYS so large keyspaces don't block the server
        let keys: Vec<String> = redis::cmd("SCAN")
            .cursor_arg(0)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(1000)
            .query_async(&mut conn)
            .await
            .map(|(_, keys): (u64, Vec<String>)| keys)
            .unwrap_or_default();

        self.delete(&keys).await
    }

    /// Drop every cached view of a profile. Failures are logged only.
    pub async fn invalidate_profile(&self, profile_id: uuid::Uuid, slug: Option<&str>) {
        let mut keys = vec![keys::profile(profile_id)];
        if let Some(slug) = slug {
            keys.push(keys::public_profile(slug));
        }
        if let Err(e) = self.delete(&keys).await {
            warn!(%profile_id, error = %e, "Failed to invalidate profile cache");
        }
    }

    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis health check failed")?;
        Ok(())
    }
}

/// Cache key builders for consistent key formats.
pub mod keys {
    use uuid::Uuid;

    /// Own profile (authenticated view)
    pub fn profile(profile_id: Uuid) -> String {
        format!("profile:{}", profile_id)
    }

    /// Public card page, profile plus links
    pub fn public_profile(slug: &str) -> String {
        format!("public:profile:{}", slug)
    }

    pub fn analytics(profile_id: Uuid, days: u32) -> String {
        format!("analytics:profile:{}:days:{}", profile_id, days)
    }

    pub fn analytics_pattern(profile_id: Uuid) -> String {
        format!("analytics:profile:{}:*", profile_id)
    }
}

/// Cache TTLs
pub mod ttl {
    use std::time::Duration;

    pub const PROFILE: Duration = Duration::from_secs(600);
    pub const PUBLIC_PROFILE: Duration = Duration::from_secs(300);
    pub const ANALYTICS: Duration = Duration::from_secs(120);
}

#[cfg(test)]
mod tests {
    use super::keys;
    use uuid::Uuid;

    #[test]
    fn analytics_pattern_matches_summary_keys() {
        let id = Uuid::nil();
        let key = keys::analytics(id, 30);
        let prefix = keys::analytics_pattern(id);
        assert!(key.starts_with(prefix.trim_end_matches('*')));
    }
}
