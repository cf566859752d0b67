//! Redis cache for the editais listing. The cache is advisory: any Redis
//! failure is logged and the request falls through to Postgres.

use redis::AsyncCommands;
use redis::Client as RedisClient;
use tracing::warn;

use crate::models::edital::EditalSummary;

pub const EDITAIS_LIST_KEY: &str = "editais:list";
pub const EDITAIS_LIST_TTL_SECS: u64 = 300;

pub async fn get_cached_listing(redis: &RedisClient) -> Option<Vec<EditalSummary>> {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Redis unavailable, listing served from Postgres: {e}");
            return None;
        }
    };

    let payload: Option<String> = match conn.get(EDITAIS_LIST_KEY).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Redis GET failed for {EDITAIS_LIST_KEY}: {e}");
            return None;
        }
    };

    serde_json::from_str(&payload?).ok()
}

pub async fn store_listing(redis: &RedisClient, listing: &[EditalSummary]) {
    let payload = match serde_json::to_string(listing) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to serialize editais listing for cache: {e}");
            return;
        }
    };

    match redis.get_multiplexed_async_connection().await {
        Ok(mut conn) => {
            if let Err(e) = conn
                .set_ex::<_, _, ()>(EDITAIS_LIST_KEY, payload, EDITAIS_LIST_TTL_SECS)
                .await
            {
                warn!("Redis SETEX failed for {EDITAIS_LIST_KEY}: {e}");
            }
        }
        Err(e) => warn!("Redis unavailable, listing not cached: {e}"),
    }
}

/// Dropped on every edital create/update/delete so the next listing
/// rebuilds from Postgres.
pub async fn invalidate_listing(redis: &RedisClient) {
    match redis.get_multiplexed_async_connection().await {
        Ok(mut conn) => {
            if let Err(e) = conn.del::<_, ()>(EDITAIS_LIST_KEY).await {
                warn!("Redis DEL failed for {EDITAIS_LIST_KEY}: {e}");
            }
        }
        Err(e) => warn!("Redis unavailable, cache not invalidated: {e}"),
    }
}
