use axum::body::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::WalkSummary;

/// A finished render ready to be served
#[derive(Clone)]
pub struct CachedRender {
    /// Encoded PNG bytes
    pub png_bytes: Bytes,
    /// Statistics of the walk that produced it
    pub summary: WalkSummary,
    /// When this render was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Renders kept when the config does not say otherwise
pub const DEFAULT_RENDER_CACHE_CAPACITY: usize = 64;

/// Cache for pinned-seed renders, keyed by canvas name and seed
///
/// A walk with a fixed seed always paints the same image, so it only has
/// to run once. Holds at most `capacity` renders; storing a new key into a
/// full cache evicts the oldest render.
pub struct RenderCache {
    cache: Arc<RwLock<HashMap<(String, u64), CachedRender>>>,
    capacity: usize,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RENDER_CACHE_CAPACITY)
    }

    /// A cache holding at most `capacity` renders (0 disables caching)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a render, evicting the oldest one if the cache is full
    pub async fn store(&self, canvas: &str, seed: u64, render: CachedRender) {
        if self.capacity == 0 {
            return;
        }
        let key = (canvas.to_string(), seed);
        let mut cache = self.cache.write().await;
        if !cache.contains_key(&key) && cache.len() >= self.capacity {
            let oldest = cache
                .iter()
                .min_by_key(|(_, cached)| cached.generated_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(canvas = %oldest.0, seed = oldest.1, "Evicting cached render");
                cache.remove(&oldest);
            }
        }
        cache.insert(key, render);
    }

    /// Retrieve a cached render
    pub async fn get(&self, canvas: &str, seed: u64) -> Option<CachedRender> {
        let cache = self.cache.read().await;
        cache.get(&(canvas.to_string(), seed)).cloned()
    }

    /// Number of cached renders
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}
