use std::sync::Arc;

use chrono::TimeDelta;
use tracing::{debug, error, info, warn};

use crate::data::drop_table::DropTableSnapshot;
use crate::data::item::{normalize_item, Item, RawItem};
use crate::data::market::market_items;
use crate::data::relic::Relic;
use crate::data::search::{filter_items, filter_relics};
use crate::data::seed::seed_drop_table;
use crate::error::FetchError;
use crate::service::cache::{CacheState, Clock, TtlCache};
use crate::service::remote::RemoteSource;

/// Catalog cache. Live item data comes from the market listing; relics and
/// drop locations have no live source and always come from the seed
/// dataset, which also stands in for everything when the listing fails.
pub struct DropTableService {
    catalog: Option<Arc<dyn RemoteSource>>,
    clock: Arc<dyn Clock>,
    cache: TtlCache<DropTableSnapshot>,
}

impl DropTableService {
    pub fn new(
        catalog: Option<Arc<dyn RemoteSource>>,
        clock: Arc<dyn Clock>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            catalog,
            clock,
            cache: TtlCache::new(ttl),
        }
    }

    pub async fn load(&self) -> Arc<DropTableSnapshot> {
        let now = self.clock.now();
        if let Some(cached) = self.cache.fresh(now) {
            debug!("drop table served from cache");
            return cached;
        }

        if let Some(catalog) = &self.catalog {
            match fetch_live(catalog.as_ref()).await {
                Ok(snapshot) => {
                    info!(
                        origin = catalog.origin(),
                        items = snapshot.items.len(),
                        "drop table refreshed from live catalog"
                    );
                    return self.cache.store(snapshot, now);
                }
                Err(err) => warn!(error = %err, "live catalog unavailable, using seed data"),
            }
        }

        match seed_drop_table() {
            Ok(seed) => self.cache.store(seed, now),
            Err(err) => {
                error!(error = %err, "bundled seed drop table is unreadable");
                Arc::new(DropTableSnapshot::default())
            }
        }
    }

    pub async fn search_items(&self, query: &str) -> Vec<Item> {
        filter_items(&self.load().await.items, query)
    }

    pub async fn search_relics(&self, query: &str) -> Vec<Relic> {
        filter_relics(&self.load().await.relics, query)
    }

    pub async fn all_items(&self) -> Vec<Item> {
        self.load().await.items.clone()
    }

    pub async fn all_relics(&self) -> Vec<Relic> {
        self.load().await.relics.clone()
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache.state(self.clock.now())
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

async fn fetch_live(catalog: &dyn RemoteSource) -> Result<DropTableSnapshot, FetchError> {
    let payload = catalog.fetch_json().await?;
    let items = market_items(&payload).ok_or_else(|| FetchError::Shape {
        url: catalog.origin().to_string(),
        reason: "missing payload.items".to_string(),
    })?;
    merge_live(items, seed_drop_table())
}

/// Live items over seed relics and drops. Without a readable seed the live
/// result is incomplete, so it is refused rather than cached.
fn merge_live(
    items: Vec<RawItem>,
    seed: Result<DropTableSnapshot, serde_json::Error>,
) -> Result<DropTableSnapshot, FetchError> {
    let seed = seed.map_err(FetchError::Seed)?;
    Ok(DropTableSnapshot {
        items: items.into_iter().map(normalize_item).collect(),
        ..seed
    })
}
