use std::sync::Arc;

use chrono::TimeDelta;
use tracing::{debug, info, warn};

use crate::data::worldstate::{parse_worldstate, WorldCategory, WorldEvent, WorldstateSnapshot};
use crate::service::cache::{CacheState, Clock, TtlCache};
use crate::service::remote::RemoteSource;

/// Worldstate cache. A failed refresh keeps serving the last snapshot, however
/// old; with nothing cached it answers with an empty snapshot.
pub struct WorldstateService {
    source: Arc<dyn RemoteSource>,
    clock: Arc<dyn Clock>,
    cache: TtlCache<WorldstateSnapshot>,
}

impl WorldstateService {
    pub fn new(source: Arc<dyn RemoteSource>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            source,
            clock,
            cache: TtlCache::new(ttl),
        }
    }

    pub async fn fetch_worldstate(&self) -> Arc<WorldstateSnapshot> {
        let now = self.clock.now();
        if let Some(cached) = self.cache.fresh(now) {
            debug!("worldstate served from cache");
            return cached;
        }

        match self.source.fetch_json().await {
            Ok(payload) => {
                let snapshot = parse_worldstate(&payload, now);
                info!(
                    origin = self.source.origin(),
                    events = snapshot.total_events(),
                    "worldstate refreshed"
                );
                self.cache.store(snapshot, now)
            }
            Err(err) => match self.cache.latest() {
                Some(stale) => {
                    warn!(error = %err, "worldstate refresh failed, serving stale snapshot");
                    stale
                }
                None => {
                    warn!(error = %err, "worldstate refresh failed with nothing cached");
                    Arc::new(WorldstateSnapshot::empty(now))
                }
            },
        }
    }

    pub async fn category(&self, category: WorldCategory) -> Vec<WorldEvent> {
        self.fetch_worldstate().await.category(category).to_vec()
    }

    pub async fn alerts(&self) -> Vec<WorldEvent> {
        self.category(WorldCategory::Alerts).await
    }

    pub async fn invasions(&self) -> Vec<WorldEvent> {
        self.category(WorldCategory::Invasions).await
    }

    pub async fn sorties(&self) -> Vec<WorldEvent> {
        self.category(WorldCategory::Sorties).await
    }

    pub async fn fissures(&self) -> Vec<WorldEvent> {
        self.category(WorldCategory::Fissures).await
    }

    pub async fn events(&self) -> Vec<WorldEvent> {
        self.category(WorldCategory::Events).await
    }

    pub async fn nightwave(&self) -> Vec<WorldEvent> {
        self.category(WorldCategory::Nightwave).await
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache.state(self.clock.now())
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
