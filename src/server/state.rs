use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::service::{
    Clock, DropTableService, HttpJsonSource, RemoteSource, SystemClock, WorldstateService,
};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub drop_tables: Arc<DropTableService>,
    pub worldstate: Arc<WorldstateService>,
}

impl AppState {
    pub fn new(drop_tables: Arc<DropTableService>, worldstate: Arc<WorldstateService>) -> Self {
        Self {
            drop_tables,
            worldstate,
        }
    }

    /// Wire both services to their HTTP upstreams using one shared client.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let client = HttpJsonSource::default_client()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let market: Arc<dyn RemoteSource> =
            Arc::new(HttpJsonSource::new(client.clone(), config.market_url.clone()));
        let worldstate: Arc<dyn RemoteSource> =
            Arc::new(HttpJsonSource::new(client, config.worldstate_url.clone()));

        Ok(Self::new(
            Arc::new(DropTableService::new(
                Some(market),
                Arc::clone(&clock),
                config.drop_table_ttl(),
            )),
            Arc::new(WorldstateService::new(
                worldstate,
                clock,
                config.worldstate_ttl(),
            )),
        ))
    }
}
