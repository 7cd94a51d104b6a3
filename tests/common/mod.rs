#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use tennohub::error::FetchError;
use tennohub::service::{
    Clock, DropTableService, ManualClock, RemoteSource, WorldstateService,
};

/// Remote source that counts calls and can be switched into failure mode.
pub struct StubSource {
    payload: Mutex<Value>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(payload: Value) -> Arc<Self> {
        Arc::new(Self {
            payload: Mutex::new(payload),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        let stub = Self::new(Value::Null);
        stub.set_failing(true);
        stub
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_payload(&self, payload: Value) {
        *self.payload.lock().expect("stub payload lock") = payload;
    }
}

#[async_trait]
impl RemoteSource for StubSource {
    fn origin(&self) -> &str {
        "stub://upstream"
    }

    async fn fetch_json(&self) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                url: self.origin().to_string(),
                status: 503,
            });
        }
        Ok(self.payload.lock().expect("stub payload lock").clone())
    }
}

pub fn start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
        .expect("valid instant")
        .with_timezone(&Utc)
}

pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start()))
}

pub fn market_payload() -> Value {
    serde_json::json!({
        "payload": {
            "items": [
                {"url_name": "ash_prime_set", "item_name": "Ash Prime Set", "category": "warframes"},
                {"url_name": "vitality", "item_name": "Vitality", "category": "mods", "description": "Health"},
                {"url_name": "arcane_energize", "item_name": "Arcane Energize", "category": "arcanes"}
            ]
        }
    })
}

pub fn flat_worldstate(alert_id: &str) -> Value {
    serde_json::json!({
        "timestamp": "2024-03-01T12:00:00.000Z",
        "alerts": [{
            "id": alert_id,
            "mission": {"type": "Survival", "node": "Mot (Void)"},
            "activation": "2024-03-01T11:00:00.000Z",
            "expiry": "2024-03-01T13:00:00.000Z"
        }],
        "fissures": [{"id": "f1", "tier": "Axi", "node": "Xini (Eris)", "missionType": "Interception"}]
    })
}

pub fn drop_table_service(
    source: Option<Arc<StubSource>>,
    clock: Arc<ManualClock>,
) -> DropTableService {
    let source = source.map(|stub| stub as Arc<dyn RemoteSource>);
    DropTableService::new(source, clock as Arc<dyn Clock>, TimeDelta::minutes(30))
}

pub fn worldstate_service(source: Arc<StubSource>, clock: Arc<ManualClock>) -> WorldstateService {
    WorldstateService::new(source, clock as Arc<dyn Clock>, TimeDelta::minutes(5))
}
