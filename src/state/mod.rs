pub mod audit;
pub mod identity;
pub mod ledger;
pub mod room4;
pub mod rooms;
pub mod store;

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;

use self::{
    audit::{AuditSink, NoopAuditSink, TracingAuditSink},
    ledger::RoomUnlockLedger,
    room4::{CodeSource, RandomCodes, Room4Engine},
    rooms::RoomTable,
};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state owning every store. Built once at startup and injected into routes.
pub struct AppState {
    config: AppConfig,
    ledger: Arc<RoomUnlockLedger>,
    room4: Room4Engine,
}

impl AppState {
    /// Construct the state from configuration, with random Room 4 codes and the configured audit sink.
    pub fn new(config: AppConfig) -> SharedState {
        let audit: Arc<dyn AuditSink> = if config.audit_enabled {
            Arc::new(TracingAuditSink)
        } else {
            Arc::new(NoopAuditSink)
        };
        Self::with_parts(config, audit, Arc::new(RandomCodes))
    }

    /// Construct the state with explicit collaborators.
    pub fn with_parts(
        config: AppConfig,
        audit: Arc<dyn AuditSink>,
        codes: Arc<dyn CodeSource>,
    ) -> SharedState {
        let stores = config.stores;
        let ledger = Arc::new(RoomUnlockLedger::new(
            stores.capacity,
            stores.progress_ttl,
            audit,
        ));
        let room4 = Room4Engine::new(
            config.room4.clone(),
            ledger.clone(),
            stores.capacity,
            stores.puzzle_ttl,
            codes,
        );
        info!(
            capacity = stores.capacity,
            progress_ttl_secs = stores.progress_ttl.as_secs(),
            puzzle_ttl_secs = stores.puzzle_ttl.as_secs(),
            "in-memory stores ready"
        );

        Arc::new(Self {
            config,
            ledger,
            room4,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Rooms and their secrets.
    pub fn rooms(&self) -> &RoomTable {
        &self.config.rooms
    }

    /// Unlock and solve flags of every team.
    pub fn ledger(&self) -> &RoomUnlockLedger {
        &self.ledger
    }

    /// Room 4 puzzle engine.
    pub fn room4(&self) -> &Room4Engine {
        &self.room4
    }
}
