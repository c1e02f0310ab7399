use std::sync::Arc;

use sqlx::PgPool;
use zman_core::{SessionConfig, TracingNotifier};

use crate::adapters::outbound::postgres::{PgProfileReader, PgTimeEntryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PgTimeEntryStore>,
    pub profiles: Arc<PgProfileReader>,
    pub notifier: Arc<TracingNotifier>,
    pub session_config: SessionConfig,
}

impl AppState {
    pub fn new(db_pool: PgPool, session_config: SessionConfig) -> Self {
        Self {
            store: Arc::new(PgTimeEntryStore::new(db_pool.clone())),
            profiles: Arc::new(PgProfileReader::new(db_pool)),
            notifier: Arc::new(TracingNotifier),
            session_config,
        }
    }
}
