// src/cli/serve.rs — `wayrank serve`

use std::sync::Arc;

use crate::api::{self, ApiState};
use crate::clock::SystemClock;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::storage::SqliteStore;
use crate::usage::{LogLimits, UsageLogStore};

/// Serve the sync endpoint over the local database.
pub async fn run_serve(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    paths::ensure_dirs()?;
    let store = SqliteStore::open(&paths::db_path())?;
    let journal = UsageLogStore::new(Arc::new(store), Arc::new(SystemClock)).with_limits(LogLimits {
        max_events: config.optimizer.max_events,
        max_age_days: config.optimizer.log_window_days,
    });

    let mut server = config.server.clone();
    if let Some(port) = port {
        server.port = port;
    }

    let state = ApiState {
        journal: Arc::new(journal),
        token: server.token.clone(),
    };
    api::start_server(&server, state).await
}
