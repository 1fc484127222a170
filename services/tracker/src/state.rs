//! Application state shared by the tracker front end

use std::sync::Arc;

use anyhow::{Result, bail};
use api::{ApiClient, Transport};
use common::{KeyValueStore, RedisStore};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::expenses::ExpenseService;
use crate::notifications::NotificationLog;
use crate::session::SessionStore;

/// Application state shared by the tracker front end
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub notifications: NotificationLog,
    pub expenses: ExpenseService,
}

impl AppState {
    /// Wire the services together and restore the persisted notifications
    pub async fn new(
        session_store: Arc<dyn KeyValueStore>,
        notification_store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let session = SessionStore::new(session_store);
        let notifications = NotificationLog::new(notification_store);

        if let Err(e) = notifications.load().await {
            warn!("Starting with an empty notification log: {}", e);
        }

        let expenses = ExpenseService::new(
            ApiClient::new(transport),
            session.clone(),
            notifications.clone(),
        );

        Self {
            session,
            notifications,
            expenses,
        }
    }

    /// Build the state on Redis storage and the HTTP backend
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let store = RedisStore::new(&config.redis_config())?;
        if !store.health_check().await? {
            bail!("Local store at {} is not reachable", config.redis_url);
        }
        info!("Local store connection successful");

        let transport = config.client_config().transport()?;

        Ok(Self::new(
            Arc::new(store.scoped("session")),
            Arc::new(store.scoped("notifications")),
            Arc::new(transport),
        )
        .await)
    }
}
