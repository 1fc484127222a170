//! Notification log of backend interactions
//!
//! The log keeps the most recent records in memory, newest first, and
//! mirrors a short prefix of them to the local key-value store so they
//! survive a restart. Subscribers receive an immutable snapshot of the
//! whole list after every mutation.
//!
//! Durable layout: `count` holds the number of persisted records and
//! `notification_{i}` holds record `i` as a versioned JSON envelope.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local;
use common::{KeyValueStore, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Maximum number of records kept in memory
pub const MAX_NOTIFICATIONS: usize = 50;

/// Number of most recent records mirrored to durable storage
pub const PERSISTED_NOTIFICATIONS: usize = 10;

/// Current version of the durable record envelope
const RECORD_VERSION: u32 = 1;

const COUNT_KEY: &str = "count";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Immutable snapshot of the log, newest first
pub type NotificationSnapshot = Arc<Vec<Notification>>;

/// Kind of backend interaction a record describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    CategoryVerification,
    ExpenseCreatedWithDecision,
    ExpenseCreated,
    ExpenseEdited,
    ExpenseDeleted,
    Error,
    Success,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::CategoryVerification => "CATEGORY_VERIFICATION",
            NotificationKind::ExpenseCreatedWithDecision => "EXPENSE_CREATED_WITH_DECISION",
            NotificationKind::ExpenseCreated => "EXPENSE_CREATED",
            NotificationKind::ExpenseEdited => "EXPENSE_EDITED",
            NotificationKind::ExpenseDeleted => "EXPENSE_DELETED",
            NotificationKind::Error => "ERROR",
            NotificationKind::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    /// Accepts current names and the names used by the pipe-delimited
    /// records written by earlier app versions
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CATEGORY_VERIFICATION" | "VERIFICACION_CATEGORIA" => {
                Ok(NotificationKind::CategoryVerification)
            }
            "EXPENSE_CREATED_WITH_DECISION" | "CREACION_GASTO" => {
                Ok(NotificationKind::ExpenseCreatedWithDecision)
            }
            "EXPENSE_CREATED" | "GASTO_NORMAL" => Ok(NotificationKind::ExpenseCreated),
            "EXPENSE_EDITED" | "EDITAR_GASTO" => Ok(NotificationKind::ExpenseEdited),
            "EXPENSE_DELETED" | "ELIMINAR_GASTO" => Ok(NotificationKind::ExpenseDeleted),
            "ERROR" => Ok(NotificationKind::Error),
            "SUCCESS" => Ok(NotificationKind::Success),
            other => Err(format!("Unknown notification kind: {}", other)),
        }
    }
}

/// One backend interaction record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Raw backend body, for later inspection
    pub raw_response: String,
    pub read: bool,
}

impl Notification {
    /// Create an unread record stamped with the current local time
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        raw_response: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            kind,
            title: title.into(),
            message: message.into(),
            raw_response: raw_response.into(),
            read: false,
        }
    }
}

/// Versioned durable envelope
#[derive(Serialize, Deserialize)]
struct StoredNotification {
    version: u32,
    record: Notification,
}

fn slot_key(index: usize) -> String {
    format!("notification_{}", index)
}

fn encode(notification: &Notification) -> StoreResult<String> {
    serde_json::to_string(&StoredNotification {
        version: RECORD_VERSION,
        record: notification.clone(),
    })
    .map_err(|e| StoreError::Serialization {
        key: notification.id.to_string(),
        reason: e.to_string(),
    })
}

fn decode(raw: &str) -> Result<Notification, String> {
    if raw.trim_start().starts_with('{') {
        let stored: StoredNotification =
            serde_json::from_str(raw).map_err(|e| format!("invalid record: {}", e))?;
        if stored.version != RECORD_VERSION {
            return Err(format!("unsupported record version {}", stored.version));
        }
        return Ok(stored.record);
    }

    decode_legacy(raw)
}

/// Pipe-delimited records from earlier app versions:
/// `id|timestamp|kind|title|message|raw|read`
fn decode_legacy(raw: &str) -> Result<Notification, String> {
    let parts: Vec<&str> = raw.split('|').collect();
    if parts.len() != 7 {
        return Err(format!("expected 7 fields, found {}", parts.len()));
    }

    Ok(Notification {
        id: Uuid::parse_str(parts[0]).map_err(|e| format!("invalid id: {}", e))?,
        timestamp: parts[1].to_string(),
        kind: parts[2].parse()?,
        title: parts[3].to_string(),
        message: parts[4].to_string(),
        raw_response: parts[5].to_string(),
        read: parts[6].parse().map_err(|_| "invalid read flag".to_string())?,
    })
}

/// Bounded, observable, persisted log of backend interactions
///
/// All mutations go through one async mutex that is held while the
/// durable prefix is rewritten, so concurrent requests can append safely
/// and durable order always matches memory order.
#[derive(Clone)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
    updates: Arc<watch::Sender<NotificationSnapshot>>,
    store: Arc<dyn KeyValueStore>,
}

impl NotificationLog {
    /// Create an empty log backed by `store`; call `load` to restore
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (updates, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(updates),
            store,
        }
    }

    /// Subscribe to snapshots; the receiver starts with the current list
    pub fn subscribe(&self) -> watch::Receiver<NotificationSnapshot> {
        self.updates.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> NotificationSnapshot {
        self.updates.borrow().clone()
    }

    /// Number of unread records
    pub fn unread_count(&self) -> usize {
        self.snapshot().iter().filter(|n| !n.read).count()
    }

    /// Record a backend interaction at the head of the log
    pub async fn append(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        raw_response: impl Into<String>,
    ) -> Notification {
        let notification = Notification::new(kind, title, message, raw_response);
        debug!("Appending {} notification: {}", kind, notification.title);

        let mut entries = self.entries.lock().await;
        entries.insert(0, notification.clone());
        entries.truncate(MAX_NOTIFICATIONS);
        self.publish(&entries).await;

        notification
    }

    /// Mark one record read; unknown ids are ignored
    pub async fn mark_read(&self, id: Uuid) {
        let mut entries = self.entries.lock().await;
        if let Some(notification) = entries.iter_mut().find(|n| n.id == id) {
            notification.read = true;
        }
        self.publish(&entries).await;
    }

    /// Mark every record read
    pub async fn mark_all_read(&self) {
        let mut entries = self.entries.lock().await;
        for notification in entries.iter_mut() {
            notification.read = true;
        }
        self.publish(&entries).await;
    }

    /// Drop every record, in memory and in durable storage
    pub async fn clear_all(&self) {
        info!("Clearing all notifications");

        let mut entries = self.entries.lock().await;
        entries.clear();
        self.updates.send_replace(Arc::new(Vec::new()));
        if let Err(e) = self.wipe().await {
            error!("Failed to wipe persisted notifications: {}", e);
        }
    }

    /// Restore the log from the durable prefix
    ///
    /// Records that fail to decode are skipped. Returns how many were
    /// restored.
    pub async fn load(&self) -> StoreResult<usize> {
        let mut entries = self.entries.lock().await;

        let count = match self.store.get(COUNT_KEY).await? {
            Some(raw) => raw.parse::<usize>().unwrap_or_else(|_| {
                warn!("Ignoring unreadable notification count {:?}", raw);
                0
            }),
            None => 0,
        };

        let mut restored = Vec::with_capacity(count.min(PERSISTED_NOTIFICATIONS));
        for index in 0..count.min(PERSISTED_NOTIFICATIONS) {
            let Some(raw) = self.store.get(&slot_key(index)).await? else {
                continue;
            };
            match decode(&raw) {
                Ok(notification) => restored.push(notification),
                Err(reason) => warn!("Skipping persisted notification {}: {}", index, reason),
            }
        }

        info!("Restored {} notifications", restored.len());
        *entries = restored;
        self.updates.send_replace(Arc::new(entries.to_vec()));

        Ok(entries.len())
    }

    /// Publish a snapshot and mirror the durable prefix
    ///
    /// Persistence failures are logged; the in-memory log stays authoritative.
    async fn publish(&self, entries: &[Notification]) {
        self.updates.send_replace(Arc::new(entries.to_vec()));
        if let Err(e) = self.persist(entries).await {
            error!("Failed to persist notifications: {}", e);
        }
    }

    async fn persist(&self, entries: &[Notification]) -> StoreResult<()> {
        let persisted = entries.len().min(PERSISTED_NOTIFICATIONS);

        for (index, notification) in entries.iter().take(persisted).enumerate() {
            self.store.set(&slot_key(index), &encode(notification)?).await?;
        }
        for index in persisted..PERSISTED_NOTIFICATIONS {
            self.store.delete(&slot_key(index)).await?;
        }
        self.store.set(COUNT_KEY, &persisted.to_string()).await?;

        Ok(())
    }

    async fn wipe(&self) -> StoreResult<()> {
        for index in 0..PERSISTED_NOTIFICATIONS {
            self.store.delete(&slot_key(index)).await?;
        }
        self.store.delete(COUNT_KEY).await
    }
}
