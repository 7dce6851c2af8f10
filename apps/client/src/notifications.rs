//! Process-wide queue of transient, user-facing notifications.
//!
//! Append on show, remove by id on dismissal or when the auto-dismiss timer fires.
//! Observers subscribe through a `watch` receiver and see the full list on every change.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

pub type NotificationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn default_duration(self) -> Duration {
        match self {
            NotificationKind::Success | NotificationKind::Info => Duration::from_secs(3),
            NotificationKind::Warning => Duration::from_secs(4),
            NotificationKind::Error => Duration::from_secs(5),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    /// Zero means the notification stays until dismissed.
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

/// Cheap to clone; all clones share one list.
#[derive(Clone)]
pub struct NotificationQueue {
    active: Arc<watch::Sender<Vec<Notification>>>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            active: Arc::new(tx),
        }
    }

    /// Appends a notification and returns its id.
    ///
    /// A non-zero `duration` schedules removal on the current Tokio runtime.
    /// Outside a runtime the notification stays until dismissed.
    pub fn show(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Duration,
    ) -> NotificationId {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            duration,
            created_at: Utc::now(),
        };
        let id = notification.id;

        debug!(%id, kind = kind.label(), "notification: {}", notification.message);
        self.active.send_modify(|list| list.push(notification));

        if !duration.is_zero() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let queue: Weak<watch::Sender<Vec<Notification>>> = Arc::downgrade(&self.active);
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    if let Some(active) = queue.upgrade() {
                        NotificationQueue { active }.dismiss(id);
                    }
                });
            }
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show_default(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show_default(NotificationKind::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.show_default(NotificationKind::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show_default(NotificationKind::Info, message)
    }

    fn show_default(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        self.show(kind, message, kind.default_duration())
    }

    /// Removes the notification with `id`. Returns false (and changes nothing) if it is absent.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.active.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| n.id != id);
            list.len() != before
        })
    }

    pub fn clear(&self) {
        self.active.send_if_modified(|list| {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        });
    }

    /// Snapshot of the active notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.active.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.active.subscribe()
    }
}
