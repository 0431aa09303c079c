use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

/// Toast shown on the next rendered page. Serializes as
/// `{"type": "success", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Error, message: message.into() }
    }
}

/// Notifications queued by a component during one interaction.
#[derive(Debug, Clone, Default)]
pub struct Outbox(Vec<Notification>);

impl Outbox {
    pub fn push(&mut self, notification: Notification) {
        self.0.push(notification);
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.0)
    }
}
