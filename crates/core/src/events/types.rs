use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State changes broadcast to event-stream listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DatasetEvent {
    Welcome,
    DatasetReplaced(DatasetReplaced),
    ChatHistoryChanged(ChatHistoryChanged),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReplaced {
    pub records: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryChanged {
    pub timestamp: DateTime<Utc>,
}
