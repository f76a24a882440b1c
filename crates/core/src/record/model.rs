use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The nine columns every uploaded file must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    Network,
    MessageUrl,
    Date,
    Message,
    Type,
    ContentType,
    Profile,
    Followers,
    Engagements,
}

impl CanonicalField {
    /// All required fields, in canonical order.
    pub const ALL: [CanonicalField; 9] = [
        CanonicalField::Network,
        CanonicalField::MessageUrl,
        CanonicalField::Date,
        CanonicalField::Message,
        CanonicalField::Type,
        CanonicalField::ContentType,
        CanonicalField::Profile,
        CanonicalField::Followers,
        CanonicalField::Engagements,
    ];

    /// Spelling used in export headers, with spaces.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            CanonicalField::Network => "Network",
            CanonicalField::MessageUrl => "Message URL",
            CanonicalField::Date => "Date",
            CanonicalField::Message => "Message",
            CanonicalField::Type => "Type",
            CanonicalField::ContentType => "Content Type",
            CanonicalField::Profile => "Profile",
            CanonicalField::Followers => "Followers",
            CanonicalField::Engagements => "Engagements",
        }
    }

    /// Position of this field in [`CanonicalField::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A cell value as received from the uploader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(serde_json::Number),
    Text(String),
}

impl RawValue {
    /// True for empty text. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.is_empty())
    }

    /// Text form of the value, as it would appear in a CSV cell.
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// One uploaded row keyed by canonical field. Exists only during ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    values: [Option<RawValue>; 9],
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: CanonicalField, value: impl Into<RawValue>) -> Self {
        self.set(field, value.into());
        self
    }

    pub fn set(&mut self, field: CanonicalField, value: RawValue) {
        self.values[field.index()] = Some(value);
    }

    pub fn get(&self, field: CanonicalField) -> Option<&RawValue> {
        self.values[field.index()].as_ref()
    }

    /// Text of a field, or `None` when absent or empty.
    pub fn text(&self, field: CanonicalField) -> Option<String> {
        self.get(field)
            .filter(|v| !v.is_blank())
            .map(RawValue::as_text)
    }

    /// First required field that is absent or empty, if any.
    pub fn first_blank_field(&self) -> Option<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .find(|field| self.get(*field).map_or(true, RawValue::is_blank))
    }
}

/// A validated, typed, sanitized post. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Network")]
    pub network: String,
    #[serde(rename = "Message_URL")]
    pub message_url: String,
    /// Raw date text from the upload.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "occurredAt")]
    pub occurred_at: DateTime<Utc>,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Content_Type")]
    pub content_type: String,
    #[serde(rename = "Profile")]
    pub profile: String,
    #[serde(rename = "Followers")]
    pub followers: u64,
    #[serde(rename = "Engagements")]
    pub engagements: u64,
    #[serde(rename = "formattedDate")]
    pub formatted_date: String,
}
