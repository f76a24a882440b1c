//! Row-level validation outcomes.
//!
//! A discarded row is never surfaced to the uploader individually; reasons are
//! kept for logging and for tests.

use thiserror::Error;

use super::model::{CanonicalField, RawRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscardReason {
    #[error("required field {0} is missing or empty")]
    MissingField(CanonicalField),
    #[error("date {0:?} matched no known format")]
    UnparsableDate(String),
    #[error("superseded by a later row with the same Message URL")]
    Superseded,
}

impl DiscardReason {
    /// Short machine-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DiscardReason::MissingField(_) => "missing-field",
            DiscardReason::UnparsableDate(_) => "unparsable-date",
            DiscardReason::Superseded => "superseded",
        }
    }
}

/// Fields the normalizer cannot work without, checked in this order.
const IDENTITY_FIELDS: [CanonicalField; 3] = [
    CanonicalField::MessageUrl,
    CanonicalField::Date,
    CanonicalField::Message,
];

/// Validate that a record carries its identity fields.
pub fn validate_identity_fields(record: &RawRecord) -> Result<(), DiscardReason> {
    for field in IDENTITY_FIELDS {
        match record.get(field) {
            None => return Err(DiscardReason::MissingField(field)),
            Some(v) if v.is_blank() => return Err(DiscardReason::MissingField(field)),
            _ => {}
        }
    }
    Ok(())
}

/// Validate that every required field is present and non-empty.
pub fn validate_required_fields(record: &RawRecord) -> Result<(), DiscardReason> {
    match record.first_blank_field() {
        Some(field) => Err(DiscardReason::MissingField(field)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_fields_checked_in_order() {
        let record = RawRecord::new().with(CanonicalField::Message, "hello");
        assert_eq!(
            validate_identity_fields(&record),
            Err(DiscardReason::MissingField(CanonicalField::MessageUrl))
        );

        let record = record
            .with(CanonicalField::MessageUrl, "https://x.com/1")
            .with(CanonicalField::Date, "");
        assert_eq!(
            validate_identity_fields(&record),
            Err(DiscardReason::MissingField(CanonicalField::Date))
        );
    }

    #[test]
    fn identity_fields_ignore_other_columns() {
        let record = RawRecord::new()
            .with(CanonicalField::MessageUrl, "https://x.com/1")
            .with(CanonicalField::Date, "2024-04-05 10:30:00")
            .with(CanonicalField::Message, "hello");
        assert!(validate_identity_fields(&record).is_ok());
        assert_eq!(
            validate_required_fields(&record),
            Err(DiscardReason::MissingField(CanonicalField::Network))
        );
    }

    #[test]
    fn labels() {
        assert_eq!(
            DiscardReason::MissingField(CanonicalField::Date).label(),
            "missing-field"
        );
        assert_eq!(
            DiscardReason::UnparsableDate("x".into()).label(),
            "unparsable-date"
        );
    }
}
