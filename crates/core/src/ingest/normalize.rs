use tracing::debug;

use super::date::{format_long_date, resolve_date};
use super::sanitize::sanitize_message;
use crate::record::model::{CanonicalField, NormalizedRecord, RawRecord, RawValue};
use crate::record::validate::{validate_identity_fields, DiscardReason};

/// Turn one raw record into a normalized one, or say why it was discarded.
///
/// Pure: the same input always yields the same output.
pub fn normalize_record(raw: &RawRecord) -> Result<NormalizedRecord, DiscardReason> {
    validate_identity_fields(raw)?;

    let date = text(raw, CanonicalField::Date);
    let occurred_at = resolve_date(&date).ok_or_else(|| DiscardReason::UnparsableDate(date.clone()))?;

    Ok(NormalizedRecord {
        network: text(raw, CanonicalField::Network),
        message_url: text(raw, CanonicalField::MessageUrl),
        message: sanitize_message(&text(raw, CanonicalField::Message)),
        kind: text(raw, CanonicalField::Type),
        content_type: text(raw, CanonicalField::ContentType),
        profile: text(raw, CanonicalField::Profile),
        followers: coerce_count(raw.get(CanonicalField::Followers)),
        engagements: coerce_count(raw.get(CanonicalField::Engagements)),
        formatted_date: format_long_date(&occurred_at),
        occurred_at,
        date,
    })
}

fn text(raw: &RawRecord, field: CanonicalField) -> String {
    raw.text(field).unwrap_or_default()
}

/// Coerce a count column. Numbers pass through (negatives become 0, fractions
/// are truncated); text must be a plain unsigned integer, anything else is 0.
pub fn coerce_count(value: Option<&RawValue>) -> u64 {
    match value {
        None => 0,
        Some(RawValue::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else if let Some(v) = n.as_f64().filter(|v| v.is_finite() && *v >= 0.0) {
                v.trunc() as u64
            } else {
                debug!(value = %n, "negative count coerced to 0");
                0
            }
        }
        Some(RawValue::Text(s)) => match s.trim().parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                debug!(value = %s, "non-numeric count coerced to 0");
                0
            }
        },
    }
}
