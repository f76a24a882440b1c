use std::fmt;

use thiserror::Error;

use crate::record::model::{CanonicalField, RawRecord, RawValue};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Canonical field → column index for one uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    columns: [usize; 9],
}

impl FieldMapping {
    /// Column index holding `field`.
    pub fn column(&self, field: CanonicalField) -> usize {
        self.columns[field.index()]
    }

    /// Pull the required fields out of one row. Cells past the end of a short
    /// row are absent.
    pub fn extract(&self, row: &[Option<RawValue>]) -> RawRecord {
        let mut record = RawRecord::new();
        for field in CanonicalField::ALL {
            if let Some(Some(value)) = row.get(self.column(field)) {
                record.set(field, value.clone());
            }
        }
        record
    }
}

/// Every required field without a matching header, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required columns: {}", MissingList(.0))]
pub struct MissingColumns(pub Vec<CanonicalField>);

struct MissingList<'a>(&'a [CanonicalField]);

impl fmt::Display for MissingList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(field.canonical_name())?;
        }
        Ok(())
    }
}

/// Strip surrounding whitespace and a leading byte-order mark.
pub fn clean_header(raw: &str) -> &str {
    raw.trim().trim_start_matches(BYTE_ORDER_MARK).trim()
}

fn header_matches(header: &str, field: CanonicalField) -> bool {
    let canonical = field.canonical_name();
    header == canonical || header == canonical.replace(' ', "_")
}

/// Map raw headers onto canonical fields.
///
/// Each field accepts its canonical spelling or the same spelling with
/// underscores for spaces. The first matching header wins. If any field is
/// unmatched the whole file is rejected with the full list.
pub fn reconcile_headers<S: AsRef<str>>(headers: &[S]) -> Result<FieldMapping, MissingColumns> {
    let cleaned: Vec<&str> = headers.iter().map(|h| clean_header(h.as_ref())).collect();

    let mut columns = [0usize; 9];
    let mut missing = Vec::new();
    for field in CanonicalField::ALL {
        match cleaned.iter().position(|h| header_matches(h, field)) {
            Some(idx) => columns[field.index()] = idx,
            None => missing.push(field),
        }
    }

    if missing.is_empty() {
        Ok(FieldMapping { columns })
    } else {
        Err(MissingColumns(missing))
    }
}
