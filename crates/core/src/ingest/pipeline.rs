use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use super::header::{reconcile_headers, MissingColumns};
use super::normalize::normalize_record;
use super::table::{RawTable, TableError};
use crate::record::dataset::{Dataset, DatasetHandle};
use crate::record::model::NormalizedRecord;
use crate::record::validate::{validate_required_fields, DiscardReason};

/// Upload-level failures. Each one leaves the active dataset untouched.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    MissingColumns(#[from] MissingColumns),
    #[error("no valid data found ({discarded} rows discarded)")]
    NoValidData { discarded: usize },
}

/// A row the pipeline dropped. Row numbers count data rows from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discard {
    pub row: usize,
    pub reason: DiscardReason,
}

/// Result of one pipeline run, ready to be adopted.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    pub discards: Vec<Discard>,
}

/// Run header reconciliation, pre-filtering, normalization, de-duplication and
/// ordering over one uploaded table.
pub fn run_pipeline(table: &RawTable) -> Result<PipelineOutput, IngestError> {
    let mapping = reconcile_headers(&table.headers)?;

    let mut accepted: Vec<(usize, NormalizedRecord)> = Vec::with_capacity(table.rows.len());
    let mut discards = Vec::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let row_number = idx + 1;
        let raw = mapping.extract(row);
        let outcome = validate_required_fields(&raw).and_then(|_| normalize_record(&raw));
        match outcome {
            Ok(record) => accepted.push((row_number, record)),
            Err(reason) => {
                debug!(row = row_number, reason = %reason, kind = reason.label(), "row discarded");
                discards.push(Discard {
                    row: row_number,
                    reason,
                });
            }
        }
    }

    let records = keep_last_per_url(accepted, &mut discards);

    if records.is_empty() {
        return Err(IngestError::NoValidData {
            discarded: discards.len(),
        });
    }

    discards.sort_by_key(|d| d.row);
    let dataset = Dataset::from_records(records);
    info!(
        records = dataset.len(),
        discarded = discards.len(),
        "pipeline produced dataset"
    );

    Ok(PipelineOutput { dataset, discards })
}

/// Run the pipeline and swap the result into `handle`. Used when no storage
/// step sits between normalization and adoption.
pub fn ingest_into(handle: &DatasetHandle, table: &RawTable) -> Result<PipelineOutput, IngestError> {
    let output = run_pipeline(table)?;
    handle.replace(output.dataset.clone());
    Ok(output)
}

// Message URL is the identity key; a later row replaces an earlier one.
fn keep_last_per_url(
    accepted: Vec<(usize, NormalizedRecord)>,
    discards: &mut Vec<Discard>,
) -> Vec<NormalizedRecord> {
    let mut last_row: HashMap<String, usize> = HashMap::with_capacity(accepted.len());
    for (row, record) in &accepted {
        last_row.insert(record.message_url.clone(), *row);
    }
    let survivors: Vec<usize> = accepted
        .iter()
        .filter(|(row, record)| last_row[record.message_url.as_str()] == *row)
        .map(|(row, _)| *row)
        .collect();

    let mut records = Vec::with_capacity(survivors.len());
    let mut survivors = survivors.into_iter().peekable();
    for (row, record) in accepted {
        if survivors.peek() == Some(&row) {
            survivors.next();
            records.push(record);
        } else {
            debug!(row, url = %record.message_url, "row superseded by later duplicate");
            discards.push(Discard {
                row,
                reason: DiscardReason::Superseded,
            });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::model::CanonicalField;

    const HEADER: &str =
        "Network,Message URL,Date,Message,Type,Content Type,Profile,Followers,Engagements\n";

    fn table(rows: &[&str]) -> RawTable {
        let mut csv = HEADER.to_string();
        for row in rows {
            csv.push_str(row);
            csv.push('\n');
        }
        RawTable::from_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn sorts_most_recent_first() {
        let output = run_pipeline(&table(&[
            "twitter,u1,2024-01-01 00:00:00,old,Post,Text,a,1,1",
            "twitter,u2,2024-03-01 00:00:00,new,Post,Text,a,1,1",
            "twitter,u3,2024-02-01 00:00:00,mid,Post,Text,a,1,1",
        ]))
        .unwrap();
        let urls: Vec<&str> = output
            .dataset
            .records()
            .iter()
            .map(|r| r.message_url.as_str())
            .collect();
        assert_eq!(urls, vec!["u2", "u3", "u1"]);
        assert!(output.discards.is_empty());
    }

    #[test]
    fn prefilter_discards_rows_with_any_blank_field() {
        let output = run_pipeline(&table(&[
            "twitter,u1,2024-01-01 00:00:00,hi,Post,Text,,1,1",
            "twitter,u2,2024-01-02 00:00:00,hi,Post,Text,a,1,1",
        ]))
        .unwrap();
        assert_eq!(output.dataset.len(), 1);
        assert_eq!(
            output.discards,
            vec![Discard {
                row: 1,
                reason: DiscardReason::MissingField(CanonicalField::Profile),
            }]
        );
    }

    #[test]
    fn duplicate_urls_keep_last() {
        let output = run_pipeline(&table(&[
            "twitter,u1,2024-01-01 00:00:00,first,Post,Text,a,1,1",
            "twitter,u2,2024-01-02 00:00:00,other,Post,Text,a,1,1",
            "twitter,u1,2024-01-03 00:00:00,second,Post,Text,a,1,1",
        ]))
        .unwrap();
        assert_eq!(output.dataset.len(), 2);
        let u1 = output.dataset.find_by_url("u1").unwrap();
        assert_eq!(u1.message, "second");
        assert_eq!(output.discards[0].reason, DiscardReason::Superseded);
        assert_eq!(output.discards[0].row, 1);
    }

    #[test]
    fn all_rows_invalid_is_no_valid_data() {
        let err = run_pipeline(&table(&[
            "twitter,u1,not a date,hi,Post,Text,a,1,1",
            "twitter,u2,,hi,Post,Text,a,1,1",
        ]))
        .unwrap_err();
        assert!(matches!(err, IngestError::NoValidData { discarded: 2 }));
    }

    #[test]
    fn missing_columns_abort_and_keep_previous() {
        let handle = DatasetHandle::new();
        ingest_into(
            &handle,
            &table(&["twitter,u1,2024-01-01 00:00:00,hi,Post,Text,a,1,1"]),
        )
        .unwrap();

        let bad = RawTable::from_csv(b"Network,MessageURL,Date\ntwitter,u9,2024-01-01 00:00:00\n").unwrap();
        let err = ingest_into(&handle, &bad).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumns(_)));
        assert_eq!(handle.snapshot().len(), 1);
        assert!(handle.snapshot().find_by_url("u1").is_some());
    }
}
