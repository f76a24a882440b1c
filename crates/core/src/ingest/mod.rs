//! CSV/JSON ingestion: tokenization, header reconciliation, per-row
//! normalization and dataset assembly.

pub mod date;
pub mod header;
pub mod normalize;
pub mod pipeline;
pub mod sanitize;
pub mod table;
