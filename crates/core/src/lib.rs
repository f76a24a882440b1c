//! Ingestion, normalization and analytics for uploaded social-media post
//! exports, plus the persistence and event plumbing around them.

pub mod analytics;
pub mod chat;
pub mod context;
pub mod events;
pub mod ingest;
pub mod record;

pub use analytics::{summarize, AnalyticsSummary};
pub use ingest::pipeline::{run_pipeline, IngestError, PipelineOutput};
pub use ingest::table::RawTable;
pub use record::dataset::{Dataset, DatasetHandle};
pub use record::model::NormalizedRecord;
