use std::fmt::Write as _;

use crate::record::dataset::Dataset;
use crate::record::model::NormalizedRecord;

/// Records exposed to the language model when nothing is focused.
pub const RECENT_CONTEXT_SIZE: usize = 5;

/// Pick the grounding records for a question: the focused record alone, or
/// the most recent [`RECENT_CONTEXT_SIZE`] records.
pub fn select_context<'a>(
    dataset: &'a Dataset,
    focused: Option<&'a NormalizedRecord>,
) -> Vec<&'a NormalizedRecord> {
    match focused {
        Some(record) => vec![record],
        None => dataset.records().iter().take(RECENT_CONTEXT_SIZE).collect(),
    }
}

/// Render one record as a key/value text block.
pub fn render_record(record: &NormalizedRecord) -> String {
    let mut out = String::from("Post Details:\n");
    let _ = writeln!(out, "- Network: {}", record.network);
    let _ = writeln!(
        out,
        "- Profile: {} (Followers: {})",
        record.profile, record.followers
    );
    let _ = writeln!(out, "- Date: {}", record.formatted_date);
    let _ = writeln!(out, "- Type: {}", record.kind);
    let _ = writeln!(out, "- Content Type: {}", record.content_type);
    let _ = writeln!(out, "- Message: \"{}\"", record.message);
    let _ = writeln!(out, "- Engagements: {}", record.engagements);
    let _ = write!(out, "- URL: {}", record.message_url);
    out
}

/// Render a context set, blocks separated by a blank line.
pub fn render_context(records: &[&NormalizedRecord]) -> String {
    records
        .iter()
        .map(|r| render_record(r))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(i: usize) -> NormalizedRecord {
        NormalizedRecord {
            network: "twitter".into(),
            message_url: format!("https://example.com/{i}"),
            date: format!("2024-04-{:02} 10:30:00", i),
            occurred_at: format!("2024-04-{:02}T10:30:00Z", i).parse().unwrap(),
            message: format!("post {i}"),
            kind: "Post".into(),
            content_type: "Text".into(),
            profile: "alice".into(),
            followers: 1200,
            engagements: i as u64,
            formatted_date: String::new(),
        }
    }

    fn dataset(n: usize) -> Dataset {
        Dataset::from_records((1..=n).map(record).collect())
    }

    #[test]
    fn defaults_to_five_most_recent() {
        let data = dataset(8);
        let selected = select_context(&data, None);
        assert_eq!(selected.len(), 5);
        assert_eq!(selected[0].message, "post 8");
        assert_eq!(selected[4].message, "post 4");
    }

    #[test]
    fn small_dataset_returns_everything() {
        let data = dataset(2);
        assert_eq!(select_context(&data, None).len(), 2);
        assert!(select_context(&Dataset::default(), None).is_empty());
    }

    #[test]
    fn focused_record_is_exclusive() {
        let data = dataset(8);
        let focused = data.find_by_url("https://example.com/2");
        let selected = select_context(&data, focused);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].message, "post 2");
    }

    #[test]
    fn renders_key_value_block() {
        let text = render_record(&record(3));
        assert!(text.starts_with("Post Details:\n- Network: twitter\n"));
        assert!(text.contains("- Profile: alice (Followers: 1200)"));
        assert!(text.contains("- Message: \"post 3\""));
        assert!(text.ends_with("- URL: https://example.com/3"));
    }

    #[test]
    fn context_blocks_are_separated() {
        let data = dataset(2);
        let text = render_context(&select_context(&data, None));
        assert_eq!(text.matches("Post Details:").count(), 2);
        assert!(text.contains("\n\nPost Details:"));
    }
}
