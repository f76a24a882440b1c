use social_lens_core::analytics::summarize;
use social_lens_core::context::select_context;
use social_lens_core::ingest::header::MissingColumns;
use social_lens_core::ingest::pipeline::{ingest_into, run_pipeline, IngestError};
use social_lens_core::record::model::CanonicalField;
use social_lens_core::record::validate::DiscardReason;
use social_lens_core::{DatasetHandle, RawTable};

const EXPORT: &str = "\u{feff}Network,Message_URL,Date,Message,Type,Content_Type,Profile,Followers,Engagements
Twitter,https://x.com/a/1,04/05/2024 10:30,\"RT @alice: Check this out! https://example.com/x &amp; more\",Post,Text,alice,\"12,000\",40
Twitter,https://x.com/b/2,2024-04-06 09:00:00,Morning update,Post,Photo,bob,800,12
LinkedIn,https://li.com/c/3,2024-04-04T08:15:00.000+02:00,Quarterly results are in,Article,Link,carol,5400,90
Twitter,https://x.com/a/4,2024-04-03T18:00:00Z,Thread 1/2,Reply,Text,alice,12000,5
Facebook,https://fb.com/d/5,,No date on this one,Post,Text,dave,300,3
Instagram,https://ig.com/e/6,2024-04-02,Sunset,Post,Video,erin,2100,75
Twitter,https://x.com/b/7,2024-04-06 09:00:00,Same minute as bob's other post,Post,Text,bob,800,12
LinkedIn,https://li.com/c/8,03/30/2024 23:59,Hiring!,Post,Text,carol,5400,33
Twitter,https://x.com/f/9,2024-03-29 07:00:00,&lt;3 this community,Post,Text,frank,50,1
";

#[test]
fn nine_row_export_with_one_blank_date() {
    let table = RawTable::from_csv(EXPORT.as_bytes()).unwrap();
    let output = run_pipeline(&table).unwrap();

    assert_eq!(output.dataset.len(), 8);
    assert_eq!(output.discards.len(), 1);
    assert_eq!(output.discards[0].row, 5);
    assert_eq!(
        output.discards[0].reason,
        DiscardReason::MissingField(CanonicalField::Date)
    );

    let records = output.dataset.records();
    assert!(records
        .windows(2)
        .all(|w| w[0].occurred_at >= w[1].occurred_at));

    // Rows 2 and 7 share an instant and keep their input order.
    assert_eq!(records[0].message_url, "https://x.com/b/2");
    assert_eq!(records[1].message_url, "https://x.com/b/7");

    let alice = output.dataset.find_by_url("https://x.com/a/1").unwrap();
    assert_eq!(alice.message, "Check this out! & more");
    assert_eq!(alice.formatted_date, "April 5th, 2024");
    assert_eq!(alice.followers, 0);
    assert_eq!(alice.engagements, 40);

    let frank = output.dataset.find_by_url("https://x.com/f/9").unwrap();
    assert_eq!(frank.message, "<3 this community");
}

#[test]
fn analytics_and_context_over_ingested_export() {
    let table = RawTable::from_csv(EXPORT.as_bytes()).unwrap();
    let dataset = run_pipeline(&table).unwrap().dataset;

    let summary = summarize(&dataset);
    assert_eq!(summary.total_records, 8);
    assert_eq!(summary.total_engagements, 40 + 12 + 90 + 5 + 75 + 12 + 33 + 1);
    assert_eq!(summary.posts_per_network["Twitter"], 5);
    assert_eq!(summary.posts_per_network["LinkedIn"], 2);
    assert_eq!(summary.top_profiles.len(), 5);
    assert_eq!(summary.top_profiles[0].profile, "carol");
    assert_eq!(summary.top_profiles[0].engagements, 123);

    let context = select_context(&dataset, None);
    assert_eq!(context.len(), 5);
    assert_eq!(context[0].message_url, "https://x.com/b/2");
}

#[test]
fn rejected_upload_leaves_active_dataset() {
    let handle = DatasetHandle::new();
    ingest_into(&handle, &RawTable::from_csv(EXPORT.as_bytes()).unwrap()).unwrap();
    let before = handle.snapshot();

    let headers_only = "Network,MessageURL,Date,Message,Type,Content Type,Profile,Followers\n";
    let err = ingest_into(&handle, &RawTable::from_csv(headers_only.as_bytes()).unwrap())
        .unwrap_err();
    match err {
        IngestError::MissingColumns(MissingColumns(missing)) => assert_eq!(
            missing,
            vec![CanonicalField::MessageUrl, CanonicalField::Engagements]
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*handle.snapshot(), *before);

    let no_valid_rows = "Network,Message URL,Date,Message,Type,Content Type,Profile,Followers,Engagements\n\
                         Twitter,https://x.com/z,never,hello,Post,Text,zed,1,1\n";
    let err = ingest_into(&handle, &RawTable::from_csv(no_valid_rows.as_bytes()).unwrap())
        .unwrap_err();
    assert!(matches!(err, IngestError::NoValidData { discarded: 1 }));
    assert_eq!(handle.snapshot().len(), 8);
}
