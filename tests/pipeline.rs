//! End-to-end pipeline tests with in-memory fetcher and generator.

use std::io::Write;

use async_trait::async_trait;
use tokio::sync::mpsc;

use metarewrite::analysis::{
    analyze, merge_suggestions, summarize_pages, AnalysisParams, GENERATION_ERROR_TITLE,
};
use metarewrite::export::{create_output, write_suggestions, ExportFormat};
use metarewrite::input::{read_records, read_records_from_path, InputError};
use metarewrite::llm::{SuggestionGenerator, Tone};
use metarewrite::models::{ActionCode, KeywordImportance, PageMeta, PageSummary};
use metarewrite::scrapers::PageFetcher;
use metarewrite::services::{RewriteEvent, RewriteService};

const EXPORT: &str = "\u{feff}Page,Query,Clicks,Impressions,CTR,Position
https://shop.example/shoes,running shoes,50,\"2,000\",2.5%,3
https://shop.example/shoes,trail shoes,10,\"1,500\",0.67%,8
https://shop.example/boots,winter boots,40,800,5%,2
https://shop.example/boots,boot care,0,400,0%,45
https://shop.example/broken,broken widget,5,300,1.67%,15
https://shop.example/quiet,quiet query,1,20,5%,1
https://shop.example/bad,bad row,n/a,500,3%,4
";

struct FakeFetcher;

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> PageMeta {
        match url {
            "https://shop.example/shoes" => PageMeta::new("Shoes | Shop", "All our shoes."),
            "https://shop.example/broken" => PageMeta::new("Widgets", ""),
            _ => PageMeta::default(),
        }
    }
}

struct FakeGenerator;

#[async_trait]
impl SuggestionGenerator for FakeGenerator {
    async fn generate(&self, summary: &PageSummary, tone: Tone) -> anyhow::Result<String> {
        if summary.page.ends_with("/broken") {
            anyhow::bail!("rate limited");
        }
        Ok(format!(
            "Sure! Here you go:\n\n  title: Best {}\nMeta Description: {} copy for {}\n",
            summary.keywords[0],
            tone.display_name(),
            summary.page
        ))
    }
}

struct RefusingGenerator;

#[async_trait]
impl SuggestionGenerator for RefusingGenerator {
    async fn generate(&self, _summary: &PageSummary, _tone: Tone) -> anyhow::Result<String> {
        anyhow::bail!("API error: 403 Forbidden")
    }
}

fn write_export() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(EXPORT.as_bytes()).unwrap();
    file
}

#[test]
fn test_analysis_classifies_fixture() {
    let file = write_export();
    let raw = read_records_from_path(file.path()).unwrap();
    assert_eq!(raw.len(), 7);

    let analysis = analyze(&raw, &AnalysisParams::default());

    let tiers: Vec<_> = analysis
        .records
        .iter()
        .map(|r| r.keyword_importance.unwrap())
        .collect();
    assert_eq!(
        tiers,
        vec![
            KeywordImportance::Primary,
            KeywordImportance::Secondary,
            KeywordImportance::Primary,
            KeywordImportance::Ghost,
            KeywordImportance::Primary,
            KeywordImportance::Primary,
            KeywordImportance::Ignore,
        ]
    );

    let actions: Vec<_> = analysis.records.iter().map(|r| r.action_code).collect();
    assert_eq!(
        actions,
        vec![
            Some(ActionCode::ReviseTitleMetaForClicks),
            Some(ActionCode::StrengthenTitleMetaInternalLinking),
            Some(ActionCode::NoChangeNeededHighPerformer),
            None,
            Some(ActionCode::SemanticReviewAndRefinement),
            Some(ActionCode::NoAction),
            None,
        ]
    );

    assert_eq!(analysis.records[0].impressions, Some(2000.0));
    assert_eq!(analysis.records[0].total_clicks_page, 60.0);
    assert_eq!(analysis.records[6].click_share, None);
    assert_eq!(analysis.warnings().len(), 1);

    let avg = analysis.avg_ctr.unwrap();
    assert!((avg - 0.02968).abs() < 1e-9);

    assert_eq!(
        analysis.actionable_pages(),
        vec![
            "https://shop.example/shoes".to_string(),
            "https://shop.example/boots".to_string(),
            "https://shop.example/broken".to_string(),
        ]
    );
}

#[test]
fn test_missing_columns_rejected() {
    let input = "Page,Query,Clicks,CTR\nhttps://a.example/,q,1,1%\n";
    let err = read_records(input.as_bytes()).unwrap_err();
    match &err {
        InputError::MissingColumns(missing) => {
            assert_eq!(missing, &vec!["Impressions".to_string(), "Position".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Impressions"));
}

#[tokio::test]
async fn test_full_pipeline_writes_suggestions() {
    let file = write_export();
    let raw = read_records_from_path(file.path()).unwrap();
    let analysis = analyze(&raw, &AnalysisParams::default());

    let service = RewriteService::new(FakeFetcher, FakeGenerator).with_concurrency(2, 2);
    let (event_tx, mut event_rx) = mpsc::channel::<RewriteEvent>(100);

    let metas = service
        .fetch_page_meta(&analysis.actionable_pages(), event_tx.clone())
        .await;
    assert_eq!(metas.len(), 3);

    let summaries = summarize_pages(&analysis.records, &metas, 10);
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[0].keywords, vec!["running shoes", "trail shoes"]);
    assert_eq!(summaries[0].current_title, "Shoes | Shop");
    assert_eq!(summaries[1].current_title, "");

    let outcomes = service
        .generate(&summaries, Tone::Persuasive, event_tx)
        .await;
    let rows = merge_suggestions(summaries, &outcomes);

    let ids: Vec<u32> = rows.iter().map(|r| r.url_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(rows[0].suggested_title, "Best running shoes");
    assert_eq!(
        rows[0].suggested_meta,
        "Persuasive & Energetic copy for https://shop.example/shoes"
    );
    assert_eq!(rows[1].suggested_title, "Best winter boots");
    assert_eq!(rows[2].suggested_title, "An error occurred");
    assert!(rows[2].suggested_meta.contains("rate limited"));
    assert_eq!(rows[2].current_title, "Widgets");

    let mut failed = 0;
    while let Ok(event) = event_rx.try_recv() {
        if let RewriteEvent::SuggestionFailed { url_id, .. } = event {
            assert_eq!(url_id, 3);
            failed += 1;
        }
    }
    assert_eq!(failed, 1);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out").join("seo_suggestions.csv");
    write_suggestions(create_output(&out).unwrap(), &rows, ExportFormat::Csv).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with("\u{feff}".as_bytes()));

    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec![
            "URL_ID",
            "Page",
            "Current_Title",
            "Current_Meta",
            "Suggested_Title",
            "Suggested_Meta",
            "Keywords",
            "Keyword_Importance",
        ]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][6], "running shoes;trail shoes");
    assert_eq!(&records[0][7], "Primary;Secondary");
    assert_eq!(&records[2][4], "An error occurred");
}

#[tokio::test]
async fn test_threshold_change_shrinks_actionable_set() {
    let file = write_export();
    let raw = read_records_from_path(file.path()).unwrap();

    let strict = analyze(
        &raw,
        &AnalysisParams {
            impression_threshold: 1000,
        },
    );
    assert_eq!(
        strict.actionable_pages(),
        vec!["https://shop.example/shoes".to_string()]
    );

    let summaries = summarize_pages(&strict.records, &Default::default(), 10);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].url_id, 1);
    assert_eq!(summaries[0].keywords, vec!["running shoes", "trail shoes"]);
}

#[tokio::test]
async fn test_every_generation_failing_still_writes_table() {
    let file = write_export();
    let raw = read_records_from_path(file.path()).unwrap();
    let analysis = analyze(&raw, &AnalysisParams::default());

    let service = RewriteService::new(FakeFetcher, RefusingGenerator);
    let (event_tx, _event_rx) = mpsc::channel::<RewriteEvent>(100);
    let rows = service
        .suggest(&analysis, 10, Tone::default(), event_tx)
        .await;

    assert_eq!(rows.len(), analysis.actionable_pages().len());
    for (row, id) in rows.iter().zip(1..) {
        assert_eq!(row.url_id, id);
        assert_eq!(row.suggested_title, GENERATION_ERROR_TITLE);
        assert!(row.suggested_meta.contains("403 Forbidden"));
    }
    assert_eq!(rows[0].current_title, "Shoes | Shop");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("seo_suggestions.csv");
    write_suggestions(create_output(&out).unwrap(), &rows, ExportFormat::Csv).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let titles: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[4].to_string())
        .collect();
    assert_eq!(titles, vec![GENERATION_ERROR_TITLE; 3]);
}
