//! End-to-end pipeline tests over both data sources
//!
//! File mode runs against real temp files; API mode runs against a scripted
//! transport so the full fetch/normalize/statistics flow is exercised
//! without a network.

use async_trait::async_trait;
use patentscope_config::Settings;
use patentscope_pipeline::{Bundle, ReportEngine, ReportInputs};
use patentscope_providers::{
    HttpResponse, PatentsViewClient, SearchTransport, TransportError,
};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "patentscope-pipeline-{}-{}",
        std::process::id(),
        name
    ));
    fs::write(&path, content).unwrap();
    path
}

fn sample_records(count: usize) -> Value {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "patent_number": format!("1000{i}"),
                "patent_title": format!("Invention {i}"),
                "patent_date": "2021-06-15",
                "inventors": [
                    {"inventor_first_name": "Jane", "inventor_last_name": "Doe"}
                ],
                "assignees": [{"assignee_organization": "Acme"}],
                "cited_patent_count": i,
            })
        })
        .collect();
    Value::Array(records)
}

#[tokio::test]
async fn test_file_mode_produces_a_full_bundle() {
    let path = write_temp("bundle.json", &sample_records(4).to_string());
    let engine = ReportEngine::new(Settings::default());

    let inputs = ReportInputs {
        file_path: Some(path.display().to_string()),
        ..Default::default()
    };
    let bundle = engine.run(&inputs).await.unwrap();

    assert_eq!(bundle.dataset_name, "patent-research");
    assert_eq!(bundle.samples.main.len(), 4);
    assert_eq!(bundle.stats.total_patents, 4);
    assert_eq!(bundle.metadata.total_records, 4);
    assert_eq!(bundle.metadata.source, path.display().to_string());
    assert!(bundle.metadata.search_params.is_none());

    let record = &bundle.samples.main[0];
    assert_eq!(record.title, "Invention 0");
    assert_eq!(record.assignee, "Acme");
    assert_eq!(record.inventors, vec!["Jane Doe"]);
    assert_eq!(record.patent_year, 2021);

    fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_file_mode_caps_records_before_statistics() {
    let path = write_temp("capped.json", &sample_records(8).to_string());

    let mut settings = Settings::default();
    settings.report.max_records = 3;
    let engine = ReportEngine::new(settings);

    let inputs = ReportInputs {
        file_path: Some(path.display().to_string()),
        ..Default::default()
    };
    let bundle = engine.run(&inputs).await.unwrap();

    assert_eq!(bundle.samples.main.len(), 3);
    // Statistics are computed over the capped set, not the raw input.
    assert_eq!(bundle.stats.total_patents, 3);

    fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_file_mode_reads_csv() {
    let path = write_temp(
        "records.csv",
        "patent_number,patent_title,patent_date,cited_patent_count\n\
         D100,Widget,2019-03-01,7\n\
         D101,Gadget,2020-04-01,2\n",
    );
    let engine = ReportEngine::new(Settings::default());

    let inputs = ReportInputs {
        file_path: Some(path.display().to_string()),
        ..Default::default()
    };
    let bundle = engine.run(&inputs).await.unwrap();

    assert_eq!(bundle.samples.main.len(), 2);
    assert_eq!(bundle.samples.main[0].patent_number, "D100");
    assert_eq!(bundle.samples.main[0].citation_count, 7);
    assert_eq!(bundle.stats.citation_stats.total_citations, 9);

    fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_empty_file_yields_empty_bundle() {
    let path = write_temp("empty.json", "[]");
    let engine = ReportEngine::new(Settings::default());

    let inputs = ReportInputs {
        file_path: Some(path.display().to_string()),
        ..Default::default()
    };
    let bundle = engine.run(&inputs).await.unwrap();

    assert!(bundle.samples.main.is_empty());
    assert_eq!(bundle.stats.total_patents, 0);
    assert_eq!(bundle.metadata.total_records, 0);

    fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_invalid_inputs_stop_the_run() {
    let engine = ReportEngine::new(Settings::default());

    let result = engine.run(&ReportInputs::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_missing_file_surfaces_a_load_error() {
    let engine = ReportEngine::new(Settings::default());

    let inputs = ReportInputs {
        file_path: Some("/nonexistent/patents.json".to_string()),
        ..Default::default()
    };
    assert!(engine.run(&inputs).await.is_err());
}

/// Transport returning one fixed page, then an empty page.
struct OnePageTransport {
    page: Vec<Value>,
}

#[async_trait]
impl SearchTransport for OnePageTransport {
    async fn execute(&self, body: &Value) -> Result<HttpResponse, TransportError> {
        let patents = if body["o"].get("after").is_none() {
            self.page.clone()
        } else {
            vec![]
        };
        Ok(HttpResponse {
            status: reqwest::StatusCode::OK,
            body: json!({"patents": patents, "total_hits": self.page.len()}).to_string(),
        })
    }
}

fn api_engine(page: Vec<Value>) -> ReportEngine {
    let mut settings = Settings::default();
    settings.api.api_key = Some("test-key".to_string());
    settings.api.request_delay_ms = 0;

    let transport = Arc::new(OnePageTransport { page });
    let client = PatentsViewClient::with_transport(settings.api.clone(), transport);
    ReportEngine::with_client(settings, client)
}

#[tokio::test]
async fn test_api_mode_carries_search_params_in_metadata() {
    let page = vec![json!({
        "patent_id": "11111111",
        "patent_title": "Battery electrode",
        "patent_date": "2023-02-14",
        "assignees": [{"assignee_organization": "Volt Labs"}],
    })];
    let engine = api_engine(page);

    let inputs = ReportInputs {
        keyword: Some("battery".to_string()),
        start_date: Some("2020-01-01".to_string()),
        end_date: Some("2024-12-31".to_string()),
        max_results: Some(10),
        ..Default::default()
    };
    let bundle = engine.run(&inputs).await.unwrap();

    assert_eq!(bundle.samples.main.len(), 1);
    assert_eq!(bundle.samples.main[0].assignee, "Volt Labs");
    assert_eq!(bundle.metadata.source, "PatentsView API Search");

    let params = bundle.metadata.search_params.as_ref().unwrap();
    assert_eq!(params.keyword.as_deref(), Some("battery"));
    assert_eq!(params.date_range.start, "2020-01-01");
    assert_eq!(params.date_range.end, "2024-12-31");
    assert_eq!(params.max_results, 10);
}

#[tokio::test]
async fn test_api_mode_defaults_the_date_range() {
    let engine = api_engine(vec![]);

    let inputs = ReportInputs {
        keyword: Some("battery".to_string()),
        ..Default::default()
    };
    let bundle = engine.run(&inputs).await.unwrap();

    let params = bundle.metadata.search_params.as_ref().unwrap();
    // Defaults resolve to concrete dates (lookback start through today).
    assert!(!params.date_range.start.is_empty());
    assert!(!params.date_range.end.is_empty());
    assert!(params.date_range.start < params.date_range.end);
    assert_eq!(params.max_results, 100);
}

#[tokio::test]
async fn test_bundle_serializes_with_report_bindings() {
    let path = write_temp("shape.json", &sample_records(1).to_string());
    let engine = ReportEngine::new(Settings::default());

    let inputs = ReportInputs {
        file_path: Some(path.display().to_string()),
        ..Default::default()
    };
    let bundle: Bundle = engine.run(&inputs).await.unwrap();
    let json = serde_json::to_value(&bundle).unwrap();

    assert_eq!(json["datasetName"], "patent-research");
    assert!(json["samples"]["main"].is_array());
    assert!(json["stats"]["filingTrends"]["byYear"].is_array());
    assert!(json["stats"]["technologyStats"]["totalUniqueCPCCodes"].is_number());
    assert!(json["metadata"]["totalRecords"].is_number());
    assert!(json["metadata"]["ingestedAt"].is_string());
    assert!(json["metadata"].get("searchParams").is_none());

    fs::remove_file(&path).unwrap();
}
