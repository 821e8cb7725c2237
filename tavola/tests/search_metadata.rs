use std::sync::Arc;

use tavola::{DatasetCode, RawSession, SearchQuery, SessionBuilder, TypedSession};
use tavola_core::TavolaError;
use tavola_mock::ScriptedTransport;

const METADATA_BODY: &str = r#"{
    "dataset": {
        "id": 9775687,
        "dataset_code": "AAPL",
        "database_code": "WIKI",
        "name": "Apple Inc (AAPL) Prices",
        "description": "End of day prices",
        "oldest_available_date": "1980-12-12",
        "newest_available_date": "2018-03-27",
        "column_names": ["Date", "Open", "High", "Low", "Close"],
        "frequency": "daily",
        "premium": false
    }
}"#;

const SEARCH_BODY: &str = r#"{
    "datasets": [
        {"dataset_code": "AAPL", "database_code": "WIKI", "name": "Apple Inc (AAPL) Prices"},
        {"dataset_code": "AAPL_UADJ", "database_code": "WIKI", "name": "Apple Inc (AAPL) Unadjusted"}
    ],
    "meta": {"total_count": 2, "current_page": 1}
}"#;

fn typed(transport: Arc<ScriptedTransport>) -> TypedSession {
    SessionBuilder::new()
        .transport(transport)
        .api_key("demo-key")
        .build()
        .unwrap()
}

#[test]
fn metadata_decodes_into_the_typed_wrapper() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.enqueue(ScriptedTransport::json_ok(METADATA_BODY));
    let session = typed(Arc::clone(&transport));

    let code: DatasetCode = "WIKI/AAPL".parse().unwrap();
    let metadata = session.metadata(&code).unwrap();

    assert_eq!(metadata.full_code(), "WIKI/AAPL");
    assert_eq!(metadata.id, Some(9775687));
    assert_eq!(metadata.frequency.as_deref(), Some("daily"));
    assert_eq!(metadata.column_names.len(), 5);
    assert_eq!(
        metadata.oldest_available_date,
        chrono::NaiveDate::from_ymd_opt(1980, 12, 12)
    );

    let issued = transport.requests();
    assert_eq!(issued[0].path(), "/v1/datasets/WIKI/AAPL/metadata.json");
}

#[test]
fn search_decodes_results_and_paging() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.enqueue(ScriptedTransport::json_ok(SEARCH_BODY));
    let session = typed(Arc::clone(&transport));

    let results = session
        .search(&SearchQuery::new("apple").per_page(20).page(1))
        .unwrap();

    assert_eq!(results.datasets.len(), 2);
    assert_eq!(results.total_count, Some(2));
    assert_eq!(results.current_page, Some(1));
    assert_eq!(results.datasets[0].full_code(), "WIKI/AAPL");

    let issued = transport.requests();
    assert_eq!(issued[0].path(), "/v1/datasets.json");
    let query: Vec<(String, String)> = issued[0]
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        query,
        vec![
            ("query".to_string(), "apple".to_string()),
            ("per_page".to_string(), "20".to_string()),
            ("page".to_string(), "1".to_string()),
            ("api_key".to_string(), "demo-key".to_string()),
        ]
    );
}

#[test]
fn search_meta_block_is_optional() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.enqueue(ScriptedTransport::json_ok(
        r#"{"datasets": [{"dataset_code": "GDP", "database_code": "FRED"}]}"#,
    ));
    let session = typed(Arc::clone(&transport));

    let results = session.search(&SearchQuery::new("gdp")).unwrap();
    assert_eq!(results.datasets.len(), 1);
    assert_eq!(results.total_count, None);
    assert_eq!(results.current_page, None);
}

#[test]
fn raw_session_passes_documents_through() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.enqueue(ScriptedTransport::json_ok(METADATA_BODY));
    let session: RawSession = SessionBuilder::new()
        .transport(Arc::clone(&transport) as Arc<dyn tavola_core::Transport>)
        .build()
        .unwrap();

    let code: DatasetCode = "WIKI/AAPL".parse().unwrap();
    let document = session.metadata(&code).unwrap();
    assert_eq!(document["dataset"]["database_code"], "WIKI");
}

#[test]
fn malformed_metadata_is_a_decode_error() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.enqueue(ScriptedTransport::json_ok(r#"{"dataset": {"name": 3}}"#));
    let session = typed(Arc::clone(&transport));

    let code: DatasetCode = "WIKI/AAPL".parse().unwrap();
    assert!(matches!(
        session.metadata(&code),
        Err(TavolaError::Decode(_))
    ));
}
