//! openBIS V3 API mocking infrastructure tests
//!
//! These tests use wiremock to create deterministic JSON-RPC responses for
//! the application server and data store server facades, eliminating network
//! dependencies and making tests fast and reliable.

use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use obis_microscopy::model::{fetch_experiment_view, fetch_sample_view, SchemaRevision};
use obis_microscopy::openbis::criteria::{SampleFetchOptions, SampleSearchCriteria};
use obis_microscopy::{OpenbisClient, OpenbisError};

const AS_API: &str = "/openbis/openbis/rmi-application-server-v3.json";
const DSS_API: &str = "/datastore_server/rmi-data-store-server-v3.json";

/// openBIS application-server mock for deterministic testing
pub struct OpenbisApiMock {
    pub server: MockServer,
}

impl OpenbisApiMock {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn client(&self) -> OpenbisClient {
        let base = Url::parse(&self.server.uri()).unwrap();
        OpenbisClient::from_session_token(&base, "mock-token".to_string()).unwrap()
    }

    /// Mock one application-server RPC method with a canned result.
    pub async fn mock_rpc(&self, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path(AS_API))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "result": result })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock one application-server RPC method with a JSON-RPC error body.
    pub async fn mock_rpc_error(&self, rpc_method: &str, code: i64, message: &str) {
        Mock::given(method("POST"))
            .and(path(AS_API))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": { "code": code, "message": message }
            })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of all JSON-RPC requests to the given method, in arrival order.
    pub async fn requests_for(&self, rpc_method: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
            .filter(|body| body.get("method").and_then(Value::as_str) == Some(rpc_method))
            .collect()
    }
}

#[tokio::test]
async fn login_returns_an_authenticated_client() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc("login", json!("alice-240830120000000")).await;

    let base = Url::parse(&mock.server.uri()).unwrap();
    let client = OpenbisClient::login(&base, "alice", "secret").await.unwrap();
    assert_eq!(client.session_token(), "alice-240830120000000");

    let calls = mock.requests_for("login").await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["params"], json!(["alice", "secret"]));
}

#[tokio::test]
async fn rejected_login_is_not_authenticated() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc("login", Value::Null).await;

    let base = Url::parse(&mock.server.uri()).unwrap();
    let error = OpenbisClient::login(&base, "alice", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(error, OpenbisError::NotAuthenticated(_)));
}

#[tokio::test]
async fn search_samples_carries_session_token_and_reports_total_count() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc(
        "searchSamples",
        json!({
            "objects": [
                { "code": "S1", "permId": { "permId": "perm-1" } },
                { "code": "S2", "permId": { "permId": "perm-2" } }
            ],
            "totalCount": 250
        }),
    )
    .await;

    let client = mock.client();
    let result = client
        .search_samples(
            SampleSearchCriteria::new().with_type_code("MICROSCOPY_SAMPLE_TYPE"),
            SampleFetchOptions::new().with_properties(),
        )
        .await
        .unwrap();

    assert_eq!(result.objects.len(), 2);
    assert_eq!(result.total_count, 250);

    let calls = mock.requests_for("searchSamples").await;
    assert_eq!(calls[0]["params"][0], json!("mock-token"));
    assert_eq!(
        calls[0]["params"][1]["@type"],
        json!("as.dto.sample.search.SampleSearchCriteria")
    );
}

#[tokio::test]
async fn rpc_error_body_maps_to_rpc_error() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc_error("searchSamples", -32603, "Session no longer available")
        .await;

    let client = mock.client();
    let error = client
        .search_samples(SampleSearchCriteria::new(), SampleFetchOptions::new())
        .await
        .unwrap_err();
    match error {
        OpenbisError::Rpc { code, message } => {
            assert_eq!(code, Some(-32603));
            assert_eq!(message, "Session no longer available");
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_counts_as_transport_error() {
    let mock = OpenbisApiMock::new().await;
    Mock::given(method("POST"))
        .and(path(AS_API))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let error = client
        .search_samples(SampleSearchCriteria::new(), SampleFetchOptions::new())
        .await
        .unwrap_err();
    assert!(error.is_transport());
}

#[tokio::test]
async fn experiment_view_pages_the_sample_list() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc(
        "getSamples",
        json!({
            "/SPACE/PROJ/EXP_1": {
                "code": "EXP_1",
                "identifier": { "identifier": "/SPACE/PROJ/EXP_1" },
                "type": { "code": "MICROSCOPY_EXPERIMENT" },
                "properties": { "$NAME": "Deconvolution run" }
            }
        }),
    )
    .await;
    mock.mock_rpc(
        "searchSamples",
        json!({
            "objects": [
                { "code": "S1", "permId": { "permId": "perm-1" } }
            ],
            "totalCount": 321
        }),
    )
    .await;

    let client = mock.client();
    let view = fetch_experiment_view(&client, "/SPACE/PROJ/EXP_1", 100)
        .await
        .unwrap();

    assert_eq!(
        view.experiment_sample.property("$NAME"),
        Some("Deconvolution run")
    );
    assert_eq!(view.samples.len(), 1);
    assert_eq!(view.total_sample_count, 321);

    // The sample page is requested with the caller's offset and a fixed
    // page size of 100.
    let calls = mock.requests_for("searchSamples").await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["params"][2]["from"], json!(100));
    assert_eq!(calls[0]["params"][2]["count"], json!(100));
}

#[tokio::test]
async fn sample_view_sorts_image_containers_and_checks_the_parent() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc(
        "searchSamples",
        json!({
            "objects": [{
                "code": "S1",
                "permId": { "permId": "perm-1" },
                "type": { "code": "MICROSCOPY_SAMPLE_TYPE" },
                "parents": [
                    { "code": "EXP_1", "type": { "code": "MICROSCOPY_EXPERIMENT" } }
                ]
            }],
            "totalCount": 1
        }),
    )
    .await;
    mock.mock_rpc(
        "searchDataSets",
        json!({
            "objects": [
                { "code": "20240101-2" },
                { "code": "20240101-1" }
            ],
            "totalCount": 2
        }),
    )
    .await;

    let client = mock.client();
    let view = fetch_sample_view(&client, "perm-1", "MICROSCOPY_SAMPLE_TYPE", SchemaRevision::R3)
        .await
        .unwrap();

    assert_eq!(view.experiment_sample.code.as_deref(), Some("EXP_1"));
    let codes: Vec<&str> = view.image_containers.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["20240101-1", "20240101-2"]);
    // Accessory files only exist from schema revision 4 on, so revision 3
    // issues a single dataset search.
    assert!(view.accessory_files.is_empty());
    assert_eq!(mock.requests_for("searchDataSets").await.len(), 1);
}

#[tokio::test]
async fn corrupted_sample_registration_fails_the_integrity_check() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc(
        "searchSamples",
        json!({
            "objects": [{
                "code": "S1",
                "permId": { "permId": "perm-1" },
                "parents": []
            }],
            "totalCount": 1
        }),
    )
    .await;

    let client = mock.client();
    let error = fetch_sample_view(&client, "perm-1", "MICROSCOPY_SAMPLE_TYPE", SchemaRevision::R4)
        .await
        .unwrap_err();
    match error {
        OpenbisError::Integrity(message) => {
            assert_eq!(message, "The dataset seems to be corrupted!")
        }
        other => panic!("expected Integrity error, got {other:?}"),
    }
}

#[tokio::test]
async fn aggregation_service_resolution_pins_the_data_store_and_is_cached() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc(
        "searchAggregationServices",
        json!({
            "objects": [
                {
                    "name": "export_microscopy_datasets",
                    "permId": {
                        "permId": "export_microscopy_datasets",
                        "dataStoreId": { "permId": "DSS1" }
                    }
                },
                {
                    "name": "export_microscopy_datasets",
                    "permId": {
                        "permId": "export_microscopy_datasets",
                        "dataStoreId": { "permId": "DSS2" }
                    }
                }
            ],
            "totalCount": 2
        }),
    )
    .await;
    mock.mock_rpc(
        "executeAggregationService",
        json!({ "rows": [[{ "value": "job-1" }, { "value": false }]] }),
    )
    .await;

    let client = mock.client();
    let params = std::collections::BTreeMap::from([("uid".to_string(), "job-1".to_string())]);
    client
        .execute_aggregation_service("export_microscopy_datasets", Some("DSS2"), &params)
        .await
        .unwrap();
    client
        .execute_aggregation_service("export_microscopy_datasets", Some("DSS2"), &params)
        .await
        .unwrap();

    // The second execution reuses the cached service handle.
    assert_eq!(mock.requests_for("searchAggregationServices").await.len(), 1);

    let executions = mock.requests_for("executeAggregationService").await;
    assert_eq!(executions.len(), 2);
    for call in &executions {
        assert_eq!(
            call["params"][1]["dataStoreId"]["permId"],
            json!("DSS2"),
            "service perm id must be echoed back verbatim"
        );
        assert_eq!(call["params"][2]["parameters"], json!({ "uid": "job-1" }));
    }
}

#[tokio::test]
async fn missing_aggregation_service_is_reported_by_name() {
    let mock = OpenbisApiMock::new().await;
    mock.mock_rpc(
        "searchAggregationServices",
        json!({ "objects": [], "totalCount": 0 }),
    )
    .await;

    let client = mock.client();
    let error = client
        .find_aggregation_service("export_microscopy_datasets", None)
        .await
        .unwrap_err();
    assert!(matches!(error, OpenbisError::ServiceNotFound(name) if name == "export_microscopy_datasets"));
}

#[tokio::test]
async fn data_set_upload_url_comes_from_the_selected_data_store() {
    let mock = OpenbisApiMock::new().await;
    let dss_base = mock.server.uri();
    mock.mock_rpc(
        "searchDataStores",
        json!({
            "objects": [
                { "code": "DSS1", "downloadUrl": "https://other.example.org" },
                { "code": "DSS2", "downloadUrl": dss_base }
            ],
            "totalCount": 2
        }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(DSS_API))
        .and(body_partial_json(json!({ "method": "createDataSetUpload" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": {
                "url": format!("{dss_base}/datastore_server/store_share_file_upload?sessionID=mock-token")
            }
        })))
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let upload_url = client.create_data_set_upload(Some("DSS2")).await.unwrap();
    assert!(upload_url.contains("/datastore_server/store_share_file_upload"));
}
