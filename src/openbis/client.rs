//! Authenticated client for the openBIS V3 API.
//!
//! Wraps the application-server JSON-RPC facade and, when needed for
//! session-workspace downloads, the data-store-server facade. The resolved
//! aggregation service handle is cached (the viewers memoized it in
//! `exportDatasetsService` for the lifetime of the page; here a TTL cache
//! plays that role).

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use moka::future::Cache;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use super::criteria::{
    aggregation_service_criteria, aggregation_service_fetch_options, data_store_criteria,
    data_store_fetch_options, DataSetFetchOptions, DataSetSearchCriteria, SampleFetchOptions,
    SampleSearchCriteria,
};
use super::errors::OpenbisError;
use super::rpc::{http_client, RpcEndpoint, APPLICATION_SERVER_API, DATA_STORE_SERVER_API};
use super::types::{
    AggregationService, DataSet, DataStore, Sample, SearchResult, TableModel,
};

const SERVICE_CACHE_CAPACITY: u64 = 16;
const SERVICE_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct OpenbisClient {
    http: reqwest::Client,
    application_server: RpcEndpoint,
    session_token: String,
    service_cache: Cache<String, Value>,
}

impl OpenbisClient {
    /// Bootstrap from an existing session token (the equivalent of the
    /// webapp's `loginFromContext`).
    pub fn from_session_token(base_url: &Url, session_token: String) -> Result<Self, OpenbisError> {
        let http = http_client()?;
        let application_server = RpcEndpoint::for_api(http.clone(), base_url, APPLICATION_SERVER_API)?;
        Ok(Self {
            http,
            application_server,
            session_token,
            service_cache: Cache::builder()
                .max_capacity(SERVICE_CACHE_CAPACITY)
                .time_to_live(Duration::from_secs(SERVICE_CACHE_TTL_SECS))
                .build(),
        })
    }

    /// Bootstrap by logging in with credentials.
    pub async fn login(
        base_url: &Url,
        username: &str,
        password: &str,
    ) -> Result<Self, OpenbisError> {
        let http = http_client()?;
        let application_server = RpcEndpoint::for_api(http.clone(), base_url, APPLICATION_SERVER_API)?;
        let result = application_server
            .call("login", vec![json!(username), json!(password)])
            .await?;
        let session_token = match result {
            Value::String(token) if !token.is_empty() => token,
            Value::Null => {
                return Err(OpenbisError::NotAuthenticated(format!(
                    "login rejected for user '{username}'"
                )))
            }
            other => {
                return Err(OpenbisError::UnexpectedShape(format!(
                    "login returned {other} instead of a session token"
                )))
            }
        };
        info!(user = username, "Logged in to openBIS");
        Ok(Self {
            http,
            application_server,
            session_token,
            service_cache: Cache::builder()
                .max_capacity(SERVICE_CACHE_CAPACITY)
                .time_to_live(Duration::from_secs(SERVICE_CACHE_TTL_SECS))
                .build(),
        })
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    fn token(&self) -> Value {
        json!(self.session_token)
    }

    /// `getSamples([identifier], fetchOptions)`: fetch one sample by its
    /// identifier. The V3 call returns a map keyed by the identifier.
    pub async fn get_sample_by_identifier(
        &self,
        identifier: &str,
        fetch_options: SampleFetchOptions,
    ) -> Result<Option<Sample>, OpenbisError> {
        let ids = json!([{
            "@type": "as.dto.sample.id.SampleIdentifier",
            "identifier": identifier,
        }]);
        let result = self
            .application_server
            .call(
                "getSamples",
                vec![self.token(), ids, fetch_options.into_json()],
            )
            .await?;
        let mut map: HashMap<String, Sample> = serde_json::from_value(result)
            .map_err(|e| OpenbisError::UnexpectedShape(format!("getSamples result: {e}")))?;
        // Single requested id; key representation varies between server
        // versions, so fall back to the only entry.
        Ok(map
            .remove(identifier)
            .or_else(|| map.into_values().next()))
    }

    pub async fn search_samples(
        &self,
        criteria: SampleSearchCriteria,
        fetch_options: SampleFetchOptions,
    ) -> Result<SearchResult<Sample>, OpenbisError> {
        let result = self
            .application_server
            .call(
                "searchSamples",
                vec![self.token(), criteria.into_json(), fetch_options.into_json()],
            )
            .await?;
        serde_json::from_value(result)
            .map_err(|e| OpenbisError::UnexpectedShape(format!("searchSamples result: {e}")))
    }

    pub async fn search_data_sets(
        &self,
        criteria: DataSetSearchCriteria,
        fetch_options: DataSetFetchOptions,
    ) -> Result<SearchResult<DataSet>, OpenbisError> {
        let result = self
            .application_server
            .call(
                "searchDataSets",
                vec![self.token(), criteria.into_json(), fetch_options.into_json()],
            )
            .await?;
        serde_json::from_value(result)
            .map_err(|e| OpenbisError::UnexpectedShape(format!("searchDataSets result: {e}")))
    }

    /// Resolve an aggregation service by name, optionally pinned to one data
    /// store. The raw service JSON is cached so its perm id can be echoed
    /// back verbatim on execution.
    pub async fn find_aggregation_service(
        &self,
        name: &str,
        data_store: Option<&str>,
    ) -> Result<AggregationService, OpenbisError> {
        let raw = self.find_aggregation_service_raw(name, data_store).await?;
        serde_json::from_value(raw).map_err(|e| {
            OpenbisError::UnexpectedShape(format!("aggregation service object: {e}"))
        })
    }

    async fn find_aggregation_service_raw(
        &self,
        name: &str,
        data_store: Option<&str>,
    ) -> Result<Value, OpenbisError> {
        let cache_key = format!("{}@{}", name, data_store.unwrap_or("*"));
        if let Some(cached) = self.service_cache.get(&cache_key).await {
            debug!(service = name, "Aggregation service resolved from cache");
            return Ok(cached);
        }

        let result = self
            .application_server
            .call(
                "searchAggregationServices",
                vec![
                    self.token(),
                    aggregation_service_criteria(name),
                    aggregation_service_fetch_options(),
                ],
            )
            .await?;

        let objects = result
            .get("objects")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let selected = objects
            .into_iter()
            .find(|service| match data_store {
                Some(code) => service
                    .pointer("/permId/dataStoreId/permId")
                    .and_then(Value::as_str)
                    .is_some_and(|ds| ds == code),
                None => true,
            })
            .ok_or_else(|| OpenbisError::ServiceNotFound(name.to_string()))?;

        self.service_cache
            .insert(cache_key, selected.clone())
            .await;
        Ok(selected)
    }

    /// `executeAggregationService(servicePermId, options)` with a name/value
    /// parameter map.
    pub async fn execute_aggregation_service(
        &self,
        name: &str,
        data_store: Option<&str>,
        parameters: &BTreeMap<String, String>,
    ) -> Result<TableModel, OpenbisError> {
        let service = self.find_aggregation_service_raw(name, data_store).await?;
        let service_id = service.get("permId").cloned().ok_or_else(|| {
            OpenbisError::UnexpectedShape(format!("service '{name}' has no perm id"))
        })?;

        let options = json!({
            "@type": "as.dto.service.execute.AggregationServiceExecutionOptions",
            "parameters": parameters,
        });

        let result = self
            .application_server
            .call(
                "executeAggregationService",
                vec![self.token(), service_id, options],
            )
            .await?;
        serde_json::from_value(result).map_err(|e| {
            OpenbisError::UnexpectedShape(format!("aggregation service table: {e}"))
        })
    }

    /// Ask the data store for a data-set upload handle and return its URL.
    /// Only the URL prefix is of interest: it locates the DSS for building
    /// session-workspace download links.
    pub async fn create_data_set_upload(&self, data_store: Option<&str>) -> Result<String, OpenbisError> {
        let dss_base = self.data_store_download_url(data_store).await?;
        let dss = RpcEndpoint::for_api(self.http.clone(), &dss_base, DATA_STORE_SERVER_API)?;
        let result = dss
            .call("createDataSetUpload", vec![self.token(), json!("dummy")])
            .await?;
        result
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                OpenbisError::UnexpectedShape("createDataSetUpload returned no url".to_string())
            })
    }

    async fn data_store_download_url(&self, code: Option<&str>) -> Result<Url, OpenbisError> {
        let result = self
            .application_server
            .call(
                "searchDataStores",
                vec![self.token(), data_store_criteria(), data_store_fetch_options()],
            )
            .await?;
        let stores: SearchResult<DataStore> = serde_json::from_value(result)
            .map_err(|e| OpenbisError::UnexpectedShape(format!("searchDataStores result: {e}")))?;

        let store = stores
            .objects
            .iter()
            .find(|store| match code {
                Some(code) => store.code.as_deref() == Some(code),
                None => true,
            })
            .ok_or_else(|| {
                OpenbisError::Config(match code {
                    Some(code) => format!("data store '{code}' not registered on the server"),
                    None => "no data store registered on the server".to_string(),
                })
            })?;

        let url = store.download_url.as_deref().ok_or_else(|| {
            OpenbisError::UnexpectedShape("data store entry carries no download URL".to_string())
        })?;
        Url::parse(url)
            .map_err(|e| OpenbisError::UnexpectedShape(format!("data store URL '{url}': {e}")))
    }
}
