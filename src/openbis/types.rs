//! Subset of the openBIS V3 DTOs the microscopy tooling consumes.
//!
//! Only the fields the viewers and the export flow actually read are modeled;
//! everything else the server sends is ignored during deserialization.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermId {
    pub perm_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identifier {
    pub identifier: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityType {
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub perm_id: Option<PermId>,
    #[serde(default)]
    pub identifier: Option<Identifier>,
    #[serde(rename = "type", default)]
    pub sample_type: Option<EntityType>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
    #[serde(default)]
    pub parents: Vec<Sample>,
    #[serde(default)]
    pub experiment: Option<Experiment>,
    #[serde(default)]
    pub data_sets: Vec<DataSet>,
    #[serde(default)]
    pub registration_date: Option<i64>,
}

impl Sample {
    /// String value of a property, if present and non-empty.
    pub fn property(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn perm_id_str(&self) -> Option<&str> {
        self.perm_id.as_ref().map(|p| p.perm_id.as_str())
    }

    pub fn identifier_str(&self) -> Option<&str> {
        self.identifier.as_ref().map(|i| i.identifier.as_str())
    }

    pub fn type_code(&self) -> Option<&str> {
        self.sample_type.as_ref().map(|t| t.code.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub perm_id: Option<PermId>,
    #[serde(default)]
    pub identifier: Option<Identifier>,
    #[serde(rename = "type", default)]
    pub experiment_type: Option<EntityType>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    pub code: String,
    #[serde(rename = "type", default)]
    pub data_set_type: Option<EntityType>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
    #[serde(default)]
    pub components: Vec<DataSet>,
    #[serde(default)]
    pub children: Vec<DataSet>,
}

impl DataSet {
    pub fn property(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Paged search result, as returned by the V3 `search*` operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
}

/// Identifier of a service hosted on a data store server. Echoed back
/// verbatim when executing the service, so the raw JSON is kept alongside
/// the parsed fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DssServicePermId {
    #[serde(default)]
    pub perm_id: Option<String>,
    #[serde(default)]
    pub data_store_id: Option<PermId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationService {
    #[serde(default)]
    pub perm_id: Option<DssServicePermId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl AggregationService {
    pub fn data_store_code(&self) -> Option<&str> {
        self.perm_id
            .as_ref()
            .and_then(|id| id.data_store_id.as_ref())
            .map(|ds| ds.perm_id.as_str())
    }

    pub fn service_name(&self) -> Option<&str> {
        self.perm_id
            .as_ref()
            .and_then(|id| id.perm_id.as_deref())
            .or(self.name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStore {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Tabular result of an aggregation service run.
///
/// Cells are positional; the export plug-in's row layout is
/// `[uid, completed, success, message, nCopiedFiles, relativeExpFolder,
/// zipArchiveFileName, mode]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableModel {
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub value: Value,
}
