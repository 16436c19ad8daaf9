//! Builders for V3 search criteria and fetch options.
//!
//! The V3 API takes `@type`-tagged JSON trees for both. The builders below
//! cover the handful of shapes the microscopy viewers issue: type-code and
//! perm-id equality on samples and datasets, parent/sample containment, and
//! the fetch-option chains (`withType`, `withProperties`, `withParentsUsing`,
//! pagination) the viewers rely on.

use serde_json::{json, Value};

fn string_equal(value: &str) -> Value {
    json!({
        "@type": "as.dto.common.search.StringEqualToValue",
        "value": value,
    })
}

#[derive(Debug, Clone, Default)]
pub struct SampleSearchCriteria {
    criteria: Vec<Value>,
}

impl SampleSearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// `withType().withCode().thatEquals(code)`
    pub fn with_type_code(mut self, code: &str) -> Self {
        self.criteria.push(json!({
            "@type": "as.dto.sample.search.SampleTypeSearchCriteria",
            "criteria": [{
                "@type": "as.dto.common.search.CodeSearchCriteria",
                "fieldName": "code",
                "fieldType": "ATTRIBUTE",
                "fieldValue": string_equal(code),
            }],
        }));
        self
    }

    /// `withPermId().thatEquals(perm_id)`
    pub fn with_perm_id(mut self, perm_id: &str) -> Self {
        self.criteria.push(json!({
            "@type": "as.dto.common.search.PermIdSearchCriteria",
            "fieldName": "perm_id",
            "fieldType": "ATTRIBUTE",
            "fieldValue": string_equal(perm_id),
        }));
        self
    }

    /// `withParents().withIdentifier().thatEquals(identifier)`
    pub fn with_parent_identifier(mut self, identifier: &str) -> Self {
        self.criteria.push(json!({
            "@type": "as.dto.sample.search.SampleParentsSearchCriteria",
            "criteria": [{
                "@type": "as.dto.common.search.IdentifierSearchCriteria",
                "fieldName": "identifier",
                "fieldType": "ATTRIBUTE",
                "fieldValue": string_equal(identifier),
            }],
        }));
        self
    }

    pub fn into_json(self) -> Value {
        json!({
            "@type": "as.dto.sample.search.SampleSearchCriteria",
            "operator": "AND",
            "criteria": self.criteria,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataSetSearchCriteria {
    criteria: Vec<Value>,
}

impl DataSetSearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_code(mut self, code: &str) -> Self {
        self.criteria.push(json!({
            "@type": "as.dto.dataset.search.DataSetTypeSearchCriteria",
            "criteria": [{
                "@type": "as.dto.common.search.CodeSearchCriteria",
                "fieldName": "code",
                "fieldType": "ATTRIBUTE",
                "fieldValue": string_equal(code),
            }],
        }));
        self
    }

    /// `withSample().withPermId().thatEquals(perm_id)`
    pub fn with_sample_perm_id(mut self, perm_id: &str) -> Self {
        self.criteria.push(json!({
            "@type": "as.dto.dataset.search.DataSetSampleSearchCriteria",
            "criteria": [{
                "@type": "as.dto.common.search.PermIdSearchCriteria",
                "fieldName": "perm_id",
                "fieldType": "ATTRIBUTE",
                "fieldValue": string_equal(perm_id),
            }],
        }));
        self
    }

    pub fn into_json(self) -> Value {
        json!({
            "@type": "as.dto.dataset.search.DataSetSearchCriteria",
            "operator": "AND",
            "criteria": self.criteria,
        })
    }
}

/// `withName().thatEquals(name)` on aggregation services.
pub fn aggregation_service_criteria(name: &str) -> Value {
    json!({
        "@type": "as.dto.service.search.AggregationServiceSearchCriteria",
        "operator": "AND",
        "criteria": [{
            "@type": "as.dto.common.search.NameSearchCriteria",
            "fieldName": "name",
            "fieldType": "ATTRIBUTE",
            "fieldValue": string_equal(name),
        }],
    })
}

#[derive(Debug, Clone, Default)]
pub struct SampleFetchOptions {
    with_type: bool,
    with_properties: bool,
    with_experiment: bool,
    with_experiment_type: bool,
    with_data_sets: bool,
    with_data_set_type: bool,
    parents: Option<Box<SampleFetchOptions>>,
    from: Option<u64>,
    count: Option<u64>,
}

impl SampleFetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self) -> Self {
        self.with_type = true;
        self
    }

    pub fn with_properties(mut self) -> Self {
        self.with_properties = true;
        self
    }

    pub fn with_experiment(mut self) -> Self {
        self.with_experiment = true;
        self
    }

    pub fn with_experiment_type(mut self) -> Self {
        self.with_experiment = true;
        self.with_experiment_type = true;
        self
    }

    pub fn with_data_sets(mut self) -> Self {
        self.with_data_sets = true;
        self
    }

    pub fn with_data_set_type(mut self) -> Self {
        self.with_data_sets = true;
        self.with_data_set_type = true;
        self
    }

    /// `withParentsUsing(options)`
    pub fn with_parents_using(mut self, options: SampleFetchOptions) -> Self {
        self.parents = Some(Box::new(options));
        self
    }

    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn into_json(self) -> Value {
        let mut options = serde_json::Map::new();
        options.insert(
            "@type".into(),
            json!("as.dto.sample.fetchoptions.SampleFetchOptions"),
        );
        if self.with_type {
            options.insert(
                "type".into(),
                json!({"@type": "as.dto.sample.fetchoptions.SampleTypeFetchOptions"}),
            );
        }
        if self.with_properties {
            options.insert(
                "properties".into(),
                json!({"@type": "as.dto.property.fetchoptions.PropertyFetchOptions"}),
            );
        }
        if self.with_experiment {
            let mut experiment = serde_json::Map::new();
            experiment.insert(
                "@type".into(),
                json!("as.dto.experiment.fetchoptions.ExperimentFetchOptions"),
            );
            if self.with_experiment_type {
                experiment.insert(
                    "type".into(),
                    json!({"@type": "as.dto.experiment.fetchoptions.ExperimentTypeFetchOptions"}),
                );
            }
            options.insert("experiment".into(), Value::Object(experiment));
        }
        if self.with_data_sets {
            let mut data_sets = serde_json::Map::new();
            data_sets.insert(
                "@type".into(),
                json!("as.dto.dataset.fetchoptions.DataSetFetchOptions"),
            );
            if self.with_data_set_type {
                data_sets.insert(
                    "type".into(),
                    json!({"@type": "as.dto.dataset.fetchoptions.DataSetTypeFetchOptions"}),
                );
            }
            options.insert("dataSets".into(), Value::Object(data_sets));
        }
        if let Some(parents) = self.parents {
            options.insert("parents".into(), parents.into_json());
        }
        if let Some(from) = self.from {
            options.insert("from".into(), json!(from));
        }
        if let Some(count) = self.count {
            options.insert("count".into(), json!(count));
        }
        Value::Object(options)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataSetFetchOptions {
    with_children: bool,
    with_properties: bool,
    with_components: bool,
    with_component_type: bool,
}

impl DataSetFetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self) -> Self {
        self.with_children = true;
        self
    }

    pub fn with_properties(mut self) -> Self {
        self.with_properties = true;
        self
    }

    pub fn with_components(mut self) -> Self {
        self.with_components = true;
        self
    }

    pub fn with_component_type(mut self) -> Self {
        self.with_components = true;
        self.with_component_type = true;
        self
    }

    pub fn into_json(self) -> Value {
        let mut options = serde_json::Map::new();
        options.insert(
            "@type".into(),
            json!("as.dto.dataset.fetchoptions.DataSetFetchOptions"),
        );
        if self.with_children {
            options.insert(
                "children".into(),
                json!({"@type": "as.dto.dataset.fetchoptions.DataSetFetchOptions"}),
            );
        }
        if self.with_properties {
            options.insert(
                "properties".into(),
                json!({"@type": "as.dto.property.fetchoptions.PropertyFetchOptions"}),
            );
        }
        if self.with_components {
            let mut components = serde_json::Map::new();
            components.insert(
                "@type".into(),
                json!("as.dto.dataset.fetchoptions.DataSetFetchOptions"),
            );
            if self.with_component_type {
                components.insert(
                    "type".into(),
                    json!({"@type": "as.dto.dataset.fetchoptions.DataSetTypeFetchOptions"}),
                );
            }
            options.insert("components".into(), Value::Object(components));
        }
        Value::Object(options)
    }
}

/// Fetch options for `searchAggregationServices`; no sub-objects needed.
pub fn aggregation_service_fetch_options() -> Value {
    json!({"@type": "as.dto.service.fetchoptions.AggregationServiceFetchOptions"})
}

/// Fetch options for `searchDataStores`.
pub fn data_store_fetch_options() -> Value {
    json!({"@type": "as.dto.datastore.fetchoptions.DataStoreFetchOptions"})
}

/// Search criteria matching all data stores.
pub fn data_store_criteria() -> Value {
    json!({"@type": "as.dto.datastore.search.DataStoreSearchCriteria"})
}
