//! Data model behind the experiment viewer.

use tracing::debug;

use crate::openbis::criteria::{SampleFetchOptions, SampleSearchCriteria};
use crate::openbis::{OpenbisClient, OpenbisError, Sample};

pub const MICROSCOPY_SAMPLE_TYPE: &str = "MICROSCOPY_SAMPLE_TYPE";

/// Page size for child samples; larger experiments are paginated.
pub const SAMPLE_PAGE_SIZE: u64 = 100;

/// Everything the experiment viewer displays: the MICROSCOPY_EXPERIMENT
/// sample itself and one page of its MICROSCOPY_SAMPLE_TYPE children.
#[derive(Debug)]
pub struct ExperimentView {
    pub experiment_sample: Sample,
    pub samples: Vec<Sample>,
    /// Total number of child samples on the server, for pagination.
    pub total_sample_count: u64,
}

/// Fetch the experiment sample by identifier, then one page of its children.
pub async fn fetch_experiment_view(
    client: &OpenbisClient,
    identifier: &str,
    page_offset: u64,
) -> Result<ExperimentView, OpenbisError> {
    // The experiment sample with type, properties, datasets, experiment and
    // its ORGANIZATION_UNIT parents ("tags").
    let fetch_options = SampleFetchOptions::new()
        .with_type()
        .with_properties()
        .with_data_set_type()
        .with_experiment_type()
        .with_parents_using(SampleFetchOptions::new().with_type().with_properties());

    let experiment_sample = client
        .get_sample_by_identifier(identifier, fetch_options)
        .await?
        .ok_or_else(|| {
            OpenbisError::UnexpectedShape(format!("no sample found for identifier '{identifier}'"))
        })?;

    // Child samples of type MICROSCOPY_SAMPLE_TYPE, paginated.
    let criteria = SampleSearchCriteria::new()
        .with_type_code(MICROSCOPY_SAMPLE_TYPE)
        .with_parent_identifier(identifier);
    let fetch_options = SampleFetchOptions::new()
        .with_type()
        .with_properties()
        .from(page_offset)
        .count(SAMPLE_PAGE_SIZE);

    let result = client.search_samples(criteria, fetch_options).await?;
    debug!(
        identifier,
        page = result.objects.len(),
        total = result.total_count,
        "Fetched experiment view"
    );

    Ok(ExperimentView {
        experiment_sample,
        samples: result.objects,
        total_sample_count: result.total_count,
    })
}
