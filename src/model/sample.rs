//! Data model behind the sample (image series) viewer.

use tracing::debug;

use super::schema::SchemaRevision;
use crate::openbis::criteria::{
    DataSetFetchOptions, DataSetSearchCriteria, SampleFetchOptions, SampleSearchCriteria,
};
use crate::openbis::{DataSet, OpenbisClient, OpenbisError, Sample};

pub const MICROSCOPY_EXPERIMENT: &str = "MICROSCOPY_EXPERIMENT";
pub const MICROSCOPY_IMG_CONTAINER: &str = "MICROSCOPY_IMG_CONTAINER";
pub const MICROSCOPY_ACCESSORY_FILE: &str = "MICROSCOPY_ACCESSORY_FILE";

/// Everything the sample viewer displays.
#[derive(Debug)]
pub struct SampleView {
    pub sample: Sample,
    /// The MICROSCOPY_EXPERIMENT parent of the sample.
    pub experiment_sample: Sample,
    /// MICROSCOPY_IMG_CONTAINER datasets, sorted by code; the sorted order
    /// drives the series viewer.
    pub image_containers: Vec<DataSet>,
    /// MICROSCOPY_ACCESSORY_FILE datasets (schema revision 4 only).
    pub accessory_files: Vec<DataSet>,
}

/// Fetch the sample of `sample_type` with the given perm id together with
/// its datasets.
pub async fn fetch_sample_view(
    client: &OpenbisClient,
    perm_id: &str,
    sample_type: &str,
    revision: SchemaRevision,
) -> Result<SampleView, OpenbisError> {
    let criteria = SampleSearchCriteria::new()
        .with_type_code(sample_type)
        .with_perm_id(perm_id);
    let fetch_options = SampleFetchOptions::new()
        .with_properties()
        .with_experiment_type()
        .with_parents_using(SampleFetchOptions::new().with_type().with_properties());

    let result = client.search_samples(criteria, fetch_options).await?;
    let sample = result.objects.into_iter().next().ok_or_else(|| {
        OpenbisError::UnexpectedShape(format!("no sample found for perm id '{perm_id}'"))
    })?;

    let experiment_sample = experiment_parent(&sample)?;

    let image_containers =
        fetch_datasets_of_type(client, perm_id, MICROSCOPY_IMG_CONTAINER).await?;
    let accessory_files = if revision.has_accessory_files() {
        fetch_datasets_of_type(client, perm_id, MICROSCOPY_ACCESSORY_FILE).await?
    } else {
        Vec::new()
    };

    debug!(
        perm_id,
        image_containers = image_containers.len(),
        accessory_files = accessory_files.len(),
        "Fetched sample view"
    );

    Ok(SampleView {
        sample,
        experiment_sample,
        image_containers,
        accessory_files,
    })
}

/// The sample must have exactly one parent, of type MICROSCOPY_EXPERIMENT;
/// anything else means the registration is broken.
fn experiment_parent(sample: &Sample) -> Result<Sample, OpenbisError> {
    match sample.parents.as_slice() {
        [parent] if parent.type_code() == Some(MICROSCOPY_EXPERIMENT) => Ok(parent.clone()),
        _ => Err(OpenbisError::Integrity(
            "The dataset seems to be corrupted!".to_string(),
        )),
    }
}

async fn fetch_datasets_of_type(
    client: &OpenbisClient,
    sample_perm_id: &str,
    type_code: &str,
) -> Result<Vec<DataSet>, OpenbisError> {
    let criteria = DataSetSearchCriteria::new()
        .with_type_code(type_code)
        .with_sample_perm_id(sample_perm_id);
    let fetch_options = DataSetFetchOptions::new()
        .with_children()
        .with_properties()
        .with_component_type();

    let mut data_sets = client.search_data_sets(criteria, fetch_options).await?.objects;
    data_sets.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(data_sets)
}
