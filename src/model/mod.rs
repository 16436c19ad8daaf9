pub mod experiment;
pub mod sample;
pub mod schema;

pub use experiment::{fetch_experiment_view, ExperimentView};
pub use sample::{fetch_sample_view, SampleView};
pub use schema::SchemaRevision;
