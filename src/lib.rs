// obis-microscopy library - openBIS microscopy browsing and export
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod export;
pub mod model;
pub mod observability;
pub mod openbis;
pub mod render;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, init_config, ObisMicroscopyConfig};
pub use export::{
    parse_status, session_download_url, AggregationInvoker, ExportMode, ExportPoller,
    ExportRequest, ExportService, JobOutcome, JobStatus, EXPORT_SERVICE_NAME,
};
pub use model::{
    fetch_experiment_view, fetch_sample_view, ExperimentView, SampleView, SchemaRevision,
};
pub use observability::{openbis_metrics, OpenbisApiMetrics, OperationTimer};
pub use openbis::{OpenbisClient, OpenbisError, Sample, SearchResult, TableModel};
pub use render::{
    error_banner, outcome_banner, render_experiment, render_sample, StatusBanner, StatusLevel,
};
pub use telemetry::{
    create_export_span, generate_correlation_id, init_telemetry, shutdown_telemetry,
};
