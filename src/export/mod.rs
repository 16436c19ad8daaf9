pub mod download;
pub mod job;
pub mod poller;
pub mod status;

pub use download::session_download_url;
pub use job::{poll_parameters, ExportMode, ExportRequest, EXPORT_SERVICE_NAME};
pub use poller::{AggregationInvoker, ExportPoller, ExportService};
pub use status::{parse_status, JobOutcome, JobStatus};
