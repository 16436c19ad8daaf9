pub mod client;
pub mod criteria;
pub mod errors;
pub mod rpc;
pub mod types;

pub use client::OpenbisClient;
pub use errors::OpenbisError;
pub use types::{AggregationService, DataSet, Sample, SearchResult, TableModel};
