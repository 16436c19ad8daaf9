//! Fixed-interval polling of the export aggregation service.
//!
//! The first invocation carries the full request parameters and comes back
//! with a job uid; every subsequent invocation carries only that uid, spaced
//! by the configured interval. The loop runs until the server reports the
//! job terminal; the original viewers imposed no client-side timeout and
//! neither does this poller.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::job::{poll_parameters, ExportRequest, EXPORT_SERVICE_NAME};
use super::status::{parse_status, JobOutcome, JobStatus};
use crate::model::SchemaRevision;
use crate::observability::openbis_metrics;
use crate::openbis::{OpenbisClient, OpenbisError, TableModel};

/// Seam over aggregation-service execution so the poll loop is testable
/// without a server.
#[async_trait]
pub trait AggregationInvoker {
    async fn execute(
        &self,
        parameters: &BTreeMap<String, String>,
    ) -> Result<TableModel, OpenbisError>;
}

/// Invoker backed by a real client and a named service on one data store.
pub struct ExportService<'a> {
    client: &'a OpenbisClient,
    data_store: Option<&'a str>,
}

impl<'a> ExportService<'a> {
    pub fn new(client: &'a OpenbisClient, data_store: Option<&'a str>) -> Self {
        Self { client, data_store }
    }
}

#[async_trait]
impl AggregationInvoker for ExportService<'_> {
    async fn execute(
        &self,
        parameters: &BTreeMap<String, String>,
    ) -> Result<TableModel, OpenbisError> {
        self.client
            .execute_aggregation_service(EXPORT_SERVICE_NAME, self.data_store, parameters)
            .await
    }
}

pub struct ExportPoller<I> {
    invoker: I,
    interval: Duration,
}

impl<I: AggregationInvoker> ExportPoller<I> {
    pub fn new(invoker: I, interval: Duration) -> Self {
        Self { invoker, interval }
    }

    /// Trigger the export and poll it to completion.
    pub async fn run(
        &self,
        request: &ExportRequest,
        revision: SchemaRevision,
    ) -> Result<JobOutcome, OpenbisError> {
        self.run_with_parameters(request.parameters(revision)).await
    }

    pub async fn run_with_parameters(
        &self,
        initial: BTreeMap<String, String>,
    ) -> Result<JobOutcome, OpenbisError> {
        let mut table = self.invoker.execute(&initial).await?;
        let mut polls: u64 = 0;

        loop {
            match parse_status(&table)? {
                JobStatus::Finished(outcome) => {
                    info!(
                        uid = %outcome.uid,
                        success = outcome.success,
                        polls,
                        "Export job finished"
                    );
                    return Ok(outcome);
                }
                JobStatus::Pending { uid } => {
                    debug!(%uid, polls, "Export job still running");
                    openbis_metrics().record_poll();
                    tokio::time::sleep(self.interval).await;
                    polls += 1;
                    table = self.invoker.execute(&poll_parameters(&uid)).await?;
                }
            }
        }
    }
}
