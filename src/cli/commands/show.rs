//! Viewer commands: fetch an entity and print its rendered view.

use anyhow::Result;

use crate::cli::commands::build_client;
use crate::config::ObisMicroscopyConfig;
use crate::model::{fetch_experiment_view, fetch_sample_view, SchemaRevision};
use crate::render::{error_banner, render_experiment, render_sample};

pub async fn show_experiment_command(
    config: &ObisMicroscopyConfig,
    identifier: &str,
    page_offset: u64,
) -> Result<()> {
    let client = build_client(config).await?;
    match fetch_experiment_view(&client, identifier, page_offset).await {
        Ok(view) => {
            print!("{}", render_experiment(&view));
            Ok(())
        }
        Err(error) => {
            eprintln!("{}", error_banner(&error));
            Err(error.into())
        }
    }
}

pub async fn show_sample_command(
    config: &ObisMicroscopyConfig,
    perm_id: &str,
    sample_type: &str,
    revision: Option<SchemaRevision>,
) -> Result<()> {
    let revision = revision.unwrap_or(config.export.schema_revision);
    let client = build_client(config).await?;
    match fetch_sample_view(&client, perm_id, sample_type, revision).await {
        Ok(view) => {
            print!("{}", render_sample(&view));
            Ok(())
        }
        Err(error) => {
            eprintln!("{}", error_banner(&error));
            Err(error.into())
        }
    }
}
