use anyhow::Result;
use clap::{Parser, Subcommand};

use obis_microscopy::cli::commands::export::{export_command, ExportArgs};
use obis_microscopy::cli::commands::show::{show_experiment_command, show_sample_command};
use obis_microscopy::config::{config, init_config};
use obis_microscopy::export::ExportMode;
use obis_microscopy::model::SchemaRevision;
use obis_microscopy::telemetry::init_telemetry;

#[derive(Parser)]
#[command(name = "obis-microscopy")]
#[command(about = "Browse and export openBIS microscopy experiments")]
#[command(
    long_about = "obis-microscopy talks to an openBIS application server over its V3 JSON-RPC \
                  API: inspect microscopy experiments and samples, and drive the server-side \
                  export aggregation plugin to copy datasets to a user folder, an HRM source \
                  folder, or a downloadable zip archive."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a microscopy experiment with its sample list
    ShowExperiment {
        /// Experiment sample identifier, e.g. /SPACE/PROJECT/EXP_1
        identifier: String,
        /// Offset into the sample list (pages of 100)
        #[arg(long, default_value = "0")]
        page_offset: u64,
    },
    /// Display a microscopy sample with its image containers
    ShowSample {
        /// Sample permId
        perm_id: String,
        /// openBIS sample type code of the sample
        #[arg(long, default_value = "MICROSCOPY_SAMPLE_TYPE")]
        sample_type: String,
        /// Metadata schema revision of the experiment (defaults to configured value)
        #[arg(long)]
        revision: Option<SchemaRevision>,
    },
    /// Run a dataset export job and poll it to completion
    Export {
        /// Experiment sample identifier or permId to export
        #[arg(long)]
        experiment_id: String,
        /// Experiment sample permId (revisions 3 and 4)
        #[arg(long)]
        exp_sample_perm_id: Option<String>,
        /// Restrict the export to a single sample permId
        #[arg(long)]
        sample: Option<String>,
        /// Export destination
        #[arg(long, value_enum, default_value_t = ExportMode::Zip)]
        mode: ExportMode,
        /// Metadata schema revision of the experiment (defaults to configured value)
        #[arg(long)]
        revision: Option<SchemaRevision>,
        /// Poll interval in milliseconds (defaults to configured value)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_config()?;
    let config = config()?;

    if config.observability.tracing_enabled {
        init_telemetry()?;
    }

    match cli.command {
        Commands::ShowExperiment {
            identifier,
            page_offset,
        } => tokio::runtime::Runtime::new()?.block_on(async {
            show_experiment_command(config, &identifier, page_offset).await
        }),
        Commands::ShowSample {
            perm_id,
            sample_type,
            revision,
        } => tokio::runtime::Runtime::new()?.block_on(async {
            show_sample_command(config, &perm_id, &sample_type, revision).await
        }),
        Commands::Export {
            experiment_id,
            exp_sample_perm_id,
            sample,
            mode,
            revision,
            interval_ms,
        } => tokio::runtime::Runtime::new()?.block_on(async {
            export_command(
                config,
                ExportArgs {
                    experiment_id,
                    experiment_sample_perm_id: exp_sample_perm_id,
                    sample,
                    mode,
                    revision,
                    interval_ms,
                },
            )
            .await
        }),
    }
}
