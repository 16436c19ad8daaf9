//! Text rendering of the viewer content.
//!
//! Where the webapps built DOM trees, the CLI prints sections. Property
//! codes and wording follow the viewers; missing properties are simply
//! skipped, like the viewers skipped empty DOM nodes.

use std::fmt::Write;

use chrono::{TimeZone, Utc};

use crate::model::{ExperimentView, SampleView};
use crate::openbis::{DataSet, Sample};

const NAME_PROPERTY: &str = "$NAME";
const EXPERIMENT_DESCRIPTION: &str = "MICROSCOPY_EXPERIMENT_DESCRIPTION";
const EXPERIMENT_ACQ_HARDWARE: &str = "MICROSCOPY_EXPERIMENT_ACQ_HARDWARE_FRIENDLY_NAME";
const SAMPLE_DESCRIPTION: &str = "MICROSCOPY_SAMPLE_DESCRIPTION";
const SAMPLE_SIZE_IN_BYTES: &str = "MICROSCOPY_SAMPLE_SIZE_IN_BYTES";

/// MiB below one GiB, GiB above, two decimals either way.
pub fn format_dataset_size(size_in_bytes: f64) -> String {
    let mib = size_in_bytes / 1024.0 / 1024.0;
    if mib < 1024.0 {
        format!("{mib:.2} MiB")
    } else {
        format!("{:.2} GiB", mib / 1024.0)
    }
}

fn display_name(sample: &Sample) -> &str {
    sample
        .property(NAME_PROPERTY)
        .or_else(|| sample.code.as_deref())
        .unwrap_or("(unnamed)")
}

fn registration_date(sample: &Sample) -> Option<String> {
    let millis = sample.registration_date?;
    let date = Utc.timestamp_millis_opt(millis).single()?;
    Some(date.format("%a %b %e %Y").to_string())
}

pub fn render_experiment(view: &ExperimentView) -> String {
    let mut out = String::new();
    let experiment = &view.experiment_sample;

    let _ = writeln!(out, "Experiment: {}", display_name(experiment));
    if let Some(identifier) = experiment.identifier_str() {
        let _ = writeln!(out, "Identifier: {identifier}");
    }
    if let Some(perm_id) = experiment.perm_id_str() {
        let _ = writeln!(out, "Perm ID:    {perm_id}");
    }
    if let Some(description) = experiment.property(EXPERIMENT_DESCRIPTION) {
        let _ = writeln!(out, "Description: {description}");
    }
    if let Some(hardware) = experiment.property(EXPERIMENT_ACQ_HARDWARE) {
        match registration_date(experiment) {
            Some(date) => {
                let _ = writeln!(
                    out,
                    "This experiment was performed on {hardware} and registered on {date}."
                );
            }
            None => {
                let _ = writeln!(out, "This experiment was performed on {hardware}.");
            }
        }
    }

    let tags: Vec<&str> = experiment
        .parents
        .iter()
        .filter(|p| p.type_code() == Some("ORGANIZATION_UNIT"))
        .map(display_name)
        .collect();
    if !tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", tags.join(", "));
    }

    let _ = writeln!(
        out,
        "\nSamples ({} of {}):",
        view.samples.len(),
        view.total_sample_count
    );
    for sample in &view.samples {
        let _ = write!(out, "  - {}", display_name(sample));
        if let Some(size) = sample
            .property(SAMPLE_SIZE_IN_BYTES)
            .and_then(|s| s.parse::<f64>().ok())
        {
            let _ = write!(out, " ({})", format_dataset_size(size));
        }
        out.push('\n');
    }

    out
}

pub fn render_sample(view: &SampleView) -> String {
    let mut out = String::new();
    let sample = &view.sample;

    let _ = writeln!(out, "Sample: {}", display_name(sample));
    if let Some(perm_id) = sample.perm_id_str() {
        let _ = writeln!(out, "Perm ID: {perm_id}");
    }
    if let Some(description) = sample.property(SAMPLE_DESCRIPTION) {
        let _ = writeln!(out, "Description: {description}");
    }
    if let Some(size) = sample
        .property(SAMPLE_SIZE_IN_BYTES)
        .and_then(|s| s.parse::<f64>().ok())
    {
        let _ = writeln!(out, "File size: {}", format_dataset_size(size));
    }

    let _ = writeln!(out, "Experiment: {}", display_name(&view.experiment_sample));

    let _ = writeln!(out, "\nImage series ({}):", view.image_containers.len());
    for data_set in &view.image_containers {
        let _ = writeln!(out, "  - {}", data_set.code);
        for component in &data_set.components {
            let _ = writeln!(out, "      {}", component.code);
        }
    }

    if !view.accessory_files.is_empty() {
        let _ = writeln!(out, "\nAccessory files ({}):", view.accessory_files.len());
        for data_set in &view.accessory_files {
            let _ = writeln!(out, "  - {}", render_data_set_label(data_set));
        }
    }

    out
}

fn render_data_set_label(data_set: &DataSet) -> String {
    match data_set.property(NAME_PROPERTY) {
        Some(name) => format!("{} ({})", name, data_set.code),
        None => data_set.code.clone(),
    }
}
