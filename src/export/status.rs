//! Parsing of the export plug-in's tabular status rows.
//!
//! The plug-in answers every invocation with a single-row table. While the
//! job runs the row has two cells, `[uid, completed]`; the terminal row has
//! eight: `[uid, completed, success, message, nCopiedFiles,
//! relativeExpFolder, zipArchiveFileName, mode]`. Older servers emit 0/1
//! where newer ones emit booleans, so both encodings are accepted.

use serde_json::Value;

use crate::openbis::{OpenbisError, TableModel};

/// Terminal result of an export job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub uid: String,
    pub success: bool,
    pub message: String,
    pub n_copied_files: u64,
    pub relative_exp_folder: String,
    pub zip_archive_file_name: String,
    /// Mode echoed by the server; kept verbatim so unknown values render
    /// the way the viewers rendered them (as the zip branch).
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending { uid: String },
    Finished(JobOutcome),
}

/// Interpret a status table. Anything other than exactly one row, or a row
/// with missing cells, is the "unexpected feedback" bucket.
pub fn parse_status(table: &TableModel) -> Result<JobStatus, OpenbisError> {
    if table.rows.len() != 1 {
        return Err(OpenbisError::UnexpectedShape(format!(
            "export status table has {} rows instead of 1",
            table.rows.len()
        )));
    }
    let row = &table.rows[0];

    let uid = cell_str(row.first().map(|c| &c.value))
        .ok_or_else(|| OpenbisError::UnexpectedShape("export status row has no uid".into()))?;
    let completed = cell_truthy(row.get(1).map(|c| &c.value)).ok_or_else(|| {
        OpenbisError::UnexpectedShape("export status row has no completed flag".into())
    })?;

    if !completed {
        return Ok(JobStatus::Pending { uid });
    }

    if row.len() < 8 {
        return Err(OpenbisError::UnexpectedShape(format!(
            "terminal export status row has {} cells instead of 8",
            row.len()
        )));
    }

    let success = cell_truthy(Some(&row[2].value)).ok_or_else(|| {
        OpenbisError::UnexpectedShape("terminal export status row has no success flag".into())
    })?;

    Ok(JobStatus::Finished(JobOutcome {
        uid,
        success,
        message: cell_str(Some(&row[3].value)).unwrap_or_default(),
        n_copied_files: cell_u64(&row[4].value),
        relative_exp_folder: cell_str(Some(&row[5].value)).unwrap_or_default(),
        zip_archive_file_name: cell_str(Some(&row[6].value)).unwrap_or_default(),
        mode: cell_str(Some(&row[7].value)).unwrap_or_default(),
    }))
}

fn cell_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn cell_truthy(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn cell_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}
