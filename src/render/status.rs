//! Status banners.
//!
//! The viewers surfaced every outcome as a color-coded banner; the CLI keeps
//! the same classification and wording, minus the markup.

use std::fmt;

use crate::export::JobOutcome;
use crate::openbis::OpenbisError;

pub const PROCESSING_MESSAGE: &str =
    "Please wait while processing your request. This might take a while...";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Sorry, could not process request.";
pub const UNEXPECTED_FEEDBACK_MESSAGE: &str =
    "Sorry, unexpected feedback from server obtained. Please contact your administrator.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn label(self) -> &'static str {
        match self {
            StatusLevel::Info => "INFO",
            StatusLevel::Success => "SUCCESS",
            StatusLevel::Warning => "WARNING",
            StatusLevel::Error => "ERROR",
        }
    }

    /// Bootstrap alert class the webapps mapped each level to.
    pub fn css_class(self) -> &'static str {
        match self {
            StatusLevel::Info => "info",
            StatusLevel::Success => "success",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub level: StatusLevel,
    pub message: String,
}

impl StatusBanner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for StatusBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}

/// Banner for a terminal export job, with the download URL for successful
/// zip exports.
pub fn outcome_banner(outcome: &JobOutcome, download_url: Option<&str>) -> StatusBanner {
    if outcome.success {
        let count = if outcome.n_copied_files == 1 {
            "1 file was".to_string()
        } else {
            format!("{} files were", outcome.n_copied_files)
        };
        let message = match outcome.mode.as_str() {
            "normal" => format!(
                "Congratulations! {count} successfully exported to your user folder under {}.",
                outcome.relative_exp_folder
            ),
            "hrm" => {
                format!("Congratulations! {count} successfully exported to your HRM source folder.")
            }
            _ => match download_url {
                Some(url) => format!(
                    "Congratulations! {count} successfully packaged. Download: {url}"
                ),
                None => format!("Congratulations! {count} successfully packaged."),
            },
        };
        StatusBanner::success(message)
    } else if outcome.mode == "normal" {
        StatusBanner::error(format!(
            "Sorry, there was an error exporting to your user folder: \"{}\".",
            outcome.message
        ))
    } else {
        StatusBanner::error("Sorry, there was an error packaging your files for download!")
    }
}

/// Banner for a failed action, in the three buckets the viewers knew:
/// transport, unexpected server feedback, and everything else verbatim.
pub fn error_banner(error: &OpenbisError) -> StatusBanner {
    match error {
        OpenbisError::UnexpectedShape(_) => StatusBanner::error(UNEXPECTED_FEEDBACK_MESSAGE),
        OpenbisError::Integrity(message) => StatusBanner::error(message.clone()),
        e if e.is_transport() => StatusBanner::error(TRANSPORT_ERROR_MESSAGE),
        other => StatusBanner::error(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn outcome(mode: &str, success: bool, n: u64) -> JobOutcome {
        JobOutcome {
            uid: "job".into(),
            success,
            message: "disk full".into(),
            n_copied_files: n,
            relative_exp_folder: "collection/exp_1".into(),
            zip_archive_file_name: "exp_1.zip".into(),
            mode: mode.into(),
        }
    }

    #[test]
    fn successful_normal_export_names_the_folder() {
        let banner = outcome_banner(&outcome("normal", true, 1), None);
        assert_eq!(banner.level, StatusLevel::Success);
        assert_eq!(
            banner.message,
            "Congratulations! 1 file was successfully exported to your user folder under collection/exp_1."
        );
    }

    #[test]
    fn plural_file_count_reads_naturally() {
        let banner = outcome_banner(&outcome("hrm", true, 24), None);
        assert!(banner.message.starts_with("Congratulations! 24 files were"));
        assert!(banner.message.ends_with("HRM source folder."));
    }

    #[test]
    fn zip_success_includes_download_url_when_available() {
        let banner = outcome_banner(
            &outcome("zip", true, 3),
            Some("https://dss.example.org/download?filePath=exp_1.zip"),
        );
        assert!(banner
            .message
            .contains("Download: https://dss.example.org/download?filePath=exp_1.zip"));
    }

    #[test]
    fn unknown_mode_renders_like_zip() {
        let banner = outcome_banner(&outcome("tar", true, 3), None);
        assert!(banner.message.ends_with("successfully packaged."));
    }

    #[test]
    fn failed_normal_export_embeds_server_message() {
        let banner = outcome_banner(&outcome("normal", false, 0), None);
        assert_eq!(banner.level, StatusLevel::Error);
        assert_eq!(
            banner.message,
            "Sorry, there was an error exporting to your user folder: \"disk full\"."
        );
    }

    #[test]
    fn failed_zip_export_uses_packaging_message() {
        let banner = outcome_banner(&outcome("zip", false, 0), None);
        assert_eq!(
            banner.message,
            "Sorry, there was an error packaging your files for download!"
        );
    }

    #[test]
    fn error_buckets_map_to_their_banners() {
        let unexpected = OpenbisError::UnexpectedShape("2 rows".into());
        assert_eq!(
            error_banner(&unexpected).message,
            UNEXPECTED_FEEDBACK_MESSAGE
        );

        let http = OpenbisError::Http {
            status: StatusCode::BAD_GATEWAY,
            body: "gateway".into(),
        };
        assert_eq!(error_banner(&http).message, TRANSPORT_ERROR_MESSAGE);

        let rpc = OpenbisError::Rpc {
            code: Some(-32000),
            message: "session expired".into(),
        };
        assert_eq!(error_banner(&rpc).message, TRANSPORT_ERROR_MESSAGE);

        let integrity = OpenbisError::Integrity("The dataset seems to be corrupted!".into());
        assert_eq!(
            error_banner(&integrity).message,
            "The dataset seems to be corrupted!"
        );
    }

    #[test]
    fn levels_keep_their_bootstrap_classes() {
        assert_eq!(StatusLevel::Error.css_class(), "danger");
        assert_eq!(StatusLevel::Info.css_class(), "info");
    }
}
