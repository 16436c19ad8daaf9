pub mod status;
pub mod view;

pub use status::{
    error_banner, outcome_banner, StatusBanner, StatusLevel, PROCESSING_MESSAGE,
    TRANSPORT_ERROR_MESSAGE, UNEXPECTED_FEEDBACK_MESSAGE,
};
pub use view::{format_dataset_size, render_experiment, render_sample};
