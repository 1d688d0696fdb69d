//! Operator-facing messages for import and export results.

use serde::Serialize;

use crate::errors::{ExportError, ImportError};
use crate::exchange::outcome::{ImportOutcome, ImportStatus};

/// Up to three message categories shown after an import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportNotice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportNotice {
    pub fn from_result(result: &Result<ImportOutcome, ImportError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(error) => Self::from_error(error),
        }
    }

    pub fn from_outcome(outcome: &ImportOutcome) -> Self {
        let uploaded = || format!("Successfully uploaded {} customers.", outcome.success_count());

        match outcome.status() {
            ImportStatus::NoData => {
                Self::error_only("No valid customer data found in the file.".to_string())
            }
            ImportStatus::Succeeded => Self { success: Some(uploaded()), ..Self::default() },
            ImportStatus::PartiallySucceeded { skipped } => Self {
                success: Some(uploaded()),
                warning: Some(format!(
                    "{skipped} customers failed to upload due to validation errors."
                )),
                error: None,
            },
            ImportStatus::Failed => Self::error_only(
                "No customers were successfully uploaded. Please check your file format."
                    .to_string(),
            ),
        }
    }

    pub fn from_error(error: &ImportError) -> Self {
        let message = match error {
            ImportError::NoFileSupplied => "Please select a valid JSON file.",
            ImportError::WrongFileType { .. } => "Please select a JSON file.",
            ImportError::InvalidFormat(_) => "Invalid JSON format. Please check your file.",
        };
        Self::error_only(message.to_string())
    }

    fn error_only(message: String) -> Self {
        Self { error: Some(message), ..Self::default() }
    }
}

pub fn export_failure_message(error: &ExportError) -> String {
    let reason = match error {
        ExportError::Listing(source) => source.to_string(),
        ExportError::Serialization(message) => message.clone(),
    };
    format!("Error downloading customers: {reason}")
}
