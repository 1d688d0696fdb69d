//! Bulk import and export of customer records as JSON exchange files.

pub mod exporter;
pub mod format;
pub mod importer;
pub mod notice;
pub mod outcome;

pub use exporter::{artifact_file_name, CustomerExporter, ExportArtifact};
pub use importer::CustomerImporter;
pub use notice::{export_failure_message, ImportNotice};
pub use outcome::{ImportOutcome, ImportStatus, RejectedRecord, RejectionReason};

/// Extension (without the dot) an import file name must carry, compared case-insensitively.
pub const EXCHANGE_FILE_EXTENSION: &str = "json";

pub const EXCHANGE_CONTENT_TYPE: &str = "application/json";
