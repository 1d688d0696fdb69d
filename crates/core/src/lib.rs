pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod exchange;

pub use api::CustomerApi;
pub use domain::customer::{CustomerDraft, CustomerField, CustomerId, CustomerRecord};
pub use errors::{ApiError, ExportError, ImportError, InterfaceError};
pub use exchange::{
    CustomerExporter, CustomerImporter, ExportArtifact, ImportNotice, ImportOutcome, ImportStatus,
    RejectedRecord, RejectionReason,
};
