use thiserror::Error;

/// Failures reported by the remote data API collaborator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid api base url `{0}`")]
    InvalidBaseUrl(String),
    #[error("api transport failure: {0}")]
    Transport(String),
    #[error("api responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode api response: {0}")]
    Decode(String),
    #[error("api rejected the record: {0}")]
    Rejected(String),
}

/// File-level import failures. Per-record problems never surface here.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("no file supplied")]
    NoFileSupplied,
    #[error("wrong file type: `{file_name}` is not a .json file")]
    WrongFileType { file_name: String },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("customer listing failed: {0}")]
    Listing(#[from] ApiError),
    #[error("could not serialize customers: {0}")]
    Serialization(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The customer service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        match &mut self {
            Self::BadRequest { correlation_id: id, .. }
            | Self::ServiceUnavailable { correlation_id: id, .. }
            | Self::Internal { correlation_id: id, .. } => *id = correlation_id.into(),
        }
        self
    }
}

impl From<ImportError> for InterfaceError {
    fn from(value: ImportError) -> Self {
        Self::BadRequest { message: value.to_string(), correlation_id: "unassigned".to_owned() }
    }
}

impl From<ExportError> for InterfaceError {
    fn from(value: ExportError) -> Self {
        match value {
            ExportError::Listing(_) => Self::ServiceUnavailable {
                message: value.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ExportError::Serialization(_) => {
                Self::Internal { message: value.to_string(), correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApiError, ExportError, ImportError, InterfaceError};

    #[test]
    fn import_errors_map_to_bad_request_with_correlation_id() {
        let interface = InterfaceError::from(ImportError::InvalidFormat(
            "expected value at line 1 column 1".to_owned(),
        ))
        .with_correlation_id("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn listing_failure_maps_to_service_unavailable() {
        let interface = InterfaceError::from(ExportError::from(ApiError::Transport(
            "connection refused".to_owned(),
        )));

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert!(interface.message().contains("connection refused"));
    }

    #[test]
    fn serialization_failure_maps_to_internal() {
        let interface =
            InterfaceError::from(ExportError::Serialization("key must be a string".to_owned()));

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
