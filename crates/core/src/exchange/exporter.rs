use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{error, info};

use crate::api::CustomerApi;
use crate::errors::ExportError;
use crate::exchange::{format, EXCHANGE_CONTENT_TYPE, EXCHANGE_FILE_EXTENSION};

/// A complete export ready to be offered as a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
    pub record_count: usize,
}

pub struct CustomerExporter {
    api: Arc<dyn CustomerApi>,
}

impl CustomerExporter {
    pub fn new(api: Arc<dyn CustomerApi>) -> Self {
        Self { api }
    }

    pub async fn export(&self) -> Result<ExportArtifact, ExportError> {
        self.export_at(Local::now().naive_local()).await
    }

    /// Exports the full customer set, naming the artifact after `exported_at`.
    pub async fn export_at(
        &self,
        exported_at: NaiveDateTime,
    ) -> Result<ExportArtifact, ExportError> {
        let customers = self.api.list_customers().await.map_err(|source| {
            error!(
                event_name = "exchange.export.failed",
                error = %source,
                "customer listing failed; no export produced"
            );
            ExportError::Listing(source)
        })?;

        let bytes = format::render_document(&customers)
            .map_err(|error| ExportError::Serialization(error.to_string()))?;
        let artifact = ExportArtifact {
            bytes,
            file_name: artifact_file_name(exported_at),
            content_type: EXCHANGE_CONTENT_TYPE,
            record_count: customers.len(),
        };

        info!(
            event_name = "exchange.export.completed",
            file_name = %artifact.file_name,
            record_count = artifact.record_count,
            byte_count = artifact.bytes.len(),
            "customer export completed"
        );

        Ok(artifact)
    }
}

/// `customers_<YYYYMMDD>_<HHMMSS>.json`
pub fn artifact_file_name(exported_at: NaiveDateTime) -> String {
    format!("customers_{}.{EXCHANGE_FILE_EXTENSION}", exported_at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::api::CustomerApi;
    use crate::domain::customer::{CustomerId, CustomerRecord};
    use crate::errors::{ApiError, ExportError};

    use super::{artifact_file_name, CustomerExporter};

    struct FixedApi(Result<Vec<CustomerRecord>, ApiError>);

    #[async_trait]
    impl CustomerApi for FixedApi {
        async fn list_customers(&self) -> Result<Vec<CustomerRecord>, ApiError> {
            self.0.clone()
        }

        async fn create_customer(&self, _: CustomerRecord) -> Result<CustomerRecord, ApiError> {
            Err(ApiError::Rejected("read-only fixture".to_string()))
        }
    }

    fn exporter(listing: Result<Vec<CustomerRecord>, ApiError>) -> CustomerExporter {
        CustomerExporter::new(Arc::new(FixedApi(listing)))
    }

    fn morning() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|date| date.and_hms_opt(9, 5, 30))
            .expect("valid timestamp")
    }

    #[test]
    fn file_name_embeds_timestamp_to_the_second() {
        assert_eq!(artifact_file_name(morning()), "customers_20240307_090530.json");
    }

    #[tokio::test]
    async fn export_serializes_every_listed_customer() {
        let customers = vec![
            CustomerRecord {
                id: CustomerId("c-1".to_string()),
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                shipping_address: "London".to_string(),
            },
            CustomerRecord {
                id: CustomerId("c-2".to_string()),
                name: "Grace".to_string(),
                surname: "Hopper".to_string(),
                username: "grace".to_string(),
                email: "grace@example.com".to_string(),
                shipping_address: "Arlington".to_string(),
            },
        ];

        let artifact = exporter(Ok(customers)).export_at(morning()).await.expect("export");

        assert_eq!(artifact.content_type, "application/json");
        assert_eq!(artifact.record_count, 2);
        assert_eq!(artifact.file_name, "customers_20240307_090530.json");

        let document: Value = serde_json::from_slice(&artifact.bytes).expect("valid json");
        assert_eq!(document[0]["id"], "c-1");
        assert_eq!(document[1]["shippingAddress"], "Arlington");
    }

    #[tokio::test]
    async fn zero_customers_export_as_empty_array() {
        let artifact = exporter(Ok(Vec::new())).export().await.expect("export");

        let document: Value = serde_json::from_slice(&artifact.bytes).expect("valid json");
        assert_eq!(document, Value::Array(Vec::new()));
        assert_eq!(artifact.record_count, 0);
        assert!(artifact.file_name.starts_with("customers_"));
    }

    #[tokio::test]
    async fn listing_failure_produces_no_artifact() {
        let result =
            exporter(Err(ApiError::Transport("connection refused".to_string()))).export().await;

        assert_eq!(
            result,
            Err(ExportError::Listing(ApiError::Transport("connection refused".to_string())))
        );
    }
}
