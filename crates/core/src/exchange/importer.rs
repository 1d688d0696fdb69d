use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::api::CustomerApi;
use crate::domain::customer::{CustomerDraft, CustomerField, CustomerId};
use crate::errors::ImportError;
use crate::exchange::format;
use crate::exchange::outcome::{ImportOutcome, ImportTally, RejectionReason};
use crate::exchange::EXCHANGE_FILE_EXTENSION;

/// Bulk-creates customers from an exchange file.
///
/// Records are submitted one at a time in file order. A record that fails
/// validation or submission is counted and skipped; it never stops the run.
pub struct CustomerImporter {
    api: Arc<dyn CustomerApi>,
}

impl CustomerImporter {
    pub fn new(api: Arc<dyn CustomerApi>) -> Self {
        Self { api }
    }

    pub async fn import(
        &self,
        file_bytes: &[u8],
        file_name: &str,
    ) -> Result<ImportOutcome, ImportError> {
        check_preconditions(file_bytes, file_name)?;

        let correlation_id = Uuid::new_v4().to_string();
        let drafts = format::parse_drafts(file_bytes).map_err(|error| {
            warn!(
                event_name = "exchange.import.invalid_format",
                correlation_id = %correlation_id,
                file_name = %file_name,
                error = %error,
                "import file could not be parsed"
            );
            error
        })?;

        info!(
            event_name = "exchange.import.started",
            correlation_id = %correlation_id,
            file_name = %file_name,
            record_count = drafts.len(),
            "customer import started"
        );

        let mut tally = ImportTally::default();
        for (position, draft) in drafts.into_iter().enumerate() {
            tally = self.apply(tally, position, draft, &correlation_id).await;
        }
        let outcome = tally.finish();

        info!(
            event_name = "exchange.import.completed",
            correlation_id = %correlation_id,
            status = outcome.status().as_str(),
            success_count = outcome.success_count(),
            failure_count = outcome.failure_count(),
            "customer import completed"
        );

        Ok(outcome)
    }

    async fn apply(
        &self,
        tally: ImportTally,
        position: usize,
        draft: Option<CustomerDraft>,
        correlation_id: &str,
    ) -> ImportTally {
        let Some(draft) = draft else {
            let missing = CustomerField::MANDATORY.to_vec();
            return reject_incomplete(tally, position, None, missing, correlation_id);
        };

        let declared_id = draft.declared_id();
        let record = match draft.into_record() {
            Ok(record) => record,
            Err(missing) => {
                return reject_incomplete(tally, position, declared_id, missing, correlation_id);
            }
        };

        let id = record.id.clone();
        let name = record.name.clone();
        match self.api.create_customer(record).await {
            Ok(_) => tally.accept(),
            Err(error) => {
                warn!(
                    event_name = "exchange.import.record_failed",
                    correlation_id = %correlation_id,
                    position,
                    customer_id = %id,
                    customer_name = %name,
                    error = %error,
                    "customer submission failed"
                );
                tally.reject(
                    position,
                    Some(id),
                    RejectionReason::Submission { message: error.to_string() },
                )
            }
        }
    }
}

fn check_preconditions(file_bytes: &[u8], file_name: &str) -> Result<(), ImportError> {
    if file_bytes.is_empty() {
        return Err(ImportError::NoFileSupplied);
    }

    if !has_exchange_extension(file_name) {
        return Err(ImportError::WrongFileType { file_name: file_name.to_string() });
    }

    Ok(())
}

fn has_exchange_extension(file_name: &str) -> bool {
    let suffix = format!(".{EXCHANGE_FILE_EXTENSION}");
    file_name.len() >= suffix.len()
        && file_name.is_char_boundary(file_name.len() - suffix.len())
        && file_name[file_name.len() - suffix.len()..].eq_ignore_ascii_case(&suffix)
}

fn reject_incomplete(
    tally: ImportTally,
    position: usize,
    id: Option<CustomerId>,
    missing: Vec<CustomerField>,
    correlation_id: &str,
) -> ImportTally {
    let fields = missing.iter().map(|field| field.exchange_name()).collect::<Vec<_>>().join(",");
    warn!(
        event_name = "exchange.import.record_rejected",
        correlation_id = %correlation_id,
        position,
        missing_fields = %fields,
        "customer record is missing mandatory fields"
    );
    tally.reject(position, id, RejectionReason::MissingFields { fields: missing })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::api::CustomerApi;
    use crate::domain::customer::{CustomerField, CustomerId, CustomerRecord};
    use crate::errors::{ApiError, ImportError};
    use crate::exchange::outcome::{ImportStatus, RejectionReason};

    use super::{has_exchange_extension, CustomerImporter};

    #[derive(Default)]
    struct RecordingApi {
        created: Mutex<Vec<CustomerRecord>>,
        rejected_usernames: HashSet<String>,
    }

    impl RecordingApi {
        fn rejecting(usernames: &[&str]) -> Self {
            Self {
                rejected_usernames: usernames.iter().map(|name| name.to_string()).collect(),
                ..Self::default()
            }
        }

        async fn created(&self) -> Vec<CustomerRecord> {
            self.created.lock().await.clone()
        }
    }

    #[async_trait]
    impl CustomerApi for RecordingApi {
        async fn list_customers(&self) -> Result<Vec<CustomerRecord>, ApiError> {
            Ok(self.created.lock().await.clone())
        }

        async fn create_customer(
            &self,
            customer: CustomerRecord,
        ) -> Result<CustomerRecord, ApiError> {
            if self.rejected_usernames.contains(&customer.username) {
                return Err(ApiError::Status { status: 409, body: "duplicate".to_string() });
            }
            self.created.lock().await.push(customer.clone());
            Ok(customer)
        }
    }

    fn importer(api: &Arc<RecordingApi>) -> CustomerImporter {
        CustomerImporter::new(api.clone())
    }

    const TWO_RECORDS: &[u8] = br#"[
        {"name":"A","surname":"B","username":"ab","email":"a@b.com","shippingAddress":"X"},
        {"name":"","surname":"B","username":"c","email":"c@d.com","shippingAddress":"Y"}
    ]"#;

    #[tokio::test]
    async fn blank_mandatory_field_is_counted_and_not_submitted() {
        let api = Arc::new(RecordingApi::default());

        let outcome = importer(&api).import(TWO_RECORDS, "customers.json").await.expect("import");

        assert_eq!(outcome.success_count(), 1);
        assert_eq!(outcome.failure_count(), 1);
        assert_eq!(outcome.status(), ImportStatus::PartiallySucceeded { skipped: 1 });
        assert_eq!(
            outcome.rejected()[0].reason,
            RejectionReason::MissingFields { fields: vec![CustomerField::Name] }
        );

        let created = api.created().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].username, "ab");
    }

    #[tokio::test]
    async fn empty_array_is_no_data() {
        let api = Arc::new(RecordingApi::default());

        let outcome = importer(&api).import(b"[]", "customers.json").await.expect("import");

        assert_eq!(outcome.status(), ImportStatus::NoData);
        assert_eq!((outcome.success_count(), outcome.failure_count()), (0, 0));
    }

    #[tokio::test]
    async fn preconditions_are_checked_before_parsing() {
        let api = Arc::new(RecordingApi::default());
        let importer = importer(&api);

        assert_eq!(
            importer.import(b"", "customers.json").await,
            Err(ImportError::NoFileSupplied)
        );
        assert_eq!(
            importer.import(b"not even json", "customers.csv").await,
            Err(ImportError::WrongFileType { file_name: "customers.csv".to_string() })
        );
        assert!(api.created().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_submits_nothing() {
        let api = Arc::new(RecordingApi::default());
        let payload = br#"[{"name":"A","surname":"B","username":"ab","email":"a@b.com","shippingAddress":"X"},
            {"name": oops}, {"name":"C","surname":"D","username":"cd","email":"c@d.com","shippingAddress":"Z"}]"#;

        let result = importer(&api).import(payload, "customers.json").await;

        assert!(matches!(result, Err(ImportError::InvalidFormat(_))));
        assert!(api.created().await.is_empty());
    }

    #[tokio::test]
    async fn submission_failure_does_not_stop_the_batch() {
        let api = Arc::new(RecordingApi::rejecting(&["dup"]));
        let payload = br#"[
            {"id":"c-1","name":"A","surname":"B","username":"dup","email":"a@b.com","shippingAddress":"X"},
            {"id":"c-2","name":"C","surname":"D","username":"cd","email":"c@d.com","shippingAddress":"Y"}
        ]"#;

        let outcome = importer(&api).import(payload, "customers.json").await.expect("import");

        assert_eq!(outcome.success_count(), 1);
        assert_eq!(outcome.failure_count(), 1);
        let rejected = &outcome.rejected()[0];
        assert_eq!(rejected.position, 0);
        assert_eq!(rejected.id, Some(CustomerId("c-1".to_string())));
        assert!(matches!(
            rejected.reason,
            RejectionReason::Submission { ref message } if message.contains("409")
        ));
    }

    #[tokio::test]
    async fn all_records_failing_is_total_failure() {
        let api = Arc::new(RecordingApi::default());
        let payload = br#"[null, {"name":"only a name"}]"#;

        let outcome = importer(&api).import(payload, "customers.json").await.expect("import");

        assert_eq!(outcome.status(), ImportStatus::Failed);
        assert_eq!(outcome.total(), 2);
        assert!(api.created().await.is_empty());
    }

    #[tokio::test]
    async fn generated_ids_differ_between_runs_and_declared_ids_are_kept() {
        let api = Arc::new(RecordingApi::default());
        let importer = importer(&api);
        let payload = br#"[
            {"name":"A","surname":"B","username":"ab","email":"a@b.com","shippingAddress":"X"},
            {"Id":"keep-me","name":"C","surname":"D","username":"cd","email":"c@d.com","shippingAddress":"Y"}
        ]"#;

        importer.import(payload, "first.JSON").await.expect("first import");
        importer.import(payload, "second.json").await.expect("second import");

        let created = api.created().await;
        assert_eq!(created.len(), 4);
        assert!(!created[0].id.as_str().is_empty());
        assert_ne!(created[0].id, created[2].id);
        assert_eq!(created[1].id, CustomerId("keep-me".to_string()));
        assert_eq!(created[3].id, CustomerId("keep-me".to_string()));
    }

    #[tokio::test]
    async fn records_are_submitted_in_file_order() {
        let api = Arc::new(RecordingApi::default());
        let payload = br#"[
            {"name":"1","surname":"s","username":"u1","email":"e","shippingAddress":"a"},
            {"name":"2","surname":"s","username":"u2","email":"e","shippingAddress":"a"},
            {"name":"3","surname":"s","username":"u3","email":"e","shippingAddress":"a"}
        ]"#;

        importer(&api).import(payload, "customers.json").await.expect("import");

        let names: Vec<_> = api.created().await.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["1", "2", "3"]);
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_exchange_extension("customers.json"));
        assert!(has_exchange_extension("CUSTOMERS.JSON"));
        assert!(has_exchange_extension(".Json"));
        assert!(!has_exchange_extension("customers.json.csv"));
        assert!(!has_exchange_extension("json"));
        assert!(!has_exchange_extension("ünïcødé"));
    }
}
