use serde::Serialize;

use crate::domain::customer::{CustomerField, CustomerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    MissingFields { fields: Vec<CustomerField> },
    Submission { message: String },
}

/// A parsed record that was not persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// Zero-based index of the element in the imported array.
    pub position: usize,
    pub id: Option<CustomerId>,
    pub reason: RejectionReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportStatus {
    NoData,
    Succeeded,
    PartiallySucceeded { skipped: usize },
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::Succeeded => "succeeded",
            Self::PartiallySucceeded { .. } => "partially_succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Aggregate result of one import run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportOutcome {
    success_count: usize,
    rejected: Vec<RejectedRecord>,
}

impl ImportOutcome {
    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn total(&self) -> usize {
        self.success_count + self.rejected.len()
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn status(&self) -> ImportStatus {
        match (self.success_count, self.failure_count()) {
            (0, 0) => ImportStatus::NoData,
            (_, 0) => ImportStatus::Succeeded,
            (0, _) => ImportStatus::Failed,
            (_, skipped) => ImportStatus::PartiallySucceeded { skipped },
        }
    }
}

/// Running counters for an import; consumed into an [`ImportOutcome`].
#[derive(Debug, Default)]
pub(crate) struct ImportTally {
    success_count: usize,
    rejected: Vec<RejectedRecord>,
}

impl ImportTally {
    pub(crate) fn accept(mut self) -> Self {
        self.success_count += 1;
        self
    }

    pub(crate) fn reject(
        mut self,
        position: usize,
        id: Option<CustomerId>,
        reason: RejectionReason,
    ) -> Self {
        self.rejected.push(RejectedRecord { position, id, reason });
        self
    }

    pub(crate) fn finish(self) -> ImportOutcome {
        ImportOutcome { success_count: self.success_count, rejected: self.rejected }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::customer::CustomerField;

    use super::{ImportStatus, ImportTally, RejectionReason};

    fn missing_name() -> RejectionReason {
        RejectionReason::MissingFields { fields: vec![CustomerField::Name] }
    }

    #[test]
    fn empty_tally_reports_no_data() {
        let outcome = ImportTally::default().finish();

        assert_eq!(outcome.status(), ImportStatus::NoData);
        assert_eq!(outcome.total(), 0);
    }

    #[test]
    fn mixed_tally_reports_skipped_count() {
        let outcome = ImportTally::default()
            .accept()
            .reject(1, None, missing_name())
            .accept()
            .reject(3, None, RejectionReason::Submission { message: "409".to_string() })
            .finish();

        assert_eq!(outcome.success_count(), 2);
        assert_eq!(outcome.failure_count(), 2);
        assert_eq!(outcome.status(), ImportStatus::PartiallySucceeded { skipped: 2 });
        assert_eq!(outcome.rejected()[1].position, 3);
    }

    #[test]
    fn all_rejected_reports_failed() {
        let outcome = ImportTally::default().reject(0, None, missing_name()).finish();

        assert_eq!(outcome.status(), ImportStatus::Failed);
        assert_eq!(outcome.status().as_str(), "failed");
    }

    #[test]
    fn rejection_reason_serializes_with_kind_tag() {
        let value = serde_json::to_value(RejectionReason::MissingFields {
            fields: vec![CustomerField::ShippingAddress],
        })
        .expect("serializes");

        assert_eq!(value["kind"], "missing_fields");
        assert_eq!(value["fields"][0], "shippingAddress");
    }
}
