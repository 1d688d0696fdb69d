use async_trait::async_trait;

use crate::domain::customer::CustomerRecord;
use crate::errors::ApiError;

/// Record-access operations the exchange pipeline consumes from the remote data API.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, ApiError>;

    async fn create_customer(&self, customer: CustomerRecord) -> Result<CustomerRecord, ApiError>;
}
