use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use storefront_core::{ApiError, CustomerApi, CustomerRecord};

/// Process-local customer store speaking the same contract as the remote API.
///
/// Creation rejects duplicate ids, as the remote store does for its row keys.
#[derive(Default)]
pub struct InMemoryCustomerApi {
    customers: RwLock<Vec<CustomerRecord>>,
    rejected_usernames: HashSet<String>,
    unavailable: bool,
}

impl InMemoryCustomerApi {
    pub fn with_customers(customers: Vec<CustomerRecord>) -> Self {
        Self { customers: RwLock::new(customers), ..Self::default() }
    }

    /// Every creation whose username is listed fails as a remote validation error would.
    pub fn rejecting_usernames<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected_usernames.extend(usernames.into_iter().map(Into::into));
        self
    }

    /// Every call fails as if the remote API could not be reached.
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    pub async fn snapshot(&self) -> Vec<CustomerRecord> {
        self.customers.read().await.clone()
    }

    fn ensure_available(&self) -> Result<(), ApiError> {
        if self.unavailable {
            return Err(ApiError::Transport("customer store is unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerApi for InMemoryCustomerApi {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, ApiError> {
        self.ensure_available()?;
        Ok(self.customers.read().await.clone())
    }

    async fn create_customer(&self, customer: CustomerRecord) -> Result<CustomerRecord, ApiError> {
        self.ensure_available()?;

        if self.rejected_usernames.contains(&customer.username) {
            return Err(ApiError::Rejected(format!(
                "username `{}` is not accepted",
                customer.username
            )));
        }

        let mut customers = self.customers.write().await;
        if customers.iter().any(|existing| existing.id == customer.id) {
            return Err(ApiError::Rejected(format!("customer `{}` already exists", customer.id)));
        }
        customers.push(customer.clone());
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::{ApiError, CustomerApi, CustomerId, CustomerRecord};

    use super::InMemoryCustomerApi;

    fn customer(id: &str, username: &str) -> CustomerRecord {
        CustomerRecord {
            id: CustomerId(id.to_string()),
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            shipping_address: "London".to_string(),
        }
    }

    #[tokio::test]
    async fn created_customers_are_listed_in_insertion_order() {
        let api = InMemoryCustomerApi::default();

        api.create_customer(customer("c-1", "ada")).await.expect("create first");
        api.create_customer(customer("c-2", "grace")).await.expect("create second");

        let listed = api.list_customers().await.expect("list");
        let ids: Vec<_> = listed.into_iter().map(|customer| customer.id).collect();
        assert_eq!(ids, vec![CustomerId("c-1".to_string()), CustomerId("c-2".to_string())]);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let api = InMemoryCustomerApi::with_customers(vec![customer("c-1", "ada")]);

        let result = api.create_customer(customer("c-1", "someone-else")).await;

        assert!(matches!(result, Err(ApiError::Rejected(_))));
        assert_eq!(api.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn configured_usernames_are_rejected() {
        let api = InMemoryCustomerApi::default().rejecting_usernames(["mallory"]);

        let result = api.create_customer(customer("c-1", "mallory")).await;

        assert!(matches!(
            result,
            Err(ApiError::Rejected(ref message)) if message.contains("mallory")
        ));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let api = InMemoryCustomerApi::unavailable();

        assert!(matches!(api.list_customers().await, Err(ApiError::Transport(_))));
        assert!(matches!(
            api.create_customer(customer("c-1", "ada")).await,
            Err(ApiError::Transport(_))
        ));
    }
}
