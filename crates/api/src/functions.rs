//! HTTP client for the storefront functions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Response, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use storefront_core::config::ApiConfig;
use storefront_core::{ApiError, CustomerApi, CustomerId, CustomerRecord};
use tracing::{debug, error};

const FUNCTION_KEY_HEADER: &str = "x-functions-key";
const CUSTOMERS_PATH: &str = "customers";
const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct FunctionsApiClient {
    http: Client,
    base_url: Url,
}

impl FunctionsApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(config.base_url.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(function_key) = &config.function_key {
            let mut value = HeaderValue::from_str(function_key.expose_secret()).map_err(|_| {
                ApiError::Transport("function key is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(FUNCTION_KEY_HEADER), value);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .default_headers(headers)
            .build()
            .map_err(|error| ApiError::Transport(error.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))
    }
}

#[async_trait]
impl CustomerApi for FunctionsApiClient {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, ApiError> {
        let url = self.endpoint(CUSTOMERS_PATH)?;
        debug!(event_name = "api.customers.list", url = %url, "listing customers");

        let response = self.http.get(url).send().await.map_err(transport_error)?;
        let body = success_body(response).await?;

        let customers: Option<Vec<CustomerDto>> =
            serde_json::from_slice(&body).map_err(|error| ApiError::Decode(error.to_string()))?;
        Ok(customers.unwrap_or_default().into_iter().map(CustomerRecord::from).collect())
    }

    async fn create_customer(&self, customer: CustomerRecord) -> Result<CustomerRecord, ApiError> {
        let url = self.endpoint(CUSTOMERS_PATH)?;
        debug!(
            event_name = "api.customers.create",
            url = %url,
            customer_id = %customer.id,
            "creating customer"
        );

        let response = self
            .http
            .post(url)
            .json(&CustomerDto::from(&customer))
            .send()
            .await
            .map_err(transport_error)?;
        let body = success_body(response).await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(customer);
        }
        let created: CustomerDto =
            serde_json::from_slice(&body).map_err(|error| ApiError::Decode(error.to_string()))?;
        Ok(created.into())
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    error!(event_name = "api.transport.error", error = %error, "customer api request failed");
    ApiError::Transport(error.to_string())
}

async fn success_body(response: Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    Ok(bytes.to_vec())
}

/// Customer as serialized by the functions API. PascalCase payloads are accepted too.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerDto {
    #[serde(default, alias = "Id")]
    id: Option<String>,
    #[serde(default, alias = "Name")]
    name: Option<String>,
    #[serde(default, alias = "Surname")]
    surname: Option<String>,
    #[serde(default, alias = "Username")]
    username: Option<String>,
    #[serde(default, alias = "Email")]
    email: Option<String>,
    #[serde(default, alias = "ShippingAddress")]
    shipping_address: Option<String>,
}

impl From<&CustomerRecord> for CustomerDto {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            id: Some(record.id.0.clone()),
            name: Some(record.name.clone()),
            surname: Some(record.surname.clone()),
            username: Some(record.username.clone()),
            email: Some(record.email.clone()),
            shipping_address: Some(record.shipping_address.clone()),
        }
    }
}

impl From<CustomerDto> for CustomerRecord {
    fn from(dto: CustomerDto) -> Self {
        Self {
            id: CustomerId(dto.id.unwrap_or_default()),
            name: dto.name.unwrap_or_default(),
            surname: dto.surname.unwrap_or_default(),
            username: dto.username.unwrap_or_default(),
            email: dto.email.unwrap_or_default(),
            shipping_address: dto.shipping_address.unwrap_or_default(),
        }
    }
}
