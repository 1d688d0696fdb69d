use std::sync::Arc;

use axum::Router;
use storefront_api::FunctionsApiClient;
use storefront_core::config::{AppConfig, ConfigError, LoadOptions};
use storefront_core::{ApiError, CustomerApi};
use thiserror::Error;
use tracing::info;

use crate::{customers, health};

pub struct Application {
    pub config: AppConfig,
    pub api: Arc<dyn CustomerApi>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("customer api client could not be built: {0}")]
    ApiClient(#[source] ApiError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        api_base_url = %config.api.base_url,
        "starting application bootstrap"
    );

    let client = FunctionsApiClient::new(&config.api).map_err(BootstrapError::ApiClient)?;
    info!(
        event_name = "system.bootstrap.api_client_ready",
        correlation_id = "bootstrap",
        base_url = %client.base_url(),
        function_key_configured = config.api.function_key.is_some(),
        "customer api client configured"
    );

    Ok(Application { config, api: Arc::new(client) })
}

impl Application {
    pub fn router(&self) -> Router {
        customers::router(self.api.clone(), self.config.server.max_upload_bytes)
            .merge(health::router(self.api.clone()))
    }
}
