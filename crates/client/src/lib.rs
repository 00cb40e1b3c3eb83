//! HTTP implementation of the automation-service contract.
//!
//! One `reqwest` client, three webhook calls. Transport failures, non-2xx
//! statuses, and undecodable bodies are mapped onto `ServiceError` variants;
//! the workflow layer decides which of those reach the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use quotedesk_core::config::ServiceConfig;
use quotedesk_core::domain::field::FieldDescriptor;
use quotedesk_core::domain::product::Product;
use quotedesk_core::domain::quotation::Quotation;
use quotedesk_core::errors::ServiceError;
use quotedesk_core::service::{
    CalculateRequest, Endpoint, FieldListResponse, FieldsRequest, ProductListResponse,
    QuoteService,
};

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("could not build http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the three quotation webhooks.
#[derive(Clone, Debug)]
pub struct WebhookClient {
    base_url: String,
    client: Client,
}

impl WebhookClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { base_url: config.base_url.trim_end_matches('/').to_string(), client })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: Endpoint,
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UnexpectedStatus { endpoint, status: status.as_u16() });
        }
        let body = response
            .text()
            .await
            .map_err(|error| transport(endpoint, &error))?;
        serde_json::from_str(&body).map_err(|error| ServiceError::InvalidBody {
            endpoint,
            detail: error.to_string(),
        })
    }
}

fn transport(endpoint: Endpoint, error: &reqwest::Error) -> ServiceError {
    ServiceError::Transport { endpoint, detail: error.to_string() }
}

#[async_trait]
impl QuoteService for WebhookClient {
    async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        let endpoint = Endpoint::ProductList;
        debug!(%endpoint, "fetching product list");
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|error| transport(endpoint, &error))?;
        let body: ProductListResponse = Self::decode(endpoint, response).await?;
        Ok(body.data)
    }

    async fn resolve_fields(
        &self,
        request: FieldsRequest<'_>,
    ) -> Result<Vec<FieldDescriptor>, ServiceError> {
        let endpoint = Endpoint::ProductFields;
        debug!(%endpoint, product = request.product, "resolving fields");
        let response = self
            .client
            .post(self.url(endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|error| transport(endpoint, &error))?;
        let body: FieldListResponse = Self::decode(endpoint, response).await?;
        Ok(body.data)
    }

    async fn calculate_price(
        &self,
        request: CalculateRequest<'_>,
    ) -> Result<Quotation, ServiceError> {
        let endpoint = Endpoint::CalculatePrice;
        debug!(%endpoint, product = request.product, "requesting price calculation");
        let response = self
            .client
            .post(self.url(endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|error| transport(endpoint, &error))?;
        Self::decode(endpoint, response).await
    }
}
