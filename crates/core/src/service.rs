//! Contract with the remote automation service.
//!
//! All business logic (field definitions, pricing rules) lives behind three
//! webhook endpoints; this module pins their wire shapes and exposes the
//! service as a trait so the workflow can be driven against fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::field::FieldDescriptor;
use crate::domain::product::Product;
use crate::domain::quotation::Quotation;
use crate::errors::ServiceError;

/// The three webhook endpoints, by path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    ProductList,
    ProductFields,
    CalculatePrice,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::ProductList => "/webhook/products/list",
            Self::ProductFields => "/webhook/product/fields",
            Self::CalculatePrice => "/webhook/quote/calculate/price",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// `GET /webhook/products/list` envelope. A missing `data` key means an
/// empty collection, not an error.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub data: Vec<Product>,
}

/// `POST /webhook/product/fields` envelope.
#[derive(Debug, Default, Deserialize)]
pub struct FieldListResponse {
    #[serde(default)]
    pub data: Vec<FieldDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct FieldsRequest<'a> {
    pub product: &'a str,
    #[serde(rename = "productCode")]
    pub product_code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CalculateRequest<'a> {
    pub product: &'a str,
    #[serde(rename = "productCode")]
    pub product_code: &'a str,
    pub values: &'a Map<String, Value>,
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ServiceError>;

    async fn resolve_fields(
        &self,
        request: FieldsRequest<'_>,
    ) -> Result<Vec<FieldDescriptor>, ServiceError>;

    async fn calculate_price(
        &self,
        request: CalculateRequest<'_>,
    ) -> Result<Quotation, ServiceError>;
}
