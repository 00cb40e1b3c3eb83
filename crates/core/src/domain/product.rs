use serde::{Deserialize, Serialize};

/// One selectable product, carried verbatim from the product list webhook.
///
/// The automation service owns the shape; this side only displays the fields
/// and passes `name`/`code` back on follow-up calls. `row_number` is a list
/// key, nothing more.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "Products")]
    pub name: String,
    #[serde(rename = "Product Code")]
    pub code: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "row_number", default)]
    pub row_number: i64,
}
