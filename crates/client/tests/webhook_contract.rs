//! Contract tests against a mocked automation service.
//!
//! These pin the exact wire shapes of the three webhooks and drive the full
//! login -> list -> form -> quotation scenario end to end without a network.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quotedesk_client::WebhookClient;
use quotedesk_core::auth::{Credential, FixedCredentialVerifier};
use quotedesk_core::config::ServiceConfig;
use quotedesk_core::errors::ServiceError;
use quotedesk_core::service::{CalculateRequest, Endpoint, FieldsRequest, QuoteService};
use quotedesk_core::workflow::controller::{Pacing, WorkflowController};
use quotedesk_core::workflow::session::{LoginOutcome, ViewEffect, CALCULATION_FAILED};

fn client_for(server: &MockServer) -> WebhookClient {
    WebhookClient::new(&ServiceConfig { base_url: server.uri(), timeout_secs: 5 })
        .expect("client builds")
}

async fn mount_products(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/webhook/products/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn product_list_deserializes_webhook_rows() {
    let server = MockServer::start().await;
    mount_products(
        &server,
        json!({
            "data": [
                {
                    "row_number": 1,
                    "Products": "Term Shield",
                    "Product Code": "TS-01",
                    "Description": "Term life cover"
                },
                {
                    "row_number": 2,
                    "Products": "Health Plus",
                    "Product Code": "HP-02",
                    "Description": "Health cover"
                }
            ]
        }),
    )
    .await;

    let products = client_for(&server).list_products().await.expect("list");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Term Shield");
    assert_eq!(products[0].code, "TS-01");
    assert_eq!(products[1].row_number, 2);
}

#[tokio::test]
async fn missing_data_key_means_empty_product_list() {
    let server = MockServer::start().await;
    mount_products(&server, json!({})).await;

    let products = client_for(&server).list_products().await.expect("list");
    assert!(products.is_empty());
}

#[tokio::test]
async fn field_resolution_posts_product_and_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/product/fields"))
        .and(body_json(json!({"product": "Term Shield", "productCode": "TS-01"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"field": "Qty", "value": []},
                {"field": "Tier", "value": ["Gold", "Silver"]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = client_for(&server)
        .resolve_fields(FieldsRequest { product: "Term Shield", product_code: "TS-01" })
        .await
        .expect("fields");

    assert_eq!(fields.len(), 2);
    assert!(fields[0].options.is_empty());
    assert_eq!(fields[1].options, vec!["Gold", "Silver"]);
}

#[tokio::test]
async fn calculation_posts_the_coerced_values_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/quote/calculate/price"))
        .and(body_json(json!({
            "product": "Term Shield",
            "productCode": "TS-01",
            "values": {"Qty": "10", "Tier": 0}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Net Total": 42.0, "GST": 6.3})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut values = serde_json::Map::new();
    values.insert("Qty".to_string(), json!("10"));
    values.insert("Tier".to_string(), json!(0));

    let quotation = client_for(&server)
        .calculate_price(CalculateRequest {
            product: "Term Shield",
            product_code: "TS-01",
            values: &values,
        })
        .await
        .expect("quotation");

    assert_eq!(quotation.net_total(), Some(42.0));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/quote/calculate/price"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let values = serde_json::Map::new();
    let error = client_for(&server)
        .calculate_price(CalculateRequest { product: "P", product_code: "C", values: &values })
        .await
        .expect_err("500 must fail");

    assert_eq!(
        error,
        ServiceError::UnexpectedStatus { endpoint: Endpoint::CalculatePrice, status: 500 }
    );
}

#[tokio::test]
async fn undecodable_body_is_an_invalid_body_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhook/products/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server).list_products().await.expect_err("html must fail");
    assert!(matches!(error, ServiceError::InvalidBody { endpoint: Endpoint::ProductList, .. }));
}

/// The full portal scenario against mocked webhooks: login, pick a product,
/// fill the form, read the quotation.
#[tokio::test]
async fn end_to_end_quotation_flow() {
    let server = MockServer::start().await;
    mount_products(
        &server,
        json!({
            "data": [
                {"row_number": 1, "Products": "Term Shield", "Product Code": "TS-01",
                 "Description": "Term life cover"},
                {"row_number": 2, "Products": "Health Plus", "Product Code": "HP-02",
                 "Description": "Health cover"}
            ]
        }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/webhook/product/fields"))
        .and(body_json(json!({"product": "Term Shield", "productCode": "TS-01"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"field": "Qty", "value": []},
                {"field": "Tier", "value": ["Gold", "Silver"]}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook/quote/calculate/price"))
        .and(body_json(json!({
            "product": "Term Shield",
            "productCode": "TS-01",
            "values": {"Qty": "10", "Tier": "Gold"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Net Total": 1234.5,
            "Base Premium": 1000,
            "GST": 234.5,
            "ID": 99,
            "row_number": 4,
            "Fields": ["Qty", "Tier"],
            "values": {"Qty": "10", "Tier": "Gold"}
        })))
        .mount(&server)
        .await;

    let verifier = Arc::new(FixedCredentialVerifier::new(vec![
        Credential::new("raksha@hrlabs.in", "password123"),
        Credential::new("vijay@hrlabs.in", "password123"),
    ]));
    let service = Arc::new(client_for(&server));
    let mut controller = WorkflowController::new(service, verifier, Pacing::none());

    controller.start().await.expect("startup");
    let outcome = controller
        .login("raksha@hrlabs.in", "password123")
        .await
        .expect("login");
    assert_eq!(outcome, LoginOutcome::Authenticated);
    assert_eq!(controller.session().products().len(), 2);

    let chosen = controller.session().products()[0].clone();
    controller.select_product(chosen).await.expect("select");
    assert_eq!(controller.session().fields().len(), 2);

    controller.edit_field("Qty", "10").expect("edit qty");
    controller.edit_field("Tier", "Gold").expect("edit tier");

    let effects = controller.calculate().await.expect("calculate");
    assert_eq!(effects, vec![ViewEffect::RevealQuotation]);

    let quotation = controller.session().quotation().expect("quotation");
    assert_eq!(quotation.formatted_net_total().as_deref(), Some("\u{20b9}1234.50"));

    let detail_lines = quotation.detail_lines();
    let keys: Vec<&str> = detail_lines.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, vec!["Base Premium", "GST"]);
}

/// A failed calculation must surface the generic message, and a retry must
/// recover.
#[tokio::test]
async fn calculation_failure_then_recovery() {
    let server = MockServer::start().await;
    mount_products(
        &server,
        json!({"data": [
            {"row_number": 1, "Products": "Term Shield", "Product Code": "TS-01",
             "Description": ""}
        ]}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/webhook/product/fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"field": "Qty", "value": []}]
        })))
        .mount(&server)
        .await;

    // First attempt: the pricing endpoint is down.
    Mock::given(method("POST"))
        .and(path("/webhook/quote/calculate/price"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook/quote/calculate/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Net Total": 10.0})))
        .mount(&server)
        .await;

    let verifier = Arc::new(FixedCredentialVerifier::new(vec![Credential::new(
        "raksha@hrlabs.in",
        "password123",
    )]));
    let service = Arc::new(client_for(&server));
    let mut controller = WorkflowController::new(service, verifier, Pacing::none());

    controller.start().await.expect("startup");
    controller.login("raksha@hrlabs.in", "password123").await.expect("login");
    let chosen = controller.session().products()[0].clone();
    controller.select_product(chosen).await.expect("select");

    let effects = controller.calculate().await.expect("first calculation");
    assert!(effects.is_empty());
    assert!(controller.session().quotation().is_none());
    assert_eq!(controller.session().calculation_error(), Some(CALCULATION_FAILED));

    let effects = controller.calculate().await.expect("second calculation");
    assert_eq!(effects, vec![ViewEffect::RevealQuotation]);
    assert!(controller.session().calculation_error().is_none());
    assert_eq!(controller.session().quotation().and_then(|q| q.net_total()), Some(10.0));
}
