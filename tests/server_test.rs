//! HTTP surface tests driven through the router with tower's `oneshot`

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pseudo712::config::DomainConfig;
use pseudo712::domain::abi::{AbiFetchError, AbiResolver};
use pseudo712::domain::eip712::TypedDataDocument;
use pseudo712::infrastructure::ethereum::ChainIdSource;
use pseudo712::server::{router, ABI_FETCH_FAILED, PROCESSING_FAILED};
use pseudo712::App;

const TRANSFER_CALLDATA: &str = "0xa9059cbb000000000000000000000000123456789012345678901234567890123456789000000000000000000000000000000000000000000000000000000000000003e8";

struct RateLimited;

#[async_trait]
impl AbiResolver for RateLimited {
    fn name(&self) -> &'static str {
        "rate-limited"
    }

    async fn fetch_abi(&self, _chain_id: u64, _address: &str) -> Result<Value, AbiFetchError> {
        Err(AbiFetchError::RateLimited("Max rate limit reached".to_string()))
    }
}

fn erc20_abi() -> Value {
    json!([{
        "type": "function",
        "name": "transfer",
        "inputs": [
            { "name": "to", "type": "address" },
            { "name": "amount", "type": "uint256" }
        ]
    }])
}

fn test_router() -> axum::Router {
    let app = App::new(
        Arc::new(RateLimited),
        ChainIdSource::Fixed(1),
        DomainConfig::default(),
    );
    router(Arc::new(app))
}

async fn post(body: Value) -> (StatusCode, Value) {
    post_raw(body.to_string(), Some("application/json")).await
}

async fn post_raw(body: impl Into<String>, content_type: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/api/verifyTransaction");
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }
    let response = test_router()
        .oneshot(request.body(Body::from(body.into())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_success_returns_serialized_document() {
    let (status, body) = post(json!({
        "contractAddress": "0x000000000000000000000000000000000000dEaD",
        "transactionData": TRANSFER_CALLDATA,
        "from": "0x00000000000000000000000000000000000000b0",
        "to": "0x000000000000000000000000000000000000dEaD",
        "value": "0",
        "abi": erc20_abi()
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("error").is_none());

    let message = body["clearSignMessage"].as_str().unwrap();
    let doc: TypedDataDocument = serde_json::from_str(message).unwrap();
    assert_eq!(doc.primary_type, "transfer");
    assert_eq!(doc.message["amount"], json!("1000"));
    assert!(doc.signing_hash().is_ok());
}

#[tokio::test]
async fn test_abi_as_json_string() {
    let (status, body) = post(json!({
        "contractAddress": "0x000000000000000000000000000000000000dEaD",
        "transactionData": TRANSFER_CALLDATA,
        "abi": erc20_abi().to_string()
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["clearSignMessage"].is_string());
}

#[tokio::test]
async fn test_missing_fields_is_bad_request() {
    let (status, body) = post(json!({ "from": "0x01", "to": "0x02" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required fields: contractAddress, transactionData."
    );
    assert!(body.get("clearSignMessage").is_none());
}

#[tokio::test]
async fn test_unreadable_bodies_get_json_error() {
    let cases = [
        post_raw("{not json", Some("application/json")).await,
        post_raw("{}", None).await,
        post_raw(r#"{"chainId": "one"}"#, Some("application/json")).await,
    ];

    for (status, body) in cases {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
        assert!(body.get("clearSignMessage").is_none());
    }
}

#[tokio::test]
async fn test_abi_fetch_failure() {
    let (status, body) = post(json!({
        "contractAddress": "0x000000000000000000000000000000000000dEaD",
        "transactionData": TRANSFER_CALLDATA
    }))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": ABI_FETCH_FAILED }));
}

#[tokio::test]
async fn test_unknown_selector() {
    let (status, body) = post(json!({
        "contractAddress": "0x000000000000000000000000000000000000dEaD",
        "transactionData": "0xdeadbeef",
        "abi": erc20_abi()
    }))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": PROCESSING_FAILED }));
}

#[tokio::test]
async fn test_health() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
