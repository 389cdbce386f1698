//! API client against the in-process mock backend.

#![allow(clippy::unwrap_used)]

use catalogix_core::{NewProduct, NewUser, ProductId, UserId};
use catalogix_frontend::api::{ApiClient, ApiEndpoints, ApiError, CatalogBackend};
use catalogix_integration_tests::MockBackend;
use reqwest::{Method, StatusCode};
use serde_json::json;

async fn spawn(backend: &MockBackend) -> ApiClient {
    let url = backend.spawn().await.unwrap();
    ApiClient::new(ApiEndpoints::same_origin(url))
}

// =============================================================================
// Identity header
// =============================================================================

#[tokio::test]
async fn test_product_requests_carry_identity_header() {
    let backend = MockBackend::new();
    backend.add_product(1, json!({"id": 9, "name": "Pen", "price": 10}));
    let client = spawn(&backend).await;

    let products = client
        .list_products(Some(UserId::new(1)))
        .await
        .unwrap()
        .into_items();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, ProductId::new(9));
    assert_eq!(products[0].price.to_string(), "10");

    let requests = backend.product_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].user_id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_missing_identity_sends_nothing() {
    let backend = MockBackend::new();
    let client = spawn(&backend).await;
    let product = NewProduct::parse("Pen", "10", None).unwrap();

    assert!(matches!(
        client.list_products(None).await,
        Err(ApiError::IdentityRequired)
    ));
    assert!(matches!(
        client.create_product(&product, None).await,
        Err(ApiError::IdentityRequired)
    ));
    assert!(matches!(
        client.delete_product(ProductId::new(9), None).await,
        Err(ApiError::IdentityRequired)
    ));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_products_are_scoped_per_user() {
    let backend = MockBackend::new();
    backend.add_product(1, json!({"id": 1, "name": "Pen", "price": 10}));
    backend.add_product(2, json!({"id": 2, "name": "Ink", "price": 4.5}));
    let client = spawn(&backend).await;

    let bobs = client
        .list_products(Some(UserId::new(2)))
        .await
        .unwrap()
        .into_items();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].name, "Ink");
    assert_eq!(bobs[0].price.display_with("₹"), "₹4.5");
}

// =============================================================================
// Body normalization
// =============================================================================

#[tokio::test]
async fn test_non_array_product_body_is_empty() {
    let backend = MockBackend::new();
    backend.set_products_body(json!({"content": [], "page": 0}));
    let client = spawn(&backend).await;

    let body = client.list_products(Some(UserId::new(1))).await.unwrap();
    assert!(!body.is_list());
    assert!(body.into_items().is_empty());
}

#[tokio::test]
async fn test_user_list_decodes_optional_email() {
    let backend = MockBackend::new();
    backend.add_user(1, "Alice");
    let client = spawn(&backend).await;

    let new_user = NewUser::parse("Bob", "bob@example.com", "Password1".to_string()).unwrap();
    client.register_user(&new_user).await.unwrap();

    let users = client.list_users().await.unwrap().into_items();
    assert_eq!(users.len(), 2);
    assert!(users[0].email.is_none());
    assert_eq!(
        users[1].email.as_ref().map(|e| e.as_str()),
        Some("bob@example.com")
    );
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn test_create_then_delete_product() {
    let backend = MockBackend::new();
    let client = spawn(&backend).await;
    let alice = Some(UserId::new(1));

    let product = NewProduct::parse("Notebook", "12.50", Some("A5")).unwrap();
    let created = client.create_product(&product, alice).await.unwrap();
    assert_eq!(created.name, "Notebook");
    assert_eq!(created.description.as_deref(), Some("A5"));
    assert_eq!(backend.products_of(1).len(), 1);

    let ack = client.delete_product(created.id, alice).await.unwrap();
    assert_eq!(ack.status, StatusCode::NO_CONTENT);
    assert!(backend.products_of(1).is_empty());

    let methods: Vec<Method> = backend
        .product_requests()
        .into_iter()
        .map(|r| r.method)
        .collect();
    assert_eq!(methods, vec![Method::POST, Method::DELETE]);
}

#[tokio::test]
async fn test_register_and_delete_user() {
    let backend = MockBackend::new();
    let client = spawn(&backend).await;

    let new_user = NewUser::parse("Alice", "alice@example.com", "Password1".to_string()).unwrap();
    let created = client.register_user(&new_user).await.unwrap();
    assert_eq!(created.name, "Alice");

    client.delete_user(created.id).await.unwrap();
    assert!(client.list_users().await.unwrap().into_items().is_empty());
}

// =============================================================================
// Error envelope
// =============================================================================

#[tokio::test]
async fn test_conflict_message_from_envelope() {
    let backend = MockBackend::new();
    let client = spawn(&backend).await;
    let new_user = NewUser::parse("Alice", "alice@example.com", "Password1".to_string()).unwrap();

    client.register_user(&new_user).await.unwrap();
    let err = client.register_user(&new_user).await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(message.as_deref(), Some("Email already registered"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_errors_are_flattened() {
    let backend = MockBackend::new();
    let client = spawn(&backend).await;
    // Bypass client-side validation to reach the backend's.
    let product = NewProduct {
        name: " ".to_string(),
        price: "10".parse().unwrap(),
        description: None,
    };

    let err = client
        .create_product(&product, Some(UserId::new(1)))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Backend returned 400 Bad Request: Validation failed (name: Product name is required)"
    );
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let backend = MockBackend::new();
    let client = spawn(&backend).await;

    let err = client
        .delete_product(ProductId::new(404), Some(UserId::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            ..
        }
    ));
}

// =============================================================================
// Endpoints
// =============================================================================

#[tokio::test]
async fn test_split_service_endpoints() {
    let users = MockBackend::new();
    let products = MockBackend::new();
    users.add_user(1, "Alice");
    let client = ApiClient::new(ApiEndpoints {
        users: users.spawn().await.unwrap(),
        products: products.spawn().await.unwrap(),
    });

    client.list_users().await.unwrap();
    client.list_products(Some(UserId::new(1))).await.unwrap();

    assert_eq!(users.requests().len(), 1);
    assert!(users.product_requests().is_empty());
    assert_eq!(products.product_requests().len(), 1);
}

#[tokio::test]
async fn test_ping() {
    let backend = MockBackend::new();
    let client = spawn(&backend).await;
    client.ping().await.unwrap();
}
