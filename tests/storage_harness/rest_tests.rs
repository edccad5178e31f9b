//! REST integration test macro for order store backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that drive a
//! store through full round-trips:
//! JSON → HTTP request → handler → OrderService → OrderStore → HTTP response → JSON.
//!
//! # Generated Tests
//!
//! - `test_rest_create` — POST 201, defaults applied
//! - `test_rest_create_invalid_json` / `test_rest_create_missing_fields` /
//!   `test_rest_create_unknown_status` — 400 with error codes
//! - `test_rest_get` / `test_rest_get_unknown` / `test_rest_get_garbage_id`
//! - `test_rest_active_orders` / `test_rest_active_empty`
//! - `test_rest_update_status` — 201, priority overwritten
//! - `test_rest_update_status_requires_status`
//! - `test_rest_cancel`
//! - `test_rest_all_orders` / `test_rest_all_empty`
//! - `test_rest_finish_publishes_event`
//! - `test_rest_seed_endpoint`

/// Generate a REST integration test suite for a storage backend.
///
/// `$factory` must produce an `impl OrderStore + 'static`; it is re-evaluated
/// for each test.
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use order_service::core::events::EventBus;
            use order_service::core::notify::EventBusNotifier;
            use order_service::server::ServerBuilder;
            use serde_json::{Value, json};

            async fn make_server_with(bus: EventBus, seed: bool) -> TestServer {
                let store = $factory;
                let router = ServerBuilder::new()
                    .with_store(store)
                    .with_notifier(EventBusNotifier::new(bus, "whatsapp"))
                    .with_seed_endpoint(seed)
                    .build()
                    .unwrap();
                TestServer::new(router)
            }

            async fn make_server() -> TestServer {
                make_server_with(EventBus::new(16), false).await
            }

            async fn create(server: &TestServer, item: &str, status: &str) -> Value {
                let response = server
                    .post("/order")
                    .json(&json!({
                        "menu": [item],
                        "status": status,
                        "source": "PHONE"
                    }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json()
            }

            // ==============================================================
            // Create
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;

                let response = server
                    .post("/order")
                    .json(&json!({
                        "menu": ["Soup", "Bread"],
                        "status": "PENDING",
                        "source": "IN_PERSON"
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                uuid::Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
                assert_eq!(body["menu"], json!(["Soup", "Bread"]));
                assert_eq!(body["status"], "PENDING");
                assert_eq!(body["order_source"], "IN_PERSON");
                assert_eq!(body["order_type"], "NORMAL");
                assert_eq!(body["created_at"], body["updated_at"]);
                assert!(body["priority"].as_u64().unwrap() >= 1);
            }

            #[tokio::test]
            async fn test_rest_create_vip() {
                let server = make_server().await;
                let response = server
                    .post("/order")
                    .json(&json!({
                        "menu": ["Lobster"],
                        "status": "PENDING",
                        "source": "DELIVERY",
                        "type": "VIP"
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                assert_eq!(response.json::<Value>()["order_type"], "VIP");
            }

            #[tokio::test]
            async fn test_rest_create_invalid_json() {
                let server = make_server().await;
                let response = server
                    .post("/order")
                    .text("{\"menu\": [")
                    .content_type("application/json")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_BODY");
                assert!(body["message"].as_str().unwrap().starts_with("error binding order body"));
            }

            #[tokio::test]
            async fn test_rest_create_missing_fields() {
                let server = make_server().await;
                let response = server.post("/order").json(&json!({ "menu": ["Soup"] })).await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                assert_eq!(
                    body["message"],
                    "error validating model: source: required, status: required"
                );
                assert_eq!(body["details"]["fields"][0]["field"], "source");
            }

            #[tokio::test]
            async fn test_rest_create_empty_menu() {
                let server = make_server().await;
                let response = server
                    .post("/order")
                    .json(&json!({ "menu": [], "status": "PENDING", "source": "PHONE" }))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
            }

            #[tokio::test]
            async fn test_rest_create_unknown_status() {
                let server = make_server().await;
                let response = server
                    .post("/order")
                    .json(&json!({ "menu": ["Soup"], "status": "LOST", "source": "PHONE" }))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "INVALID_BODY");
            }

            // ==============================================================
            // Get
            // ==============================================================

            #[tokio::test]
            async fn test_rest_get() {
                let server = make_server().await;
                let created = create(&server, "Soup", "PENDING").await;
                let id = created["id"].as_str().unwrap();

                let response = server.get(&format!("/order/{}", id)).await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>(), created);
            }

            #[tokio::test]
            async fn test_rest_get_unknown() {
                let server = make_server().await;
                let response = server.get(&format!("/order/{}", uuid::Uuid::new_v4())).await;

                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(response.json::<Value>()["code"], "ORDER_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_rest_get_garbage_id() {
                let server = make_server().await;
                let response = server.get("/order/not-a-uuid").await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Lists
            // ==============================================================

            #[tokio::test]
            async fn test_rest_active_orders() {
                let server = make_server().await;
                let first = create(&server, "Soup", "PENDING").await;
                create(&server, "Tea", "IN_PREPARATION").await;
                let third = create(&server, "Bread", "PENDING").await;

                let response = server.get("/order/active").await;
                response.assert_status(StatusCode::OK);
                let body: Vec<Value> = response.json();
                assert_eq!(body.len(), 2);
                assert_eq!(body[0]["id"], first["id"]);
                assert_eq!(body[1]["id"], third["id"]);
            }

            #[tokio::test]
            async fn test_rest_active_empty() {
                let server = make_server().await;
                let response = server.get("/order/active").await;

                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["code"], "NO_ORDERS");
                assert_eq!(body["message"], "there are no active orders");
            }

            #[tokio::test]
            async fn test_rest_all_orders() {
                let server = make_server().await;
                create(&server, "Soup", "PENDING").await;
                create(&server, "Tea", "DELIVERED").await;

                let response = server.get("/order/all").await;
                response.assert_status(StatusCode::OK);
                let body: Vec<Value> = response.json();
                assert_eq!(body.len(), 2);
                assert!(body[0]["priority"].as_u64() <= body[1]["priority"].as_u64());
            }

            #[tokio::test]
            async fn test_rest_all_empty() {
                let server = make_server().await;
                let response = server.get("/order/all").await;

                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(response.json::<Value>()["message"], "orders not found");
            }

            // ==============================================================
            // Update & cancel
            // ==============================================================

            #[tokio::test]
            async fn test_rest_update_status() {
                let server = make_server().await;
                let created = create(&server, "Soup", "PENDING").await;
                let id = created["id"].as_str().unwrap();

                let response = server
                    .put(&format!("/order/{}/status", id))
                    .json(&json!({ "status": "IN_PREPARATION", "priority": 9 }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["status"], "IN_PREPARATION");
                assert_eq!(body["priority"], 9);
                assert_eq!(body["created_at"], created["created_at"]);
            }

            #[tokio::test]
            async fn test_rest_update_status_requires_status() {
                let server = make_server().await;
                let created = create(&server, "Soup", "PENDING").await;
                let id = created["id"].as_str().unwrap();

                let response = server
                    .put(&format!("/order/{}/status", id))
                    .json(&json!({ "priority": 1 }))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(
                    response.json::<Value>()["message"],
                    "error validating model: status: required"
                );
            }

            #[tokio::test]
            async fn test_rest_update_unknown() {
                let server = make_server().await;
                let response = server
                    .put(&format!("/order/{}/status", uuid::Uuid::new_v4()))
                    .json(&json!({ "status": "FINISHED" }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_cancel() {
                let server = make_server().await;
                let created = create(&server, "Soup", "PENDING").await;
                let id = created["id"].as_str().unwrap();

                let response = server.put(&format!("/order/{}/cancel", id)).await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["status"], "CANCELED");
                assert_eq!(body["priority"], created["priority"]);

                server.get("/order/active").await.assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Notifications & seeding
            // ==============================================================

            #[tokio::test]
            async fn test_rest_finish_publishes_event() {
                let bus = EventBus::new(16);
                let mut rx = bus.subscribe();
                let server = make_server_with(bus, false).await;
                let created = create(&server, "Soup", "PENDING").await;
                let id = created["id"].as_str().unwrap();

                server
                    .put(&format!("/order/{}/status", id))
                    .json(&json!({ "status": "IN_PREPARATION" }))
                    .await
                    .assert_status(StatusCode::CREATED);
                assert!(rx.try_recv().is_err());

                server
                    .put(&format!("/order/{}/status", id))
                    .json(&json!({ "status": "FINISHED" }))
                    .await
                    .assert_status(StatusCode::CREATED);

                let envelope = rx.try_recv().unwrap();
                assert_eq!(envelope.event.order_id().to_string(), id);
                assert_eq!(envelope.channel, "whatsapp");
                assert!(rx.try_recv().is_err());
            }

            #[tokio::test]
            async fn test_rest_seed_endpoint() {
                let server = make_server_with(EventBus::new(16), true).await;

                let response = server.post("/order/test").await;
                response.assert_status(StatusCode::CREATED);
                assert_eq!(response.json::<Value>()["created"], 100);

                let all: Vec<Value> = server.get("/order/all").await.json();
                assert_eq!(all.len(), 100);
            }

            #[tokio::test]
            async fn test_rest_seed_endpoint_disabled_by_default() {
                let server = make_server().await;
                let response = server.post("/order/test").await;
                response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
            }
        }
    };
}
