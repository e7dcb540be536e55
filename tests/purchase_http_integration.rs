//! Integration tests for the purchase flow over HTTP.
//!
//! Drives the full axum router against the in-memory store, the mock gateway
//! and the mock directory:
//! 1. Initiate -> verify -> lookup happy path
//! 2. Signature mismatch, duplicate account and repeated callbacks
//! 3. Two pending purchases racing for the same email
//! 4. A transaction that aborts between its two writes

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use wecloud_storefront::adapters::google::MockDirectoryProvisioner;
use wecloud_storefront::adapters::http::storefront::{storefront_router, StorefrontAppState};
use wecloud_storefront::adapters::memory::InMemoryStorefrontStore;
use wecloud_storefront::adapters::razorpay::MockPaymentGateway;
use wecloud_storefront::domain::storefront::{
    HashingCost, PasswordHasher, PaymentSignatureVerifier, PaymentStatus, PlanCatalog,
};
use wecloud_storefront::ports::DirectoryError;

const GATEWAY_SECRET: &str = "integration-test-secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    app: Router,
    store: InMemoryStorefrontStore,
    gateway: Arc<MockPaymentGateway>,
    directory: MockDirectoryProvisioner,
    verifier: PaymentSignatureVerifier,
}

impl Harness {
    fn new() -> Self {
        let store = InMemoryStorefrontStore::new();
        let gateway = Arc::new(MockPaymentGateway::new());
        let directory = MockDirectoryProvisioner::new();
        let verifier = PaymentSignatureVerifier::new(GATEWAY_SECRET);

        let state = StorefrontAppState {
            catalog: Arc::new(PlanCatalog::standard().clone()),
            payment_repository: Arc::new(store.clone()),
            account_repository: Arc::new(store.clone()),
            completion_writer: Arc::new(store.clone()),
            payment_gateway: gateway.clone(),
            directory: Arc::new(directory.clone()),
            signature_verifier: verifier.clone(),
            password_hasher: PasswordHasher::new(HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            }),
            gateway_key_id: "rzp_test_integration".to_string(),
        };

        Self {
            app: storefront_router().with_state(state),
            store,
            gateway,
            directory,
            verifier,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }

    async fn initiate(&self, plan: &str, email: &str) -> (StatusCode, Value) {
        self.post(
            "/api/purchases",
            json!({
                "plan_id": plan,
                "email": email,
                "first_name": "Alice",
                "last_name": "Liddell",
            }),
        )
        .await
    }

    /// Posts a correctly signed completion callback.
    async fn verify(&self, gateway_order_id: &str, payment_id: &str) -> (StatusCode, Value) {
        let signature = self.verifier.expected_signature(gateway_order_id, payment_id);
        self.verify_with_signature(gateway_order_id, payment_id, &signature)
            .await
    }

    async fn verify_with_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/purchases/verify",
            json!({
                "razorpay_order_id": gateway_order_id,
                "razorpay_payment_id": payment_id,
                "razorpay_signature": signature,
            }),
        )
        .await
    }
}

fn is_hex_password(value: &Value) -> bool {
    value
        .as_str()
        .map(|p| p.len() == 24 && p.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

// =============================================================================
// Catalog and Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let harness = Harness::new();
    let (status, body) = harness.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn plans_are_listed_in_catalog_order() {
    let harness = Harness::new();
    let (status, body) = harness.get("/api/plans").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["plans"]
        .as_array()
        .expect("plans array")
        .iter()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["500GB", "1TB", "2TB", "5TB"]);
    assert_eq!(body["plans"][1]["price"], 2000);
    assert_eq!(body["plans"][1]["currency"], "INR");
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn purchase_creates_account_after_verified_payment() {
    let harness = Harness::new();

    let (status, initiated) = harness.initiate("1TB", "alice@gmail.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(initiated["gateway_order_id"], "order_MOCK1");
    assert_eq!(initiated["amount"], 200_000);
    assert_eq!(initiated["currency"], "INR");
    assert_eq!(initiated["key_id"], "rzp_test_integration");
    assert!(initiated["credentials"].is_null());

    // Nothing exists in the directory or the account table yet
    assert_eq!(harness.store.account_count().await, 0);
    assert!(harness.directory.requests().is_empty());
    assert_eq!(harness.gateway.requests()[0].amount_minor_units, 200_000);
    let stored = harness.store.payment("order_MOCK1").await.unwrap();
    assert_eq!(stored.amount, 2000);
    assert_eq!(stored.status, PaymentStatus::Pending);

    let (status, confirmed) = harness.verify("order_MOCK1", "pay_ALICE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "completed");
    assert_eq!(confirmed["credentials"]["username"], "alice@wecloudstorage.in");
    assert!(is_hex_password(&confirmed["credentials"]["password"]));
    assert_eq!(confirmed["plan_id"], "1TB");
    assert_eq!(confirmed["provisioning"]["status"], "provisioned");

    let provisioned = harness.directory.requests();
    assert_eq!(provisioned.len(), 1);
    assert_eq!(provisioned[0].email.as_str(), "alice@wecloudstorage.in");
    assert_eq!(
        provisioned[0].password.expose(),
        confirmed["credentials"]["password"].as_str().unwrap()
    );

    let (status, account) = harness.get("/api/accounts/Alice@Gmail.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["username"], "alice@wecloudstorage.in");
    assert_eq!(account["payment_status"], "completed");
    assert_eq!(account["provisioned"], true);
    assert!(account.get("password").is_none());
}

#[tokio::test]
async fn confirm_response_is_not_cacheable() {
    let harness = Harness::new();
    harness.initiate("500GB", "bob@example.com").await;

    let signature = harness.verifier.expected_signature("order_MOCK1", "pay_BOB");
    let request = Request::builder()
        .method("POST")
        .uri("/api/purchases/verify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "razorpay_order_id": "order_MOCK1",
                "razorpay_payment_id": "pay_BOB",
                "razorpay_signature": signature,
            })
            .to_string(),
        ))
        .unwrap();
    let response = harness.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn directory_failure_still_returns_credentials() {
    let harness = Harness::new();
    harness
        .directory
        .set_failure(Some(DirectoryError::network("connection reset")));
    harness.initiate("2TB", "carol@example.com").await;

    let (status, confirmed) = harness.verify("order_MOCK1", "pay_CAROL").await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_hex_password(&confirmed["credentials"]["password"]));
    assert_eq!(confirmed["provisioning"]["status"], "failed");

    let (_, account) = harness.get("/api/accounts/carol@example.com").await;
    assert_eq!(account["provisioned"], false);
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn unknown_plan_is_rejected() {
    let harness = Harness::new();
    let (status, body) = harness.initiate("9TB", "alice@gmail.com").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "UNKNOWN_PLAN");
    assert!(harness.gateway.requests().is_empty());
}

#[tokio::test]
async fn invalid_signature_fails_the_payment() {
    let harness = Harness::new();
    harness.initiate("1TB", "alice@gmail.com").await;

    let (status, body) = harness
        .verify_with_signature("order_MOCK1", "pay_ALICE", "deadbeef")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "SIGNATURE_MISMATCH");
    let payment = harness.store.payment("order_MOCK1").await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert_eq!(harness.store.account_count().await, 0);

    // A correct signature cannot revive a failed payment
    let (status, _) = harness.verify("order_MOCK1", "pay_ALICE").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn existing_account_blocks_new_purchase() {
    let harness = Harness::new();
    harness.initiate("1TB", "alice@gmail.com").await;
    harness.verify("order_MOCK1", "pay_ALICE").await;

    let (status, body) = harness.initiate("2TB", "alice@yahoo.com").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "ACCOUNT_EXISTS");
    assert_eq!(harness.gateway.requests().len(), 1);
}

#[tokio::test]
async fn repeated_callback_is_a_conflict() {
    let harness = Harness::new();
    harness.initiate("1TB", "alice@gmail.com").await;

    let (first, _) = harness.verify("order_MOCK1", "pay_ALICE").await;
    let (second, body) = harness.verify("order_MOCK1", "pay_ALICE").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "INVALID_STATE_TRANSITION");
    assert_eq!(harness.store.account_count().await, 1);
    assert_eq!(harness.directory.requests().len(), 1);
}

#[tokio::test]
async fn unknown_gateway_order_is_not_found() {
    let harness = Harness::new();
    let (status, body) = harness.verify("order_NOPE", "pay_X").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "PAYMENT_NOT_FOUND");
}

#[tokio::test]
async fn lookup_of_unknown_account_is_not_found() {
    let harness = Harness::new();
    let (status, body) = harness.get("/api/accounts/nobody@example.com").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "ACCOUNT_NOT_FOUND");
}

// =============================================================================
// Concurrency and Atomicity
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn racing_purchases_for_one_email_create_one_account() {
    let harness = Harness::new();

    // Both initiations pass the duplicate check: no account exists yet
    let (first, _) = harness.initiate("1TB", "dave@gmail.com").await;
    let (second, _) = harness.initiate("2TB", "dave@outlook.com").await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);

    let (a, b) = tokio::join!(
        harness.verify("order_MOCK1", "pay_ONE"),
        harness.verify("order_MOCK2", "pay_TWO"),
    );

    let mut statuses = vec![a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let loser = if a.0 == StatusCode::CONFLICT { &a.1 } else { &b.1 };
    assert_eq!(loser["error_code"], "ACCOUNT_CONFLICT");
    assert_eq!(harness.store.account_count().await, 1);
    assert_eq!(harness.directory.requests().len(), 1);

    // The losing payment stays pending for a manual refund
    let pending = [
        harness.store.payment("order_MOCK1").await.unwrap(),
        harness.store.payment("order_MOCK2").await.unwrap(),
    ];
    assert_eq!(
        pending.iter().filter(|p| p.status == PaymentStatus::Pending).count(),
        1
    );
}

#[tokio::test]
async fn aborted_commit_leaves_no_partial_state() {
    let harness = Harness::new();
    harness.initiate("1TB", "erin@example.com").await;
    harness.store.set_abort_between_writes(true);

    let (status, body) = harness.verify("order_MOCK1", "pay_ERIN").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "INTERNAL_ERROR");
    assert_eq!(
        harness.store.payment("order_MOCK1").await.unwrap().status,
        PaymentStatus::Pending
    );
    assert_eq!(harness.store.account_count().await, 0);
    assert!(harness.directory.requests().is_empty());

    // The gateway retries the callback once the store recovers
    harness.store.set_abort_between_writes(false);
    let (status, confirmed) = harness.verify("order_MOCK1", "pay_ERIN").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["credentials"]["username"], "erin@wecloudstorage.in");
    assert_eq!(harness.store.account_count().await, 1);
}
