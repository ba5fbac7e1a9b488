use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use rust_decimal::{dec, Decimal};
use serde_json::json;

use shopdesk_api::app::services::{build_services, AppServices};
use shopdesk_auth::{JwtClaims, PrincipalId, Role};
use shopdesk_banking::{BalanceSheet, TransactionKind, TransactionRecord};
use shopdesk_core::ExpectedSequence;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str, services: Arc<AppServices>) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = shopdesk_api::app::build_app_with_services(jwt_secret.to_string(), services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, sub: PrincipalId, roles: Vec<Role>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub,
        roles,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn admin_jwt(jwt_secret: &str) -> String {
    mint_jwt(jwt_secret, PrincipalId::new(), vec![Role::new("admin")])
}

/// Seed the log with an opening snapshot so subsequent transactions have
/// funds to move. A fresh shop starts at zero and would reject everything.
fn seed_opening_balances(services: &AppServices, cash: Decimal, ledger: Decimal, wallet: Decimal) {
    let record = TransactionRecord {
        kind: TransactionKind::Deposit,
        amount: cash + ledger + wallet,
        charge: Decimal::ZERO,
        profit: Decimal::ZERO,
        payment_method: None,
        employee_id: None,
        note: Some("opening balances".to_string()),
        balances: BalanceSheet::new(cash, ledger, wallet),
        recorded_at: Utc::now(),
    };
    services
        .log
        .append(record, ExpectedSequence::Any)
        .expect("failed to seed opening balances");
}

fn dec_field(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
        .parse()
        .expect("failed to parse decimal")
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, Arc::new(build_services())).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret", Arc::new(build_services())).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn whoami_reflects_token_claims() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, Arc::new(build_services())).await;

    let sub = PrincipalId::new();
    let token = mint_jwt(jwt_secret, sub, vec![Role::new("admin")]);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["principal_id"].as_str().unwrap(), sub.to_string());
    assert!(body["roles"].as_array().unwrap().iter().any(|r| r == "admin"));
}

#[tokio::test]
async fn unknown_kind_is_a_helpful_bad_request() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, Arc::new(build_services())).await;
    let token = admin_jwt(jwt_secret);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "wire_transfer", "amount": "100" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "invalid_kind");
    assert!(body["message"].as_str().unwrap().contains("ledger_transfer"));
}

#[tokio::test]
async fn non_admin_without_grant_is_forbidden() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, Arc::new(build_services())).await;
    let token = mint_jwt(jwt_secret, PrincipalId::new(), vec![Role::new("cashier")]);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "forbidden");
}

#[tokio::test]
async fn granted_employee_can_view_transactions() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, Arc::new(build_services())).await;
    let admin = admin_jwt(jwt_secret);

    let client = reqwest::Client::new();

    // Admin registers an employee.
    let res = client
        .post(format!("{}/employees", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Asha", "phone": "+123456789" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let employee_id = created["id"].as_str().unwrap().to_string();

    // Without a grant, the employee cannot list transactions.
    let employee_token = mint_jwt(
        jwt_secret,
        employee_id.parse().unwrap(),
        vec![Role::new("cashier")],
    );
    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .bearer_auth(&employee_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin grants the view permission.
    let res = client
        .post(format!("{}/employees/{}/grants", srv.base_url, employee_id))
        .bearer_auth(&admin)
        .json(&json!({ "permission": "banking.transactions.view" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The same token now works.
    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .bearer_auth(&employee_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn deposit_on_empty_log_is_rejected_for_insufficient_funds() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, Arc::new(build_services())).await;
    let token = admin_jwt(jwt_secret);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "deposit", "amount": "100" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "insufficient_funds");
}

#[tokio::test]
async fn transaction_lifecycle_deposit_withdraw_transfer() {
    let jwt_secret = "test-secret";
    let services = Arc::new(build_services());
    seed_opening_balances(&services, dec!(1000), dec!(500), dec!(2000));
    let srv = TestServer::spawn(jwt_secret, services).await;
    let token = admin_jwt(jwt_secret);

    let client = reqwest::Client::new();

    // Deposit 100: wallet -> cash plus the default fee.
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "deposit", "amount": "100" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(dec_field(&body["charge"]), dec!(1));
    assert_eq!(dec_field(&body["balances"]["cash"]), dec!(1101));
    assert_eq!(dec_field(&body["balances"]["wallet"]), dec!(1900));
    assert_eq!(dec_field(&body["balances"]["main"]), dec!(3501));

    // Withdrawal 200 paid online.
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "withdrawal", "amount": "200", "payment_method": "online" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(dec_field(&body["balances"]["cash"]), dec!(903));
    assert_eq!(dec_field(&body["balances"]["wallet"]), dec!(2100));

    // Ledger transfer 50 costs the shop the fixed charge.
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "ledger_transfer", "amount": "50" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(dec_field(&body["charge"]), dec!(-5));
    assert_eq!(dec_field(&body["balances"]["ledger"]), dec!(450));
    assert_eq!(dec_field(&body["balances"]["wallet"]), dec!(2145));

    // Listing returns newest first, including the seed record.
    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    let kinds: Vec<&str> = items.iter().map(|i| i["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["ledger_transfer", "withdrawal", "deposit", "deposit"]);
    let sequences: Vec<u64> = items.iter().map(|i| i["sequence"].as_u64().unwrap()).collect();
    assert_eq!(sequences, vec![4, 3, 2, 1]);

    // Balances endpoint reflects the latest snapshot.
    let res = client
        .get(format!("{}/balances", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(dec_field(&body["cash"]), dec!(903));
    assert_eq!(dec_field(&body["ledger"]), dec!(450));
    assert_eq!(dec_field(&body["wallet"]), dec!(2145));
    assert_eq!(dec_field(&body["main"]), dec!(3498));
}

#[tokio::test]
async fn borrowing_records_the_employee_and_joins_the_name() {
    let jwt_secret = "test-secret";
    let services = Arc::new(build_services());
    seed_opening_balances(&services, dec!(1000), dec!(500), dec!(2000));
    let srv = TestServer::spawn(jwt_secret, services).await;
    let token = admin_jwt(jwt_secret);

    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/employees", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ravi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let employee_id = created["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "borrowing", "amount": "300", "employee_id": employee_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(dec_field(&body["charge"]), dec!(0));
    assert_eq!(dec_field(&body["balances"]["cash"]), dec!(700));
    assert_eq!(body["employee_name"].as_str().unwrap(), "Ravi");

    // The join also appears in the listing.
    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let borrowing = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["kind"] == "borrowing")
        .unwrap()
        .clone();
    assert_eq!(borrowing["employee_name"].as_str().unwrap(), "Ravi");
}

#[tokio::test]
async fn borrowing_against_an_unknown_employee_is_not_found() {
    let jwt_secret = "test-secret";
    let services = Arc::new(build_services());
    seed_opening_balances(&services, dec!(1000), dec!(500), dec!(2000));
    let srv = TestServer::spawn(jwt_secret, services).await;
    let token = admin_jwt(jwt_secret);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "kind": "borrowing",
            "amount": "300",
            "employee_id": uuid::Uuid::now_v7().to_string(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn amount_rule_answers_before_the_roster_lookup() {
    let jwt_secret = "test-secret";
    let services = Arc::new(build_services());
    seed_opening_balances(&services, dec!(1000), dec!(500), dec!(2000));
    let srv = TestServer::spawn(jwt_secret, services).await;
    let token = admin_jwt(jwt_secret);

    // A non-positive amount on a borrowing against an unknown employee is
    // rejected for the amount, not answered with 404.
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "kind": "borrowing",
            "amount": "0",
            "employee_id": uuid::Uuid::now_v7().to_string(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "invalid_amount");
}

#[tokio::test]
async fn date_range_filters_the_listing() {
    let jwt_secret = "test-secret";
    let services = Arc::new(build_services());
    seed_opening_balances(&services, dec!(1000), dec!(500), dec!(2000));
    let srv = TestServer::spawn(jwt_secret, services).await;
    let token = admin_jwt(jwt_secret);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "deposit", "amount": "100" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // A window in the far future matches nothing.
    let res = client
        .get(format!(
            "{}/transactions?start=2099-01-01T00:00:00Z&end=2099-12-31T00:00:00Z",
            srv.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());

    // A malformed date is a 400, not a 500.
    let res = client
        .get(format!("{}/transactions?start=yesterday", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "invalid_date");
}
