use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use payment_backend::config::{Config, DATABASE_URL_VAR};
use payment_backend::{create_router, initialize_backend};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use shared::{Bill, BillPage, ErrorResponse};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

fn test_config(dir: &TempDir) -> Config {
    let database_url = format!("sqlite:{}", dir.path().join("payments.db").display());
    Config::from_lookup(|name| (name == DATABASE_URL_VAR).then(|| database_url.clone()))
        .expect("Failed to build test config")
}

async fn start_app(config: &Config) -> Router {
    let app_state = initialize_backend(config)
        .await
        .expect("Failed to initialize backend");
    create_router(app_state, config)
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_bills_survive_restart() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let app = start_app(&config).await;
    let response = app
        .oneshot(post_json(
            "/payments",
            json!({
                "dueDate": "2025-07-01",
                "paymentDate": "2025-07-02",
                "amount": "150.00",
                "description": "Conta de energia",
                "status": "PENDENTE"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();

    let restarted = start_app(&config).await;
    let response = restarted.oneshot(get(&location)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bill: Bill = read_json(response).await;
    assert_eq!(bill.description, "Conta de energia");
    assert_eq!(bill.amount, dec!(150.00));
}

#[tokio::test]
async fn test_csv_upload_then_total() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let app = start_app(&config).await;

    let csv = "2025-07-01,2025-07-02,150.00,Conta de energia,PENDENTE\n\
               2025-07-05,2025-07-06,220.75,Conta de água,pago\n\
               linha,curta\n";
    let response = app
        .clone()
        .oneshot(post_json("/payments/uploads", json!({ "fileBase64": STANDARD.encode(csv) })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get("/payments/total?startDate=2025-07-01&endDate=2025-07-31"))
        .await
        .unwrap();
    let total: Decimal = read_json(response).await;
    assert_eq!(total, dec!(370.75));

    let response = app.oneshot(get("/payments?description=%C3%A1gua")).await.unwrap();
    let page: BillPage = read_json(response).await;
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].status, "PAGO");
}

#[tokio::test]
async fn test_failed_upload_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let app = start_app(&config).await;

    let csv = "2025-07-01,2025-07-02,150.00,Conta de energia,PENDENTE\n\
               2025-07-05,2025-07-06,0.00,Conta de água,PAGO\n";
    let response = app
        .clone()
        .oneshot(post_json("/payments/uploads", json!({ "fileBase64": STANDARD.encode(csv) })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.mensagem, "A linha 2 coluna Total possui valor inválido: 0.00");

    let response = app.oneshot(get("/payments")).await.unwrap();
    let page: BillPage = read_json(response).await;
    assert_eq!(page.total_elements, 0);
}
