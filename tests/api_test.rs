mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use cartridge_api::{
    config::AppConfig, events::EventSender, handlers::AppServices, services::notes::IssueNoteCommand,
    AppState,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;

async fn test_app() -> (Router, common::TestContext) {
    let ctx = common::setup().await;
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_json: false,
        auto_migrate: false,
        seed_demo_data: false,
        note_prefix: "CART".to_string(),
        low_stock_threshold: 3,
    };
    let (tx, mut rx) = mpsc::channel(64);
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let event_sender = EventSender::new(tx);
    let services = AppServices::new(ctx.db.clone(), event_sender.clone(), &config);
    let state = Arc::new(AppState {
        db: ctx.db.clone(),
        config,
        event_sender,
        services,
    });
    (cartridge_api::app(state), ctx)
}

fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_database_up() {
    let (app, _ctx) = test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn department_form_roundtrip() {
    let (app, _ctx) = test_app().await;

    let response = app
        .clone()
        .oneshot(form_post("/departments", "name=Accounting"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/departments"
    );

    let response = app.oneshot(get("/departments")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Accounting");
}

#[tokio::test]
async fn missing_department_is_404() {
    let (app, _ctx) = test_app().await;

    let response = app.oneshot(get("/departments/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn receive_form_redirects_on_success() {
    let (app, ctx) = test_app().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;

    let body = format!(
        "cartridge_id={}&box_id={}&quantity=5",
        fx.cartridge_id, fx.box_id
    );
    let request = Request::builder()
        .method("POST")
        .uri("/locations")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/warehouses");
}

#[tokio::test]
async fn receive_form_carries_error_back_on_insufficient_stock() {
    let (app, ctx) = test_app().await;
    let fx = common::base_fixture(&ctx, 2, 20).await;

    let body = format!(
        "cartridge_id={}&box_id={}&quantity=5",
        fx.cartridge_id, fx.box_id
    );
    let request = Request::builder()
        .method("POST")
        .uri("/locations")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(
        location.starts_with("/warehouses?error="),
        "expected redirect-with-message, got {}",
        location
    );
}

#[tokio::test]
async fn note_form_and_document_download() {
    let (app, ctx) = test_app().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();

    let body = format!(
        "author_id={}&recipient_id={}&cartridge_id={}&quantity=2&reason=Printer+repair",
        fx.author_id, fx.recipient_id, fx.cartridge_id
    );
    let request = Request::builder()
        .method("POST")
        .uri("/service-notes")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/service-notes");

    let note = &ctx.notes.list_notes().await.unwrap()[0];
    let response = app
        .oneshot(get(&format!("/service-notes/{}/document", note.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    let expected = format!(
        "service_note_{}.docx",
        note.note_number.replace('-', "_")
    );
    assert!(disposition.contains(&expected), "got {}", disposition);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Office documents are zip archives.
    assert_eq!(&bytes[0..2], b"PK");
}

#[tokio::test]
async fn return_endpoint_transitions_the_note() {
    let (app, ctx) = test_app().await;
    let fx = common::base_fixture(&ctx, 10, 20).await;
    ctx.ledger.receive(fx.cartridge_id, fx.box_id, 10).await.unwrap();
    let note = ctx
        .notes
        .issue(IssueNoteCommand {
            author_id: fx.author_id,
            recipient_id: fx.recipient_id,
            cartridge_id: fx.cartridge_id,
            quantity: 3,
            reason: "Printer repair".to_string(),
            comment: None,
        })
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(form_post(
            &format!("/service-notes/{}/return", note.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Terminal state: a second return redirects back with a message.
    let response = app
        .oneshot(form_post(
            &format!("/service-notes/{}/return", note.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/service-notes?error="));
}

#[tokio::test]
async fn employee_department_autofill() {
    let (app, ctx) = test_app().await;
    let fx = common::base_fixture(&ctx, 0, 10).await;

    let response = app
        .oneshot(get(&format!("/api/employees/{}/department", fx.author_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["department_name"], "IT");
}
