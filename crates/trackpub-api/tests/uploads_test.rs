mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{forecast_body, mock_publish_chain, test_backends, test_config, test_server};
use serde_json::Value;

fn csv_form(filename: &str, body: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(body.to_vec())
            .file_name(filename.to_string())
            .mime_type("text/csv"),
    )
}

#[tokio::test]
async fn test_rejects_non_csv_filename() {
    let mut backends = test_backends().await;
    let create = backends
        .zenodo
        .mock("POST", "/depositions")
        .expect(0)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("notas.txt", b"id,lat,lon\n"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().is_some());
    // Validation failures never reach the deposition API.
    create.assert_async().await;
}

#[tokio::test]
async fn test_rejects_missing_file_field() {
    let backends = test_backends().await;
    let server = test_server(&test_config(&backends));

    let response = server
        .post("/subir-zenodo")
        .multipart(MultipartForm::new().add_text("autor", "Ada"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_rejects_empty_file() {
    let backends = test_backends().await;
    let server = test_server(&test_config(&backends));

    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b""))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_successful_upload_returns_record_url() {
    let mut backends = test_backends().await;
    let chain = mock_publish_chain(&mut backends.zenodo, 123).await;
    let history = backends
        .history
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"estado":"ok"}"#)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(
            csv_form("ruta.csv", b"id,lat,lon\n1,41.37,2.19\n")
                .add_text("autor", "Ada")
                .add_text("descripcion", "Morning ride")
                .add_text("hora_local", "2026-08-06T09:00:00Z"),
        )
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(
        body["zenodo_url"].as_str(),
        Some("https://zenodo.org/record/123")
    );
    assert!(body["mensaje"].as_str().is_some());

    for mock in &chain {
        mock.assert_async().await;
    }
    history.assert_async().await;
}

#[tokio::test]
async fn test_history_append_carries_wire_fields() {
    let mut backends = test_backends().await;
    mock_publish_chain(&mut backends.zenodo, 77).await;
    let history = backends
        .history
        .mock("POST", "/")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"nombre":"ruta.csv","enlace":"https://zenodo.org/record/77","fecha":"2026-08-06T09:00:00Z"}"#
                .to_string(),
        ))
        .with_status(200)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b"1,2,3\n").add_text("hora_local", "2026-08-06T09:00:00Z"))
        .await;

    assert_eq!(response.status_code(), 200);
    history.assert_async().await;
}

#[tokio::test]
async fn test_attach_failure_short_circuits_publish_and_history() {
    let mut backends = test_backends().await;
    backends
        .zenodo
        .mock("POST", "/depositions")
        .with_status(201)
        .with_body(r#"{"id": 9}"#)
        .create_async()
        .await;
    backends
        .zenodo
        .mock("POST", "/depositions/9/files")
        .with_status(500)
        .with_body("storage exploded")
        .create_async()
        .await;
    let publish = backends
        .zenodo
        .mock("POST", "/depositions/9/actions/publish")
        .expect(0)
        .create_async()
        .await;
    let history = backends
        .history
        .mock("POST", "/")
        .expect(0)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b"1,2,3\n"))
        .await;

    assert!(response.status_code().as_u16() >= 500);
    let body: Value = response.json();
    assert!(body["error"].as_str().is_some());
    // The upstream body is log-only; it must not leak to the client.
    assert!(!response.text().contains("storage exploded"));

    publish.assert_async().await;
    history.assert_async().await;
}

#[tokio::test]
async fn test_create_failure_short_circuits_chain() {
    let mut backends = test_backends().await;
    backends
        .zenodo
        .mock("POST", "/depositions")
        .with_status(403)
        .with_body(r#"{"message":"bad token"}"#)
        .create_async()
        .await;
    let history = backends
        .history
        .mock("POST", "/")
        .expect(0)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b"1,2,3\n"))
        .await;

    assert!(response.status_code().as_u16() >= 500);
    history.assert_async().await;
}

#[tokio::test]
async fn test_publish_failure_skips_history() {
    let mut backends = test_backends().await;
    backends
        .zenodo
        .mock("POST", "/depositions")
        .with_status(201)
        .with_body(r#"{"id": 11}"#)
        .create_async()
        .await;
    backends
        .zenodo
        .mock("POST", "/depositions/11/files")
        .with_status(201)
        .create_async()
        .await;
    backends
        .zenodo
        .mock("POST", "/depositions/11/actions/publish")
        .with_status(400)
        .with_body(r#"{"message":"minting failed"}"#)
        .create_async()
        .await;
    let history = backends
        .history
        .mock("POST", "/")
        .expect(0)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b"1,2,3\n"))
        .await;

    assert!(response.status_code().as_u16() >= 500);
    history.assert_async().await;
}

#[tokio::test]
async fn test_history_failure_preserves_upload_success() {
    let mut backends = test_backends().await;
    mock_publish_chain(&mut backends.zenodo, 321).await;
    backends
        .history
        .mock("POST", "/")
        .with_status(500)
        .with_body("script quota exceeded")
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b"1,2,3\n"))
        .await;

    // The upload already succeeded; a logging failure must not change that.
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(
        body["zenodo_url"].as_str(),
        Some("https://zenodo.org/record/321")
    );
}

#[tokio::test]
async fn test_unknown_account_rejected() {
    let mut backends = test_backends().await;
    let create = backends
        .zenodo
        .mock("POST", "/depositions")
        .expect(0)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b"1,2,3\n").add_text("cuenta", "Z"))
        .await;

    assert_eq!(response.status_code(), 400);
    create.assert_async().await;
}

// The weather backend must stay untouched by uploads.
#[tokio::test]
async fn test_upload_does_not_call_weather_api() {
    let mut backends = test_backends().await;
    mock_publish_chain(&mut backends.zenodo, 5).await;
    backends
        .history
        .mock("POST", "/")
        .with_status(200)
        .create_async()
        .await;
    let weather = backends
        .weather
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .with_body(forecast_body(10.0, 0.0))
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server
        .post("/subir-zenodo")
        .multipart(csv_form("ruta.csv", b"1,2,3\n"))
        .await;

    assert_eq!(response.status_code(), 200);
    weather.assert_async().await;
}
