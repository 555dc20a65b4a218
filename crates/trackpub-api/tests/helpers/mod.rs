//! Shared test fixtures: mock upstream servers and a TestServer wired to them.

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use std::collections::HashMap;

use axum_test::TestServer;
use trackpub_core::Config;

pub const TEST_TOKEN: &str = "test-token-a-0123456789";
pub const RECORD_BASE: &str = "https://zenodo.org/record";

/// Mock servers standing in for the three upstreams.
pub struct TestBackends {
    pub zenodo: mockito::ServerGuard,
    pub history: mockito::ServerGuard,
    pub weather: mockito::ServerGuard,
}

pub async fn test_backends() -> TestBackends {
    TestBackends {
        zenodo: mockito::Server::new_async().await,
        history: mockito::Server::new_async().await,
        weather: mockito::Server::new_async().await,
    }
}

pub fn test_config(backends: &TestBackends) -> Config {
    let mut tokens = HashMap::new();
    tokens.insert("A".to_string(), TEST_TOKEN.to_string());

    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        zenodo_api_url: format!("{}/depositions", backends.zenodo.url()),
        zenodo_record_base: RECORD_BASE.to_string(),
        zenodo_tokens: tokens,
        zenodo_community: None,
        history_script_url: Some(backends.history.url()),
        openmeteo_api_url: format!("{}/v1/forecast", backends.weather.url()),
        openweather_browser_key: None,
        default_latitude: 41.37,
        default_longitude: 2.19,
        wind_grid_nx: 3,
        wind_grid_ny: 2,
        wind_grid_spacing_deg: 0.5,
        max_file_size_bytes: 1024 * 1024,
        upstream_timeout_secs: 5,
    }
}

pub fn test_server(config: &Config) -> TestServer {
    let state = trackpub_api::setup::services::initialize_services(config).expect("services");
    let router = trackpub_api::setup::routes::setup_routes(config, state).expect("routes");
    TestServer::new(router).expect("test server")
}

/// Mount the happy-path deposition chain (create 201 / attach 201 /
/// publish 202) for the given id.
pub async fn mock_publish_chain(server: &mut mockito::ServerGuard, id: u64) -> [mockito::Mock; 3] {
    let create = server
        .mock("POST", "/depositions")
        .match_header("authorization", format!("Bearer {}", TEST_TOKEN).as_str())
        .with_status(201)
        .with_body(format!(r#"{{"id": {}}}"#, id))
        .create_async()
        .await;
    let attach = server
        .mock("POST", format!("/depositions/{}/files", id).as_str())
        .with_status(201)
        .with_body(r#"{"id": "file-1"}"#)
        .create_async()
        .await;
    let publish = server
        .mock("POST", format!("/depositions/{}/actions/publish", id).as_str())
        .with_status(202)
        .with_body(r#"{"state": "done"}"#)
        .create_async()
        .await;
    [create, attach, publish]
}

/// A minimal valid forecast body.
pub fn forecast_body(windspeed: f64, winddirection: f64) -> String {
    format!(
        r#"{{"latitude":41.37,"longitude":2.19,
            "current_weather":{{"temperature":21.0,"windspeed":{},
            "winddirection":{},"time":"2026-08-06T10:15"}}}}"#,
        windspeed, winddirection
    )
}
