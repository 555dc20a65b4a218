mod helpers;

use helpers::{forecast_body, test_backends, test_config, test_server};
use serde_json::Value;

#[tokio::test]
async fn test_wind_grid_shape_and_values() {
    let mut backends = test_backends().await;
    backends
        .weather
        .mock("GET", "/v1/forecast")
        .match_query(mockito::Matcher::UrlEncoded(
            "current_weather".into(),
            "true".into(),
        ))
        .with_status(200)
        .with_body(forecast_body(18.0, 90.0))
        .create_async()
        .await;

    // Test config uses a 3x2 grid.
    let server = test_server(&test_config(&backends));
    let response = server.get("/viento.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();

    assert_eq!(body["header"]["refTime"], "2026-08-06T10:15:00Z");
    let records = body["data"].as_array().expect("data array");
    assert_eq!(records.len(), 2);

    let u_record = &records[0];
    let v_record = &records[1];
    assert_eq!(u_record["header"]["parameterCategory"], 2);
    assert_eq!(u_record["header"]["parameterNumber"], 2);
    assert_eq!(v_record["header"]["parameterNumber"], 3);
    assert_eq!(u_record["header"]["nx"], 3);
    assert_eq!(u_record["header"]["ny"], 2);

    let u_values = u_record["data"].as_array().expect("u data");
    assert_eq!(u_values.len(), 6);
    // 18 km/h from the east -> u = -5 m/s in every cell.
    for value in u_values {
        assert!((value.as_f64().unwrap() + 5.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_wind_grid_header_geometry() {
    let mut backends = test_backends().await;
    backends
        .weather
        .mock("GET", "/v1/forecast")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(forecast_body(10.0, 0.0))
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server.get("/viento.json").await;
    let body: Value = response.json();
    let header = &body["data"][0]["header"];

    // 3x2 grid, 0.5 deg spacing, centered on 41.37 / 2.19.
    assert!((header["la1"].as_f64().unwrap() - 41.62).abs() < 1e-9);
    assert!((header["lo1"].as_f64().unwrap() - 1.69).abs() < 1e-9);
    assert!((header["dx"].as_f64().unwrap() - 0.5).abs() < 1e-9);
    assert!((header["dy"].as_f64().unwrap() - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_wind_grid_accepts_coordinate_overrides() {
    let mut backends = test_backends().await;
    let weather = backends
        .weather
        .mock("GET", "/v1/forecast")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("latitude".into(), "10.5".into()),
            mockito::Matcher::UrlEncoded("longitude".into(), "-3.25".into()),
        ]))
        .with_status(200)
        .with_body(forecast_body(5.0, 180.0))
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server.get("/viento.json?lat=10.5&lon=-3.25").await;

    assert_eq!(response.status_code(), 200);
    weather.assert_async().await;
}

#[tokio::test]
async fn test_wind_grid_rejects_out_of_range_coordinates() {
    let mut backends = test_backends().await;
    let weather = backends
        .weather
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server.get("/viento.json?lat=999").await;

    assert_eq!(response.status_code(), 400);
    weather.assert_async().await;
}

#[tokio::test]
async fn test_weather_failure_maps_to_upstream_error() {
    let mut backends = test_backends().await;
    backends
        .weather
        .mock("GET", mockito::Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let server = test_server(&test_config(&backends));
    let response = server.get("/viento.json").await;

    assert!(response.status_code().as_u16() >= 500);
    let body: Value = response.json();
    assert!(body["error"].as_str().is_some());
}
