//! Weather forecast client.
//!
//! Fetches the current wind at a point from the forecast API. The upstream
//! reports speed in km/h and direction in degrees clockwise from north; the
//! conversion to u/v components happens in `trackpub_core::wind`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use trackpub_core::error::AppError;
use trackpub_core::wind::WindObservation;

const SERVICE_NAME: &str = "weather";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    windspeed: f64,
    winddirection: f64,
    time: Option<String>,
}

pub struct WeatherClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the weather API")?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Current wind speed and direction at the given coordinates.
    pub async fn current_wind(&self, latitude: f64, longitude: f64) -> Result<WindObservation, AppError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| upstream_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(upstream_error(format!(
                "forecast request rejected with status {}",
                response.status()
            )));
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .map_err(|e| upstream_error(format!("invalid forecast response: {}", e)))?;

        tracing::debug!(
            latitude,
            longitude,
            windspeed_kmh = forecast.current_weather.windspeed,
            winddirection_deg = forecast.current_weather.winddirection,
            "Fetched current wind"
        );

        Ok(WindObservation {
            speed_kmh: forecast.current_weather.windspeed,
            direction_deg: forecast.current_weather.winddirection,
            time: forecast.current_weather.time,
        })
    }
}

fn upstream_error(detail: String) -> AppError {
    AppError::Upstream {
        service: SERVICE_NAME.to_string(),
        detail,
    }
}
