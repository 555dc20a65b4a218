//! Wind grid route: fetch the current wind at a point and expand it into the
//! grid-forecast JSON the map widget consumes.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::state::AppState;
use trackpub_core::wind::{GridSpec, WindGrid};
use trackpub_core::AppError;

#[derive(Debug, Deserialize)]
pub struct WindQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

pub async fn wind_grid(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindQuery>,
) -> Result<Json<WindGrid>, HttpAppError> {
    let latitude = query.lat.unwrap_or(state.config.default_latitude);
    let longitude = query.lon.unwrap_or(state.config.default_longitude);

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::InvalidInput(
            "lat must be within [-90, 90] and lon within [-180, 180]".to_string(),
        )
        .into());
    }

    let observation = state.weather.current_wind(latitude, longitude).await?;

    let grid_spec = GridSpec {
        nx: state.config.wind_grid_nx,
        ny: state.config.wind_grid_ny,
        center_lat: latitude,
        center_lon: longitude,
        spacing_deg: state.config.wind_grid_spacing_deg,
    };

    Ok(Json(WindGrid::from_sample(&observation, &grid_spec)))
}
