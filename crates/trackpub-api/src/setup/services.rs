//! Construction of the outbound service clients from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use trackpub_core::Config;
use trackpub_services::{HistoryClient, WeatherClient, ZenodoClient};

use crate::state::AppState;

pub fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let timeout = Duration::from_secs(config.upstream_timeout_secs);

    let zenodo = ZenodoClient::new(
        config.zenodo_api_url.clone(),
        config.zenodo_record_base.clone(),
        config.zenodo_tokens.clone(),
        timeout,
    )
    .context("Failed to initialize deposition client")?;

    let history = match &config.history_script_url {
        Some(url) => Some(
            HistoryClient::new(url.clone(), timeout)
                .context("Failed to initialize history client")?,
        ),
        None => {
            tracing::info!("HISTORY_SCRIPT_URL not set; history log disabled");
            None
        }
    };

    let weather = WeatherClient::new(config.openmeteo_api_url.clone(), timeout)
        .context("Failed to initialize weather client")?;

    Ok(Arc::new(AppState {
        is_production: config.is_production(),
        config: config.clone(),
        zenodo,
        history,
        weather,
    }))
}
