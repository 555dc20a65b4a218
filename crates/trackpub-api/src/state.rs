//! Application state shared across handlers.
//!
//! A single `Arc<AppState>` carries the configuration and the three outbound
//! clients; handlers extract it via axum's `State`.

use trackpub_core::Config;
use trackpub_services::{HistoryClient, WeatherClient, ZenodoClient};

pub struct AppState {
    pub config: Config,
    pub zenodo: ZenodoClient,
    /// `None` when no history endpoint is configured; the history routes
    /// answer 404 and appends are skipped.
    pub history: Option<HistoryClient>,
    pub weather: WeatherClient,
    pub is_production: bool,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
