use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::api::{ApiResult, FestApi, HttpFestApi};
use crate::core::registration::RegistrationService;

use super::events::{AppEvent, Notification, NotificationLevel};

/// Centralized handle to all backend services.
///
/// Created once at startup, then passed by reference to views. Views clone
/// the `Arc`s into the tasks they spawn.
pub struct Services {
    pub api: Arc<dyn FestApi>,
    pub registration: RegistrationService,
    pub downloads_dir: PathBuf,
    pub scoreboard_refresh: Duration,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the HTTP client and services from config.
    pub fn init(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> ApiResult<Self> {
        let api: Arc<dyn FestApi> = Arc::new(HttpFestApi::new(&config.api)?);
        Ok(Self::with_api(api, config, event_tx))
    }

    /// Services over an arbitrary API implementation.
    pub fn with_api(
        api: Arc<dyn FestApi>,
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            registration: RegistrationService::new(Arc::clone(&api)),
            api,
            downloads_dir: config.downloads_dir(),
            scoreboard_refresh: Duration::from_secs(config.scoreboard.refresh_secs.max(1)),
            event_tx,
        }
    }

    /// Queue a notification from anywhere, including spawned tasks.
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        notify(&self.event_tx, message, level);
    }
}

/// Send a notification over the app channel. A closed channel means the
/// app is shutting down and the message is dropped.
pub fn notify(
    tx: &mpsc::UnboundedSender<AppEvent>,
    message: impl Into<String>,
    level: NotificationLevel,
) {
    let _ = tx.send(AppEvent::Notification(Notification::new(message, level)));
}
