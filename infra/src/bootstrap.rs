//! Runtime assembly
//!
//! Builds the store, transport, dispatcher, lifecycle manager and sweeper from
//! an [`AppConfig`] and starts the background tasks.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use bmb_core::services::{
    NotificationDispatcher, OtpLifecycleManager, OtpManagerConfig, OtpSweeper, SweepConfig,
};
use bmb_shared::config::{AppConfig, Environment};

use crate::sms::create_notification_transport;
use crate::storage::create_otp_store;
use crate::InfrastructureError;

/// A running OTP service
pub struct OtpRuntime {
    /// Lifecycle manager shared with callers
    pub manager: Arc<OtpLifecycleManager>,
    /// Handle for subscribing to delivery events
    pub dispatcher: NotificationDispatcher,
    /// Notification worker task
    pub worker: JoinHandle<()>,
    /// Periodic sweep task, absent when sweeping is disabled
    pub sweeper: Option<JoinHandle<()>>,
}

impl OtpRuntime {
    /// Stop the background tasks
    pub fn shutdown(self) {
        if let Some(sweeper) = self.sweeper {
            sweeper.abort();
        }
        self.worker.abort();
        info!("OTP runtime stopped");
    }
}

/// Load configuration from the process environment.
///
/// `.env` is read first, then the environment-specific file (for example
/// `.env.production`); variables already set in the process win.
pub fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    if let Err(e) = dotenvy::from_filename(environment.env_file()) {
        debug!(file = environment.env_file(), "No environment file loaded: {}", e);
    }

    AppConfig::from_env()
}

/// Initialize the OTP runtime. Must be called inside a Tokio runtime.
pub async fn initialize(config: &AppConfig) -> Result<OtpRuntime, InfrastructureError> {
    info!(environment = %config.environment, "Initializing OTP runtime...");

    let store = create_otp_store(&config.storage)?;
    let transport = create_notification_transport(&config.notification);
    info!(
        provider = transport.provider_name(),
        storage = ?config.storage.backend,
        "Adapters selected"
    );

    let (dispatcher, worker) =
        NotificationDispatcher::spawn(transport, config.notification.queue_capacity.max(1));

    let manager = Arc::new(OtpLifecycleManager::new(
        store,
        Arc::new(dispatcher.clone()),
        OtpManagerConfig::from(&config.otp),
    )?);

    let sweeper = Arc::new(OtpSweeper::new(manager.clone(), SweepConfig::from(&config.otp)));
    let sweeper = sweeper.start_background_task();

    info!("OTP runtime initialized successfully");

    Ok(OtpRuntime {
        manager,
        dispatcher,
        worker,
        sweeper,
    })
}
