//! # Main Entry Point
//!
//! Wires the layers together and hands control to the connection supervisor:
//! - Domain: Configuration, Types, Errors
//! - Infrastructure: Slack transport, Image lookup
//! - Application: Router, Supervisor, Shutdown, Logging
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::application::router::CommandRouter;
use crate::application::sender::ResponseSender;
use crate::application::shutdown::ShutdownController;
use crate::application::supervisor::{ConnectionSupervisor, SupervisorSettings};
use crate::domain::config::{AppConfig, CONFIG_PATH};
use crate::infrastructure::images::HttpImageLookup;
use crate::infrastructure::slack::SlackTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Configuration
    let config = AppConfig::load(CONFIG_PATH)?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.system)?;
    tracing::info!("{}", strings::logs::STARTING);

    // 3. Secrets (fatal when absent)
    let secrets = config.resolve_secrets().inspect_err(|e| {
        tracing::error!("{e:#}");
    })?;

    // 4. Shutdown Handling
    let shutdown = ShutdownController::new();
    let _signals = shutdown
        .install_signal_handlers()
        .context("Failed to install signal handlers")?;

    // 5. Collaborators
    let transport = SlackTransport::new(
        &config.services.slack,
        secrets.bot_token,
        config.system.poll_window(),
    )?;
    let images = Arc::new(HttpImageLookup::new(
        &config.services.images,
        secrets.image_api_key,
    ));
    let router = CommandRouter::new(&config.commands, images, shutdown.clone());
    let sender = ResponseSender::new(&config.commands.help);

    // 6. Supervise until told to stop
    let mut supervisor = ConnectionSupervisor::new(
        transport,
        router,
        sender,
        shutdown,
        SupervisorSettings::from_config(&config),
    );
    supervisor.run().await;

    Ok(())
}
