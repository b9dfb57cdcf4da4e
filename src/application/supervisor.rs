//! # Connection Supervisor
//!
//! The top-level state machine. Owns the transport, the session and the router, and
//! drives the connect / probe / read / dispatch cycle:
//!
//! ```text
//! Init -> Connecting -> Connected -> ShuttingDown -> Terminated
//!              ^  |          |
//!              |  v          v
//!              Backoff <-----+
//! ```
//!
//! Transport failures always lead to `Backoff` and a reconnect after a fixed delay,
//! indefinitely. Dispatch faults are absorbed where commands are dispatched and never
//! touch the connection state.

use std::collections::VecDeque;
use std::time::Duration;

use crate::application::events::EventStream;
use crate::application::parsing::parse_direct_mention;
use crate::application::router::CommandRouter;
use crate::application::sender::ResponseSender;
use crate::application::shutdown::ShutdownController;
use crate::domain::config::AppConfig;
use crate::domain::error::{DispatchFault, TransportError};
use crate::domain::traits::Transport;
use crate::domain::types::{ConnectionState, Event, EventKind, Response, Session, Transition};
use crate::strings::logs;

#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    /// Pause between loop iterations while connected.
    pub read_delay: Duration,
    /// Fixed delay before every reconnect attempt.
    pub backoff: Duration,
    pub default_channel: String,
    pub greeting: String,
}

impl SupervisorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            read_delay: config.system.read_delay(),
            backoff: config.system.backoff(),
            default_channel: config.services.slack.default_channel.clone(),
            greeting: config.services.slack.greeting.clone(),
        }
    }
}

/// Transitions kept for inspection; older ones are dropped.
const HISTORY_LIMIT: usize = 64;

/// Why a connected session ended.
enum ConnectionExit {
    Shutdown,
    Lost(TransportError),
}

/// Result of handling one event.
enum Dispatch {
    Ignored,
    Greeted,
    Replied,
    Faulted(DispatchFault),
}

pub struct ConnectionSupervisor<T: Transport> {
    transport: T,
    router: CommandRouter,
    sender: ResponseSender,
    shutdown: ShutdownController,
    settings: SupervisorSettings,
    session: Session,
    history: VecDeque<Transition>,
}

impl<T: Transport> ConnectionSupervisor<T> {
    pub fn new(
        transport: T,
        router: CommandRouter,
        sender: ResponseSender,
        shutdown: ShutdownController,
        settings: SupervisorSettings,
    ) -> Self {
        Self {
            transport,
            router,
            sender,
            shutdown,
            settings,
            session: Session::default(),
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    /// The most recent states entered, oldest first.
    pub fn history(&self) -> &VecDeque<Transition> {
        &self.history
    }

    fn enter(&mut self, state: ConnectionState) {
        tracing::info!(from = %self.session.state, to = %state, "Connection state changed");
        self.session.state = state;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(Transition {
            state,
            bot_identity: self.session.bot_identity.clone(),
        });
    }

    /// Runs until the run flag is cleared. Always ends in `Terminated`.
    pub async fn run(&mut self) -> ConnectionState {
        if !self.shutdown.is_running() {
            return self.terminate();
        }

        let backoff_secs = self.settings.backoff.as_secs();
        while self.shutdown.is_running() {
            self.enter(ConnectionState::Connecting);

            let mut handle = match self.connect().await {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::error!(error = %e, "{}", logs::could_not_connect(backoff_secs));
                    self.enter(ConnectionState::Backoff);
                    self.shutdown.pause(self.settings.backoff).await;
                    continue;
                }
            };

            tracing::info!("{}", logs::INITIALIZED);
            self.enter(ConnectionState::Connected);

            match self.serve(&mut handle).await {
                ConnectionExit::Shutdown => break,
                ConnectionExit::Lost(e) => {
                    let uptime_secs = self.session.invalidate();
                    tracing::error!(error = %e, ?uptime_secs, "{}", logs::connection_error(backoff_secs));
                    self.enter(ConnectionState::Backoff);
                    self.shutdown.pause(self.settings.backoff).await;
                }
            }
        }

        self.session.invalidate();
        self.enter(ConnectionState::ShuttingDown);
        self.terminate()
    }

    fn terminate(&mut self) -> ConnectionState {
        self.enter(ConnectionState::Terminated);
        tracing::error!("{}", logs::FATAL);
        ConnectionState::Terminated
    }

    /// Connect and resolve the bot identity; both must succeed.
    async fn connect(&mut self) -> Result<T::Handle, TransportError> {
        let handle = self.transport.connect().await?;
        let identity = self.transport.resolve_identity(&handle).await?;
        tracing::info!(bot_identity = %identity, "Resolved bot identity");
        self.session.establish(identity);
        Ok(handle)
    }

    async fn serve(&self, handle: &mut T::Handle) -> ConnectionExit {
        loop {
            if !self.shutdown.is_running() {
                return ConnectionExit::Shutdown;
            }
            if let Err(e) = self.iterate(handle).await {
                return ConnectionExit::Lost(e);
            }
            self.shutdown.pause(self.settings.read_delay).await;
        }
    }

    /// One pass: probe, read, dispatch. A dispatch fault abandons the rest of the batch.
    async fn iterate(&self, handle: &mut T::Handle) -> Result<(), TransportError> {
        self.transport.probe(handle).await?;

        let events = EventStream::new(&self.transport).poll(handle).await?;
        for event in events {
            match self.handle_event(event).await? {
                Dispatch::Faulted(fault) => {
                    tracing::info!("{}", logs::FAULT_ABSORBED);
                    tracing::error!(error = %fault, "Command failed");
                    break;
                }
                Dispatch::Greeted => {
                    tracing::debug!(channel = %self.settings.default_channel, "Sent greeting");
                }
                Dispatch::Ignored | Dispatch::Replied => {}
            }
        }
        Ok(())
    }

    async fn handle_event(&self, event: Event) -> Result<Dispatch, TransportError> {
        if event.kind == EventKind::Greeting {
            self.transport
                .send(&self.settings.default_channel, &self.settings.greeting)
                .await?;
            return Ok(Dispatch::Greeted);
        }
        if !event.is_plain_message() {
            return Ok(Dispatch::Ignored);
        }

        let Some(mention) = parse_direct_mention(&event.text) else {
            return Ok(Dispatch::Ignored);
        };
        if !self.session.is_addressed(&mention.addressed_identity) {
            return Ok(Dispatch::Ignored);
        }

        match self.router.route(&mention.remainder).await {
            Ok(text) => {
                let response = Response {
                    text,
                    channel_id: event.channel_id,
                };
                self.sender.send(&self.transport, &response).await?;
                Ok(Dispatch::Replied)
            }
            Err(fault) => Ok(Dispatch::Faulted(fault)),
        }
    }
}
