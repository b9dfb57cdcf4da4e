//! # Slack Transport Adapter
//!
//! Implements the `Transport` trait for Slack: Web API calls (`rtm.connect`,
//! `auth.test`, `api.test`, `chat.postMessage`) over `reqwest`, and the real-time
//! event feed over the RTM websocket.

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use async_trait::async_trait;

use crate::domain::config::SlackConfig;
use crate::domain::error::TransportError;
use crate::domain::traits::Transport;
use crate::domain::types::{Event, EventKind};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on events drained from the socket in one poll.
const MAX_BATCH: usize = 100;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Generic Slack API response envelope for deserialization.
#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

/// Thin async client for the Slack Web API methods the bot needs.
#[derive(Debug, Clone)]
pub struct SlackWebClient {
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl SlackWebClient {
    pub fn new(token: String, api_base: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the websocket URL for a new RTM session.
    pub async fn rtm_connect(&self) -> Result<String, TransportError> {
        let resp = self.call("rtm.connect", None).await?;
        resp.url.ok_or_else(|| TransportError::MissingField {
            method: "rtm.connect".to_string(),
            field: "url".to_string(),
        })
    }

    /// Returns the user id the token belongs to.
    pub async fn auth_test(&self) -> Result<String, TransportError> {
        let resp = self.call("auth.test", None).await?;
        resp.user_id.ok_or_else(|| TransportError::MissingField {
            method: "auth.test".to_string(),
            field: "user_id".to_string(),
        })
    }

    pub async fn api_test(&self) -> Result<(), TransportError> {
        self.call("api.test", None).await.map(|_| ())
    }

    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), TransportError> {
        let body = serde_json::json!({
            "channel": channel,
            "text": text,
        });
        self.call("chat.postMessage", Some(&body)).await.map(|_| ())
    }

    async fn call(
        &self,
        method: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<SlackApiResponse, TransportError> {
        tracing::debug!(method, "Calling Slack API");
        let request = self
            .http
            .post(format!("{}/{method}", self.api_base))
            .bearer_auth(&self.token);
        let request = match body {
            Some(body) => request.json(body),
            None => request.header("Content-Type", "application/x-www-form-urlencoded"),
        };

        let resp = request.send().await?;
        let api_resp: SlackApiResponse = resp
            .json()
            .await
            .map_err(|e| TransportError::Decode(format!("{method} response: {e}")))?;

        if !api_resp.ok {
            return Err(TransportError::Api {
                method: method.to_string(),
                error: api_resp.error.unwrap_or_default(),
            });
        }
        Ok(api_resp)
    }
}

/// A live RTM websocket.
pub struct RtmSession {
    socket: WsStream,
    /// Set when the remote closed while a batch was still being drained.
    closed: bool,
}

impl RtmSession {
    pub fn new(socket: WsStream) -> Self {
        Self {
            socket,
            closed: false,
        }
    }
}

pub struct SlackTransport {
    web: SlackWebClient,
    poll_window: Duration,
}

impl SlackTransport {
    pub fn new(
        config: &SlackConfig,
        token: String,
        poll_window: Duration,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            web: SlackWebClient::new(token, &config.api_base)?,
            poll_window,
        })
    }
}

#[async_trait]
impl Transport for SlackTransport {
    type Handle = RtmSession;

    async fn connect(&self) -> Result<RtmSession, TransportError> {
        let url = self.web.rtm_connect().await?;
        let (socket, _response) = connect_async(url.as_str()).await?;
        tracing::info!("RTM websocket connected");
        Ok(RtmSession::new(socket))
    }

    async fn resolve_identity(&self, _handle: &RtmSession) -> Result<String, TransportError> {
        self.web.auth_test().await
    }

    async fn probe(&self, _handle: &RtmSession) -> Result<(), TransportError> {
        self.web.api_test().await
    }

    /// Drains frames until the socket stays quiet for one poll window. Events read
    /// before the remote closes are still returned; the close is reported on the
    /// next call.
    async fn read_events(&self, handle: &mut RtmSession) -> Result<Vec<Event>, TransportError> {
        if handle.closed {
            return Err(TransportError::Closed);
        }

        let mut events = Vec::new();
        while events.len() < MAX_BATCH {
            let frame = match tokio::time::timeout(self.poll_window, handle.socket.next()).await {
                Err(_) => break,
                Ok(None) => {
                    handle.closed = true;
                    break;
                }
                Ok(Some(frame)) => frame?,
            };

            match frame {
                WsMessage::Text(text) => {
                    if let Some(event) = decode_event(text.as_str()) {
                        events.push(event);
                    }
                }
                WsMessage::Ping(data) => handle.socket.send(WsMessage::Pong(data)).await?,
                WsMessage::Close(_) => {
                    handle.closed = true;
                    break;
                }
                _ => {}
            }
        }

        if handle.closed && events.is_empty() {
            return Err(TransportError::Closed);
        }
        Ok(events)
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), TransportError> {
        self.web.post_message(channel, text).await
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
}

/// Maps one RTM frame to an [`Event`]. Frames that are not JSON objects are dropped.
pub fn decode_event(raw: &str) -> Option<Event> {
    let parsed: RawEvent = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping undecodable RTM frame");
            return None;
        }
    };

    let kind = match parsed.kind.as_deref() {
        Some("message") => EventKind::Message,
        Some("hello") => return Some(Event::greeting()),
        _ => EventKind::Other,
    };
    Some(Event {
        kind,
        channel_id: parsed.channel.unwrap_or_default(),
        text: parsed.text.unwrap_or_default(),
        has_subtype: parsed.subtype.is_some(),
    })
}
