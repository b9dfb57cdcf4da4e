//! In-memory transport and image lookup driven by a script, for exercising the
//! supervisor without a network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use crate::application::shutdown::{ShutdownController, ShutdownReason};
use crate::domain::error::{ImageLookupError, TransportError};
use crate::domain::traits::{ImageLookup, Transport};
use crate::domain::types::Event;

pub const BOT_ID: &str = "BOT123";

#[derive(Default)]
struct Script {
    connects: VecDeque<Result<(), TransportError>>,
    identities: VecDeque<Result<String, TransportError>>,
    probes: VecDeque<Result<(), TransportError>>,
    batches: VecDeque<Result<Vec<Event>, TransportError>>,
    send_failures: VecDeque<bool>,
    sent: Vec<(String, String)>,
    connect_calls: u32,
}

/// Each queue is consumed in order; an exhausted queue falls back to success.
/// Once the event batches run out, the transport requests shutdown `signals` times.
#[derive(Clone)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    shutdown: ShutdownController,
    signals: usize,
}

impl ScriptedTransport {
    pub fn new(shutdown: &ShutdownController) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            shutdown: shutdown.clone(),
            signals: 1,
        }
    }

    fn edit(self, f: impl FnOnce(&mut Script)) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            f(&mut *script);
        }
        self
    }

    pub fn connect_result(self, result: Result<(), TransportError>) -> Self {
        self.edit(|s| s.connects.push_back(result))
    }

    pub fn identity(self, result: Result<String, TransportError>) -> Self {
        self.edit(|s| s.identities.push_back(result))
    }

    pub fn probe_result(self, result: Result<(), TransportError>) -> Self {
        self.edit(|s| s.probes.push_back(result))
    }

    pub fn batch(self, events: Vec<Event>) -> Self {
        self.edit(|s| s.batches.push_back(Ok(events)))
    }

    pub fn read_error(self, err: TransportError) -> Self {
        self.edit(|s| s.batches.push_back(Err(err)))
    }

    pub fn send_fails(self, fail: bool) -> Self {
        self.edit(|s| s.send_failures.push_back(fail))
    }

    pub fn signals_when_drained(mut self, signals: usize) -> Self {
        self.signals = signals;
        self
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.script.lock().unwrap().sent.clone()
    }

    pub fn connect_calls(&self) -> u32 {
        self.script.lock().unwrap().connect_calls
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    type Handle = u32;

    async fn connect(&self) -> Result<u32, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.connect_calls += 1;
        let attempt = script.connect_calls;
        script.connects.pop_front().unwrap_or(Ok(())).map(|_| attempt)
    }

    async fn resolve_identity(&self, _handle: &u32) -> Result<String, TransportError> {
        let mut script = self.script.lock().unwrap();
        script
            .identities
            .pop_front()
            .unwrap_or_else(|| Ok(BOT_ID.to_string()))
    }

    async fn probe(&self, _handle: &u32) -> Result<(), TransportError> {
        self.script.lock().unwrap().probes.pop_front().unwrap_or(Ok(()))
    }

    async fn read_events(&self, _handle: &mut u32) -> Result<Vec<Event>, TransportError> {
        let next = self.script.lock().unwrap().batches.pop_front();
        match next {
            Some(batch) => batch,
            None => {
                for _ in 0..self.signals {
                    self.shutdown.request_shutdown(ShutdownReason::Interrupt);
                }
                Ok(Vec::new())
            }
        }
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), TransportError> {
        let mut script = self.script.lock().unwrap();
        if script.send_failures.pop_front().unwrap_or(false) {
            return Err(TransportError::Http("send refused".to_string()));
        }
        script.sent.push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

/// Answers every lookup with the same result.
pub struct FixedImage(pub Result<String, ImageLookupError>);

impl FixedImage {
    pub fn url(url: &str) -> Self {
        Self(Ok(url.to_string()))
    }
}

#[async_trait]
impl ImageLookup for FixedImage {
    async fn lookup(&self) -> Result<String, ImageLookupError> {
        self.0.clone()
    }
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Routes this thread's tracing output here until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
