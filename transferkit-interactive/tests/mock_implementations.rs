use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use transferkit_interactive::{
    BridgeFrame, Diagnostic, DiagnosticSink, InteractiveError, Result, SurfaceTransport,
    TransferEvent,
};

/// Transport that keeps every injected frame in memory
#[derive(Clone, Default)]
pub struct RecordingTransport {
    frames: Arc<Mutex<Vec<BridgeFrame>>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<BridgeFrame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.frames().into_iter().map(|f| f.payload).collect()
    }
}

#[async_trait]
impl SurfaceTransport for RecordingTransport {
    async fn inject(&self, channel: &str, payload: String) -> Result<()> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|e| InteractiveError::Transport(format!("Mutex poisoned: {}", e)))?;
        frames.push(BridgeFrame::new(channel, payload));
        Ok(())
    }
}

/// Transport whose surface has gone away
#[allow(dead_code)]
pub struct FailingTransport;

#[async_trait]
impl SurfaceTransport for FailingTransport {
    async fn inject(&self, _channel: &str, _payload: String) -> Result<()> {
        Err(InteractiveError::Transport("surface unloaded".into()))
    }
}

/// Sink that records every diagnostic
#[derive(Clone, Default)]
pub struct RecordingSink {
    seen: Arc<Mutex<Vec<Diagnostic>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.seen.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.seen.lock().unwrap().push(diagnostic.clone());
    }
}

/// Shared log of events seen by test subscribers
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<(String, TransferEvent)>>>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber that appends `(tag, event)` to this log.
    pub fn subscriber(
        &self,
        tag: &str,
    ) -> impl Fn(&TransferEvent) -> anyhow::Result<()> + Send + Sync + 'static {
        let events = self.events.clone();
        let tag = tag.to_string();
        move |event: &TransferEvent| -> anyhow::Result<()> {
            events.lock().unwrap().push((tag.clone(), event.clone()));
            Ok(())
        }
    }

    pub fn events(&self) -> Vec<(String, TransferEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// `tag:eventName` for every recorded delivery.
    pub fn names(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|(tag, event)| format!("{}:{}", tag, event.name()))
            .collect()
    }
}
