//! Host-side entry point for one embedded transfer.

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::dispatcher::{DispatchOutcome, EventCallback, EventDispatcher};
use crate::events::TransferEvent;
use crate::metrics::{MetricsSnapshot, SessionMetrics};
use crate::transport::{BridgeFrame, SurfaceTransport, BRIDGE_CHANNEL};
use crate::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use transferkit_lib::{build_launch_descriptor, LaunchDescriptor, TransferConfig};

/// Binds a configuration to its launch descriptor and the subscribers that
/// observe the embedded surface.
///
/// Inbound frames are handled one at a time, in the order the transport
/// hands them over. Sign requests never block that loop: the reply travels
/// through the [`ReplyHandle`](crate::ReplyHandle) carried by the event.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use transferkit_interactive::{ChannelTransport, TransferEvent, TransferSession};
/// use transferkit_lib::{AssetSymbol, NetworkId, TransferConfig};
/// use std::sync::Arc;
///
/// let config = TransferConfig::new(
///     "partner-1",
///     NetworkId::SolanaMainnet,
///     "7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV",
///     Decimal::new(2500, 2),
///     AssetSymbol::Sol,
/// );
/// let (transport, _outbound) = ChannelTransport::new();
/// let mut session = TransferSession::new(config, Arc::new(transport))?;
/// session.on_event(|event: &TransferEvent| {
///     println!("{}", event.name());
///     Ok(())
/// });
///
/// let outcome = session.handle_raw_message(r#"{"kind":"CLOSE"}"#);
/// assert!(outcome.is_delivered());
/// # Ok::<(), transferkit_interactive::InteractiveError>(())
/// ```
pub struct TransferSession {
    config: TransferConfig,
    dispatcher: EventDispatcher,
    handlers: Vec<EventCallback>,
    metrics: Arc<SessionMetrics>,
}

impl TransferSession {
    /// Validate `config` and create a session that replies through
    /// `transport`. Diagnostics go to [`TracingSink`] until replaced.
    pub fn new(config: TransferConfig, transport: Arc<dyn SurfaceTransport>) -> Result<Self> {
        config.validate()?;

        let metrics = Arc::new(SessionMetrics::new());
        let dispatcher = EventDispatcher::new(transport, Arc::new(TracingSink), metrics.clone());

        tracing::debug!(
            partner_id = %config.partner_id,
            network = %config.network,
            environment = %config.environment,
            "transfer session created"
        );

        Ok(Self {
            config,
            dispatcher,
            handlers: Vec::new(),
            metrics,
        })
    }

    /// Route diagnostics to `sink` instead of `tracing`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.dispatcher = self.dispatcher.with_sink(sink);
        self
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// The URL the host loads into its embedding surface.
    ///
    /// Recomputed on every call.
    pub fn build_launch_descriptor(&self) -> LaunchDescriptor {
        build_launch_descriptor(&self.config)
    }

    /// Register a subscriber. Subscribers are called in registration order
    /// and cannot be removed.
    pub fn on_event<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&TransferEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Handle one raw frame received on the bridge channel.
    pub fn handle_raw_message(&self, raw: &str) -> DispatchOutcome {
        self.handle_bridge_message(BRIDGE_CHANNEL, raw)
    }

    /// Handle one raw frame received on `channel`.
    ///
    /// Frames on any channel other than [`BRIDGE_CHANNEL`] are reported and
    /// ignored without being decoded.
    pub fn handle_bridge_message(&self, channel: &str, raw: &str) -> DispatchOutcome {
        self.metrics.record_frame_received(raw.len() as u64);

        if channel != BRIDGE_CHANNEL {
            self.metrics.record_foreign_frame();
            self.dispatcher.sink().report(&Diagnostic::ForeignChannel {
                channel: channel.to_string(),
            });
            return DispatchOutcome::ForeignChannel;
        }

        self.dispatcher.dispatch(channel, raw, &self.handlers)
    }

    /// Drain `frames` until every sender is dropped.
    ///
    /// Returns how many frames produced an event.
    pub async fn run(&self, mut frames: mpsc::UnboundedReceiver<BridgeFrame>) -> usize {
        let mut delivered = 0;
        while let Some(frame) = frames.recv().await {
            if self
                .handle_bridge_message(&frame.channel, &frame.payload)
                .is_delivered()
            {
                delivered += 1;
            }
        }
        tracing::debug!(delivered, "bridge closed");
        delivered
    }

    /// Current counters for this session.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
