//! Routing of decoded frames to events and fan-out to subscribers.

use crate::codec::{self, DecodeError, InboundMessage};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::events::{ReplyHandle, SignRequest, TransferEvent};
use crate::metrics::SessionMetrics;
use crate::transport::SurfaceTransport;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use transferkit_lib::TransferStatus;

/// A registered subscriber.
///
/// Returning an error only affects that subscriber; the broadcast carries on.
/// Panics are caught the same way, but they still pass through the process
/// panic hook first, which by default prints to stderr. Hosts that want
/// subscriber panics silent must install their own hook with
/// [`std::panic::set_hook`].
pub type EventCallback = Arc<dyn Fn(&TransferEvent) -> anyhow::Result<()> + Send + Sync>;

/// What happened to one inbound frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// An event was broadcast.
    Delivered {
        event: &'static str,
        /// Subscribers that returned `Ok`.
        handled: usize,
        /// Subscribers that errored or panicked.
        failed: usize,
    },
    /// Decoded fine but maps to no event (unexpected transfer status).
    Discarded,
    /// The frame could not be decoded.
    Undecodable(DecodeError),
    /// The frame arrived on a channel other than the bridge.
    ForeignChannel,
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Turns decoded frames into events and fans them out to subscribers.
///
/// Holds no per-message state; each sign request gets its own
/// [`ReplyHandle`].
pub struct EventDispatcher {
    transport: Arc<dyn SurfaceTransport>,
    sink: Arc<dyn DiagnosticSink>,
    metrics: Arc<SessionMetrics>,
}

impl EventDispatcher {
    pub fn new(
        transport: Arc<dyn SurfaceTransport>,
        sink: Arc<dyn DiagnosticSink>,
        metrics: Arc<SessionMetrics>,
    ) -> Self {
        Self {
            transport,
            sink,
            metrics,
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub(crate) fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    /// Decode `raw`, route it and broadcast the resulting event.
    ///
    /// `channel` is where the frame arrived; sign-request replies go back
    /// there.
    #[tracing::instrument(skip(self, raw, handlers), fields(frame_len = raw.len()))]
    pub fn dispatch(&self, channel: &str, raw: &str, handlers: &[EventCallback]) -> DispatchOutcome {
        let message = match codec::decode(raw) {
            Ok(message) => message,
            Err(error) => {
                self.metrics.record_decode_failure();
                self.sink.report(&Diagnostic::DecodeFailed {
                    error: error.clone(),
                    frame_len: raw.len(),
                });
                return DispatchOutcome::Undecodable(error);
            }
        };

        match self.route(channel, message) {
            Some(event) => self.broadcast(&event, handlers),
            None => DispatchOutcome::Discarded,
        }
    }

    /// Map a decoded message to the single event it produces, if any.
    ///
    /// Transfer updates only produce events for `APPROVED` and `COMPLETE`;
    /// every other status is reported and dropped.
    pub fn route(&self, channel: &str, message: InboundMessage) -> Option<TransferEvent> {
        let event = match message {
            InboundMessage::RequestSignedMessage { message_to_sign } => {
                TransferEvent::RequestSignedMessage(SignRequest {
                    message_to_sign,
                    reply: ReplyHandle::new(
                        channel,
                        self.transport.clone(),
                        self.sink.clone(),
                        self.metrics.clone(),
                    ),
                })
            }
            InboundMessage::Close => TransferEvent::Close,
            InboundMessage::ConfigurationError { message } => {
                TransferEvent::ConfigurationError { message }
            }
            InboundMessage::UnsupportedAssetError { message } => {
                TransferEvent::UnsupportedAssetError { message }
            }
            InboundMessage::UnsupportedNetworkError { message } => {
                TransferEvent::UnsupportedNetworkError { message }
            }
            InboundMessage::TransferUpdate(transfer) => match transfer.status {
                TransferStatus::Approved => TransferEvent::TransferApproved(transfer),
                TransferStatus::Complete => TransferEvent::TransferComplete(transfer),
                status => {
                    self.metrics.record_transfer_discarded();
                    self.sink.report(&Diagnostic::UnexpectedTransferStatus {
                        transfer_id: transfer.id,
                        status,
                    });
                    return None;
                }
            },
        };
        Some(event)
    }

    /// Deliver `event` to every handler in registration order.
    ///
    /// Each call runs inside its own fault boundary: an `Err` or a panic is
    /// reported and the loop moves on to the next handler.
    pub fn broadcast(&self, event: &TransferEvent, handlers: &[EventCallback]) -> DispatchOutcome {
        self.metrics.record_event_emitted();
        tracing::debug!(event = event.name(), handlers = handlers.len(), "broadcasting event");

        let mut handled = 0;
        let mut failed = 0;
        for (index, handler) in handlers.iter().enumerate() {
            let reason = match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {
                    handled += 1;
                    continue;
                }
                Ok(Err(err)) => format!("{:#}", err),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };

            failed += 1;
            self.metrics.record_handler_failure();
            self.sink.report(&Diagnostic::HandlerFailed {
                handler: index,
                event: event.name(),
                reason,
            });
        }

        DispatchOutcome::Delivered {
            event: event.name(),
            handled,
            failed,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoopSink;
    use crate::transport::{ChannelTransport, BRIDGE_CHANNEL};
    use std::sync::Mutex;

    fn dispatcher() -> (EventDispatcher, Arc<SessionMetrics>) {
        let (transport, _rx) = ChannelTransport::new();
        let metrics = Arc::new(SessionMetrics::new());
        (
            EventDispatcher::new(Arc::new(transport), Arc::new(NoopSink), metrics.clone()),
            metrics,
        )
    }

    fn recorder(log: Arc<Mutex<Vec<String>>>, tag: &'static str) -> EventCallback {
        Arc::new(move |event: &TransferEvent| -> anyhow::Result<()> {
            log.lock().unwrap().push(format!("{}:{}", tag, event.name()));
            Ok(())
        })
    }

    #[test]
    fn test_route_transfer_statuses() {
        let (dispatcher, metrics) = dispatcher();
        let update = |status| {
            InboundMessage::TransferUpdate(transferkit_lib::Transfer::new(
                "tr_1",
                status,
                "2024-05-01T12:30:00Z",
            ))
        };

        assert!(matches!(
            dispatcher.route(BRIDGE_CHANNEL, update(TransferStatus::Approved)),
            Some(TransferEvent::TransferApproved(_))
        ));
        assert!(matches!(
            dispatcher.route(BRIDGE_CHANNEL, update(TransferStatus::Complete)),
            Some(TransferEvent::TransferComplete(_))
        ));
        for status in [
            TransferStatus::Declined,
            TransferStatus::Executing,
            TransferStatus::Unknown,
        ] {
            assert!(dispatcher.route(BRIDGE_CHANNEL, update(status)).is_none());
        }
        assert_eq!(metrics.snapshot().transfers_discarded, 3);
    }

    #[test]
    fn test_route_binds_reply_to_channel() {
        let (dispatcher, _) = dispatcher();
        let event = dispatcher.route(
            BRIDGE_CHANNEL,
            InboundMessage::RequestSignedMessage {
                message_to_sign: "ping".into(),
            },
        );
        match event {
            Some(TransferEvent::RequestSignedMessage(request)) => {
                assert_eq!(request.message_to_sign, "ping");
                assert_eq!(request.reply.channel(), BRIDGE_CHANNEL);
                assert!(!request.reply.is_consumed());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_broadcast_isolates_failures() {
        let (dispatcher, metrics) = dispatcher();
        let log = Arc::new(Mutex::new(Vec::new()));

        let handlers: Vec<EventCallback> = vec![
            recorder(log.clone(), "a"),
            Arc::new(|_: &TransferEvent| -> anyhow::Result<()> { anyhow::bail!("handler broke") }),
            Arc::new(|_: &TransferEvent| -> anyhow::Result<()> { panic!("handler exploded") }),
            recorder(log.clone(), "b"),
        ];

        let outcome = dispatcher.broadcast(&TransferEvent::Close, &handlers);
        assert_eq!(
            outcome,
            DispatchOutcome::Delivered {
                event: "close",
                handled: 2,
                failed: 2
            }
        );
        assert_eq!(*log.lock().unwrap(), vec!["a:close", "b:close"]);
        assert_eq!(metrics.snapshot().handler_failures, 2);
    }

    #[test]
    fn test_dispatch_undecodable() {
        let (dispatcher, metrics) = dispatcher();
        let outcome = dispatcher.dispatch(BRIDGE_CHANNEL, "{not json", &[]);
        assert!(matches!(outcome, DispatchOutcome::Undecodable(DecodeError::InvalidJson(_))));
        assert_eq!(metrics.snapshot().decode_failures, 1);
        assert_eq!(metrics.snapshot().events_emitted, 0);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
