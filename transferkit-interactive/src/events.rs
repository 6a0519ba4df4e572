//! Events delivered to host subscribers.

use crate::codec;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::metrics::SessionMetrics;
use crate::transport::SurfaceTransport;
use crate::{InteractiveError, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use transferkit_lib::{SigningGateway, Transfer};

/// Everything the host can observe about a running session.
#[derive(Clone, Debug)]
pub enum TransferEvent {
    /// The user approved a transfer.
    TransferApproved(Transfer),
    /// A transfer settled.
    TransferComplete(Transfer),
    /// Generic failure reported to the host. No wire kind maps here; it is
    /// part of the taxonomy for host-side use.
    Error { message: String },
    ConfigurationError { message: String },
    UnsupportedNetworkError { message: String },
    UnsupportedAssetError { message: String },
    /// The surface needs a wallet-ownership signature.
    RequestSignedMessage(SignRequest),
    /// The user is done; the host should tear down the surface.
    Close,
}

impl TransferEvent {
    /// Host-facing event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransferApproved(_) => "transferApproved",
            Self::TransferComplete(_) => "transferComplete",
            Self::Error { .. } => "error",
            Self::ConfigurationError { .. } => "configurationError",
            Self::UnsupportedNetworkError { .. } => "unsupportedNetworkError",
            Self::UnsupportedAssetError { .. } => "unsupportedAssetError",
            Self::RequestSignedMessage(_) => "requestSignedMessage",
            Self::Close => "close",
        }
    }

    /// The message carried by error-shaped events.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message }
            | Self::ConfigurationError { message }
            | Self::UnsupportedNetworkError { message }
            | Self::UnsupportedAssetError { message } => Some(message.as_str()),
            _ => None,
        }
    }

    /// The transfer carried by transfer events.
    pub fn transfer(&self) -> Option<&Transfer> {
        match self {
            Self::TransferApproved(transfer) | Self::TransferComplete(transfer) => Some(transfer),
            _ => None,
        }
    }
}

/// A pending request for a signature.
#[derive(Clone, Debug)]
pub struct SignRequest {
    pub message_to_sign: String,
    pub reply: ReplyHandle,
}

impl SignRequest {
    /// Ask `gateway` to sign the challenge and send whatever it returns.
    ///
    /// A cancelled signature still produces a reply, just without a
    /// `signedMessage`.
    pub async fn fulfill(&self, gateway: &dyn SigningGateway) -> Result<()> {
        let signature = gateway.request_signature(&self.message_to_sign).await;
        self.reply.send(signature).await
    }
}

/// Single-use capability for answering one sign request.
///
/// Clones share the same guard: whichever clone sends first wins, later
/// sends fail with [`InteractiveError::ReplyAlreadySent`] and are reported
/// as [`Diagnostic::ReplyReused`]. The handle holds no session borrow, so
/// the session keeps dispatching while a reply is outstanding.
#[derive(Clone)]
pub struct ReplyHandle {
    inner: Arc<ReplyTarget>,
}

struct ReplyTarget {
    channel: String,
    transport: Arc<dyn SurfaceTransport>,
    sink: Arc<dyn DiagnosticSink>,
    metrics: Arc<SessionMetrics>,
    consumed: AtomicBool,
}

impl ReplyHandle {
    pub(crate) fn new(
        channel: impl Into<String>,
        transport: Arc<dyn SurfaceTransport>,
        sink: Arc<dyn DiagnosticSink>,
        metrics: Arc<SessionMetrics>,
    ) -> Self {
        Self {
            inner: Arc::new(ReplyTarget {
                channel: channel.into(),
                transport,
                sink,
                metrics,
                consumed: AtomicBool::new(false),
            }),
        }
    }

    /// Channel the reply will be delivered on.
    pub fn channel(&self) -> &str {
        &self.inner.channel
    }

    /// Whether a reply has already been attempted.
    pub fn is_consumed(&self) -> bool {
        self.inner.consumed.load(Ordering::Acquire)
    }

    /// Encode and deliver the signing result. `None` signals cancellation.
    ///
    /// The handle is consumed even if delivery fails; there is no retry.
    pub async fn send(&self, signed_message: Option<String>) -> Result<()> {
        let target = &self.inner;
        if target.consumed.swap(true, Ordering::AcqRel) {
            target.metrics.record_reply_reused();
            target.sink.report(&Diagnostic::ReplyReused);
            return Err(InteractiveError::ReplyAlreadySent);
        }

        let cancelled = signed_message.is_none();
        let delivery = match codec::encode_signed_message_reply(signed_message) {
            Ok(frame) => target.transport.inject(&target.channel, frame).await,
            Err(e) => Err(e),
        };

        match delivery {
            Ok(()) => {
                target.metrics.record_reply_sent();
                tracing::debug!(channel = %target.channel, cancelled, "signing reply delivered");
                Ok(())
            }
            Err(e) => {
                target.metrics.record_reply_failure();
                target.sink.report(&Diagnostic::ReplyDeliveryFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

impl fmt::Debug for ReplyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyHandle")
            .field("channel", &self.inner.channel)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}
