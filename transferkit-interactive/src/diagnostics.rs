//! Local reporting for problems that never reach the host as events.
//!
//! Decode failures, discarded transfer updates, failing subscribers and
//! undeliverable replies are all recovered in place. They are handed to a
//! [`DiagnosticSink`] so the host decides where they go. [`TracingSink`] is
//! the default.

use crate::codec::DecodeError;
use std::fmt;
use transferkit_lib::TransferStatus;

/// Something the session recovered from locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A frame arrived on a channel other than the bridge channel.
    ForeignChannel { channel: String },
    /// A frame did not match the wire format.
    DecodeFailed { error: DecodeError, frame_len: usize },
    /// A transfer update whose status has no event.
    UnexpectedTransferStatus {
        transfer_id: String,
        status: TransferStatus,
    },
    /// A subscriber returned an error or panicked.
    HandlerFailed {
        /// Registration index of the subscriber.
        handler: usize,
        event: &'static str,
        reason: String,
    },
    /// A signing reply could not be handed to the transport.
    ReplyDeliveryFailed { reason: String },
    /// A reply handle was invoked after its reply was already sent.
    ReplyReused,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignChannel { channel } => {
                write!(f, "ignoring frame on foreign channel {}", channel)
            }
            Self::DecodeFailed { error, frame_len } => {
                write!(f, "dropping undecodable frame ({} bytes): {}", frame_len, error)
            }
            Self::UnexpectedTransferStatus {
                transfer_id,
                status,
            } => write!(
                f,
                "discarding transfer {} update with status {}",
                transfer_id, status
            ),
            Self::HandlerFailed {
                handler,
                event,
                reason,
            } => write!(f, "handler #{} failed on {}: {}", handler, event, reason),
            Self::ReplyDeliveryFailed { reason } => {
                write!(f, "signing reply not delivered: {}", reason)
            }
            Self::ReplyReused => write!(f, "signing reply already sent"),
        }
    }
}

/// Destination for [`Diagnostic`]s.
///
/// Any `Fn(&Diagnostic) + Send + Sync` closure is a sink.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Sink that forwards diagnostics to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::ForeignChannel { channel } => {
                tracing::debug!(channel = %channel, "{}", diagnostic);
            }
            Diagnostic::DecodeFailed { frame_len, .. } => {
                tracing::warn!(frame_len, "{}", diagnostic);
            }
            Diagnostic::UnexpectedTransferStatus {
                transfer_id,
                status,
            } => {
                tracing::warn!(transfer_id = %transfer_id, status = %status, "{}", diagnostic);
            }
            Diagnostic::HandlerFailed { handler, event, .. } => {
                tracing::warn!(handler, event, "{}", diagnostic);
            }
            Diagnostic::ReplyDeliveryFailed { .. } | Diagnostic::ReplyReused => {
                tracing::warn!("{}", diagnostic);
            }
        }
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}
