//! Transferkit Interactive Layer
//!
//! This crate implements the message bridge between a host application and
//! an embedded transfer surface: the JSON wire codec, event dispatch to host
//! subscribers, and the single-use signing reply path.
//!
//! Frames flow one way through the crate:
//!
//! ```text
//! raw string -> codec::decode -> EventDispatcher::route -> subscribers
//!                                        |
//!                                        +-> ReplyHandle -> SurfaceTransport
//! ```

use transferkit_lib::TransferkitError;

pub mod codec;
pub mod diagnostics;
pub mod dispatcher;
pub mod events;
pub mod metrics;
pub mod session;
pub mod transport;

pub use codec::{
    decode, decode_outbound, encode_signed_message_reply, DecodeError, InboundMessage,
    MessageKind, OutboundMessage, SignedMessageResult, RETURN_SIGNED_MESSAGE_RESULT,
};
pub use diagnostics::{Diagnostic, DiagnosticSink, NoopSink, TracingSink};
pub use dispatcher::{DispatchOutcome, EventCallback, EventDispatcher};
pub use events::{ReplyHandle, SignRequest, TransferEvent};
pub use metrics::{MetricsSnapshot, SessionMetrics};
pub use session::TransferSession;
pub use transport::{BridgeFrame, ChannelTransport, SurfaceTransport, BRIDGE_CHANNEL};

/// Result type for interactive operations.
pub type Result<T> = std::result::Result<T, InteractiveError>;

#[derive(thiserror::Error, Debug)]
pub enum InteractiveError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("signing reply already sent")]
    ReplyAlreadySent,
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] TransferkitError),
}

impl From<serde_json::Error> for InteractiveError {
    fn from(e: serde_json::Error) -> Self {
        InteractiveError::Serialization(e.to_string())
    }
}
