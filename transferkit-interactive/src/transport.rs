use crate::{InteractiveError, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Name of the single message channel the embedded surface posts on.
///
/// Frames arriving on any other channel are not part of this protocol.
pub const BRIDGE_CHANNEL: &str = "TransferBridge";

/// A raw string frame tagged with the channel it travelled on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeFrame {
    pub channel: String,
    pub payload: String,
}

impl BridgeFrame {
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    /// A frame on [`BRIDGE_CHANNEL`].
    pub fn on_bridge(payload: impl Into<String>) -> Self {
        Self::new(BRIDGE_CHANNEL, payload)
    }

    pub fn is_bridge(&self) -> bool {
        self.channel == BRIDGE_CHANNEL
    }
}

/// Host mechanism for injecting a string back into the embedded surface.
///
/// Implementations wrap whatever the host's web view offers (script
/// injection, `postMessage`, ...). Origin checks belong to the embedding
/// primitive, not to this trait.
#[async_trait]
pub trait SurfaceTransport: Send + Sync {
    /// Deliver `payload` to the surface on `channel`.
    async fn inject(&self, channel: &str, payload: String) -> Result<()>;
}

/// Transport that queues outbound frames on a tokio channel.
///
/// Hosts whose web view can only be touched from a UI loop drain the
/// receiver there and perform the actual injection.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<BridgeFrame>,
}

impl ChannelTransport {
    /// Create a transport and the receiver the host drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BridgeFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SurfaceTransport for ChannelTransport {
    async fn inject(&self, channel: &str, payload: String) -> Result<()> {
        self.tx
            .send(BridgeFrame::new(channel, payload))
            .map_err(|e| InteractiveError::Transport(format!("Surface channel closed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_transport_delivers_in_order() {
        let (transport, mut rx) = ChannelTransport::new();
        transport.inject(BRIDGE_CHANNEL, "one".into()).await.unwrap();
        transport.inject(BRIDGE_CHANNEL, "two".into()).await.unwrap();

        assert_eq!(rx.recv().await, Some(BridgeFrame::on_bridge("one")));
        assert_eq!(rx.recv().await, Some(BridgeFrame::on_bridge("two")));
    }

    #[tokio::test]
    async fn test_channel_transport_closed_receiver() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);
        let err = transport
            .inject(BRIDGE_CHANNEL, "lost".into())
            .await
            .unwrap_err();
        assert!(matches!(err, InteractiveError::Transport(_)));
    }

    #[test]
    fn test_bridge_frame() {
        assert!(BridgeFrame::on_bridge("{}").is_bridge());
        assert!(!BridgeFrame::new("Analytics", "{}").is_bridge());
    }
}
