//! Wire codec for the embedding bridge.
//!
//! Every frame is a JSON object `{ "kind": <MessageKind>, "payload": ... }`
//! where the payload shape is fixed by `kind`. All discriminant-to-payload
//! dispatch for inbound frames happens in [`decode`]; nothing else in the
//! crate looks at raw `kind` strings.
//!
//! | kind                        | payload                      |
//! |-----------------------------|------------------------------|
//! | `REQUEST_SIGNED_MESSAGE`    | `{ messageToSign: string }`  |
//! | `CLOSE`                     | none                         |
//! | `CONFIGURATION_ERROR`       | `{ message: string }`        |
//! | `UNSUPPORTED_ASSET_ERROR`   | `{ message: string }`        |
//! | `UNSUPPORTED_NETWORK_ERROR` | `{ message: string }`        |
//! | `TRANSFER_UPDATE`           | `Transfer`                   |
//!
//! The only outbound frame is `RETURN_SIGNED_MESSAGE_RESULT`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use transferkit_lib::Transfer;

/// Discriminant of the outbound signing reply.
pub const RETURN_SIGNED_MESSAGE_RESULT: &str = "RETURN_SIGNED_MESSAGE_RESULT";

/// Discriminants the embedded surface may send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    RequestSignedMessage,
    Close,
    ConfigurationError,
    UnsupportedAssetError,
    UnsupportedNetworkError,
    TransferUpdate,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        Self::RequestSignedMessage,
        Self::Close,
        Self::ConfigurationError,
        Self::UnsupportedAssetError,
        Self::UnsupportedNetworkError,
        Self::TransferUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestSignedMessage => "REQUEST_SIGNED_MESSAGE",
            Self::Close => "CLOSE",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::UnsupportedAssetError => "UNSUPPORTED_ASSET_ERROR",
            Self::UnsupportedNetworkError => "UNSUPPORTED_NETWORK_ERROR",
            Self::TransferUpdate => "TRANSFER_UPDATE",
        }
    }

    /// Look up a wire discriminant.
    pub fn from_wire(kind: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == kind)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a frame could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("frame is not a JSON object")]
    NotAnObject,
    #[error("frame has no kind")]
    MissingKind,
    #[error("unknown message kind: {0}")]
    UnknownKind(String),
    #[error("{0} requires a payload")]
    MissingPayload(&'static str),
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload { kind: &'static str, reason: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignRequestPayload {
    message_to_sign: String,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

/// A decoded frame from the embedded surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundMessage {
    /// The surface wants the host to sign a wallet-ownership challenge.
    RequestSignedMessage { message_to_sign: String },
    /// The user finished or dismissed the flow.
    Close,
    /// The surface rejected the launch configuration.
    ConfigurationError { message: String },
    UnsupportedAssetError { message: String },
    UnsupportedNetworkError { message: String },
    /// A transfer changed state.
    TransferUpdate(Transfer),
}

impl InboundMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::RequestSignedMessage { .. } => MessageKind::RequestSignedMessage,
            Self::Close => MessageKind::Close,
            Self::ConfigurationError { .. } => MessageKind::ConfigurationError,
            Self::UnsupportedAssetError { .. } => MessageKind::UnsupportedAssetError,
            Self::UnsupportedNetworkError { .. } => MessageKind::UnsupportedNetworkError,
            Self::TransferUpdate(_) => MessageKind::TransferUpdate,
        }
    }
}

/// Payload of the signing reply. `None` means the user cancelled or
/// signing failed; the key is then left out of the JSON entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessageResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_message: Option<String>,
}

/// Frames sent back to the embedded surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum OutboundMessage {
    #[serde(rename = "RETURN_SIGNED_MESSAGE_RESULT")]
    ReturnSignedMessageResult(SignedMessageResult),
}

impl OutboundMessage {
    /// Build a signing reply.
    pub fn signed_message_reply(signed_message: Option<String>) -> Self {
        Self::ReturnSignedMessageResult(SignedMessageResult { signed_message })
    }

    pub fn encode(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The signature carried by a signing reply.
    pub fn signed_message(&self) -> Option<&str> {
        match self {
            Self::ReturnSignedMessageResult(result) => result.signed_message.as_deref(),
        }
    }
}

/// Decode one inbound frame.
///
/// Never panics; any frame that does not match the kind table comes back as
/// a [`DecodeError`].
pub fn decode(raw: &str) -> Result<InboundMessage, DecodeError> {
    let (kind, payload) = split_envelope(raw)?;
    let kind = MessageKind::from_wire(&kind).ok_or(DecodeError::UnknownKind(kind))?;

    let message = match kind {
        MessageKind::RequestSignedMessage => {
            let payload: SignRequestPayload = payload_as(kind.as_str(), payload)?;
            InboundMessage::RequestSignedMessage {
                message_to_sign: payload.message_to_sign,
            }
        }
        MessageKind::Close => InboundMessage::Close,
        MessageKind::ConfigurationError => InboundMessage::ConfigurationError {
            message: payload_as::<ErrorPayload>(kind.as_str(), payload)?.message,
        },
        MessageKind::UnsupportedAssetError => InboundMessage::UnsupportedAssetError {
            message: payload_as::<ErrorPayload>(kind.as_str(), payload)?.message,
        },
        MessageKind::UnsupportedNetworkError => InboundMessage::UnsupportedNetworkError {
            message: payload_as::<ErrorPayload>(kind.as_str(), payload)?.message,
        },
        MessageKind::TransferUpdate => {
            InboundMessage::TransferUpdate(payload_as(kind.as_str(), payload)?)
        }
    };

    Ok(message)
}

/// Encode the signing reply for `signed_message`.
///
/// ```
/// use transferkit_interactive::codec::encode_signed_message_reply;
///
/// assert_eq!(
///     encode_signed_message_reply(Some("sig123".into())).unwrap(),
///     r#"{"kind":"RETURN_SIGNED_MESSAGE_RESULT","payload":{"signedMessage":"sig123"}}"#
/// );
/// assert_eq!(
///     encode_signed_message_reply(None).unwrap(),
///     r#"{"kind":"RETURN_SIGNED_MESSAGE_RESULT","payload":{}}"#
/// );
/// ```
pub fn encode_signed_message_reply(signed_message: Option<String>) -> crate::Result<String> {
    OutboundMessage::signed_message_reply(signed_message).encode()
}

/// Decode a frame produced by [`encode_signed_message_reply`].
pub fn decode_outbound(raw: &str) -> Result<OutboundMessage, DecodeError> {
    let (kind, payload) = split_envelope(raw)?;
    if kind != RETURN_SIGNED_MESSAGE_RESULT {
        return Err(DecodeError::UnknownKind(kind));
    }
    let result: SignedMessageResult = payload_as(RETURN_SIGNED_MESSAGE_RESULT, payload)?;
    Ok(OutboundMessage::ReturnSignedMessageResult(result))
}

fn split_envelope(raw: &str) -> Result<(String, Option<Value>), DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let mut object: Map<String, Value> = match value {
        Value::Object(object) => object,
        _ => return Err(DecodeError::NotAnObject),
    };

    let kind = match object.remove("kind") {
        Some(Value::String(kind)) => kind,
        Some(other) => return Err(DecodeError::UnknownKind(other.to_string())),
        None => return Err(DecodeError::MissingKind),
    };

    // `"payload": null` is treated the same as no payload.
    let payload = object.remove("payload").filter(|p| !p.is_null());

    Ok((kind, payload))
}

fn payload_as<T: DeserializeOwned>(
    kind: &'static str,
    payload: Option<Value>,
) -> Result<T, DecodeError> {
    let payload = payload.ok_or(DecodeError::MissingPayload(kind))?;
    serde_json::from_value(payload).map_err(|e| DecodeError::MalformedPayload {
        kind,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use transferkit_lib::TransferStatus;

    #[test]
    fn test_decode_request_signed_message() {
        let msg = decode(r#"{"kind":"REQUEST_SIGNED_MESSAGE","payload":{"messageToSign":"ping"}}"#)
            .unwrap();
        assert_eq!(
            msg,
            InboundMessage::RequestSignedMessage {
                message_to_sign: "ping".into()
            }
        );
        assert_eq!(msg.kind(), MessageKind::RequestSignedMessage);
    }

    #[test]
    fn test_decode_close_without_payload() {
        assert_eq!(decode(r#"{"kind":"CLOSE"}"#).unwrap(), InboundMessage::Close);
        assert_eq!(
            decode(r#"{"kind":"CLOSE","payload":null}"#).unwrap(),
            InboundMessage::Close
        );
    }

    #[test]
    fn test_decode_error_kinds() {
        let cases = [
            ("CONFIGURATION_ERROR", MessageKind::ConfigurationError),
            ("UNSUPPORTED_ASSET_ERROR", MessageKind::UnsupportedAssetError),
            ("UNSUPPORTED_NETWORK_ERROR", MessageKind::UnsupportedNetworkError),
        ];
        for (wire, kind) in cases {
            let raw = format!(r#"{{"kind":"{}","payload":{{"message":"nope"}}}}"#, wire);
            let msg = decode(&raw).unwrap();
            assert_eq!(msg.kind(), kind);
        }
    }

    #[test]
    fn test_decode_transfer_update() {
        let raw = r#"{"kind":"TRANSFER_UPDATE","payload":{"id":"tr_1","status":"COMPLETE","updatedAt":"2024-05-01T12:30:00Z","networkTransactionId":"0xabc"}}"#;
        match decode(raw).unwrap() {
            InboundMessage::TransferUpdate(transfer) => {
                assert_eq!(transfer.id, "tr_1");
                assert_eq!(transfer.status, TransferStatus::Complete);
                assert_eq!(transfer.network_transaction_id.as_deref(), Some("0xabc"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(decode("{not json"), Err(DecodeError::InvalidJson(_))));
        assert_eq!(decode("[1,2]"), Err(DecodeError::NotAnObject));
        assert_eq!(decode(r#"{"payload":{}}"#), Err(DecodeError::MissingKind));
        assert_eq!(
            decode(r#"{"kind":"LAUNCH_ROCKET"}"#),
            Err(DecodeError::UnknownKind("LAUNCH_ROCKET".into()))
        );
        assert_eq!(
            decode(r#"{"kind":42}"#),
            Err(DecodeError::UnknownKind("42".into()))
        );
        assert_eq!(
            decode(r#"{"kind":"REQUEST_SIGNED_MESSAGE"}"#),
            Err(DecodeError::MissingPayload("REQUEST_SIGNED_MESSAGE"))
        );
        assert!(matches!(
            decode(r#"{"kind":"CONFIGURATION_ERROR","payload":{"msg":"x"}}"#),
            Err(DecodeError::MalformedPayload { kind: "CONFIGURATION_ERROR", .. })
        ));
        assert!(matches!(
            decode(r#"{"kind":"TRANSFER_UPDATE","payload":{"id":"tr_1"}}"#),
            Err(DecodeError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_outbound_kind_is_not_inbound() {
        let raw = encode_signed_message_reply(Some("abc".into())).unwrap();
        assert_eq!(
            decode(&raw),
            Err(DecodeError::UnknownKind(RETURN_SIGNED_MESSAGE_RESULT.into()))
        );
    }

    #[test]
    fn test_reply_round_trip() {
        let raw = encode_signed_message_reply(Some("abc".into())).unwrap();
        assert_eq!(decode_outbound(&raw).unwrap().signed_message(), Some("abc"));

        let raw = encode_signed_message_reply(None).unwrap();
        assert!(!raw.contains("signedMessage"));
        assert_eq!(decode_outbound(&raw).unwrap().signed_message(), None);

        let raw = encode_signed_message_reply(Some(String::new())).unwrap();
        assert_eq!(decode_outbound(&raw).unwrap().signed_message(), Some(""));
    }

    #[test]
    fn test_serde_derive_matches_manual_decode() {
        let msg = OutboundMessage::signed_message_reply(Some("sig".into()));
        let json = serde_json::to_string(&msg).unwrap();
        let back: OutboundMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
        assert_eq!(decode_outbound(&json).unwrap(), msg);
    }
}
