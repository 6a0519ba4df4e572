//! Signing boundary used to prove wallet ownership.
//!
//! The embedded surface sends a challenge, the host signs it with whatever
//! wallet it controls, and the result travels back as a string. `None`
//! means the user cancelled or signing failed; it is never an error.

use crate::base58;
use async_trait::async_trait;

/// A wallet capable of signing an opaque challenge.
///
/// Implementations are invoked once per sign request and must produce
/// exactly one result. There is no timeout or cancellation signal: a host
/// that gives up simply returns `None`.
#[async_trait]
pub trait SigningGateway: Send + Sync {
    /// Sign `challenge`, returning the encoded signature or `None` on
    /// cancellation/failure.
    async fn request_signature(&self, challenge: &str) -> Option<String>;
}

/// Placeholder gateway that returns the Base58 encoding of the challenge's
/// UTF-8 bytes.
///
/// This is NOT a signature. It exists so the round trip can be exercised
/// end to end without a wallet.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base58SigningGateway;

impl Base58SigningGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SigningGateway for Base58SigningGateway {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, challenge), fields(challenge_len = challenge.len())))]
    async fn request_signature(&self, challenge: &str) -> Option<String> {
        Some(base58::encode(challenge.as_bytes()))
    }
}

/// Gateway that always reports cancellation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecliningSigningGateway;

#[async_trait]
impl SigningGateway for DecliningSigningGateway {
    async fn request_signature(&self, _challenge: &str) -> Option<String> {
        None
    }
}

/// Adapter turning a synchronous closure into a [`SigningGateway`].
///
/// Useful for hosts whose wallet API is blocking or already resolved.
pub struct FnSigningGateway<F> {
    sign: F,
}

impl<F> FnSigningGateway<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    pub fn new(sign: F) -> Self {
        Self { sign }
    }
}

#[async_trait]
impl<F> SigningGateway for FnSigningGateway<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    async fn request_signature(&self, challenge: &str) -> Option<String> {
        (self.sign)(challenge)
    }
}
