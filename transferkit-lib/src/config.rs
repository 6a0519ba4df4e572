//! Session configuration supplied by the host.
//!
//! A [`TransferConfig`] is built once, validated, and then only read. Its
//! field names match the launch URL query keys so the same JSON a host ships
//! to its web layer can be deserialized here directly.

use crate::{Result, TransferkitError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Origin used for `Environment::Sandbox` launches.
pub const SANDBOX_ORIGIN: &str = "https://sandbox.transferkit.app";

/// Origin used for `Environment::Production` launches.
pub const PRODUCTION_ORIGIN: &str = "https://app.transferkit.app";

/// Deployment the embedded surface is loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test deployment, no real funds move.
    #[default]
    Sandbox,
    /// Live deployment.
    Production,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Self::Sandbox, Self::Production];

    /// Wire token used in the launch query.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    /// Base origin the launch URL is built on.
    pub fn origin(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_ORIGIN,
            Self::Production => PRODUCTION_ORIGIN,
        }
    }
}

/// Chain namespace the destination wallet lives on.
///
/// Tokens follow CAIP-2 (`namespace:reference`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    #[serde(rename = "eip155:1")]
    EthereumMainnet,
    #[serde(rename = "eip155:137")]
    PolygonMainnet,
    #[serde(rename = "eip155:8453")]
    BaseMainnet,
    #[serde(rename = "eip155:42161")]
    ArbitrumMainnet,
    #[serde(rename = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp")]
    SolanaMainnet,
}

impl NetworkId {
    pub const ALL: [NetworkId; 5] = [
        Self::EthereumMainnet,
        Self::PolygonMainnet,
        Self::BaseMainnet,
        Self::ArbitrumMainnet,
        Self::SolanaMainnet,
    ];

    /// The fixed CAIP-2 token for this network.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EthereumMainnet => "eip155:1",
            Self::PolygonMainnet => "eip155:137",
            Self::BaseMainnet => "eip155:8453",
            Self::ArbitrumMainnet => "eip155:42161",
            Self::SolanaMainnet => "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
        }
    }

    /// Namespace half of the token (`eip155`, `solana`).
    pub fn namespace(&self) -> &'static str {
        self.as_str().split(':').next().unwrap_or_default()
    }
}

/// Asset delivered to the destination wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetSymbol {
    Sol,
    Eth,
    Usdc,
    Usdt,
    Pol,
}

impl AssetSymbol {
    pub const ALL: [AssetSymbol; 5] = [Self::Sol, Self::Eth, Self::Usdc, Self::Usdt, Self::Pol];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sol => "SOL",
            Self::Eth => "ETH",
            Self::Usdc => "USDC",
            Self::Usdt => "USDT",
            Self::Pol => "POL",
        }
    }
}

/// How the embedded surface authenticates the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
    /// Prove wallet ownership by signing a challenge through the host.
    #[default]
    Wallet,
    /// One-time code sent by email.
    Email,
}

impl AuthStrategy {
    pub const ALL: [AuthStrategy; 2] = [Self::Wallet, Self::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::Email => "email",
        }
    }
}

macro_rules! impl_token_traits {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TransferkitError;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == s)
                    .ok_or_else(|| TransferkitError::unsupported($kind, s))
            }
        }
    };
}

impl_token_traits!(Environment, "environment");
impl_token_traits!(NetworkId, "network");
impl_token_traits!(AssetSymbol, "asset");
impl_token_traits!(AuthStrategy, "authentication strategy");

/// Caller-supplied configuration for one transfer session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferConfig {
    /// Opaque partner identifier issued by the transfer provider.
    pub partner_id: String,
    /// Chain the destination wallet lives on.
    pub network: NetworkId,
    /// Destination wallet. Compatibility with `network` is checked remotely.
    pub wallet_address: String,
    /// Fiat amount, sent as plain decimal text.
    pub source_amount: Decimal,
    pub destination_asset: AssetSymbol,
    #[serde(default)]
    pub environment: Environment,
    /// Falls back to [`AuthStrategy::default`] in the launch URL when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_strategy: Option<AuthStrategy>,
}

impl TransferConfig {
    /// Create a sandbox configuration with the default auth strategy.
    pub fn new(
        partner_id: impl Into<String>,
        network: NetworkId,
        wallet_address: impl Into<String>,
        source_amount: Decimal,
        destination_asset: AssetSymbol,
    ) -> Self {
        Self {
            partner_id: partner_id.into(),
            network,
            wallet_address: wallet_address.into(),
            source_amount,
            destination_asset,
            environment: Environment::default(),
            authentication_strategy: None,
        }
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the authentication strategy.
    pub fn with_auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.authentication_strategy = Some(strategy);
        self
    }

    /// The strategy the launch URL will carry.
    pub fn effective_auth_strategy(&self) -> AuthStrategy {
        self.authentication_strategy.unwrap_or_default()
    }

    /// Parse a configuration from host-supplied JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields this crate is able to check locally.
    ///
    /// Wallet/network compatibility is left to the embedded surface.
    pub fn validate(&self) -> Result<()> {
        if self.partner_id.trim().is_empty() {
            return Err(TransferkitError::invalid_data(
                "partnerId",
                "must not be empty",
            ));
        }
        if self.wallet_address.trim().is_empty() {
            return Err(TransferkitError::invalid_data(
                "walletAddress",
                "must not be empty",
            ));
        }
        if self.source_amount.is_sign_negative() {
            return Err(TransferkitError::invalid_data(
                "sourceAmount",
                format!("must not be negative, got {}", self.source_amount),
            ));
        }
        Ok(())
    }
}
