//! Launch URL for the embedded surface.
//!
//! The descriptor is a pure function of [`TransferConfig`]. It is rebuilt on
//! demand and never cached, so two calls with the same configuration always
//! produce byte-identical URLs.

use crate::config::TransferConfig;
use std::fmt;

/// Path appended to the environment origin.
pub const LAUNCH_PATH: &str = "/embed/transfer";

/// Client version tag sent with every launch.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render mode telling the surface it runs inside a host bridge.
pub const EMBED_MODE: &str = "embedded";

/// Fully-formed address used to initialize the embedded surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchDescriptor {
    url: String,
    query: Vec<(&'static str, String)>,
}

impl LaunchDescriptor {
    /// The absolute URL, query included.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Query parameters in the order they appear in the URL, unencoded.
    pub fn query_pairs(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Look up a single unencoded query value.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

impl fmt::Display for LaunchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl AsRef<str> for LaunchDescriptor {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// Build the launch URL for `config`.
///
/// Every configuration field is serialized as a string; the auth strategy
/// falls back to its default when unset. Values are percent-encoded.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use transferkit_lib::config::{AssetSymbol, NetworkId, TransferConfig};
/// use transferkit_lib::launch::build_launch_descriptor;
///
/// let config = TransferConfig::new(
///     "partner-1",
///     NetworkId::SolanaMainnet,
///     "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU",
///     Decimal::new(2550, 2),
///     AssetSymbol::Usdc,
/// );
/// let launch = build_launch_descriptor(&config);
/// assert!(launch.url().starts_with("https://sandbox.transferkit.app/embed/transfer?"));
/// assert_eq!(launch.query_value("sourceAmount"), Some("25.50"));
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip(config), fields(environment = %config.environment)))]
pub fn build_launch_descriptor(config: &TransferConfig) -> LaunchDescriptor {
    let query: Vec<(&'static str, String)> = vec![
        ("partnerId", config.partner_id.clone()),
        ("network", config.network.as_str().to_string()),
        ("walletAddress", config.wallet_address.clone()),
        ("sourceAmount", config.source_amount.to_string()),
        ("destinationAsset", config.destination_asset.as_str().to_string()),
        ("environment", config.environment.as_str().to_string()),
        (
            "authenticationStrategy",
            config.effective_auth_strategy().as_str().to_string(),
        ),
        ("version", PROTOCOL_VERSION.to_string()),
        ("mode", EMBED_MODE.to_string()),
    ];

    let encoded = query
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let url = format!("{}{}?{}", config.environment.origin(), LAUNCH_PATH, encoded);

    LaunchDescriptor { url, query }
}
