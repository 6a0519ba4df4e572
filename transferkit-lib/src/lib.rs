//! Transferkit library.
//!
//! Data model and leaf capabilities for embedding a third-party transfer
//! experience in a host application. This crate holds no protocol state;
//! the message codec and dispatch live in `transferkit-interactive`.
//!
//! # Features
//!
//! - **Configuration**: typed, validated session configuration
//! - **Launch descriptors**: deterministic launch URL for the embedded surface
//! - **Transfers**: the transfer record and status carried by update messages
//! - **Signing boundary**: a pluggable [`SigningGateway`] and a Base58
//!   placeholder implementation
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use transferkit_lib::{build_launch_descriptor, AssetSymbol, NetworkId, TransferConfig};
//!
//! let config = TransferConfig::new(
//!     "partner-1",
//!     NetworkId::EthereumMainnet,
//!     "0x52908400098527886E0F7030069857D2E4169EE7",
//!     Decimal::new(100, 0),
//!     AssetSymbol::Eth,
//! );
//! config.validate()?;
//! let launch = build_launch_descriptor(&config);
//! assert_eq!(launch.query_value("network"), Some("eip155:1"));
//! # Ok::<(), transferkit_lib::TransferkitError>(())
//! ```

pub mod base58;
pub mod config;
pub mod errors;
pub mod launch;
pub mod signing;
pub mod transfer;

pub use config::{AssetSymbol, AuthStrategy, Environment, NetworkId, TransferConfig};
pub use errors::{TransferkitError, TransferkitErrorCode};
pub use launch::{build_launch_descriptor, LaunchDescriptor};
pub use signing::{Base58SigningGateway, DecliningSigningGateway, FnSigningGateway, SigningGateway};
pub use transfer::{Transfer, TransferStatus};

/// Common result alias for transferkit operations.
pub type Result<T> = std::result::Result<T, TransferkitError>;
