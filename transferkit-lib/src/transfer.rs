//! Transfer records reported by the embedded surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    /// User approved the transfer; funds have not settled yet.
    Approved,
    /// Funds delivered on-chain.
    Complete,
    /// Rejected by the provider or the user.
    Declined,
    /// Being executed by the provider.
    Executing,
    /// Anything the provider reports that we do not model, including
    /// status strings newer than this crate.
    #[serde(other)]
    Unknown,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Complete => "COMPLETE",
            Self::Declined => "DECLINED",
            Self::Executing => "EXECUTING",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Check if no further updates are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Declined)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transfer as reported in a `TRANSFER_UPDATE` message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub status: TransferStatus,
    /// ISO-8601 timestamp, kept verbatim.
    pub updated_at: String,
    /// On-chain transaction id. Only expected once the transfer is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_transaction_id: Option<String>,
}

impl Transfer {
    pub fn new(id: impl Into<String>, status: TransferStatus, updated_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status,
            updated_at: updated_at.into(),
            network_transaction_id: None,
        }
    }

    /// Set the on-chain transaction id.
    pub fn with_network_transaction_id(mut self, tx_id: impl Into<String>) -> Self {
        self.network_transaction_id = Some(tx_id.into());
        self
    }

    /// Parsed `updated_at`, or `None` if the provider sent something that is
    /// not RFC 3339.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.updated_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether the transaction id is present only when the transfer is
    /// complete. A complete transfer without one still passes. Advisory
    /// only; nothing rejects inconsistent records.
    pub fn has_consistent_tx_id(&self) -> bool {
        match self.status {
            TransferStatus::Complete => true,
            _ => self.network_transaction_id.is_none(),
        }
    }
}
