//! Cross-chain delivery tracking via the message scan API
//!
//! The scan API is authoritative for delivery state; this module only parses
//! and classifies what it returns. A missing record is a valid empty result,
//! not an error: it means indexing is still pending or the hash was not a
//! bridging transaction.

use std::fmt;
use std::time::Duration;

use alloy_primitives::TxHash;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{OftError, Result};
use crate::registry::Environment;

/// Message scan API environment URLs
pub const SCAN_API: &str = "https://scan.layerzero-api.com";
pub const SCAN_API_TESTNET: &str = "https://scan-testnet.layerzero-api.com";

/// Messages-by-transaction API path
pub const MESSAGES_PATH: &str = "/v1/messages/tx/";

/// Delivery state of one cross-chain message.
///
/// `Delivered`, `Failed`, and `Blocked` are terminal. Unrecognized status
/// names pass through as [`DeliveryStatus::Other`] so new upstream states
/// never turn into parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Source-chain confirmations pending.
    Confirming,
    /// Cross-chain verification in progress.
    Inflight,
    /// Destination execution completed.
    Delivered,
    /// Terminal failure, commonly insufficient destination-execution gas.
    Failed,
    /// Requires manual intervention.
    Blocked,
    /// Payload persisted awaiting manual execution.
    PayloadStored,
    /// Opaque passthrough for status names this crate does not know.
    Other(String),
}

impl DeliveryStatus {
    pub fn from_name(name: &str) -> Self {
        match name {
            "CONFIRMING" => Self::Confirming,
            "INFLIGHT" => Self::Inflight,
            "DELIVERED" => Self::Delivered,
            "FAILED" => Self::Failed,
            "BLOCKED" => Self::Blocked,
            "PAYLOAD_STORED" => Self::PayloadStored,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether polling can stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed | Self::Blocked)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirming => write!(f, "CONFIRMING"),
            Self::Inflight => write!(f, "INFLIGHT"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Blocked => write!(f, "BLOCKED"),
            Self::PayloadStored => write!(f, "PAYLOAD_STORED"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Source/destination pathway of a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pathway {
    pub src_eid: u32,
    pub dst_eid: u32,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
}

/// One side's transaction details, when indexed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideTransaction {
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub block_timestamp: Option<u64>,
}

/// Status name/message pair as returned by the scan API.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusInfo {
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// The most recent message record for a source transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    pub pathway: Pathway,
    #[serde(default)]
    pub source: Option<SideTransaction>,
    #[serde(default)]
    pub destination: Option<SideTransaction>,
    pub status: StatusInfo,
    /// Persistent message identifier emitted at send time.
    pub guid: String,
}

impl MessageRecord {
    /// Classifies the scan status name into a [`DeliveryStatus`].
    pub fn delivery_status(&self) -> DeliveryStatus {
        DeliveryStatus::from_name(&self.status.name)
    }
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    data: Vec<MessageRecord>,
}

/// Configuration for delivery polling behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Maximum number of polling attempts before giving up.
    pub max_attempts: u32,
    /// Seconds to wait between polling attempts.
    pub poll_interval_secs: u64,
}

impl Default for PollingConfig {
    /// 30 attempts, 10 seconds apart: a 5 minute ceiling that covers typical
    /// cross-chain verification times.
    fn default() -> Self {
        Self {
            max_attempts: 30,
            poll_interval_secs: 10,
        }
    }
}

impl PollingConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Total maximum wait time in seconds.
    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

/// Polls the scan API for delivery status, on demand.
#[derive(Debug, Clone)]
pub struct DeliveryTracker {
    base_url: Url,
    client: Client,
}

impl DeliveryTracker {
    /// Creates a tracker against the scan API for the given environment.
    pub fn new(environment: Environment) -> Self {
        let base = match environment {
            Environment::Mainnet => SCAN_API,
            Environment::Testnet => SCAN_API_TESTNET,
        };
        Self::with_base_url(Url::parse(base).expect("scan API url is valid"))
    }

    /// Creates a tracker against a custom base URL.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Constructs the messages-by-transaction URL for a source tx hash.
    pub fn message_url(&self, tx_hash: TxHash) -> Result<Url> {
        self.base_url
            .join(&format!("{MESSAGES_PATH}{tx_hash}"))
            .map_err(|e| OftError::InvalidUrl {
                reason: format!("failed to construct scan URL: {e}"),
            })
    }

    /// Fetches the most recent message record for a source transaction hash.
    ///
    /// `Ok(None)` means the hash is not indexed (yet); only an unreachable
    /// status source or a malformed body is an error.
    pub async fn status_by_tx(&self, tx_hash: TxHash) -> Result<Option<MessageRecord>> {
        let url = self.message_url(tx_hash)?;
        debug!(url = %url, event = "status_lookup_started");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| OftError::StatusUnavailable {
                reason: format!("scan API unreachable: {e}"),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(tx_hash = %tx_hash, event = "message_not_indexed");
            return Ok(None);
        }

        let response =
            response
                .error_for_status()
                .map_err(|e| OftError::StatusUnavailable {
                    reason: format!("scan API returned an error: {e}"),
                })?;

        let body: ScanResponse =
            response
                .json()
                .await
                .map_err(|e| OftError::StatusUnavailable {
                    reason: format!("malformed scan API response: {e}"),
                })?;

        // Most recent record first; an empty list means indexing is pending.
        let record = body.data.into_iter().next();

        match &record {
            Some(record) => info!(
                tx_hash = %tx_hash,
                guid = %record.guid,
                status = %record.delivery_status(),
                event = "status_retrieved"
            ),
            None => debug!(tx_hash = %tx_hash, event = "message_not_indexed"),
        }

        Ok(record)
    }

    /// Polls [`status_by_tx`](Self::status_by_tx) until the message reaches a
    /// terminal state or the attempt budget runs out.
    ///
    /// A hash that is never indexed exhausts the budget like any other
    /// non-terminal outcome; the caller decides whether that means failure.
    pub async fn wait_for_delivery(
        &self,
        tx_hash: TxHash,
        config: PollingConfig,
    ) -> Result<MessageRecord> {
        info!(
            tx_hash = %tx_hash,
            max_attempts = config.max_attempts,
            poll_interval_secs = config.poll_interval_secs,
            event = "delivery_wait_started"
        );

        for attempt in 1..=config.max_attempts {
            if let Some(record) = self.status_by_tx(tx_hash).await? {
                let status = record.delivery_status();
                if status.is_terminal() {
                    info!(
                        tx_hash = %tx_hash,
                        guid = %record.guid,
                        status = %status,
                        attempt,
                        event = "delivery_wait_finished"
                    );
                    return Ok(record);
                }
                debug!(tx_hash = %tx_hash, status = %status, attempt, event = "delivery_pending");
            }

            if attempt < config.max_attempts {
                tokio::time::sleep(Duration::from_secs(config.poll_interval_secs)).await;
            }
        }

        Err(OftError::StatusUnavailable {
            reason: format!(
                "message not terminal after {} attempts ({}s)",
                config.max_attempts,
                config.total_timeout_secs()
            ),
        })
    }
}
