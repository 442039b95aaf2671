//! Transfer orchestration: balance -> approval -> quote -> execute
//!
//! Stages are strictly ordered and fail fast; nothing is retried internally
//! and no stage undoes a prior stage's on-chain effect. An approval that
//! confirms before a later stage fails stays on chain and is reported through
//! its own log events and transaction hash.

use alloy_network::Ethereum;
use alloy_primitives::{Address, FixedBytes, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::Log;
use alloy_sol_types::SolEvent;
use bon::Builder;
use tracing::{info, warn};

use crate::approval::{ApprovalManager, ApprovalOutcome};
use crate::contracts::erc20::Erc20Contract;
use crate::contracts::oft::{IOft, OftContract};
use crate::error::{OftError, Result};
use crate::quote::{Quote, QuoteService};
use crate::registry::ChainDescriptor;
use crate::request::{format_base_units, SendRequest};

/// How the final stage concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Dry run: nothing was submitted.
    Simulated,
    /// The transfer transaction confirmed. `guid` is the bridging network's
    /// message identifier from the `OFTSent` event, or `None` when the event
    /// was absent; an identifier is never fabricated.
    Submitted {
        tx_hash: TxHash,
        guid: Option<FixedBytes<32>>,
    },
}

/// Ordered record of one transfer attempt's stage results.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// Sender balance observed in stage 1, in base units.
    pub balance: U256,
    pub approval: ApprovalOutcome,
    pub quote: Quote,
    pub execution: Execution,
}

impl TransferOutcome {
    /// The source transaction hash, absent for dry runs.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self.execution {
            Execution::Simulated => None,
            Execution::Submitted { tx_hash, .. } => Some(tx_hash),
        }
    }

    /// The cross-chain tracking identifier, when the send event carried one.
    pub fn guid(&self) -> Option<FixedBytes<32>> {
        match self.execution {
            Execution::Simulated => None,
            Execution::Submitted { guid, .. } => guid,
        }
    }
}

/// Drives a single transfer through its stages on one source chain.
#[derive(Builder)]
pub struct TransferExecutor<P: Provider<Ethereum> + Clone> {
    provider: P,
    source: ChainDescriptor,
    sender: Address,
    /// Stop after the quote stage and report a synthetic outcome.
    #[builder(default)]
    dry_run: bool,
}

impl<P: Provider<Ethereum> + Clone> TransferExecutor<P> {
    /// Executes one transfer request, stage by stage.
    pub async fn execute(&self, request: &SendRequest) -> Result<TransferOutcome> {
        info!(
            source_chain = %self.source.chain_key,
            destination_eid = request.dst_eid,
            amount_ld = %request.amount_ld,
            min_amount_ld = %request.min_amount_ld,
            sender = %self.sender,
            dry_run = self.dry_run,
            event = "transfer_started"
        );

        let oft = OftContract::new(self.source.bridge_address, self.provider.clone());

        // Stage 1: balance. Aborts before any side effect is attempted.
        let token_address = oft.token().await?;
        let token = Erc20Contract::new(token_address, self.provider.clone());
        let balance = token.balance_of(self.sender).await?;
        check_balance(balance, request.amount_ld, self.source.token_decimals)?;

        // Stage 2: approval. Blocking; its on-chain effect outlives failures
        // in later stages.
        let approval = ApprovalManager::new(self.provider.clone())
            .ensure_approved(&self.source, self.sender, request.amount_ld)
            .await?;

        // Stage 3: quote, then the slippage gate before anything irreversible.
        let quoter = QuoteService::new(OftContract::new(
            self.source.bridge_address,
            self.provider.clone(),
        ));
        let quote = quoter.quote(request).await?;
        if !quote.meets_floor(request) {
            if approval.approved {
                warn!(
                    approval_tx_hash = ?approval.tx_hash,
                    event = "approval_confirmed_before_abort"
                );
            }
            return Err(OftError::SlippageExceeded {
                previewed: quote.preview.amount_received_ld.to_string(),
                floor: request.min_amount_ld.to_string(),
            });
        }

        // Stage 4: execute or simulate.
        if self.dry_run {
            info!(event = "transfer_simulated");
            return Ok(TransferOutcome {
                balance,
                approval,
                quote,
                execution: Execution::Simulated,
            });
        }

        let fee = IOft::MessagingFee {
            nativeFee: quote.fee.native_fee,
            lzTokenFee: quote.fee.lz_token_fee,
        };
        // The sender takes any refund of unused destination-execution gas.
        let tx_request = oft.send_transaction(self.sender, request.to_send_param(), fee, self.sender);

        let pending = self.provider.send_transaction(tx_request).await?;
        let tx_hash = *pending.tx_hash();

        info!(
            tx_hash = %tx_hash,
            event = "transfer_transaction_sent"
        );

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| OftError::ExecutionFailed {
                reason: format!("transfer confirmation failed: {e}"),
            })?;

        if !receipt.status() {
            return Err(OftError::ExecutionFailed {
                reason: format!("transfer transaction {tx_hash} reverted"),
            });
        }

        let guid = oft_sent_guid(receipt.inner.logs());
        if guid.is_none() {
            warn!(
                tx_hash = %tx_hash,
                event = "oft_sent_event_missing"
            );
        }

        info!(
            tx_hash = %tx_hash,
            guid = ?guid,
            event = "transfer_confirmed"
        );

        Ok(TransferOutcome {
            balance,
            approval,
            quote,
            execution: Execution::Submitted { tx_hash, guid },
        })
    }
}

/// Stage-1 gate: the sender must hold at least the requested amount.
fn check_balance(balance: U256, required: U256, decimals: u8) -> Result<()> {
    if balance < required {
        return Err(OftError::InsufficientBalance {
            balance: format_base_units(balance, decimals),
            required: format_base_units(required, decimals),
        });
    }
    Ok(())
}

/// The message identifier from the first `OFTSent` event in the logs, if any.
fn oft_sent_guid(logs: &[Log]) -> Option<FixedBytes<32>> {
    logs.iter()
        .find(|log| {
            log.topics()
                .first()
                .is_some_and(|topic| *topic == IOft::OFTSent::SIGNATURE_HASH)
        })
        .and_then(|log| log.topics().get(1).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, LogData, B256};

    #[test]
    fn test_insufficient_balance_scenario() {
        // balance 50 tokens, requested 100 tokens
        let result = check_balance(
            U256::from(50_000_000u64),
            U256::from(100_000_000u64),
            6,
        );
        match result {
            Err(OftError::InsufficientBalance { balance, required }) => {
                assert_eq!(balance, "50");
                assert_eq!(required, "100");
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_balance_passes() {
        let amount = U256::from(100_000_000u64);
        assert!(check_balance(amount, amount, 6).is_ok());
    }

    fn log_with_topics(topics: Vec<B256>) -> Log {
        Log {
            inner: alloy_primitives::Log {
                address: Address::ZERO,
                data: LogData::new_unchecked(topics, Bytes::new()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_guid_extracted_from_oft_sent_event() {
        let guid = B256::from([0xab; 32]);
        let logs = vec![
            log_with_topics(vec![B256::from([0x01; 32])]),
            log_with_topics(vec![IOft::OFTSent::SIGNATURE_HASH, guid]),
        ];
        assert_eq!(oft_sent_guid(&logs), Some(guid));
    }

    #[test]
    fn test_missing_oft_sent_event_yields_none() {
        let logs = vec![log_with_topics(vec![B256::from([0x01; 32])])];
        assert_eq!(oft_sent_guid(&logs), None);
        assert_eq!(oft_sent_guid(&[]), None);
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = TransferOutcome {
            balance: U256::from(1u64),
            approval: ApprovalOutcome {
                approved: false,
                tx_hash: None,
            },
            quote: crate::quote::Quote {
                fee: crate::quote::MessagingFeeQuote {
                    native_fee: U256::ZERO,
                    lz_token_fee: U256::ZERO,
                },
                limits: crate::quote::TransferLimits {
                    min_amount_ld: U256::ZERO,
                    max_amount_ld: U256::MAX,
                },
                fee_lines: vec![],
                preview: crate::quote::ReceiptPreview {
                    amount_sent_ld: U256::ZERO,
                    amount_received_ld: U256::ZERO,
                },
            },
            execution: Execution::Simulated,
        };
        assert_eq!(outcome.tx_hash(), None);
        assert_eq!(outcome.guid(), None);
    }
}
