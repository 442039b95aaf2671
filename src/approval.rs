//! Standing-approval management for lock/unlock adapters
//!
//! Mint/burn contracts move tokens without an allowance, so for those kinds
//! this module returns immediately without touching the chain. For adapters
//! it reads the current allowance and submits at most one approval
//! transaction, approving the maximum amount so later transfers skip the
//! step entirely.

use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use tracing::{debug, info};

use crate::contracts::erc20::Erc20Contract;
use crate::contracts::oft::OftContract;
use crate::error::{OftError, Result};
use crate::registry::ChainDescriptor;

/// Result of an approval check: whether a transaction was submitted, and its
/// hash when one was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub approved: bool,
    pub tx_hash: Option<TxHash>,
}

impl ApprovalOutcome {
    fn skipped() -> Self {
        Self {
            approved: false,
            tx_hash: None,
        }
    }
}

/// Whether the current allowance forces a new approval transaction.
pub(crate) fn needs_new_approval(allowance: U256, amount: U256) -> bool {
    allowance < amount
}

/// Ensures the bridging contract may move the sender's tokens.
pub struct ApprovalManager<P: Provider<Ethereum> + Clone> {
    provider: P,
}

impl<P: Provider<Ethereum> + Clone> ApprovalManager<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Checks and, when required, establishes the bridging contract's
    /// allowance for `owner`'s tokens.
    ///
    /// Idempotent as long as the on-chain allowance is unchanged: repeated
    /// calls with sufficient allowance never submit a transaction. When a
    /// transaction is needed this blocks until it confirms; the approval
    /// stays on chain even if a later transfer stage fails.
    pub async fn ensure_approved(
        &self,
        descriptor: &ChainDescriptor,
        owner: Address,
        amount: U256,
    ) -> Result<ApprovalOutcome> {
        if !descriptor.adapter_kind.requires_approval() {
            debug!(
                chain = %descriptor.chain_key,
                adapter_kind = ?descriptor.adapter_kind,
                event = "approval_not_required"
            );
            return Ok(ApprovalOutcome::skipped());
        }

        let oft = OftContract::new(descriptor.bridge_address, self.provider.clone());
        // The escrowed token may differ from the bridging contract address.
        let token_address = oft.token().await?;
        let token = Erc20Contract::new(token_address, self.provider.clone());

        let allowance = token.allowance(owner, descriptor.bridge_address).await?;
        if !needs_new_approval(allowance, amount) {
            debug!(
                owner = %owner,
                spender = %descriptor.bridge_address,
                allowance = %allowance,
                amount = %amount,
                event = "allowance_sufficient"
            );
            return Ok(ApprovalOutcome::skipped());
        }

        // Approve the maximum so subsequent transfers skip this transaction.
        let tx_request = token.approve_transaction(owner, descriptor.bridge_address, U256::MAX);

        let pending = self.provider.send_transaction(tx_request).await?;
        let tx_hash = *pending.tx_hash();

        info!(
            tx_hash = %tx_hash,
            owner = %owner,
            spender = %descriptor.bridge_address,
            event = "approval_transaction_sent"
        );

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| OftError::ApprovalFailed {
                reason: format!("approval confirmation failed: {e}"),
            })?;

        if !receipt.status() {
            return Err(OftError::ApprovalFailed {
                reason: format!("approval transaction {tx_hash} reverted"),
            });
        }

        info!(
            tx_hash = %tx_hash,
            event = "approval_confirmed"
        );

        Ok(ApprovalOutcome {
            approved: true,
            tx_hash: Some(tx_hash),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AdapterKind;
    use alloy_provider::ProviderBuilder;
    use rstest::rstest;
    use url::Url;

    #[rstest]
    #[case(AdapterKind::LockUnlock, true)]
    #[case(AdapterKind::MintBurnNative, false)]
    #[case(AdapterKind::MintBurnProxy, false)]
    fn test_approval_requirement_by_kind(#[case] kind: AdapterKind, #[case] required: bool) {
        assert_eq!(kind.requires_approval(), required);
    }

    #[tokio::test]
    async fn test_mint_burn_kind_skips_without_touching_chain() {
        // Nothing listens on this endpoint, so any RPC issued here fails the
        // test on its own.
        let provider =
            ProviderBuilder::new().connect_http("http://127.0.0.1:9".parse().unwrap());
        let descriptor = ChainDescriptor {
            chain_key: "ink".to_string(),
            chain_id: 57073,
            eid: 30339,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: Address::ZERO,
            bridge_address: Address::ZERO,
            adapter_kind: AdapterKind::MintBurnNative,
            token_decimals: 6,
            rpc_url: Url::parse("http://127.0.0.1:9").unwrap(),
        };

        let outcome = ApprovalManager::new(provider)
            .ensure_approved(&descriptor, Address::ZERO, U256::from(1_000_000u64))
            .await
            .unwrap();

        assert!(!outcome.approved);
        assert!(outcome.tx_hash.is_none());
    }

    #[test]
    fn test_sufficient_allowance_needs_no_approval() {
        let amount = U256::from(100_000_000u64);
        assert!(!needs_new_approval(amount, amount));
        assert!(!needs_new_approval(U256::MAX, amount));
    }

    #[test]
    fn test_insufficient_allowance_needs_approval() {
        assert!(needs_new_approval(
            U256::from(99_999_999u64),
            U256::from(100_000_000u64)
        ));
        assert!(needs_new_approval(U256::ZERO, U256::from(1u64)));
    }
}
