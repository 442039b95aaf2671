//! Messaging-fee and protocol-preview quoting
//!
//! A quote is two reads against the same request: the messaging fee
//! (`quoteSend`) and the protocol preview (`quoteOFT`). They succeed or fail
//! together; a partial quote is never returned. Quotes are ephemeral and
//! fetched immediately before execution.

use alloy_network::Ethereum;
use alloy_primitives::{I256, U256};
use alloy_provider::Provider;
use tracing::info;

use crate::contracts::oft::OftContract;
use crate::error::{OftError, Result};
use crate::request::SendRequest;

/// Messaging fee for relaying the cross-chain message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagingFeeQuote {
    /// Cost in source-chain native currency.
    pub native_fee: U256,
    /// Cost in the protocol fee token, when paying in it; zero otherwise.
    pub lz_token_fee: U256,
}

/// Protocol transfer limits in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLimits {
    pub min_amount_ld: U256,
    pub max_amount_ld: U256,
}

/// One named protocol fee line item; negative amounts are rebates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeLine {
    pub amount_ld: I256,
    pub description: String,
}

/// Amount sent vs. amount the recipient is expected to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPreview {
    pub amount_sent_ld: U256,
    pub amount_received_ld: U256,
}

/// A complete, mutually consistent quote for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub fee: MessagingFeeQuote,
    pub limits: TransferLimits,
    pub fee_lines: Vec<FeeLine>,
    pub preview: ReceiptPreview,
}

impl Quote {
    /// Whether the previewed receipt clears the request's slippage floor.
    pub fn meets_floor(&self, request: &SendRequest) -> bool {
        self.preview.amount_received_ld >= request.min_amount_ld
    }
}

/// Read-only quoting against one bridging contract.
///
/// Safe to call repeatedly; never retried internally. RPC failures surface as
/// [`OftError::QuoteFailed`] and the caller decides whether to retry.
pub struct QuoteService<P: Provider<Ethereum>> {
    oft: OftContract<P>,
}

impl<P: Provider<Ethereum>> QuoteService<P> {
    pub fn new(oft: OftContract<P>) -> Self {
        Self { oft }
    }

    /// Fetches the messaging fee and the protocol preview for one request.
    pub async fn quote(&self, request: &SendRequest) -> Result<Quote> {
        let fee = self
            .oft
            .quote_send(request.to_send_param(), false)
            .await
            .map_err(|e| OftError::QuoteFailed {
                reason: format!("messaging fee read failed: {e}"),
            })?;

        let preview = self
            .oft
            .quote_oft(request.to_send_param())
            .await
            .map_err(|e| OftError::QuoteFailed {
                reason: format!("protocol preview read failed: {e}"),
            })?;

        let quote = Quote {
            fee: MessagingFeeQuote {
                native_fee: fee.nativeFee,
                lz_token_fee: fee.lzTokenFee,
            },
            limits: TransferLimits {
                min_amount_ld: preview.limit.minAmountLD,
                max_amount_ld: preview.limit.maxAmountLD,
            },
            fee_lines: preview
                .oftFeeDetails
                .into_iter()
                .map(|d| FeeLine {
                    amount_ld: d.feeAmountLD,
                    description: d.description,
                })
                .collect(),
            preview: ReceiptPreview {
                amount_sent_ld: preview.receipt.amountSentLD,
                amount_received_ld: preview.receipt.amountReceivedLD,
            },
        };

        info!(
            contract_address = %self.oft.address(),
            native_fee = %quote.fee.native_fee,
            amount_sent_ld = %quote.preview.amount_sent_ld,
            amount_received_ld = %quote.preview.amount_received_ld,
            fee_line_count = quote.fee_lines.len(),
            event = "quote_obtained"
        );

        Ok(quote)
    }
}
