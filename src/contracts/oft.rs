//! OFT bridging contract bindings and wrapper
//!
//! Covers the three contract shapes behind a single interface: lock/unlock
//! adapters, mint/burn native tokens, and mint/burn proxies all expose the
//! same `quoteSend`/`quoteOFT`/`send` surface.

use alloy_network::Ethereum;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use tracing::{debug, info};

use IOft::IOftInstance;

/// The OFT bridging contract wrapper
///
/// Wraps one bridging contract on one chain. Quote reads are side-effect free
/// and safe to repeat; `send_transaction` only builds the request, submission
/// is the caller's job.
pub struct OftContract<P: Provider<Ethereum>> {
    instance: IOftInstance<P>,
}

impl<P: Provider<Ethereum>> OftContract<P> {
    /// Create a new OftContract wrapper
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "oft_contract_initialized"
        );
        Self {
            instance: IOftInstance::new(address, provider),
        }
    }

    /// The address of the token contract holding user balances.
    ///
    /// For adapters and proxies this differs from the bridging contract
    /// address; for mint/burn native tokens it is the contract itself.
    pub async fn token(&self) -> Result<Address, alloy_contract::Error> {
        let token = self.instance.token().call().await?;

        debug!(
            contract_address = %self.instance.address(),
            token_address = %token,
            event = "underlying_token_resolved"
        );

        Ok(token)
    }

    /// Quote the messaging fee for a send, denominated in source-chain native
    /// currency (and optionally the protocol fee token).
    pub async fn quote_send(
        &self,
        param: IOft::SendParam,
        pay_in_lz_token: bool,
    ) -> Result<IOft::MessagingFee, alloy_contract::Error> {
        let fee = self.instance.quoteSend(param, pay_in_lz_token).call().await?;

        debug!(
            contract_address = %self.instance.address(),
            native_fee = %fee.nativeFee,
            lz_token_fee = %fee.lzTokenFee,
            event = "messaging_fee_quoted"
        );

        Ok(fee)
    }

    /// Quote transfer limits, protocol fee line items, and the receipt
    /// preview for a send.
    pub async fn quote_oft(
        &self,
        param: IOft::SendParam,
    ) -> Result<IOft::quoteOFTReturn, alloy_contract::Error> {
        let preview = self.instance.quoteOFT(param).call().await?;

        debug!(
            contract_address = %self.instance.address(),
            min_amount_ld = %preview.limit.minAmountLD,
            max_amount_ld = %preview.limit.maxAmountLD,
            amount_received_ld = %preview.receipt.amountReceivedLD,
            event = "transfer_previewed"
        );

        Ok(preview)
    }

    /// Create the transaction request for the `send` function.
    ///
    /// The quoted native fee rides as `msg.value`; unused destination
    /// execution gas is refunded to `refund_address`.
    pub fn send_transaction(
        &self,
        from_address: Address,
        param: IOft::SendParam,
        fee: IOft::MessagingFee,
        refund_address: Address,
    ) -> TransactionRequest {
        let native_fee: U256 = fee.nativeFee;

        info!(
            from_address = %from_address,
            destination_eid = param.dstEid,
            amount_ld = %param.amountLD,
            min_amount_ld = %param.minAmountLD,
            native_fee = %native_fee,
            refund_address = %refund_address,
            contract_address = %self.instance.address(),
            event = "send_transaction_created"
        );

        self.instance
            .send(param, fee, refund_address)
            .from(from_address)
            .value(native_fee)
            .into_transaction_request()
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

// Minimal OFT interface: quoting, sending, and the underlying token lookup.
sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IOft {
        struct SendParam {
            uint32 dstEid;
            bytes32 to;
            uint256 amountLD;
            uint256 minAmountLD;
            bytes extraOptions;
            bytes composeMsg;
            bytes oftCmd;
        }

        struct MessagingFee {
            uint256 nativeFee;
            uint256 lzTokenFee;
        }

        struct OFTLimit {
            uint256 minAmountLD;
            uint256 maxAmountLD;
        }

        struct OFTFeeDetail {
            int256 feeAmountLD;
            string description;
        }

        struct OFTReceipt {
            uint256 amountSentLD;
            uint256 amountReceivedLD;
        }

        function token() external view returns (address);

        function quoteSend(SendParam calldata sendParam, bool payInLzToken)
            external
            view
            returns (MessagingFee memory fee);

        function quoteOFT(SendParam calldata sendParam)
            external
            view
            returns (OFTLimit memory limit, OFTFeeDetail[] memory oftFeeDetails, OFTReceipt memory receipt);

        function send(SendParam calldata sendParam, MessagingFee calldata fee, address refundAddress)
            external
            payable
            returns (bytes32 guid, uint64 nonce, uint256 amountSentLD, uint256 amountReceivedLD);

        event OFTSent(
            bytes32 indexed guid,
            uint32 dstEid,
            address indexed fromAddress,
            uint256 amountSentLD,
            uint256 amountReceivedLD
        );
    }
);
