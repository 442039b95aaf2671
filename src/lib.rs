//! # oft-rs
//!
//! A Rust SDK for moving a stablecoin between blockchain networks connected
//! through OFT (Omnichain Fungible Token) bridging meshes.
//!
//! Two bridging networks exist side by side: a lock/unlock adapter mesh and a
//! mint/burn mesh. They are not directly interconnected, and some chains sit
//! in both under different contract addresses. This crate reconciles the two
//! topologies behind one uniform transfer operation: it resolves which mesh
//! connects a chain pair, builds a protocol-correct request with slippage
//! protection and destination-gas accounting, sequences the money-moving
//! steps in a safe order, and tracks delivery through the scan API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oft_rs::{
//!     ChainRegistry, Environment, MeshRouter, RoutingBackend, SendRequest,
//!     TransferExecutor, TransferParams,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # use alloy_provider::ProviderBuilder;
//! let registry = ChainRegistry::builtin(Environment::Mainnet);
//! let router = MeshRouter::new(&registry, RoutingBackend::Protocol);
//!
//! // Which mesh connects the pair, and through which contracts?
//! let route = router.resolve("ethereum", "arbitrum")?;
//!
//! // Canonical request: base-unit amount, slippage floor, receive gas.
//! let params = TransferParams::builder()
//!     .amount("100")
//!     .recipient("0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d".parse()?)
//!     .build();
//! let request = SendRequest::build(&params, &route.destination)?;
//!
//! // Balance -> approval -> quote -> execute, fail-fast.
//! let provider = ProviderBuilder::new().connect("http://localhost:8545").await?;
//! let executor = TransferExecutor::builder()
//!     .provider(provider)
//!     .source(route.source)
//!     .sender("0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d".parse()?)
//!     .build();
//! let outcome = executor.execute(&request).await?;
//! println!("sent: {:?}, guid: {:?}", outcome.tx_hash(), outcome.guid());
//! # Ok(())
//! # }
//! ```
//!
//! ## Tracking delivery
//!
//! ```rust,no_run
//! use oft_rs::{DeliveryTracker, Environment};
//! use alloy_primitives::FixedBytes;
//!
//! # async fn example() -> Result<(), oft_rs::OftError> {
//! let tracker = DeliveryTracker::new(Environment::Mainnet);
//! let tx_hash = FixedBytes::from([0u8; 32]);
//! match tracker.status_by_tx(tx_hash).await? {
//!     Some(record) => println!("status: {}", record.delivery_status()),
//!     None => println!("not indexed yet"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`ChainRegistry`], [`ChainDescriptor`], [`MeshId`], [`AdapterKind`],
//!   [`Environment`] - chain configuration and mesh membership
//! - [`MeshRouter`], [`RoutePair`], [`RoutingBackend`] - route resolution
//! - [`TransferParams`], [`SendRequest`] - canonical request construction
//! - [`QuoteService`], [`Quote`] - messaging fee and protocol preview
//! - [`ApprovalManager`], [`ApprovalOutcome`] - standing-approval handling
//! - [`TransferExecutor`], [`TransferOutcome`], [`Execution`] - orchestration
//! - [`DeliveryTracker`], [`DeliveryStatus`], [`MessageRecord`] - tracking
//! - [`OftError`] and [`Result`] - error types

mod approval;
mod contracts;
mod error;
mod executor;
mod plan;
mod quote;
mod registry;
mod request;
mod router;
mod tracker;

pub use approval::{ApprovalManager, ApprovalOutcome};
pub use contracts::{erc20::Erc20Contract, oft::OftContract};
pub use error::{OftError, Result};
pub use executor::{Execution, TransferExecutor, TransferOutcome};
pub use plan::{select_plan, ExecutionPlan, PlanStep};
pub use quote::{FeeLine, MessagingFeeQuote, Quote, QuoteService, ReceiptPreview, TransferLimits};
pub use registry::{
    AdapterKind, ChainDescriptor, ChainRegistry, Environment, MeshId, STABLECOIN_DECIMALS,
};
pub use request::{
    format_base_units, lz_receive_options, min_amount_after_slippage, parse_base_units,
    SendRequest, TransferParams, DEFAULT_RECEIVE_GAS,
};
pub use router::{MeshRouter, RoutePair, RoutingBackend};
pub use tracker::{
    DeliveryStatus, DeliveryTracker, MessageRecord, Pathway, PollingConfig, SideTransaction,
    StatusInfo, MESSAGES_PATH, SCAN_API, SCAN_API_TESTNET,
};
