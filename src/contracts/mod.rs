//! Alloy contract bindings and wrappers
//!
//! Inline `sol!` interfaces for the on-chain surfaces the SDK touches: the
//! OFT bridging contract and the minimal ERC-20 surface needed for balance
//! and allowance handling.

pub mod erc20;
pub mod oft;
