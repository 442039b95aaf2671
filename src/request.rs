//! Canonical transfer-request construction
//!
//! Amounts are integer base units end to end; decimal strings are parsed
//! exactly and excess fractional digits are rejected rather than truncated.
//! The recipient travels as a 32-byte left-zero-padded value so the request
//! shape is uniform across chain families.

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use bon::Builder;

use crate::contracts::oft::IOft;
use crate::error::{OftError, Result};
use crate::registry::ChainDescriptor;

/// Destination-execution gas granted to the receive-side call when the caller
/// does not override it.
pub const DEFAULT_RECEIVE_GAS: u128 = 200_000;

/// Caller-facing transfer parameters, prior to routing and encoding.
#[derive(Builder, Debug, Clone)]
pub struct TransferParams {
    /// Decimal amount string, e.g. `"100"` or `"0.25"`.
    #[builder(into)]
    pub amount: String,
    /// Recipient in its chain-native address form.
    pub recipient: Address,
    /// Slippage tolerance in percent; must be in `[0, 100)`.
    #[builder(default = 0.5)]
    pub slippage_percent: f64,
    /// Receive-side execution gas limit; must be positive.
    #[builder(default = DEFAULT_RECEIVE_GAS)]
    pub receive_gas: u128,
}

/// The canonical transfer request consumed by quoting and execution.
///
/// Immutable once built. `compose_msg` and `oft_cmd` are always empty for
/// simple transfers; they exist so the wire struct round-trips losslessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub dst_eid: u32,
    pub to: FixedBytes<32>,
    pub amount_ld: U256,
    pub min_amount_ld: U256,
    pub extra_options: Bytes,
    pub compose_msg: Bytes,
    pub oft_cmd: Bytes,
}

impl SendRequest {
    /// Builds a request against a resolved destination descriptor.
    pub fn build(params: &TransferParams, destination: &ChainDescriptor) -> Result<Self> {
        let amount_ld = parse_base_units(&params.amount, destination.token_decimals)?;
        if amount_ld.is_zero() {
            return Err(OftError::InvalidAmount {
                reason: "amount must be positive".to_string(),
            });
        }
        if params.receive_gas == 0 {
            return Err(OftError::InvalidAmount {
                reason: "receive gas must be positive".to_string(),
            });
        }

        let min_amount_ld = min_amount_after_slippage(amount_ld, params.slippage_percent)?;

        Ok(Self {
            dst_eid: destination.eid,
            to: params.recipient.into_word(),
            amount_ld,
            min_amount_ld,
            extra_options: lz_receive_options(params.receive_gas),
            compose_msg: Bytes::new(),
            oft_cmd: Bytes::new(),
        })
    }

    /// The on-wire send parameter struct.
    pub fn to_send_param(&self) -> IOft::SendParam {
        IOft::SendParam {
            dstEid: self.dst_eid,
            to: self.to,
            amountLD: self.amount_ld,
            minAmountLD: self.min_amount_ld,
            extraOptions: self.extra_options.clone(),
            composeMsg: self.compose_msg.clone(),
            oftCmd: self.oft_cmd.clone(),
        }
    }
}

/// Parses a decimal amount string into integer base units.
///
/// Fails on non-numeric input, negative values, and fractional digits beyond
/// what the token carries; an amount that cannot be represented exactly is an
/// error, never a rounding.
pub fn parse_base_units(s: &str, decimals: u8) -> Result<U256> {
    let s = s.trim();
    if s.is_empty() || s == "." {
        return Err(OftError::InvalidAmount {
            reason: format!("not a decimal number: {s:?}"),
        });
    }
    if s.starts_with('-') {
        return Err(OftError::InvalidAmount {
            reason: "amount must not be negative".to_string(),
        });
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(OftError::InvalidAmount {
            reason: format!("not a decimal number: {s:?}"),
        });
    }
    if frac_part.len() > decimals as usize {
        return Err(OftError::InvalidAmount {
            reason: format!(
                "{} fractional digits exceed the token's {decimals} decimals",
                frac_part.len()
            ),
        });
    }

    let scale = U256::from(10u64).pow(U256::from(decimals));
    let int_units = U256::from_str_radix(if int_part.is_empty() { "0" } else { int_part }, 10)
        .map_err(|_| OftError::InvalidAmount {
            reason: format!("integer part out of range: {int_part:?}"),
        })?
        .checked_mul(scale)
        .ok_or_else(|| OftError::InvalidAmount {
            reason: "amount overflows".to_string(),
        })?;

    let mut frac_units = U256::ZERO;
    if !frac_part.is_empty() {
        let padding = decimals as usize - frac_part.len();
        frac_units = U256::from_str_radix(frac_part, 10).map_err(|_| OftError::InvalidAmount {
            reason: format!("fractional part out of range: {frac_part:?}"),
        })? * U256::from(10u64).pow(U256::from(padding as u64));
    }

    int_units
        .checked_add(frac_units)
        .ok_or_else(|| OftError::InvalidAmount {
            reason: "amount overflows".to_string(),
        })
}

/// Formats integer base units back into a decimal string, trimming trailing
/// fractional zeros.
pub fn format_base_units(amount: U256, decimals: u8) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let int_part = amount / scale;
    let frac_part = amount % scale;

    if frac_part.is_zero() {
        return int_part.to_string();
    }
    let frac = format!("{:0>width$}", frac_part.to_string(), width = decimals as usize);
    format!("{int_part}.{}", frac.trim_end_matches('0'))
}

/// Applies the slippage floor: `floor(amount * (10000 - bps) / 10000)` where
/// `bps = round(percent * 100)`.
pub fn min_amount_after_slippage(amount: U256, slippage_percent: f64) -> Result<U256> {
    if !slippage_percent.is_finite() || !(0.0..100.0).contains(&slippage_percent) {
        return Err(OftError::InvalidAmount {
            reason: format!("slippage {slippage_percent}% outside [0, 100)"),
        });
    }
    let bps = (slippage_percent * 100.0).round() as u64;

    let scaled = amount
        .checked_mul(U256::from(10_000 - bps))
        .ok_or_else(|| OftError::InvalidAmount {
            reason: "amount overflows".to_string(),
        })?;
    Ok(scaled / U256::from(10_000u64))
}

/// Encodes a type-3 options blob carrying a single executor `lzReceive` gas
/// directive.
pub fn lz_receive_options(gas: u128) -> Bytes {
    const OPTIONS_TYPE: u16 = 3;
    const EXECUTOR_WORKER_ID: u8 = 1;
    const LZ_RECEIVE_OPTION: u8 = 1;
    // option type byte + u128 gas
    const OPTION_LENGTH: u16 = 17;

    let mut buf = Vec::with_capacity(22);
    buf.extend_from_slice(&OPTIONS_TYPE.to_be_bytes());
    buf.push(EXECUTOR_WORKER_ID);
    buf.extend_from_slice(&OPTION_LENGTH.to_be_bytes());
    buf.push(LZ_RECEIVE_OPTION);
    buf.extend_from_slice(&gas.to_be_bytes());
    Bytes::from(buf)
}
