use thiserror::Error;

use crate::registry::MeshId;

#[derive(Error, Debug)]
pub enum OftError {
    #[error("Unknown chain: {chain}")]
    UnknownChain { chain: String },

    // `source` is reserved by thiserror for the error cause; chain fields
    // carry an explicit suffix.
    #[error("No mesh connects {source_chain} to {destination_chain}{}", .hint.as_deref().map(|h| format!(" ({h})")).unwrap_or_default())]
    UnsupportedRoute {
        source_chain: String,
        destination_chain: String,
        hint: Option<String>,
    },

    #[error("Route {source_chain} -> {destination_chain} is ambiguous: both endpoints belong to {} and {}", .meshes.0, .meshes.1)]
    AmbiguousRoute {
        source_chain: String,
        destination_chain: String,
        meshes: (MeshId, MeshId),
    },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: String, required: String },

    #[error("Approval failed: {reason}")]
    ApprovalFailed { reason: String },

    #[error("Quote failed: {reason}")]
    QuoteFailed { reason: String },

    #[error("Previewed receipt {previewed} is below the slippage floor {floor}")]
    SlippageExceeded { previewed: String, floor: String },

    #[error("Execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("Status source unavailable: {reason}")]
    StatusUnavailable { reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("Contract call failed: {0}")]
    Contract(#[from] alloy_contract::Error),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, OftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_route_display() {
        let err = OftError::UnsupportedRoute {
            source_chain: "ethereum".to_string(),
            destination_chain: "ink".to_string(),
            hint: Some("try a two-hop transfer through arbitrum".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "No mesh connects ethereum to ink (try a two-hop transfer through arbitrum)"
        );
        // Chain names are context fields, not an underlying cause.
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_unsupported_route_display_without_hint() {
        let err = OftError::UnsupportedRoute {
            source_chain: "ethereum".to_string(),
            destination_chain: "ink".to_string(),
            hint: None,
        };
        assert_eq!(err.to_string(), "No mesh connects ethereum to ink");
    }

    #[test]
    fn test_ambiguous_route_display() {
        let err = OftError::AmbiguousRoute {
            source_chain: "arbitrum".to_string(),
            destination_chain: "arbitrum".to_string(),
            meshes: (MeshId::Adapter, MeshId::MintBurn),
        };
        assert_eq!(
            err.to_string(),
            "Route arbitrum -> arbitrum is ambiguous: both endpoints belong to adapter mesh and mint/burn mesh"
        );
        assert!(std::error::Error::source(&err).is_none());
    }
}
