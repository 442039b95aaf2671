//! Chain configuration registry and mesh membership
//!
//! The registry holds one [`ChainDescriptor`] per (chain, mesh) pair. A chain
//! wired into both bridging meshes appears twice with the same chain id but a
//! different bridging contract. The table is validated once at construction
//! and is immutable afterwards, so it can be shared by reference without
//! synchronization.

use std::fmt;

use alloy_primitives::{address, Address};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{OftError, Result};

/// Base-unit decimals of the bridged stablecoin, identical on every chain.
pub const STABLECOIN_DECIMALS: u8 = 6;

/// Which configuration table to load.
///
/// Threaded explicitly into [`ChainRegistry`] construction; there is no
/// process-wide network-mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Mainnet,
    Testnet,
}

/// One of the two bridging networks.
///
/// Chains in different meshes cannot transfer directly; a chain present in
/// both is a bridge chain usable for two-hop transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeshId {
    /// Lock/unlock adapter mesh.
    Adapter,
    /// Mint/burn mesh (native tokens and proxies).
    MintBurn,
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adapter => write!(f, "adapter mesh"),
            Self::MintBurn => write!(f, "mint/burn mesh"),
        }
    }
}

/// Bridging contract model, decided once per descriptor at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// Adapter escrowing a pre-existing token; requires ERC-20 approval.
    LockUnlock,
    /// The token contract itself mints and burns; no approval needed.
    MintBurnNative,
    /// Separate proxy with mint/burn authority over the token.
    MintBurnProxy,
}

impl AdapterKind {
    /// The mesh this contract model belongs to.
    pub fn mesh(&self) -> MeshId {
        match self {
            Self::LockUnlock => MeshId::Adapter,
            Self::MintBurnNative | Self::MintBurnProxy => MeshId::MintBurn,
        }
    }

    /// Whether transfers through this contract need a standing ERC-20
    /// allowance. Mint/burn variants move tokens without one.
    pub fn requires_approval(&self) -> bool {
        matches!(self, Self::LockUnlock)
    }
}

/// Identity of one network within one mesh.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainDescriptor {
    /// Stable string id, e.g. `"ethereum"`.
    pub chain_key: String,
    /// EVM chain id.
    pub chain_id: u64,
    /// Wire-level endpoint id used as the transfer destination identifier.
    pub eid: u32,
    pub native_symbol: String,
    pub native_decimals: u8,
    /// Token contract holding user balances.
    pub token_address: Address,
    /// Bridging contract; equals `token_address` for mint/burn native chains.
    pub bridge_address: Address,
    pub adapter_kind: AdapterKind,
    pub token_decimals: u8,
    pub rpc_url: Url,
}

impl ChainDescriptor {
    pub fn mesh(&self) -> MeshId {
        self.adapter_kind.mesh()
    }
}

/// Immutable table of chain descriptors, keyed by chain key and mesh.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    environment: Environment,
    descriptors: Vec<ChainDescriptor>,
}

impl ChainRegistry {
    /// Builds a registry from a descriptor table, validating every entry.
    ///
    /// Any malformed entry is a fatal construction error, never a per-call
    /// error: a registry that loads is a registry that routes.
    pub fn from_descriptors(
        environment: Environment,
        descriptors: Vec<ChainDescriptor>,
    ) -> Result<Self> {
        for descriptor in &descriptors {
            if descriptor.token_decimals != STABLECOIN_DECIMALS {
                return Err(OftError::InvalidConfig(format!(
                    "chain {} has token decimals {}, expected {}",
                    descriptor.chain_key, descriptor.token_decimals, STABLECOIN_DECIMALS
                )));
            }
            if descriptor.chain_key.is_empty() {
                return Err(OftError::InvalidConfig("empty chain key".to_string()));
            }
        }
        for (i, a) in descriptors.iter().enumerate() {
            for b in descriptors.iter().skip(i + 1) {
                if a.chain_key == b.chain_key && a.mesh() == b.mesh() {
                    return Err(OftError::InvalidConfig(format!(
                        "duplicate descriptor for chain {} in {}",
                        a.chain_key,
                        a.mesh()
                    )));
                }
            }
        }

        debug!(
            environment = ?environment,
            descriptor_count = descriptors.len(),
            event = "chain_registry_loaded"
        );

        Ok(Self {
            environment,
            descriptors,
        })
    }

    /// Builds a registry from a serialized descriptor table, as produced by
    /// the external configuration collaborator.
    pub fn from_json(environment: Environment, json: &str) -> Result<Self> {
        let descriptors: Vec<ChainDescriptor> = serde_json::from_str(json)?;
        Self::from_descriptors(environment, descriptors)
    }

    /// The compiled-in default table for the given environment.
    pub fn builtin(environment: Environment) -> Self {
        let descriptors = match environment {
            Environment::Mainnet => builtin_mainnet(),
            Environment::Testnet => builtin_testnet(),
        };
        // The builtin tables uphold every construction invariant.
        Self::from_descriptors(environment, descriptors)
            .unwrap_or_else(|e| panic!("builtin chain table invalid: {e}"))
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Looks up a chain by key. When the chain is a member of both meshes the
    /// adapter-mesh descriptor wins; use [`Self::descriptor_in_mesh`] to pick
    /// explicitly.
    pub fn lookup(&self, chain_key: &str) -> Result<&ChainDescriptor> {
        self.descriptor_in_mesh(chain_key, MeshId::Adapter)
            .or_else(|| self.descriptor_in_mesh(chain_key, MeshId::MintBurn))
            .ok_or_else(|| OftError::UnknownChain {
                chain: chain_key.to_string(),
            })
    }

    /// The descriptor for a chain within one specific mesh, if the chain is a
    /// member of it.
    pub fn descriptor_in_mesh(&self, chain_key: &str, mesh: MeshId) -> Option<&ChainDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.chain_key == chain_key && d.mesh() == mesh)
    }

    /// All descriptors belonging to one mesh.
    pub fn descriptors_for_mesh(&self, mesh: MeshId) -> Vec<&ChainDescriptor> {
        self.descriptors.iter().filter(|d| d.mesh() == mesh).collect()
    }

    /// The meshes a chain belongs to, in fixed [`MeshId`] order. Empty when
    /// the chain key is unknown.
    pub fn meshes_containing(&self, chain_key: &str) -> Vec<MeshId> {
        [MeshId::Adapter, MeshId::MintBurn]
            .into_iter()
            .filter(|mesh| self.descriptor_in_mesh(chain_key, *mesh).is_some())
            .collect()
    }

    /// Chain keys present in both meshes, usable as intermediate hops.
    pub fn bridge_chains(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| d.mesh() == MeshId::Adapter)
            .filter(|d| {
                self.descriptor_in_mesh(&d.chain_key, MeshId::MintBurn)
                    .is_some()
            })
            .map(|d| d.chain_key.as_str())
            .collect()
    }
}

fn builtin_mainnet() -> Vec<ChainDescriptor> {
    vec![
        ChainDescriptor {
            chain_key: "ethereum".to_string(),
            chain_id: 1,
            eid: 30101,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("dac17f958d2ee523a2206206994597c13d831ec7"),
            bridge_address: address!("6c96de32cea08842dcc4058c14d3aaad7fa41dee"),
            adapter_kind: AdapterKind::LockUnlock,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://eth.llamarpc.com"),
        },
        ChainDescriptor {
            chain_key: "arbitrum".to_string(),
            chain_id: 42161,
            eid: 30110,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9"),
            bridge_address: address!("1cb7bbc9552d9d4fa5d1e2f6d4e9f0a3c8b7d6e5"),
            adapter_kind: AdapterKind::LockUnlock,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://arb1.arbitrum.io/rpc"),
        },
        ChainDescriptor {
            chain_key: "arbitrum".to_string(),
            chain_id: 42161,
            eid: 30110,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9"),
            bridge_address: address!("14e4a1b13bf7f943c8ff7c51fb60fa964a298d92"),
            adapter_kind: AdapterKind::MintBurnProxy,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://arb1.arbitrum.io/rpc"),
        },
        ChainDescriptor {
            chain_key: "ink".to_string(),
            chain_id: 57073,
            eid: 30339,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("0200c29006150606b650577bbe7b6248f58470c1"),
            bridge_address: address!("0200c29006150606b650577bbe7b6248f58470c1"),
            adapter_kind: AdapterKind::MintBurnNative,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://rpc-gel.inkonchain.com"),
        },
        ChainDescriptor {
            chain_key: "berachain".to_string(),
            chain_id: 80094,
            eid: 30362,
            native_symbol: "BERA".to_string(),
            native_decimals: 18,
            token_address: address!("779ded0c9e1022225f8e0630b35a9b54be713736"),
            bridge_address: address!("779ded0c9e1022225f8e0630b35a9b54be713736"),
            adapter_kind: AdapterKind::MintBurnNative,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://rpc.berachain.com"),
        },
    ]
}

fn builtin_testnet() -> Vec<ChainDescriptor> {
    vec![
        ChainDescriptor {
            chain_key: "sepolia".to_string(),
            chain_id: 11155111,
            eid: 40161,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("aa8e23fb1079ea71e0a56f48a2aa51851d8433d0"),
            bridge_address: address!("c2fc6bcd2ba4e40d1ff9b4dc95c519d24a668b10"),
            adapter_kind: AdapterKind::LockUnlock,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://ethereum-sepolia-rpc.publicnode.com"),
        },
        ChainDescriptor {
            chain_key: "arbitrum-sepolia".to_string(),
            chain_id: 421614,
            eid: 40231,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("30fa2fbe15c1eadfbef28c188b7b8dbd3c1ff2eb"),
            bridge_address: address!("543bda7c6ca604b4bc8c453c6e1a810f99e3aed7"),
            adapter_kind: AdapterKind::LockUnlock,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://sepolia-rollup.arbitrum.io/rpc"),
        },
        ChainDescriptor {
            chain_key: "arbitrum-sepolia".to_string(),
            chain_id: 421614,
            eid: 40231,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("30fa2fbe15c1eadfbef28c188b7b8dbd3c1ff2eb"),
            bridge_address: address!("87ab0e4dbc56d7b7d76e3b6a0e1a4e3e6c2bb6b1"),
            adapter_kind: AdapterKind::MintBurnProxy,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://sepolia-rollup.arbitrum.io/rpc"),
        },
        ChainDescriptor {
            chain_key: "ink-sepolia".to_string(),
            chain_id: 763373,
            eid: 40360,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: address!("b5a6de36cc1f9d97bf1bc4e250b5b6b5f877cbb0"),
            bridge_address: address!("b5a6de36cc1f9d97bf1bc4e250b5b6b5f877cbb0"),
            adapter_kind: AdapterKind::MintBurnNative,
            token_decimals: STABLECOIN_DECIMALS,
            rpc_url: parse_url("https://rpc-gel-sepolia.inkonchain.com"),
        },
    ]
}

fn parse_url(url: &str) -> Url {
    Url::parse(url).unwrap_or_else(|e| panic!("builtin RPC url invalid: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(chain_key: &str, kind: AdapterKind, decimals: u8) -> ChainDescriptor {
        ChainDescriptor {
            chain_key: chain_key.to_string(),
            chain_id: 1,
            eid: 30101,
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            token_address: Address::ZERO,
            bridge_address: Address::ZERO,
            adapter_kind: kind,
            token_decimals: decimals,
            rpc_url: Url::parse("http://localhost:8545").unwrap(),
        }
    }

    #[test]
    fn test_builtin_tables_load() {
        let mainnet = ChainRegistry::builtin(Environment::Mainnet);
        let testnet = ChainRegistry::builtin(Environment::Testnet);

        assert!(mainnet.lookup("ethereum").is_ok());
        assert!(mainnet.lookup("ink").is_ok());
        assert!(testnet.lookup("sepolia").is_ok());
    }

    #[test]
    fn test_unknown_chain_error() {
        let registry = ChainRegistry::builtin(Environment::Mainnet);
        let result = registry.lookup("solana");
        assert!(matches!(result, Err(OftError::UnknownChain { .. })));
    }

    #[test]
    fn test_wrong_decimals_is_fatal() {
        let result = ChainRegistry::from_descriptors(
            Environment::Mainnet,
            vec![descriptor("ethereum", AdapterKind::LockUnlock, 18)],
        );
        assert!(matches!(result, Err(OftError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_chain_in_same_mesh_is_fatal() {
        let result = ChainRegistry::from_descriptors(
            Environment::Mainnet,
            vec![
                descriptor("ethereum", AdapterKind::LockUnlock, 6),
                descriptor("ethereum", AdapterKind::LockUnlock, 6),
            ],
        );
        assert!(matches!(result, Err(OftError::InvalidConfig(_))));
    }

    #[test]
    fn test_same_chain_in_both_meshes_is_allowed() {
        let registry = ChainRegistry::from_descriptors(
            Environment::Mainnet,
            vec![
                descriptor("arbitrum", AdapterKind::LockUnlock, 6),
                descriptor("arbitrum", AdapterKind::MintBurnProxy, 6),
            ],
        )
        .unwrap();

        assert_eq!(
            registry.meshes_containing("arbitrum"),
            vec![MeshId::Adapter, MeshId::MintBurn]
        );
        assert_eq!(registry.bridge_chains(), vec!["arbitrum"]);
    }

    #[test]
    fn test_lookup_prefers_adapter_mesh_for_dual_members() {
        let registry = ChainRegistry::builtin(Environment::Mainnet);
        let descriptor = registry.lookup("arbitrum").unwrap();
        assert_eq!(descriptor.mesh(), MeshId::Adapter);
    }

    #[test]
    fn test_meshes_containing_unknown_chain_is_empty() {
        let registry = ChainRegistry::builtin(Environment::Mainnet);
        assert!(registry.meshes_containing("solana").is_empty());
    }

    #[test]
    fn test_descriptors_for_mesh() {
        let registry = ChainRegistry::builtin(Environment::Mainnet);
        let adapter = registry.descriptors_for_mesh(MeshId::Adapter);
        let mint_burn = registry.descriptors_for_mesh(MeshId::MintBurn);

        assert!(adapter.iter().all(|d| d.mesh() == MeshId::Adapter));
        assert!(mint_burn.iter().all(|d| d.mesh() == MeshId::MintBurn));
        assert!(adapter.iter().any(|d| d.chain_key == "ethereum"));
        assert!(mint_burn.iter().any(|d| d.chain_key == "ink"));
    }

    #[test]
    fn test_from_json_roundtrip() {
        let json = r#"[
            {
                "chain_key": "ethereum",
                "chain_id": 1,
                "eid": 30101,
                "native_symbol": "ETH",
                "native_decimals": 18,
                "token_address": "0xdac17f958d2ee523a2206206994597c13d831ec7",
                "bridge_address": "0x6c96de32cea08842dcc4058c14d3aaad7fa41dee",
                "adapter_kind": "lock_unlock",
                "token_decimals": 6,
                "rpc_url": "https://eth.llamarpc.com"
            }
        ]"#;

        let registry = ChainRegistry::from_json(Environment::Mainnet, json).unwrap();
        let descriptor = registry.lookup("ethereum").unwrap();
        assert_eq!(descriptor.eid, 30101);
        assert_eq!(descriptor.adapter_kind, AdapterKind::LockUnlock);
    }
}
