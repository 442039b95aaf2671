//! End-to-end tests for route resolution and request construction
//!
//! These cover the full pure pipeline: load a registry, resolve a route,
//! build a canonical request against the resolved destination.

use alloy_primitives::{address, U256};
use oft_rs::{
    ChainRegistry, Environment, MeshId, MeshRouter, OftError, RoutingBackend, SendRequest,
    TransferParams, STABLECOIN_DECIMALS,
};

fn registry() -> ChainRegistry {
    ChainRegistry::builtin(Environment::Mainnet)
}

fn transfer_params(amount: &str) -> TransferParams {
    TransferParams::builder()
        .amount(amount)
        .recipient(address!("742d35cc6634c0532925a3b844bc9e7595f8fa0d"))
        .build()
}

#[test]
fn resolve_and_build_request_within_adapter_mesh() {
    let registry = registry();
    let router = MeshRouter::new(&registry, RoutingBackend::Protocol);

    let route = router.resolve("ethereum", "arbitrum").unwrap();
    assert_eq!(route.mesh, Some(MeshId::Adapter));

    let request = SendRequest::build(&transfer_params("100"), &route.destination).unwrap();
    assert_eq!(request.dst_eid, route.destination.eid);
    assert_eq!(request.amount_ld, U256::from(100_000_000u64));
    assert_eq!(request.min_amount_ld, U256::from(99_500_000u64));
    assert!(request.compose_msg.is_empty());
    assert!(request.oft_cmd.is_empty());
}

#[test]
fn resolve_and_build_request_within_mint_burn_mesh() {
    let registry = registry();
    let router = MeshRouter::new(&registry, RoutingBackend::Protocol);

    let route = router.resolve("arbitrum", "ink").unwrap();
    assert_eq!(route.mesh, Some(MeshId::MintBurn));
    // The dual-mesh source must resolve to its mint/burn descriptor, so the
    // pair shares one mesh rather than mixing bridging contracts.
    assert_eq!(route.source.mesh(), MeshId::MintBurn);
    assert_ne!(
        route.source.bridge_address,
        registry
            .descriptor_in_mesh("arbitrum", MeshId::Adapter)
            .unwrap()
            .bridge_address
    );

    let request = SendRequest::build(&transfer_params("0.25"), &route.destination).unwrap();
    assert_eq!(request.amount_ld, U256::from(250_000u64));
}

#[test]
fn cross_mesh_route_needs_two_hops() {
    let registry = registry();
    let router = MeshRouter::new(&registry, RoutingBackend::Protocol);

    let direct = router.resolve("ethereum", "ink");
    assert!(matches!(direct, Err(OftError::UnsupportedRoute { .. })));

    let (first, second) = router.resolve_two_hop("ethereum", "ink").unwrap();
    assert_eq!(first.source.chain_key, "ethereum");
    assert_eq!(first.destination.chain_key, second.source.chain_key);
    assert_eq!(second.destination.chain_key, "ink");
    assert_ne!(first.mesh, second.mesh);

    // Each leg is independently buildable.
    let leg1 = SendRequest::build(&transfer_params("10"), &first.destination).unwrap();
    let leg2 = SendRequest::build(&transfer_params("10"), &second.destination).unwrap();
    assert_ne!(leg1.dst_eid, leg2.dst_eid);
}

#[test]
fn request_amount_survives_configuration_decimals() {
    let registry = registry();
    for mesh in [MeshId::Adapter, MeshId::MintBurn] {
        for descriptor in registry.descriptors_for_mesh(mesh) {
            assert_eq!(descriptor.token_decimals, STABLECOIN_DECIMALS);
            let request = SendRequest::build(&transfer_params("1.5"), descriptor).unwrap();
            assert_eq!(request.amount_ld, U256::from(1_500_000u64));
        }
    }
}

#[test]
fn testnet_registry_routes_independently_of_mainnet() {
    let testnet = ChainRegistry::builtin(Environment::Testnet);
    let router = MeshRouter::new(&testnet, RoutingBackend::Protocol);

    let route = router.resolve("sepolia", "arbitrum-sepolia").unwrap();
    assert_eq!(route.mesh, Some(MeshId::Adapter));

    let route = router.resolve("arbitrum-sepolia", "ink-sepolia").unwrap();
    assert_eq!(route.mesh, Some(MeshId::MintBurn));
}

#[test]
fn invalid_amount_surfaces_before_any_routing_artifacts() {
    let registry = registry();
    let router = MeshRouter::new(&registry, RoutingBackend::Protocol);
    let route = router.resolve("ethereum", "arbitrum").unwrap();

    let result = SendRequest::build(&transfer_params("1.2345678"), &route.destination);
    assert!(matches!(result, Err(OftError::InvalidAmount { .. })));
}
