//! Mesh routing: deciding which bridging network connects a chain pair
//!
//! Routing is a mesh-membership intersection query against the registry, not
//! a path search. The one multi-hop case is explicit: a two-hop route is two
//! independent single-mesh legs through a bridge chain.

use tracing::{debug, info};

use crate::error::{OftError, Result};
use crate::registry::{ChainDescriptor, ChainRegistry, MeshId};

/// Which routing disposition the resolver serves.
///
/// Protocol routing submits transfers to the bridging contracts directly and
/// therefore requires both endpoints to sit in the same mesh. External routing
/// hands the transfer to a third-party router that crosses meshes itself, so
/// endpoints may be resolved independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingBackend {
    #[default]
    Protocol,
    External,
}

/// A resolved (source, destination) descriptor pair.
#[derive(Debug, Clone)]
pub struct RoutePair {
    pub source: ChainDescriptor,
    pub destination: ChainDescriptor,
    /// The mesh both endpoints were resolved in, or `None` when the endpoints
    /// were resolved independently for an external router.
    pub mesh: Option<MeshId>,
}

/// Resolves chain pairs to bridging-contract pairs.
pub struct MeshRouter<'a> {
    registry: &'a ChainRegistry,
    backend: RoutingBackend,
}

impl<'a> MeshRouter<'a> {
    pub fn new(registry: &'a ChainRegistry, backend: RoutingBackend) -> Self {
        Self { registry, backend }
    }

    /// Resolves a direct route between two chains.
    ///
    /// The destination's mesh membership drives the decision. With a
    /// single-mesh destination, the source must be a member of that mesh; if
    /// it is not, the error carries a hint naming a bridge chain for a
    /// two-hop transfer. With a dual-mesh destination, the mesh common to
    /// both endpoints wins; when both meshes are common, the protocol backend
    /// refuses the ambiguity while the external backend falls back to
    /// independent per-key resolution.
    pub fn resolve(&self, source_key: &str, dest_key: &str) -> Result<RoutePair> {
        let dest_meshes = self.registry.meshes_containing(dest_key);
        let src_meshes = self.registry.meshes_containing(source_key);

        debug!(
            source = source_key,
            destination = dest_key,
            source_meshes = ?src_meshes,
            destination_meshes = ?dest_meshes,
            backend = ?self.backend,
            event = "route_resolution_started"
        );

        if src_meshes.is_empty() {
            return Err(OftError::UnknownChain {
                chain: source_key.to_string(),
            });
        }

        match dest_meshes.as_slice() {
            [] => Err(OftError::UnknownChain {
                chain: dest_key.to_string(),
            }),
            [mesh] => self.resolve_in_mesh(source_key, dest_key, *mesh),
            _ => {
                let common: Vec<MeshId> = dest_meshes
                    .iter()
                    .copied()
                    .filter(|m| src_meshes.contains(m))
                    .collect();

                match common.as_slice() {
                    [mesh] => self.resolve_in_mesh(source_key, dest_key, *mesh),
                    [a, b] => match self.backend {
                        RoutingBackend::Protocol => Err(OftError::AmbiguousRoute {
                            source_chain: source_key.to_string(),
                            destination_chain: dest_key.to_string(),
                            meshes: (*a, *b),
                        }),
                        RoutingBackend::External => self.resolve_independent(source_key, dest_key),
                    },
                    _ => self.unsupported(source_key, dest_key),
                }
            }
        }
    }

    /// Resolves a two-hop route through a chain that is a member of both
    /// meshes. Each leg is an ordinary single-mesh route; the caller executes
    /// them as two independent transfers.
    pub fn resolve_two_hop(&self, source_key: &str, dest_key: &str) -> Result<(RoutePair, RoutePair)> {
        let src_meshes = self.registry.meshes_containing(source_key);
        let dest_meshes = self.registry.meshes_containing(dest_key);

        let src_mesh = *src_meshes.first().ok_or_else(|| OftError::UnknownChain {
            chain: source_key.to_string(),
        })?;
        let dest_mesh = *dest_meshes.first().ok_or_else(|| OftError::UnknownChain {
            chain: dest_key.to_string(),
        })?;

        let bridge_key = self
            .registry
            .bridge_chains()
            .first()
            .map(|k| k.to_string())
            .ok_or_else(|| OftError::UnsupportedRoute {
                source_chain: source_key.to_string(),
                destination_chain: dest_key.to_string(),
                hint: Some("no chain is a member of both meshes".to_string()),
            })?;

        let first = self.resolve_in_mesh(source_key, &bridge_key, src_mesh)?;
        let second = self.resolve_in_mesh(&bridge_key, dest_key, dest_mesh)?;

        info!(
            source = source_key,
            destination = dest_key,
            bridge_chain = %bridge_key,
            first_mesh = %src_mesh,
            second_mesh = %dest_mesh,
            event = "two_hop_route_resolved"
        );

        Ok((first, second))
    }

    fn resolve_in_mesh(&self, source_key: &str, dest_key: &str, mesh: MeshId) -> Result<RoutePair> {
        let destination = self
            .registry
            .descriptor_in_mesh(dest_key, mesh)
            .ok_or_else(|| OftError::UnknownChain {
                chain: dest_key.to_string(),
            })?;

        let Some(source) = self.registry.descriptor_in_mesh(source_key, mesh) else {
            return self.unsupported(source_key, dest_key);
        };

        info!(
            source = source_key,
            destination = dest_key,
            mesh = %mesh,
            source_bridge = %source.bridge_address,
            destination_eid = destination.eid,
            event = "route_resolved"
        );

        Ok(RoutePair {
            source: source.clone(),
            destination: destination.clone(),
            mesh: Some(mesh),
        })
    }

    fn resolve_independent(&self, source_key: &str, dest_key: &str) -> Result<RoutePair> {
        let source = self.registry.lookup(source_key)?.clone();
        let destination = self.registry.lookup(dest_key)?.clone();

        info!(
            source = source_key,
            destination = dest_key,
            event = "route_resolved_independently"
        );

        Ok(RoutePair {
            source,
            destination,
            mesh: None,
        })
    }

    fn unsupported(&self, source_key: &str, dest_key: &str) -> Result<RoutePair> {
        let hint = self
            .registry
            .bridge_chains()
            .first()
            .map(|bridge| format!("try a two-hop transfer through {bridge}"));

        Err(OftError::UnsupportedRoute {
            source_chain: source_key.to_string(),
            destination_chain: dest_key.to_string(),
            hint,
        })
    }
}
