//! Dependency graph linking business services to assets and suppliers.
//!
//! The graph is bipartite and single-hop: criticality flows from services
//! to the assets and suppliers they depend on, never transitively further.
//! Construction never fails; edges that cannot be resolved are skipped and
//! counted so the graph stays queryable for audits even over dirty data.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::diagnostics::{DataIntegrityWarning, Diagnostics};
use crate::index::AssetIndex;
use crate::models::{BusinessService, Criticality, DependencyTarget, ServiceDependency};
use crate::snapshot::Snapshot;

/// Grouping key for concentration risk: a concrete external provider or
/// the internal sentinel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKey {
    /// Service is provided internally.
    Internal,
    /// Service is provided by this external supplier.
    External(Uuid),
}

impl std::fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKey::Internal => write!(f, "internal"),
            ProviderKey::External(id) => write!(f, "{}", id),
        }
    }
}

/// The provider group with the highest share of High/Critical services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConcentrationRisk {
    /// The dominant provider.
    pub provider: ProviderKey,
    /// Number of High/Critical services on that provider.
    pub count: usize,
    /// Total number of High/Critical services considered.
    pub total: usize,
    /// `count / total`, as a percentage rounded to the nearest integer.
    pub percentage: u32,
}

/// Dependency graph over a snapshot.
pub struct DependencyGraph<'a> {
    index: AssetIndex<'a>,
    edges: Vec<ServiceDependency>,
    edges_by_asset: HashMap<Uuid, Vec<usize>>,
    edges_by_supplier: HashMap<Uuid, Vec<usize>>,
    assets_by_supplier: HashMap<Uuid, Vec<Uuid>>,
    diagnostics: Diagnostics,
}

impl<'a> DependencyGraph<'a> {
    /// Builds the graph from a snapshot, skipping and counting edges that
    /// reference missing records or carry an ambiguous target.
    pub fn new(snapshot: &'a Snapshot) -> Self {
        let index = AssetIndex::build(snapshot);
        let mut diagnostics = Diagnostics::default();
        let mut edges = Vec::new();
        let mut edges_by_asset: HashMap<Uuid, Vec<usize>> = HashMap::new();
        let mut edges_by_supplier: HashMap<Uuid, Vec<usize>> = HashMap::new();

        for raw in &snapshot.dependencies {
            let Some(edge) = raw.resolve() else {
                warn!(dependency_id = %raw.id, "skipping ambiguous dependency edge");
                diagnostics.push(DataIntegrityWarning::AmbiguousEdge {
                    dependency_id: raw.id,
                });
                continue;
            };

            if index.service(&edge.service_id).is_none() {
                warn!(dependency_id = %edge.id, service_id = %edge.service_id, "skipping dangling dependency edge");
                diagnostics.push(DataIntegrityWarning::DanglingEdge {
                    dependency_id: edge.id,
                    detail: format!("service {} not found", edge.service_id),
                });
                continue;
            }

            let target_exists = match edge.target {
                DependencyTarget::Asset(id) => index.asset(&id).is_some(),
                DependencyTarget::Supplier(id) => index.supplier(&id).is_some(),
            };
            if !target_exists {
                warn!(dependency_id = %edge.id, "skipping dangling dependency edge");
                diagnostics.push(DataIntegrityWarning::DanglingEdge {
                    dependency_id: edge.id,
                    detail: match edge.target {
                        DependencyTarget::Asset(id) => format!("asset {} not found", id),
                        DependencyTarget::Supplier(id) => format!("supplier {} not found", id),
                    },
                });
                continue;
            }

            let edge_index = edges.len();
            match edge.target {
                DependencyTarget::Asset(id) => {
                    edges_by_asset.entry(id).or_default().push(edge_index)
                }
                DependencyTarget::Supplier(id) => {
                    edges_by_supplier.entry(id).or_default().push(edge_index)
                }
            }
            edges.push(edge);
        }

        let mut assets_by_supplier: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for asset in &snapshot.assets {
            if let Some(supplier_id) = asset.supplier_id {
                assets_by_supplier
                    .entry(supplier_id)
                    .or_default()
                    .push(asset.id);
            }
        }

        debug!(
            edges = edges.len(),
            dangling = diagnostics.dangling_edges(),
            ambiguous = diagnostics.ambiguous_edges(),
            "dependency graph built"
        );

        Self {
            index,
            edges,
            edges_by_asset,
            edges_by_supplier,
            assets_by_supplier,
            diagnostics,
        }
    }

    /// Effective criticality of an asset: the maximum criticality of any
    /// service depending on it, floored at the asset's own override.
    /// Unlinked assets default to `Low`.
    pub fn criticality_of(&self, asset_id: Uuid) -> Criticality {
        let floor = self
            .index
            .asset(&asset_id)
            .and_then(|a| a.criticality_override)
            .unwrap_or(Criticality::Low);

        let propagated = self
            .edges_by_asset
            .get(&asset_id)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.index.service(&self.edges[i].service_id))
            .map(|service| service.criticality)
            .max()
            .unwrap_or(Criticality::Low);

        floor.max(propagated)
    }

    /// Services connected to a supplier, directly or through an asset
    /// procured under that supplier's contract. Single hop only; the
    /// result is ordered by service id for stable output.
    pub fn dependent_services(&self, supplier_id: Uuid) -> Vec<&'a BusinessService> {
        let mut service_ids = BTreeSet::new();

        for &i in self.edges_by_supplier.get(&supplier_id).into_iter().flatten() {
            service_ids.insert(self.edges[i].service_id);
        }

        for asset_id in self.assets_by_supplier.get(&supplier_id).into_iter().flatten() {
            for &i in self.edges_by_asset.get(asset_id).into_iter().flatten() {
                service_ids.insert(self.edges[i].service_id);
            }
        }

        service_ids
            .iter()
            .filter_map(|id| self.index.service(id))
            .collect()
    }

    /// Concentration risk over the given services: among High/Critical
    /// services, the provider group with the largest share.
    ///
    /// Returns `None` when there are no High/Critical services at all —
    /// "no signal" is distinct from "fully internal, 0% external risk".
    /// Ties resolve deterministically: external providers beat the
    /// internal sentinel, then the lowest provider id wins.
    pub fn concentration_risk(&self, services: &[BusinessService]) -> Option<ConcentrationRisk> {
        concentration_risk(services)
    }

    /// Number of edges skipped because a service or target was missing.
    pub fn dangling_edges(&self) -> usize {
        self.diagnostics.dangling_edges()
    }

    /// Number of edges skipped because not exactly one target was set.
    pub fn ambiguous_edges(&self) -> usize {
        self.diagnostics.ambiguous_edges()
    }

    /// Valid edges retained in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Integrity findings from the graph build (edge findings only; index
    /// findings are merged in).
    pub fn diagnostics(&self) -> Diagnostics {
        let mut combined = self.index.diagnostics().clone();
        combined.merge(self.diagnostics.clone());
        combined
    }

    /// The underlying id index.
    pub fn index(&self) -> &AssetIndex<'a> {
        &self.index
    }
}

/// Concentration risk over an arbitrary service slice.
pub fn concentration_risk(services: &[BusinessService]) -> Option<ConcentrationRisk> {
    let elevated: Vec<&BusinessService> = services
        .iter()
        .filter(|s| s.criticality.is_elevated())
        .collect();
    if elevated.is_empty() {
        return None;
    }

    let mut groups: HashMap<ProviderKey, usize> = HashMap::new();
    for service in &elevated {
        let key = match service.external_provider_id {
            Some(id) => ProviderKey::External(id),
            None => ProviderKey::Internal,
        };
        *groups.entry(key).or_default() += 1;
    }

    let total = elevated.len();
    groups
        .into_iter()
        .max_by_key(|(key, count)| {
            // Sort key: count first, externals before internal, low id first.
            let tiebreak = match key {
                ProviderKey::External(id) => (1u8, Some(std::cmp::Reverse(*id))),
                ProviderKey::Internal => (0u8, None),
            };
            (*count, tiebreak)
        })
        .map(|(provider, count)| ConcentrationRisk {
            provider,
            count,
            total,
            percentage: ((count * 100) as f64 / total as f64).round() as u32,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, AssetKind, DependencyKind, RawServiceDependency, Supplier};

    fn linked_snapshot() -> (Snapshot, Uuid, Uuid) {
        let asset = Asset::new("erp-db", AssetKind::Equipment);
        let asset_id = asset.id;
        let low = BusinessService::new("Intranet", Criticality::Low);
        let critical = BusinessService::new("ERP", Criticality::Critical);
        let service_id = critical.id;

        let deps = vec![
            ServiceDependency::to_asset(low.id, asset_id, DependencyKind::Hosting),
            ServiceDependency::to_asset(critical.id, asset_id, DependencyKind::Hosting),
        ];
        let snapshot = Snapshot::new()
            .with_assets(vec![asset])
            .with_services(vec![low, critical])
            .with_dependencies(deps);
        (snapshot, asset_id, service_id)
    }

    #[test]
    fn test_criticality_is_max_over_services() {
        let (snapshot, asset_id, _) = linked_snapshot();
        let graph = DependencyGraph::new(&snapshot);

        assert_eq!(graph.criticality_of(asset_id), Criticality::Critical);
    }

    #[test]
    fn test_unlinked_asset_defaults_to_low() {
        let asset = Asset::new("spare", AssetKind::Equipment);
        let asset_id = asset.id;
        let snapshot = Snapshot::new().with_assets(vec![asset]);
        let graph = DependencyGraph::new(&snapshot);

        assert_eq!(graph.criticality_of(asset_id), Criticality::Low);
    }

    #[test]
    fn test_override_acts_as_floor() {
        let asset =
            Asset::new("backup-nas", AssetKind::Equipment).with_criticality_override(Criticality::High);
        let asset_id = asset.id;
        let service = BusinessService::new("Archive", Criticality::Medium);
        let dep = ServiceDependency::to_asset(service.id, asset_id, DependencyKind::Hosting);

        let snapshot = Snapshot::new()
            .with_assets(vec![asset])
            .with_services(vec![service])
            .with_dependencies(vec![dep]);
        let graph = DependencyGraph::new(&snapshot);

        // Floor above the propagated value wins; a higher service still wins
        // over the floor.
        assert_eq!(graph.criticality_of(asset_id), Criticality::High);
    }

    #[test]
    fn test_dangling_edge_is_skipped_and_counted() {
        let (mut snapshot, asset_id, _) = linked_snapshot();
        snapshot.dependencies.push(
            ServiceDependency::to_asset(Uuid::new_v4(), asset_id, DependencyKind::Hosting).into(),
        );

        let graph = DependencyGraph::new(&snapshot);

        // The valid asset still resolves; the bad edge is only counted.
        assert_eq!(graph.criticality_of(asset_id), Criticality::Critical);
        assert_eq!(graph.dangling_edges(), 1);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_ambiguous_edge_is_skipped_and_counted() {
        let (mut snapshot, asset_id, service_id) = linked_snapshot();
        snapshot.dependencies.push(RawServiceDependency {
            id: Uuid::new_v4(),
            service_id,
            asset_id: Some(asset_id),
            supplier_id: Some(Uuid::new_v4()),
            kind: DependencyKind::Hosting,
        });

        let graph = DependencyGraph::new(&snapshot);

        assert_eq!(graph.ambiguous_edges(), 1);
        assert_eq!(graph.dangling_edges(), 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_dependent_services_direct_and_via_asset() {
        let supplier = Supplier::new("DC Provider", Criticality::High);
        let supplier_id = supplier.id;
        let hosted_asset = Asset::new("rack-7", AssetKind::Equipment).with_supplier(supplier_id);
        let hosted_asset_id = hosted_asset.id;

        let direct = BusinessService::new("Managed SOC", Criticality::High);
        let via_asset = BusinessService::new("Web Shop", Criticality::Critical);
        let unrelated = BusinessService::new("Intranet", Criticality::Low);

        let deps = vec![
            ServiceDependency::to_supplier(direct.id, supplier_id, DependencyKind::Support),
            ServiceDependency::to_asset(via_asset.id, hosted_asset_id, DependencyKind::Hosting),
        ];
        let direct_id = direct.id;
        let via_id = via_asset.id;

        let snapshot = Snapshot::new()
            .with_assets(vec![hosted_asset])
            .with_suppliers(vec![supplier])
            .with_services(vec![direct, via_asset, unrelated])
            .with_dependencies(deps);
        let graph = DependencyGraph::new(&snapshot);

        let dependents = graph.dependent_services(supplier_id);
        let ids: Vec<Uuid> = dependents.iter().map(|s| s.id).collect();
        assert_eq!(dependents.len(), 2);
        assert!(ids.contains(&direct_id));
        assert!(ids.contains(&via_id));
    }

    #[test]
    fn test_concentration_risk_three_of_four() {
        let provider = Uuid::new_v4();
        let services = vec![
            BusinessService::new("A", Criticality::Critical).with_external_provider(provider),
            BusinessService::new("B", Criticality::High).with_external_provider(provider),
            BusinessService::new("C", Criticality::Critical).with_external_provider(provider),
            BusinessService::new("D", Criticality::High),
        ];

        let risk = concentration_risk(&services).unwrap();
        assert_eq!(risk.provider, ProviderKey::External(provider));
        assert_eq!(risk.count, 3);
        assert_eq!(risk.total, 4);
        assert_eq!(risk.percentage, 75);
    }

    #[test]
    fn test_concentration_risk_no_signal_without_elevated_services() {
        let services = vec![
            BusinessService::new("A", Criticality::Low),
            BusinessService::new("B", Criticality::Medium).with_external_provider(Uuid::new_v4()),
        ];

        assert!(concentration_risk(&services).is_none());
    }

    #[test]
    fn test_concentration_risk_fully_internal_is_a_signal() {
        let services = vec![
            BusinessService::new("A", Criticality::High),
            BusinessService::new("B", Criticality::Critical),
        ];

        let risk = concentration_risk(&services).unwrap();
        assert_eq!(risk.provider, ProviderKey::Internal);
        assert_eq!(risk.percentage, 100);
    }

    #[test]
    fn test_concentration_risk_tie_prefers_external() {
        let provider = Uuid::new_v4();
        let services = vec![
            BusinessService::new("A", Criticality::High).with_external_provider(provider),
            BusinessService::new("B", Criticality::High),
        ];

        let risk = concentration_risk(&services).unwrap();
        assert_eq!(risk.provider, ProviderKey::External(provider));
        assert_eq!(risk.percentage, 50);
    }

    #[test]
    fn test_lower_service_does_not_reduce_criticality() {
        let (snapshot, asset_id, _) = linked_snapshot();
        let graph = DependencyGraph::new(&snapshot);

        // Two services (Low and Critical) are linked; max wins.
        assert_eq!(graph.criticality_of(asset_id), Criticality::Critical);
    }
}
