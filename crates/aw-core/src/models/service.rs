//! Business service and dependency edge models.
//!
//! Business services carry the authoritative criticality that the dependency
//! graph propagates down to assets. A `ServiceDependency` links a service to
//! exactly one asset or one supplier; the raw row shape with two nullable
//! columns is only accepted at the snapshot boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::Criticality;

/// An abstract business service from the business impact analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessService {
    /// Unique identifier for this service.
    pub id: Uuid,
    /// Human-readable name for the service.
    pub name: String,
    /// Business criticality assigned during the impact analysis.
    pub criticality: Criticality,
    /// Collaborator responsible for the service, if any.
    pub owner_id: Option<Uuid>,
    /// External supplier providing the service; absent means internal.
    pub external_provider_id: Option<Uuid>,
}

impl BusinessService {
    /// Creates a new business service.
    pub fn new(name: impl Into<String>, criticality: Criticality) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            criticality,
            owner_id: None,
            external_provider_id: None,
        }
    }

    /// Sets the responsible collaborator.
    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Marks the service as externally provided.
    pub fn with_external_provider(mut self, provider_id: Uuid) -> Self {
        self.external_provider_id = Some(provider_id);
        self
    }
}

/// The single target of a dependency edge.
///
/// An edge points at either an asset or a supplier relationship record,
/// never both. Using a sum type here removes the "ambiguous edge" error
/// class from everything downstream of the snapshot boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DependencyTarget {
    /// The service depends on a physical or software asset.
    Asset(Uuid),
    /// The service depends on a supplier relationship.
    Supplier(Uuid),
}

/// How a service depends on its target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Target hosts or runs the service.
    Hosting,
    /// Target is software the service is built on.
    Software,
    /// Target provides network connectivity.
    Connectivity,
    /// Target provides operational support.
    Support,
    /// Custom dependency kind.
    Custom(String),
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyKind::Hosting => write!(f, "Hosting"),
            DependencyKind::Software => write!(f, "Software"),
            DependencyKind::Connectivity => write!(f, "Connectivity"),
            DependencyKind::Support => write!(f, "Support"),
            DependencyKind::Custom(name) => write!(f, "Custom: {}", name),
        }
    }
}

/// A validated dependency edge from a service to a single target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDependency {
    /// Unique identifier for this edge.
    pub id: Uuid,
    /// The dependent business service.
    pub service_id: Uuid,
    /// The asset or supplier the service relies on.
    pub target: DependencyTarget,
    /// How the service depends on the target.
    pub kind: DependencyKind,
}

impl ServiceDependency {
    /// Creates an edge from a service to an asset.
    pub fn to_asset(service_id: Uuid, asset_id: Uuid, kind: DependencyKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_id,
            target: DependencyTarget::Asset(asset_id),
            kind,
        }
    }

    /// Creates an edge from a service to a supplier.
    pub fn to_supplier(service_id: Uuid, supplier_id: Uuid, kind: DependencyKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_id,
            target: DependencyTarget::Supplier(supplier_id),
            kind,
        }
    }
}

/// Dependency row as stored by the console backend: two nullable columns.
///
/// Exactly one of `asset_id` / `supplier_id` must be set. Rows violating
/// that are counted as ambiguous edges by the graph and skipped, never
/// silently resolved one way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawServiceDependency {
    /// Unique identifier for this edge.
    pub id: Uuid,
    /// The dependent business service.
    pub service_id: Uuid,
    /// Target asset id, if the edge points at an asset.
    pub asset_id: Option<Uuid>,
    /// Target supplier id, if the edge points at a supplier.
    pub supplier_id: Option<Uuid>,
    /// How the service depends on the target.
    pub kind: DependencyKind,
}

impl RawServiceDependency {
    /// Resolves the two nullable columns into a single typed target.
    ///
    /// Returns `None` when both or neither column is set.
    pub fn resolve(&self) -> Option<ServiceDependency> {
        let target = match (self.asset_id, self.supplier_id) {
            (Some(asset_id), None) => DependencyTarget::Asset(asset_id),
            (None, Some(supplier_id)) => DependencyTarget::Supplier(supplier_id),
            _ => return None,
        };
        Some(ServiceDependency {
            id: self.id,
            service_id: self.service_id,
            target,
            kind: self.kind.clone(),
        })
    }
}

impl From<ServiceDependency> for RawServiceDependency {
    fn from(dep: ServiceDependency) -> Self {
        let (asset_id, supplier_id) = match dep.target {
            DependencyTarget::Asset(id) => (Some(id), None),
            DependencyTarget::Supplier(id) => (None, Some(id)),
        };
        Self {
            id: dep.id,
            service_id: dep.service_id,
            asset_id,
            supplier_id,
            kind: dep.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_creation() {
        let owner = Uuid::new_v4();
        let service = BusinessService::new("Payroll", Criticality::High).with_owner(owner);

        assert_eq!(service.name, "Payroll");
        assert_eq!(service.criticality, Criticality::High);
        assert_eq!(service.owner_id, Some(owner));
        assert!(service.external_provider_id.is_none());
    }

    #[test]
    fn test_dependency_constructors() {
        let service_id = Uuid::new_v4();
        let asset_id = Uuid::new_v4();
        let supplier_id = Uuid::new_v4();

        let to_asset = ServiceDependency::to_asset(service_id, asset_id, DependencyKind::Hosting);
        assert_eq!(to_asset.target, DependencyTarget::Asset(asset_id));

        let to_supplier =
            ServiceDependency::to_supplier(service_id, supplier_id, DependencyKind::Support);
        assert_eq!(to_supplier.target, DependencyTarget::Supplier(supplier_id));
    }

    #[test]
    fn test_raw_dependency_resolve_asset() {
        let raw = RawServiceDependency {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            asset_id: Some(Uuid::new_v4()),
            supplier_id: None,
            kind: DependencyKind::Software,
        };

        let resolved = raw.resolve().unwrap();
        assert!(matches!(resolved.target, DependencyTarget::Asset(_)));
    }

    #[test]
    fn test_raw_dependency_resolve_rejects_both_targets() {
        let raw = RawServiceDependency {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            asset_id: Some(Uuid::new_v4()),
            supplier_id: Some(Uuid::new_v4()),
            kind: DependencyKind::Hosting,
        };

        assert!(raw.resolve().is_none());
    }

    #[test]
    fn test_raw_dependency_resolve_rejects_no_target() {
        let raw = RawServiceDependency {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            asset_id: None,
            supplier_id: None,
            kind: DependencyKind::Hosting,
        };

        assert!(raw.resolve().is_none());
    }

    #[test]
    fn test_typed_to_raw_round_trip() {
        let dep = ServiceDependency::to_supplier(
            Uuid::new_v4(),
            Uuid::new_v4(),
            DependencyKind::Connectivity,
        );
        let raw: RawServiceDependency = dep.clone().into();

        assert!(raw.asset_id.is_none());
        let back = raw.resolve().unwrap();
        assert_eq!(back.target, dep.target);
        assert_eq!(back.service_id, dep.service_id);
    }
}
