//! Id-keyed lookup index over a snapshot.
//!
//! Pure indexing with no business rules. Duplicate ids are tolerated:
//! the last occurrence wins and the first is reported as a
//! `DataIntegrityWarning`, matching the engine's never-abort policy.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::diagnostics::{DataIntegrityWarning, Diagnostics};
use crate::models::{
    Asset, BusinessService, Collaborator, EntityType, Policy, Supplier, Ticket,
};
use crate::snapshot::Snapshot;

/// O(1) lookup maps for every referencable entity collection.
#[derive(Debug)]
pub struct AssetIndex<'a> {
    assets: HashMap<Uuid, &'a Asset>,
    services: HashMap<Uuid, &'a BusinessService>,
    suppliers: HashMap<Uuid, &'a Supplier>,
    tickets: HashMap<Uuid, &'a Ticket>,
    policies: HashMap<Uuid, &'a Policy>,
    collaborators: HashMap<Uuid, &'a Collaborator>,
    diagnostics: Diagnostics,
}

impl<'a> AssetIndex<'a> {
    /// Builds the index from a snapshot.
    pub fn build(snapshot: &'a Snapshot) -> Self {
        let mut diagnostics = Diagnostics::default();

        let assets = index_by_id(
            snapshot.assets.iter().map(|a| (a.id, a)),
            EntityType::Asset,
            &mut diagnostics,
        );
        let services = index_by_id(
            snapshot.services.iter().map(|s| (s.id, s)),
            EntityType::Service,
            &mut diagnostics,
        );
        let suppliers = index_by_id(
            snapshot.suppliers.iter().map(|s| (s.id, s)),
            EntityType::Supplier,
            &mut diagnostics,
        );
        let tickets = index_by_id(
            snapshot.tickets.iter().map(|t| (t.id, t)),
            EntityType::Ticket,
            &mut diagnostics,
        );
        let policies = index_by_id(
            snapshot.policies.iter().map(|p| (p.id, p)),
            EntityType::Policy,
            &mut diagnostics,
        );
        let collaborators = index_by_id(
            snapshot.collaborators.iter().map(|c| (c.id, c)),
            EntityType::Collaborator,
            &mut diagnostics,
        );

        Self {
            assets,
            services,
            suppliers,
            tickets,
            policies,
            collaborators,
            diagnostics,
        }
    }

    /// Looks up an asset by id.
    pub fn asset(&self, id: &Uuid) -> Option<&'a Asset> {
        self.assets.get(id).copied()
    }

    /// Looks up a business service by id.
    pub fn service(&self, id: &Uuid) -> Option<&'a BusinessService> {
        self.services.get(id).copied()
    }

    /// Looks up a supplier by id.
    pub fn supplier(&self, id: &Uuid) -> Option<&'a Supplier> {
        self.suppliers.get(id).copied()
    }

    /// Looks up a ticket by id.
    pub fn ticket(&self, id: &Uuid) -> Option<&'a Ticket> {
        self.tickets.get(id).copied()
    }

    /// Looks up a policy by id.
    pub fn policy(&self, id: &Uuid) -> Option<&'a Policy> {
        self.policies.get(id).copied()
    }

    /// Looks up a collaborator by id.
    pub fn collaborator(&self, id: &Uuid) -> Option<&'a Collaborator> {
        self.collaborators.get(id).copied()
    }

    /// Integrity findings recorded during the build.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// Builds an id map, warning on duplicates (first occurrence reported,
/// last write wins).
fn index_by_id<'a, T>(
    entries: impl Iterator<Item = (Uuid, &'a T)>,
    entity: EntityType,
    diagnostics: &mut Diagnostics,
) -> HashMap<Uuid, &'a T> {
    let mut map = HashMap::new();
    for (id, item) in entries {
        if map.insert(id, item).is_some() {
            warn!(%id, %entity, "duplicate id in snapshot, last write wins");
            diagnostics.push(DataIntegrityWarning::DuplicateId { entity, id });
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetKind, Criticality};

    #[test]
    fn test_index_lookup() {
        let asset = Asset::new("nas-01", AssetKind::Equipment);
        let asset_id = asset.id;
        let service = BusinessService::new("File Shares", Criticality::Medium);
        let service_id = service.id;

        let snapshot = Snapshot::new()
            .with_assets(vec![asset])
            .with_services(vec![service]);
        let index = AssetIndex::build(&snapshot);

        assert!(index.asset(&asset_id).is_some());
        assert!(index.service(&service_id).is_some());
        assert!(index.asset(&Uuid::new_v4()).is_none());
        assert!(index.diagnostics().is_clean());
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let mut first = Asset::new("dup", AssetKind::Equipment);
        let mut second = Asset::new("dup-replacement", AssetKind::License);
        second.id = first.id;
        first.name = "dup-original".to_string();
        let id = first.id;

        let snapshot = Snapshot::new().with_assets(vec![first, second]);
        let index = AssetIndex::build(&snapshot);

        assert_eq!(index.asset(&id).unwrap().name, "dup-replacement");
        assert_eq!(index.diagnostics().duplicate_ids(), 1);
    }

    #[test]
    fn test_duplicates_counted_per_collection() {
        let collaborator = Collaborator::new("A");
        let mut duplicate = Collaborator::new("B");
        duplicate.id = collaborator.id;

        let snapshot = Snapshot::new().with_collaborators(vec![collaborator, duplicate]);
        let index = AssetIndex::build(&snapshot);

        assert_eq!(index.diagnostics().duplicate_ids(), 1);
    }
}
