//! Immutable entity snapshot.
//!
//! A `Snapshot` is a plain value holding the entity collections the engine
//! operates on, loaded from the durable store by an external collaborator.
//! Every engine operation takes a snapshot and returns derived values with
//! no retained references back into mutable state.

use serde::{Deserialize, Serialize};

use crate::models::{
    Asset, Assignment, BusinessService, Collaborator, Policy, PolicyAcceptance,
    RawServiceDependency, Supplier, TeamMember, Ticket,
};

/// Point-in-time view of all entity collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Physical and software assets.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Business services from the impact analysis.
    #[serde(default)]
    pub services: Vec<BusinessService>,
    /// Dependency rows in their raw two-column shape.
    #[serde(default)]
    pub dependencies: Vec<RawServiceDependency>,
    /// Third-party suppliers.
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    /// Support and incident tickets.
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    /// Policy documents.
    #[serde(default)]
    pub policies: Vec<Policy>,
    /// Policy acceptance records.
    #[serde(default)]
    pub policy_acceptances: Vec<PolicyAcceptance>,
    /// Collaborators.
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    /// Asset assignments.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Team memberships.
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the asset collection.
    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    /// Sets the business service collection.
    pub fn with_services(mut self, services: Vec<BusinessService>) -> Self {
        self.services = services;
        self
    }

    /// Sets the dependency collection from typed edges.
    pub fn with_dependencies(
        mut self,
        dependencies: impl IntoIterator<Item = crate::models::ServiceDependency>,
    ) -> Self {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the dependency collection from raw rows.
    pub fn with_raw_dependencies(mut self, dependencies: Vec<RawServiceDependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Sets the supplier collection.
    pub fn with_suppliers(mut self, suppliers: Vec<Supplier>) -> Self {
        self.suppliers = suppliers;
        self
    }

    /// Sets the ticket collection.
    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    /// Sets the policy collection.
    pub fn with_policies(mut self, policies: Vec<Policy>) -> Self {
        self.policies = policies;
        self
    }

    /// Sets the policy acceptance collection.
    pub fn with_policy_acceptances(mut self, acceptances: Vec<PolicyAcceptance>) -> Self {
        self.policy_acceptances = acceptances;
        self
    }

    /// Sets the collaborator collection.
    pub fn with_collaborators(mut self, collaborators: Vec<Collaborator>) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Sets the assignment collection.
    pub fn with_assignments(mut self, assignments: Vec<Assignment>) -> Self {
        self.assignments = assignments;
        self
    }

    /// Sets the team membership collection.
    pub fn with_team_members(mut self, team_members: Vec<TeamMember>) -> Self {
        self.team_members = team_members;
        self
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.assets.len()
            + self.services.len()
            + self.dependencies.len()
            + self.suppliers.len()
            + self.tickets.len()
            + self.policies.len()
            + self.policy_acceptances.len()
            + self.collaborators.len()
            + self.assignments.len()
            + self.team_members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetKind, Criticality, DependencyKind, ServiceDependency};

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::new();
        assert_eq!(snapshot.record_count(), 0);
    }

    #[test]
    fn test_builder_and_count() {
        let asset = Asset::new("srv-01", AssetKind::Equipment);
        let service = BusinessService::new("Billing", Criticality::High);
        let dep = ServiceDependency::to_asset(service.id, asset.id, DependencyKind::Hosting);

        let snapshot = Snapshot::new()
            .with_assets(vec![asset])
            .with_services(vec![service])
            .with_dependencies(vec![dep]);

        assert_eq!(snapshot.record_count(), 3);
        assert_eq!(snapshot.dependencies.len(), 1);
        assert!(snapshot.dependencies[0].asset_id.is_some());
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_collections() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"assets": []}"#).unwrap();
        assert_eq!(snapshot.record_count(), 0);
    }
}
