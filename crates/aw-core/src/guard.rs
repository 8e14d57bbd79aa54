//! Referential deletion guard.
//!
//! Every dashboard used to reimplement its own scan-and-report pattern
//! before a delete. The guard centralizes that behind one declarative table
//! of `ReferenceSource` descriptors: one row per cross-entity relation that
//! blocks deletion. The guard only reports; callers perform the actual
//! mutation after receiving an allowing verdict.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::EntityType;
use crate::snapshot::Snapshot;

/// Marker appended to a truncated display list.
pub const DISPLAY_ELLIPSIS: &str = "…";

/// Errors raised when a guard is constructed from an invalid source table.
///
/// These are caller programming errors and surface at construction time,
/// never during evaluation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuardError {
    /// The descriptor names a field the collection does not carry.
    #[error("reference source '{reason}': collection {collection:?} has no field {field:?}")]
    UnsupportedField {
        /// Reason label of the offending source.
        reason: String,
        /// The scanned collection.
        collection: SourceCollection,
        /// The unsupported field.
        field: SourceField,
    },
}

/// Result type for guard construction.
pub type GuardResult<T> = Result<T, GuardError>;

/// Collections the guard can scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceCollection {
    /// Asset assignments.
    Assignments,
    /// Support tickets.
    Tickets,
    /// Team memberships.
    TeamMembers,
    /// Service dependency rows.
    ServiceDependencies,
    /// Policy acceptances.
    PolicyAcceptances,
    /// Business services.
    Services,
    /// Assets.
    Assets,
}

/// Foreign-key fields the guard can match on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceField {
    /// `collaborator_id` on assignments, team members, acceptances.
    CollaboratorId,
    /// `requester_id` on tickets.
    RequesterId,
    /// `technician_id` on tickets.
    TechnicianId,
    /// `asset_id` on assignments, tickets, dependency rows.
    AssetId,
    /// `supplier_id` on dependency rows and assets.
    SupplierId,
    /// `service_id` on dependency rows.
    ServiceId,
    /// `policy_id` on acceptances.
    PolicyId,
    /// `owner_id` on services.
    OwnerId,
    /// `external_provider_id` on services.
    ProviderId,
}

/// Declarative descriptor of one relation that blocks deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSource {
    /// Collection to scan.
    pub source: SourceCollection,
    /// Foreign-key field to match against the candidate id.
    pub field: SourceField,
    /// Entity type this source protects.
    pub target: EntityType,
    /// Human-readable blocking reason shown to the operator.
    pub reason: String,
    /// Whether only "active" rows block (open assignment, open ticket).
    pub active_only: bool,
}

impl ReferenceSource {
    /// Creates a descriptor matching every row.
    pub fn new(
        source: SourceCollection,
        field: SourceField,
        target: EntityType,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source,
            field,
            target,
            reason: reason.into(),
            active_only: false,
        }
    }

    /// Restricts the descriptor to active rows.
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    fn supports_field(&self) -> bool {
        use SourceCollection as C;
        use SourceField as F;
        matches!(
            (self.source, self.field),
            (C::Assignments, F::CollaboratorId)
                | (C::Assignments, F::AssetId)
                | (C::Tickets, F::RequesterId)
                | (C::Tickets, F::TechnicianId)
                | (C::Tickets, F::AssetId)
                | (C::TeamMembers, F::CollaboratorId)
                | (C::ServiceDependencies, F::ServiceId)
                | (C::ServiceDependencies, F::AssetId)
                | (C::ServiceDependencies, F::SupplierId)
                | (C::PolicyAcceptances, F::CollaboratorId)
                | (C::PolicyAcceptances, F::PolicyId)
                | (C::Services, F::OwnerId)
                | (C::Services, F::ProviderId)
                | (C::Assets, F::SupplierId)
        )
    }
}

/// The console's standard relation table.
pub fn default_sources() -> Vec<ReferenceSource> {
    use EntityType as E;
    use SourceCollection as C;
    use SourceField as F;
    vec![
        ReferenceSource::new(C::Assignments, F::CollaboratorId, E::Collaborator, "Active Assignments")
            .active_only(),
        ReferenceSource::new(C::Assignments, F::AssetId, E::Asset, "Active Assignments")
            .active_only(),
        ReferenceSource::new(C::Tickets, F::RequesterId, E::Collaborator, "Support Tickets (Requester)"),
        ReferenceSource::new(C::Tickets, F::TechnicianId, E::Collaborator, "Support Tickets (Technician)"),
        ReferenceSource::new(C::Tickets, F::AssetId, E::Asset, "Support Tickets"),
        ReferenceSource::new(C::TeamMembers, F::CollaboratorId, E::Collaborator, "Team Memberships"),
        ReferenceSource::new(C::ServiceDependencies, F::ServiceId, E::Service, "Service Dependencies"),
        ReferenceSource::new(C::ServiceDependencies, F::AssetId, E::Asset, "Service Dependencies"),
        ReferenceSource::new(C::ServiceDependencies, F::SupplierId, E::Supplier, "Service Dependencies"),
        ReferenceSource::new(C::PolicyAcceptances, F::CollaboratorId, E::Collaborator, "Policy Acceptances"),
        ReferenceSource::new(C::PolicyAcceptances, F::PolicyId, E::Policy, "Policy Acceptances"),
        ReferenceSource::new(C::Services, F::OwnerId, E::Collaborator, "Business Service Ownership"),
        ReferenceSource::new(C::Services, F::ProviderId, E::Supplier, "Business Services (External Provider)"),
        ReferenceSource::new(C::Assets, F::SupplierId, E::Supplier, "Assets Under Contract"),
    ]
}

/// Deletion-safety verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletionVerdict {
    /// Whether the entity can be deleted safely.
    pub allowed: bool,
    /// Complete list of blocking reasons, de-duplicated, in
    /// source-declaration order. Never truncated.
    pub reasons: Vec<String>,
    /// Reasons capped for inline display, with an ellipsis marker when
    /// truncated.
    pub display_reasons: Vec<String>,
}

/// Deletion guard over a declarative source table.
#[derive(Debug)]
pub struct ReferentialGuard {
    sources: Vec<ReferenceSource>,
    display_limit: usize,
}

impl ReferentialGuard {
    /// Creates a guard, validating every descriptor against the collection
    /// schema. Invalid descriptors are hard errors here, never at
    /// evaluation time.
    pub fn new(sources: Vec<ReferenceSource>, config: &EngineConfig) -> GuardResult<Self> {
        for source in &sources {
            if !source.supports_field() {
                return Err(GuardError::UnsupportedField {
                    reason: source.reason.clone(),
                    collection: source.source,
                    field: source.field,
                });
            }
        }
        Ok(Self {
            sources,
            display_limit: config.display_reason_limit,
        })
    }

    /// Creates a guard over the console's standard relation table.
    pub fn with_default_sources(config: &EngineConfig) -> Self {
        // The default table is statically valid.
        Self {
            sources: default_sources(),
            display_limit: config.display_reason_limit,
        }
    }

    /// Checks whether the entity may be deleted safely.
    ///
    /// All matching sources are scanned; there is no short-circuit, so the
    /// verdict always carries the complete blocker list.
    pub fn can_delete(&self, snapshot: &Snapshot, entity: EntityType, id: Uuid) -> DeletionVerdict {
        let mut reasons: Vec<String> = Vec::new();

        for source in self.sources.iter().filter(|s| s.target == entity) {
            if scan(snapshot, source, id) && !reasons.contains(&source.reason) {
                reasons.push(source.reason.clone());
            }
        }

        let mut display_reasons: Vec<String> =
            reasons.iter().take(self.display_limit).cloned().collect();
        if reasons.len() > self.display_limit {
            display_reasons.push(DISPLAY_ELLIPSIS.to_string());
        }

        DeletionVerdict {
            allowed: reasons.is_empty(),
            reasons,
            display_reasons,
        }
    }

    /// The configured source table.
    pub fn sources(&self) -> &[ReferenceSource] {
        &self.sources
    }
}

/// Scans one collection for a row referencing the candidate id.
fn scan(snapshot: &Snapshot, source: &ReferenceSource, id: Uuid) -> bool {
    use SourceCollection as C;
    use SourceField as F;

    match source.source {
        C::Assignments => snapshot
            .assignments
            .iter()
            .filter(|a| !source.active_only || a.is_active())
            .any(|a| match source.field {
                F::CollaboratorId => a.collaborator_id == id,
                F::AssetId => a.asset_id == id,
                _ => false,
            }),
        C::Tickets => snapshot
            .tickets
            .iter()
            .filter(|t| !source.active_only || !t.status.is_terminal())
            .any(|t| match source.field {
                F::RequesterId => t.requester_id == Some(id),
                F::TechnicianId => t.technician_id == Some(id),
                F::AssetId => t.asset_id == Some(id),
                _ => false,
            }),
        C::TeamMembers => snapshot
            .team_members
            .iter()
            .any(|m| matches!(source.field, F::CollaboratorId) && m.collaborator_id == id),
        C::ServiceDependencies => snapshot.dependencies.iter().any(|d| match source.field {
            F::ServiceId => d.service_id == id,
            F::AssetId => d.asset_id == Some(id),
            F::SupplierId => d.supplier_id == Some(id),
            _ => false,
        }),
        C::PolicyAcceptances => snapshot.policy_acceptances.iter().any(|a| match source.field {
            F::CollaboratorId => a.collaborator_id == id,
            F::PolicyId => a.policy_id == id,
            _ => false,
        }),
        C::Services => snapshot.services.iter().any(|s| match source.field {
            F::OwnerId => s.owner_id == Some(id),
            F::ProviderId => s.external_provider_id == Some(id),
            _ => false,
        }),
        C::Assets => snapshot
            .assets
            .iter()
            .any(|a| matches!(source.field, F::SupplierId) && a.supplier_id == Some(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Asset, AssetKind, Assignment, AssignmentKind, Collaborator, Severity, TeamMember, Ticket,
        TicketCategory, TicketStatus,
    };
    use chrono::Utc;

    fn guard() -> ReferentialGuard {
        ReferentialGuard::with_default_sources(&EngineConfig::default())
    }

    #[test]
    fn test_unreferenced_entity_is_deletable() {
        let collaborator = Collaborator::new("Ghost");
        let id = collaborator.id;
        let snapshot = Snapshot::new().with_collaborators(vec![collaborator]);

        let verdict = guard().can_delete(&snapshot, EntityType::Collaborator, id);

        assert!(verdict.allowed);
        assert!(verdict.reasons.is_empty());
        assert!(verdict.display_reasons.is_empty());
    }

    #[test]
    fn test_ticket_roles_yield_two_distinct_reasons() {
        let collaborator = Collaborator::new("Jo");
        let id = collaborator.id;
        let closed = Ticket::new("done", TicketCategory::ServiceRequest, Severity::Low)
            .with_requester(id)
            .with_status(TicketStatus::Closed);
        let open = Ticket::new("wip", TicketCategory::Malfunction, Severity::Medium)
            .with_technician(id);

        let snapshot = Snapshot::new()
            .with_collaborators(vec![collaborator])
            .with_tickets(vec![closed, open]);

        let verdict = guard().can_delete(&snapshot, EntityType::Collaborator, id);

        assert!(!verdict.allowed);
        assert_eq!(
            verdict.reasons,
            vec![
                "Support Tickets (Requester)".to_string(),
                "Support Tickets (Technician)".to_string(),
            ]
        );
    }

    #[test]
    fn test_returned_assignment_does_not_block() {
        let collaborator = Collaborator::new("Sam");
        let id = collaborator.id;
        let asset = Asset::new("laptop-12", AssetKind::Equipment);
        let assignment =
            Assignment::new(id, asset.id, AssignmentKind::Equipment).returned(Utc::now());

        let snapshot = Snapshot::new()
            .with_collaborators(vec![collaborator])
            .with_assets(vec![asset])
            .with_assignments(vec![assignment]);

        let verdict = guard().can_delete(&snapshot, EntityType::Collaborator, id);
        assert!(verdict.allowed);
    }

    #[test]
    fn test_active_assignment_blocks_collaborator_and_asset() {
        let collaborator = Collaborator::new("Ana");
        let asset = Asset::new("laptop-13", AssetKind::Equipment);
        let assignment = Assignment::new(collaborator.id, asset.id, AssignmentKind::Equipment);
        let (collaborator_id, asset_id) = (collaborator.id, asset.id);

        let snapshot = Snapshot::new()
            .with_collaborators(vec![collaborator])
            .with_assets(vec![asset])
            .with_assignments(vec![assignment]);

        let guard = guard();
        let for_collaborator =
            guard.can_delete(&snapshot, EntityType::Collaborator, collaborator_id);
        let for_asset = guard.can_delete(&snapshot, EntityType::Asset, asset_id);

        assert_eq!(for_collaborator.reasons, vec!["Active Assignments".to_string()]);
        assert_eq!(for_asset.reasons, vec!["Active Assignments".to_string()]);
    }

    #[test]
    fn test_display_reasons_capped_with_ellipsis() {
        let collaborator = Collaborator::new("Lead");
        let id = collaborator.id;
        let asset = Asset::new("kit", AssetKind::Equipment);
        let policy = crate::models::Policy::new("AUP", true);

        let snapshot = Snapshot::new()
            .with_collaborators(vec![collaborator])
            .with_assets(vec![asset.clone()])
            .with_assignments(vec![Assignment::new(id, asset.id, AssignmentKind::Equipment)])
            .with_tickets(vec![
                Ticket::new("a", TicketCategory::ServiceRequest, Severity::Low).with_requester(id),
                Ticket::new("b", TicketCategory::Malfunction, Severity::Low).with_technician(id),
            ])
            .with_team_members(vec![TeamMember::new(Uuid::new_v4(), id)])
            .with_policies(vec![policy.clone()])
            .with_policy_acceptances(vec![crate::models::PolicyAcceptance::new(&policy, id)]);

        let verdict = guard().can_delete(&snapshot, EntityType::Collaborator, id);

        assert!(!verdict.allowed);
        assert!(verdict.reasons.len() > 3);
        assert_eq!(verdict.display_reasons.len(), 4);
        assert_eq!(verdict.display_reasons.last().unwrap().as_str(), DISPLAY_ELLIPSIS);
        // The uncapped list never carries the marker.
        assert!(!verdict.reasons.contains(&DISPLAY_ELLIPSIS.to_string()));
    }

    #[test]
    fn test_duplicate_reason_labels_are_merged() {
        let supplier = crate::models::Supplier::new("Vendor", crate::models::Criticality::Low);
        let id = supplier.id;
        let service = crate::models::BusinessService::new("S", crate::models::Criticality::Low);
        let deps = vec![
            crate::models::ServiceDependency::to_supplier(
                service.id,
                id,
                crate::models::DependencyKind::Support,
            ),
            crate::models::ServiceDependency::to_supplier(
                service.id,
                id,
                crate::models::DependencyKind::Connectivity,
            ),
        ];

        let snapshot = Snapshot::new()
            .with_suppliers(vec![supplier])
            .with_services(vec![service])
            .with_dependencies(deps);

        let verdict = guard().can_delete(&snapshot, EntityType::Supplier, id);
        assert_eq!(verdict.reasons, vec!["Service Dependencies".to_string()]);
    }

    #[test]
    fn test_invalid_source_rejected_at_construction() {
        let sources = vec![ReferenceSource::new(
            SourceCollection::TeamMembers,
            SourceField::SupplierId,
            EntityType::Supplier,
            "Nonsense",
        )];

        let err = ReferentialGuard::new(sources, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, GuardError::UnsupportedField { .. }));
    }

    #[test]
    fn test_default_sources_are_valid() {
        assert!(ReferentialGuard::new(default_sources(), &EngineConfig::default()).is_ok());
    }
}
