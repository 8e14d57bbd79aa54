//! Data models for the compliance engine.
//!
//! All entities here are owned and mutated by CRUD collaborators outside
//! the engine; the engine only reads them and derives facts.

pub mod asset;
pub mod collaborator;
pub mod policy;
pub mod service;
pub mod supplier;
pub mod ticket;

pub use asset::{Asset, AssetKind, AssetStatus, Criticality};
pub use collaborator::{Assignment, AssignmentKind, Collaborator, TeamMember};
pub use policy::{Policy, PolicyAcceptance};
pub use service::{
    BusinessService, DependencyKind, DependencyTarget, RawServiceDependency, ServiceDependency,
};
pub use supplier::Supplier;
pub use ticket::{Severity, Ticket, TicketCategory, TicketDraft, TicketStatus};

use serde::{Deserialize, Serialize};

/// The referencable entity types known to the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A physical or software asset.
    Asset,
    /// A business service.
    Service,
    /// A supplier.
    Supplier,
    /// A ticket.
    Ticket,
    /// A policy document.
    Policy,
    /// A collaborator.
    Collaborator,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Asset => write!(f, "Asset"),
            EntityType::Service => write!(f, "Service"),
            EntityType::Supplier => write!(f, "Supplier"),
            EntityType::Ticket => write!(f, "Ticket"),
            EntityType::Policy => write!(f, "Policy"),
            EntityType::Collaborator => write!(f, "Collaborator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_display() {
        assert_eq!(format!("{}", EntityType::Asset), "Asset");
        assert_eq!(format!("{}", EntityType::Collaborator), "Collaborator");
    }

    #[test]
    fn test_entity_type_serialization() {
        let json = serde_json::to_string(&EntityType::Supplier).unwrap();
        assert_eq!(json, "\"supplier\"");
    }
}
