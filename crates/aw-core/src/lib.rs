//! # aw-core
//!
//! Core engine and data models for Asset Warden.
//!
//! This crate provides the inventory snapshot model, id-keyed asset index,
//! service dependency graph, referential deletion guard, and the regulatory
//! deadline scheduler.

pub mod config;
pub mod deadline;
pub mod diagnostics;
pub mod graph;
pub mod guard;
pub mod index;
pub mod models;
pub mod snapshot;
pub mod store;

pub use config::{DeadlineConfig, EngineConfig};
pub use deadline::{
    ClockReading, DeadlineKind, DeadlineRecord, DeadlineScheduler, DeadlineState, SweepDiagnostics,
    SweepReport,
};
pub use diagnostics::{DataIntegrityWarning, Diagnostics};
pub use graph::{concentration_risk, ConcentrationRisk, DependencyGraph, ProviderKey};
pub use guard::{
    DeletionVerdict, GuardError, ReferenceSource, ReferentialGuard, SourceCollection, SourceField,
};
pub use index::AssetIndex;
pub use models::{
    Asset, AssetKind, AssetStatus, Assignment, AssignmentKind, BusinessService, Collaborator,
    Criticality, DependencyKind, DependencyTarget, EntityType, Policy, PolicyAcceptance,
    RawServiceDependency, ServiceDependency, Severity, Supplier, TeamMember, Ticket,
    TicketCategory, TicketDraft, TicketStatus,
};
pub use snapshot::Snapshot;
pub use store::{InMemorySnapshotStore, SnapshotStore, StoreError, StoreResult};
