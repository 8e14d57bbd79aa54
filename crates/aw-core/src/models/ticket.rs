//! Ticket models: support tickets and the remediation ticket drafts the
//! deadline scheduler emits.
//!
//! `created_at` is optional on purpose: malformed or missing timestamps from
//! the backing store must be representable so the scheduler can classify the
//! subject as `Unknown` instead of aborting a bulk sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A support or incident ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier for this ticket.
    pub id: Uuid,
    /// Short summary of the ticket.
    pub title: String,
    /// When the ticket was opened; `None` when the stored timestamp was
    /// missing or unparseable.
    pub created_at: Option<DateTime<Utc>>,
    /// Ticket category.
    pub category: TicketCategory,
    /// Whether the ticket was flagged as a security incident.
    pub is_security_incident: bool,
    /// Current status.
    pub status: TicketStatus,
    /// Severity of the underlying issue.
    pub severity: Severity,
    /// Collaborator who opened the ticket.
    pub requester_id: Option<Uuid>,
    /// Collaborator working the ticket.
    pub technician_id: Option<Uuid>,
    /// Asset the ticket concerns, if any.
    pub asset_id: Option<Uuid>,
    /// Entity a remediation ticket was opened for, if any.
    pub linked_entity_id: Option<Uuid>,
}

impl Ticket {
    /// Creates a new open ticket.
    pub fn new(title: impl Into<String>, category: TicketCategory, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: Some(Utc::now()),
            category,
            is_security_incident: false,
            status: TicketStatus::Open,
            severity,
            requester_id: None,
            technician_id: None,
            asset_id: None,
            linked_entity_id: None,
        }
    }

    /// Flags the ticket as a security incident.
    pub fn as_security_incident(mut self) -> Self {
        self.is_security_incident = true;
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the requesting collaborator.
    pub fn with_requester(mut self, collaborator_id: Uuid) -> Self {
        self.requester_id = Some(collaborator_id);
        self
    }

    /// Sets the assigned technician.
    pub fn with_technician(mut self, collaborator_id: Uuid) -> Self {
        self.technician_id = Some(collaborator_id);
        self
    }

    /// Links the ticket to an asset.
    pub fn with_asset(mut self, asset_id: Uuid) -> Self {
        self.asset_id = Some(asset_id);
        self
    }

    /// Links the ticket to the entity it remediates.
    pub fn with_linked_entity(mut self, entity_id: Uuid) -> Self {
        self.linked_entity_id = Some(entity_id);
        self
    }

    /// Sets the ticket status.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }
}

/// Ticket category taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    /// Security incident.
    SecurityIncident,
    /// Hardware or software malfunction.
    Malfunction,
    /// Routine service request.
    ServiceRequest,
    /// Planned maintenance.
    Maintenance,
    /// Compliance remediation.
    Compliance,
    /// Custom category.
    Custom(String),
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketCategory::SecurityIncident => write!(f, "Security Incident"),
            TicketCategory::Malfunction => write!(f, "Malfunction"),
            TicketCategory::ServiceRequest => write!(f, "Service Request"),
            TicketCategory::Maintenance => write!(f, "Maintenance"),
            TicketCategory::Compliance => write!(f, "Compliance"),
            TicketCategory::Custom(name) => write!(f, "Custom: {}", name),
        }
    }
}

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly opened.
    Open,
    /// Being worked on.
    InProgress,
    /// Waiting on an external party.
    OnHold,
    /// Work finished.
    Closed,
    /// Abandoned without resolution.
    Cancelled,
}

impl TicketStatus {
    /// Returns true once the ticket can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Closed | TicketStatus::Cancelled)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "Open"),
            TicketStatus::InProgress => write!(f, "In Progress"),
            TicketStatus::OnHold => write!(f, "On Hold"),
            TicketStatus::Closed => write!(f, "Closed"),
            TicketStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Severity of a ticket or draft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
    /// Critical severity.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

/// Remediation ticket payload emitted by the deadline scheduler.
///
/// The scheduler never persists anything itself; callers hand a draft to
/// their own ticket-creation path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketDraft {
    /// Ticket title.
    pub title: String,
    /// Ticket description.
    pub description: String,
    /// Category to open the ticket under.
    pub category: TicketCategory,
    /// The entity whose deadline breach this draft remediates.
    pub linked_entity_id: Uuid,
    /// Severity for the new ticket.
    pub severity: Severity,
}
