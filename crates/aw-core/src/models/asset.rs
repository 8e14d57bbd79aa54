//! Asset data model for the compliance inventory.
//!
//! Assets are the physical and software resources (equipment, licenses)
//! that business services depend on. Their effective criticality is derived
//! by the dependency graph, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical or software resource tracked in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier for this asset.
    pub id: Uuid,
    /// Human-readable name for the asset.
    pub name: String,
    /// Whether this is equipment or a software license.
    pub kind: AssetKind,
    /// Current lifecycle status.
    pub status: AssetStatus,
    /// Optional criticality floor supplied by the owning record.
    ///
    /// Propagation never lowers the effective criticality below this value.
    pub criticality_override: Option<Criticality>,
    /// Supplier this asset is procured from, if any.
    pub supplier_id: Option<Uuid>,
    /// Timestamp when the asset was first created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Creates a new asset with required fields.
    pub fn new(name: impl Into<String>, kind: AssetKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            status: AssetStatus::InService,
            criticality_override: None,
            supplier_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a criticality floor for this asset.
    pub fn with_criticality_override(mut self, criticality: Criticality) -> Self {
        self.criticality_override = Some(criticality);
        self
    }

    /// Links this asset to the supplier it is procured from.
    pub fn with_supplier(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: AssetStatus) -> Self {
        self.status = status;
        self
    }
}

/// Classification of the asset kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Physical equipment (server, laptop, network gear).
    Equipment,
    /// Software license or subscription.
    License,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Equipment => write!(f, "Equipment"),
            AssetKind::License => write!(f, "License"),
        }
    }
}

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Deployed and in active use.
    InService,
    /// In stock, not assigned.
    InStock,
    /// Temporarily out of service for repair.
    UnderRepair,
    /// Decommissioned.
    Retired,
    /// Custom status label.
    Custom(String),
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStatus::InService => write!(f, "In Service"),
            AssetStatus::InStock => write!(f, "In Stock"),
            AssetStatus::UnderRepair => write!(f, "Under Repair"),
            AssetStatus::Retired => write!(f, "Retired"),
            AssetStatus::Custom(name) => write!(f, "Custom: {}", name),
        }
    }
}

/// Business criticality level, totally ordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    /// Low criticality - minimal business impact.
    Low,
    /// Medium criticality.
    Medium,
    /// High criticality - significant business impact.
    High,
    /// Critical - essential business service.
    Critical,
}

impl Criticality {
    /// Returns true for the levels that count toward concentration risk.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Criticality::High | Criticality::Critical)
    }
}

impl Default for Criticality {
    fn default() -> Self {
        Criticality::Low
    }
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criticality::Low => write!(f, "Low"),
            Criticality::Medium => write!(f, "Medium"),
            Criticality::High => write!(f, "High"),
            Criticality::Critical => write!(f, "Critical"),
        }
    }
}
