//! Supplier model for third-party risk tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::Criticality;

/// A third-party supplier the organization depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier for this supplier.
    pub id: Uuid,
    /// Supplier name.
    pub name: String,
    /// Assessed third-party risk level.
    pub risk_level: Criticality,
    /// Whether the supplier relationship is currently active.
    pub is_active: bool,
    /// Expiry date of the supplier's ISO 27001 certificate, if tracked.
    pub iso_certificate_expiry: Option<DateTime<Utc>>,
}

impl Supplier {
    /// Creates a new active supplier.
    pub fn new(name: impl Into<String>, risk_level: Criticality) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            risk_level,
            is_active: true,
            iso_certificate_expiry: None,
        }
    }

    /// Sets the ISO certificate expiry date.
    pub fn with_iso_certificate_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.iso_certificate_expiry = Some(expiry);
        self
    }

    /// Marks the supplier relationship as terminated.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}
