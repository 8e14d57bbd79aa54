//! Data-integrity diagnostics.
//!
//! The engine never raises for an individual bad record during bulk
//! evaluation: duplicates, dangling edges, and ambiguous edges degrade the
//! specific record's result and land here as warnings for dashboards and
//! logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::EntityType;

/// A non-fatal data-integrity finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DataIntegrityWarning {
    /// Two records in the same collection share an id; the last one wins.
    DuplicateId {
        /// The affected collection.
        entity: EntityType,
        /// The duplicated id.
        id: Uuid,
    },
    /// A dependency edge points at a service or target that does not exist.
    DanglingEdge {
        /// The offending dependency row.
        dependency_id: Uuid,
        /// What the edge failed to resolve.
        detail: String,
    },
    /// A dependency row has both or neither of its target columns set.
    AmbiguousEdge {
        /// The offending dependency row.
        dependency_id: Uuid,
    },
}

impl std::fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataIntegrityWarning::DuplicateId { entity, id } => {
                write!(f, "duplicate {} id {}", entity, id)
            }
            DataIntegrityWarning::DanglingEdge {
                dependency_id,
                detail,
            } => write!(f, "dangling dependency {}: {}", dependency_id, detail),
            DataIntegrityWarning::AmbiguousEdge { dependency_id } => {
                write!(f, "ambiguous dependency {}: not exactly one target", dependency_id)
            }
        }
    }
}

/// Accumulated integrity findings from an index or graph build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// All findings, in discovery order.
    pub warnings: Vec<DataIntegrityWarning>,
}

impl Diagnostics {
    /// Records a finding.
    pub fn push(&mut self, warning: DataIntegrityWarning) {
        self.warnings.push(warning);
    }

    /// Merges findings from another build.
    pub fn merge(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    /// Number of duplicate-id findings.
    pub fn duplicate_ids(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, DataIntegrityWarning::DuplicateId { .. }))
            .count()
    }

    /// Number of dangling-edge findings.
    pub fn dangling_edges(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, DataIntegrityWarning::DanglingEdge { .. }))
            .count()
    }

    /// Number of ambiguous-edge findings.
    pub fn ambiguous_edges(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, DataIntegrityWarning::AmbiguousEdge { .. }))
            .count()
    }

    /// Returns true when no findings were recorded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_counters() {
        let mut diagnostics = Diagnostics::default();
        assert!(diagnostics.is_clean());

        diagnostics.push(DataIntegrityWarning::DuplicateId {
            entity: EntityType::Asset,
            id: Uuid::new_v4(),
        });
        diagnostics.push(DataIntegrityWarning::DanglingEdge {
            dependency_id: Uuid::new_v4(),
            detail: "service missing".to_string(),
        });
        diagnostics.push(DataIntegrityWarning::AmbiguousEdge {
            dependency_id: Uuid::new_v4(),
        });

        assert_eq!(diagnostics.duplicate_ids(), 1);
        assert_eq!(diagnostics.dangling_edges(), 1);
        assert_eq!(diagnostics.ambiguous_edges(), 1);
        assert!(!diagnostics.is_clean());
    }

    #[test]
    fn test_diagnostics_merge() {
        let mut a = Diagnostics::default();
        a.push(DataIntegrityWarning::AmbiguousEdge {
            dependency_id: Uuid::new_v4(),
        });

        let mut b = Diagnostics::default();
        b.push(DataIntegrityWarning::AmbiguousEdge {
            dependency_id: Uuid::new_v4(),
        });

        a.merge(b);
        assert_eq!(a.ambiguous_edges(), 2);
    }

    #[test]
    fn test_warning_display() {
        let warning = DataIntegrityWarning::DuplicateId {
            entity: EntityType::Supplier,
            id: Uuid::nil(),
        };
        let text = format!("{}", warning);
        assert!(text.contains("duplicate Supplier id"));
    }
}
