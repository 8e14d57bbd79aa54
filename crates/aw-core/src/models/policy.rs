//! Policy and policy-acceptance models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An internal policy document collaborators must accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Unique identifier for this policy.
    pub id: Uuid,
    /// Policy name.
    pub name: String,
    /// Current version number; bumped on every revision.
    pub version: u32,
    /// When the current version was published.
    pub updated_at: DateTime<Utc>,
    /// Whether acceptance is mandatory for all active collaborators.
    pub is_mandatory: bool,
    /// Scheduled review date, if the policy is on a review cycle.
    pub review_due: Option<DateTime<Utc>>,
}

impl Policy {
    /// Creates a new policy at version 1.
    pub fn new(name: impl Into<String>, is_mandatory: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            version: 1,
            updated_at: Utc::now(),
            is_mandatory,
            review_due: None,
        }
    }

    /// Sets the scheduled review date.
    pub fn with_review_due(mut self, review_due: DateTime<Utc>) -> Self {
        self.review_due = Some(review_due);
        self
    }

    /// Publishes a new version at the given time.
    pub fn revised(mut self, updated_at: DateTime<Utc>) -> Self {
        self.version += 1;
        self.updated_at = updated_at;
        self
    }
}

/// A collaborator's acceptance of a specific policy version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyAcceptance {
    /// Unique identifier for this acceptance record.
    pub id: Uuid,
    /// The accepted policy.
    pub policy_id: Uuid,
    /// The version that was accepted.
    pub version: u32,
    /// The accepting collaborator.
    pub collaborator_id: Uuid,
    /// When the acceptance was recorded.
    pub accepted_at: DateTime<Utc>,
}

impl PolicyAcceptance {
    /// Records an acceptance of the policy's current version.
    pub fn new(policy: &Policy, collaborator_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            policy_id: policy.id,
            version: policy.version,
            collaborator_id,
            accepted_at: Utc::now(),
        }
    }

    /// Returns true if this acceptance covers the policy's current version.
    pub fn covers(&self, policy: &Policy) -> bool {
        self.policy_id == policy.id && self.version >= policy.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_policy_creation_and_revision() {
        let policy = Policy::new("Acceptable Use", true);
        assert_eq!(policy.version, 1);
        assert!(policy.is_mandatory);

        let later = Utc::now() + Duration::days(30);
        let revised = policy.revised(later);
        assert_eq!(revised.version, 2);
        assert_eq!(revised.updated_at, later);
    }

    #[test]
    fn test_acceptance_covers_current_version() {
        let policy = Policy::new("Information Security", true);
        let collaborator = Uuid::new_v4();
        let acceptance = PolicyAcceptance::new(&policy, collaborator);

        assert!(acceptance.covers(&policy));

        let revised = policy.revised(Utc::now());
        assert!(!acceptance.covers(&revised));
    }

    #[test]
    fn test_acceptance_does_not_cover_other_policy() {
        let policy_a = Policy::new("A", true);
        let policy_b = Policy::new("B", true);
        let acceptance = PolicyAcceptance::new(&policy_a, Uuid::new_v4());

        assert!(!acceptance.covers(&policy_b));
    }
}
