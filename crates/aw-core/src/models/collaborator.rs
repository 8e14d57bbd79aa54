//! Collaborator, assignment, and team membership models.
//!
//! Assignments carry the "active while no return date" rule the referential
//! guard relies on: an open assignment blocks deletion of both its
//! collaborator and its asset, a returned one does not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person holding assets or tickets in the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    /// Unique identifier for this collaborator.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Whether the collaborator is currently employed/active.
    pub is_active: bool,
}

impl Collaborator {
    /// Creates a new active collaborator.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_active: true,
        }
    }

    /// Marks the collaborator as inactive.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Kind of asset assignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    /// Physical equipment handed out.
    Equipment,
    /// Software license seat granted.
    License,
}

/// An asset handed out to a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier for this assignment.
    pub id: Uuid,
    /// The collaborator holding the asset.
    pub collaborator_id: Uuid,
    /// The asset handed out.
    pub asset_id: Uuid,
    /// Equipment or license assignment.
    pub kind: AssignmentKind,
    /// When the asset was handed out.
    pub assigned_at: DateTime<Utc>,
    /// When the asset was returned; `None` while the assignment is active.
    pub returned_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Creates a new active assignment.
    pub fn new(collaborator_id: Uuid, asset_id: Uuid, kind: AssignmentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            collaborator_id,
            asset_id,
            kind,
            assigned_at: Utc::now(),
            returned_at: None,
        }
    }

    /// Marks the assignment as returned at the given time.
    pub fn returned(mut self, returned_at: DateTime<Utc>) -> Self {
        self.returned_at = Some(returned_at);
        self
    }

    /// Returns true while the asset has not been returned.
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Membership of a collaborator in a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique identifier for this membership.
    pub id: Uuid,
    /// The team.
    pub team_id: Uuid,
    /// The member.
    pub collaborator_id: Uuid,
}

impl TeamMember {
    /// Creates a new team membership.
    pub fn new(team_id: Uuid, collaborator_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            collaborator_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_creation() {
        let collaborator = Collaborator::new("Dana Reyes");
        assert!(collaborator.is_active);

        let inactive = collaborator.deactivated();
        assert!(!inactive.is_active);
    }

    #[test]
    fn test_assignment_active_until_returned() {
        let assignment =
            Assignment::new(Uuid::new_v4(), Uuid::new_v4(), AssignmentKind::Equipment);
        assert!(assignment.is_active());

        let returned = assignment.returned(Utc::now());
        assert!(!returned.is_active());
    }

    #[test]
    fn test_team_member_creation() {
        let team_id = Uuid::new_v4();
        let collaborator_id = Uuid::new_v4();
        let member = TeamMember::new(team_id, collaborator_id);

        assert_eq!(member.team_id, team_id);
        assert_eq!(member.collaborator_id, collaborator_id);
    }
}
