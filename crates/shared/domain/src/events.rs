//! Record change notifications published by the feature slices.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Member,
    Team,
    Tournament,
    Profile,
    Match,
}

impl Entity {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Team => "Team",
            Self::Tournament => "Tournament",
            Self::Profile => "Profile",
            Self::Match => "Match",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

impl Action {
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// A successful write to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubEvent {
    pub action: Action,
    pub entity: Entity,
    pub id: i64,
    /// Display string of the record at the time of the change.
    pub label: String,
}

impl ClubEvent {
    #[must_use]
    pub fn new(action: Action, entity: Entity, id: i64, label: impl Into<String>) -> Self {
        Self { action, entity, id, label: label.into() }
    }

    #[must_use]
    pub fn created(entity: Entity, id: i64, label: impl Into<String>) -> Self {
        Self::new(Action::Created, entity, id, label)
    }

    #[must_use]
    pub fn updated(entity: Entity, id: i64, label: impl Into<String>) -> Self {
        Self::new(Action::Updated, entity, id, label)
    }

    #[must_use]
    pub fn deleted(entity: Entity, id: i64, label: impl Into<String>) -> Self {
        Self::new(Action::Deleted, entity, id, label)
    }

    /// User-facing confirmation, e.g. `Member Roger Federer created successfully!`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} {} {} successfully!", self.entity, self.label, self.action.verb())
    }
}
