use club_derive::api_model;
use club_kernel::validation::{FieldErrors, validate_date};
use surrealdb::types::SurrealValue;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct TournamentRecord {
    pub(crate) key: i64,
    pub(crate) name: String,
    pub(crate) location: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
}

impl From<TournamentRecord> for Tournament {
    fn from(record: TournamentRecord) -> Self {
        Self {
            id: record.key,
            name: record.name,
            location: record.location,
            start_date: record.start_date,
            end_date: record.end_date,
        }
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, Validate)]
pub struct NewTournament {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Location must be 1 to 255 characters."))]
    pub location: String,
    /// ISO date (`YYYY-MM-DD`)
    #[validate(custom(function = "validate_date"))]
    pub start_date: String,
    /// ISO date (`YYYY-MM-DD`)
    #[validate(custom(function = "validate_date"))]
    pub end_date: String,
}

impl NewTournament {
    pub(crate) fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            location: self.location.trim().to_owned(),
            start_date: self.start_date.trim().to_owned(),
            end_date: self.end_date.trim().to_owned(),
        }
    }

    pub(crate) fn rule_errors(&self) -> FieldErrors {
        self.validate().map_or_else(FieldErrors::from, |()| FieldErrors::new())
    }
}

/// Partial update; omitted fields keep their current value.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default)]
pub struct TournamentPatch {
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub end_date: Option<String>,
}

impl TournamentPatch {
    #[must_use]
    pub fn apply(self, tournament: &Tournament) -> NewTournament {
        NewTournament {
            name: self.name.unwrap_or_else(|| tournament.name.clone()),
            location: self.location.unwrap_or_else(|| tournament.location.clone()),
            start_date: self.start_date.unwrap_or_else(|| tournament.start_date.clone()),
            end_date: self.end_date.unwrap_or_else(|| tournament.end_date.clone()),
        }
    }
}

/// Body of the register and withdraw endpoints.
#[api_model(deny_unknown_fields = false)]
pub struct Entry {
    /// Member id
    pub member: i64,
}

#[api_model]
pub struct TournamentView {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// Ids of the entered members
    pub entrants: Vec<i64>,
}

impl TournamentView {
    #[must_use]
    pub fn new(tournament: Tournament, entrants: Vec<i64>) -> Self {
        Self {
            id: tournament.id,
            name: tournament.name,
            location: tournament.location,
            start_date: tournament.start_date,
            end_date: tournament.end_date,
            entrants,
        }
    }
}

#[api_model]
pub struct TournamentList {
    pub tournaments: Vec<TournamentView>,
}

#[api_model]
pub struct TournamentDetail {
    pub tournament: TournamentView,
}

#[api_model]
pub struct TournamentSaved {
    pub success: bool,
    pub tournament: TournamentView,
}
