use club_derive::api_model;
use club_kernel::validation::FieldErrors;
use surrealdb::types::SurrealValue;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Set at creation, never changed afterwards.
    pub created_date: String,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct TeamRecord {
    pub(crate) key: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) created_date: String,
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Self {
            id: record.key,
            name: record.name,
            description: record.description,
            created_date: record.created_date,
        }
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewTeam {
    pub(crate) fn trimmed(self) -> Self {
        Self { name: self.name.trim().to_owned(), description: self.description.trim().to_owned() }
    }

    pub(crate) fn rule_errors(&self) -> FieldErrors {
        self.validate().map_or_else(FieldErrors::from, |()| FieldErrors::new())
    }
}

/// Partial update; omitted fields keep their current value.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default)]
pub struct TeamPatch {
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub description: Option<String>,
}

impl TeamPatch {
    #[must_use]
    pub fn apply(self, team: &Team) -> NewTeam {
        NewTeam {
            name: self.name.unwrap_or_else(|| team.name.clone()),
            description: self.description.unwrap_or_else(|| team.description.clone()),
        }
    }
}

/// Team as returned by every endpoint.
#[api_model]
pub struct TeamView {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// ISO date the team was created
    pub created_date: String,
    /// Ids of the members on the team
    pub members: Vec<i64>,
}

impl TeamView {
    #[must_use]
    pub fn new(team: Team, members: Vec<i64>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            created_date: team.created_date,
            members,
        }
    }
}

#[api_model]
pub struct TeamList {
    pub teams: Vec<TeamView>,
}

#[api_model]
pub struct TeamDetail {
    pub team: TeamView,
}

#[api_model]
pub struct TeamSaved {
    pub success: bool,
    pub team: TeamView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_keeps_what_it_does_not_name() {
        let team = Team {
            id: 1,
            name: "Aces".to_owned(),
            description: "Weekend league".to_owned(),
            created_date: "2024-02-01".to_owned(),
        };
        let patch: TeamPatch = serde_json::from_str(r#"{"description":"Evening league"}"#).unwrap();

        let draft = patch.apply(&team);
        assert_eq!(draft.name, "Aces");
        assert_eq!(draft.description, "Evening league");
    }

    #[test]
    fn names_are_required() {
        let draft = NewTeam { name: "   ".to_owned(), description: String::new() }.trimmed();
        assert_eq!(draft.rule_errors().get("name"), ["Name must be 1 to 255 characters."]);
    }
}
