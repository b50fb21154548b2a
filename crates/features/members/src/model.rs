use club_derive::api_model;
use club_kernel::validation::FieldErrors;
use serde::{Deserialize, Serialize};
use surrealdb::types::SurrealValue;
use validator::Validate;

/// A club member as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    /// Set at creation, never changed afterwards.
    pub joined_date: String,
    pub team: Option<i64>,
    pub tournaments: Vec<i64>,
}

impl Member {
    /// `"{firstname} {lastname}"`, used in messages and delete responses.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

#[derive(Debug, SurrealValue)]
pub(crate) struct MemberRecord {
    pub(crate) key: i64,
    pub(crate) firstname: String,
    pub(crate) lastname: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) joined_date: String,
    pub(crate) team: Option<i64>,
    pub(crate) tournaments: Vec<i64>,
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        Self {
            id: record.key,
            firstname: record.firstname,
            lastname: record.lastname,
            email: record.email,
            phone: record.phone,
            joined_date: record.joined_date,
            team: record.team,
            tournaments: record.tournaments,
        }
    }
}

/// Member fields accepted on create, and the merged result of an update.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, Validate)]
pub struct NewMember {
    #[validate(length(min = 1, max = 255, message = "First name must be 1 to 255 characters."))]
    pub firstname: String,
    #[validate(length(min = 1, max = 255, message = "Last name must be 1 to 255 characters."))]
    pub lastname: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 255, message = "Email must be at most 255 characters.")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters."))]
    pub phone: String,
    /// Team id
    #[serde(default)]
    pub team: Option<i64>,
}

impl NewMember {
    #[must_use]
    pub(crate) fn trimmed(self) -> Self {
        Self {
            firstname: self.firstname.trim().to_owned(),
            lastname: self.lastname.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            team: self.team,
        }
    }

    /// Field rule violations, before any database check.
    pub(crate) fn rule_errors(&self) -> FieldErrors {
        self.validate().map_or_else(FieldErrors::from, |()| FieldErrors::new())
    }
}

/// Partial update; omitted fields keep their current value and only `team` accepts `null`.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default)]
pub struct MemberPatch {
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub phone: Option<String>,
    /// Team id; `null` removes the member from its team
    #[serde(default, deserialize_with = "club_kernel::prelude::nullable")]
    #[schema(value_type = Option<i64>)]
    pub team: Option<Option<i64>>,
}

impl MemberPatch {
    /// The stored member with this patch applied.
    #[must_use]
    pub fn apply(self, member: &Member) -> NewMember {
        NewMember {
            firstname: self.firstname.unwrap_or_else(|| member.firstname.clone()),
            lastname: self.lastname.unwrap_or_else(|| member.lastname.clone()),
            email: self.email.unwrap_or_else(|| member.email.clone()),
            phone: self.phone.unwrap_or_else(|| member.phone.clone()),
            team: self.team.unwrap_or(member.team),
        }
    }
}

/// Urlencoded body of the HTML member form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberForm {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl MemberForm {
    /// The form does not edit the team, so the current one is carried over.
    #[must_use]
    pub fn into_draft(self, team: Option<i64>) -> NewMember {
        NewMember {
            firstname: self.firstname,
            lastname: self.lastname,
            email: self.email,
            phone: self.phone,
            team,
        }
    }
}

impl From<&Member> for MemberForm {
    fn from(member: &Member) -> Self {
        Self {
            firstname: member.firstname.clone(),
            lastname: member.lastname.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
        }
    }
}

/// Member as listed and shown by the JSON API.
#[api_model]
pub struct MemberView {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    /// ISO date the member joined
    pub joined_date: String,
}

impl From<Member> for MemberView {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            firstname: member.firstname,
            lastname: member.lastname,
            email: member.email,
            phone: member.phone,
            joined_date: member.joined_date,
        }
    }
}

/// Member as echoed back by create and update.
#[api_model]
pub struct MemberSummary {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

impl From<Member> for MemberSummary {
    fn from(member: Member) -> Self {
        Self { id: member.id, firstname: member.firstname, lastname: member.lastname, email: member.email }
    }
}

#[api_model]
pub struct MemberList {
    pub members: Vec<MemberView>,
}

#[api_model]
pub struct MemberDetail {
    pub member: MemberView,
}

#[api_model]
pub struct MemberSaved {
    pub success: bool,
    pub member: MemberSummary,
}

impl MemberSaved {
    #[must_use]
    pub fn new(member: Member) -> Self {
        Self { success: true, member: member.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roger() -> Member {
        Member {
            id: 3,
            firstname: "Roger".to_owned(),
            lastname: "Federer".to_owned(),
            email: "roger.federer@tennis.com".to_owned(),
            phone: "555-0103".to_owned(),
            joined_date: "2024-01-15".to_owned(),
            team: Some(2),
            tournaments: vec![1],
        }
    }

    #[test]
    fn patch_keeps_unspecified_fields() {
        let patch: MemberPatch = serde_json::from_str(r#"{"phone":"555-9999"}"#).unwrap();
        let draft = patch.apply(&roger());

        assert_eq!(draft.firstname, "Roger");
        assert_eq!(draft.email, "roger.federer@tennis.com");
        assert_eq!(draft.phone, "555-9999");
        assert_eq!(draft.team, Some(2));
    }

    #[test]
    fn patch_null_team_clears_it() {
        let patch: MemberPatch = serde_json::from_str(r#"{"team":null,"unknown":1}"#).unwrap();
        assert_eq!(patch.apply(&roger()).team, None);
    }

    #[test]
    fn drafts_are_trimmed_and_checked() {
        let draft = NewMember {
            firstname: "  Roger ".to_owned(),
            lastname: String::new(),
            email: "not-an-email".to_owned(),
            phone: "1".repeat(21),
            team: None,
        }
        .trimmed();

        assert_eq!(draft.firstname, "Roger");
        let errors = draft.rule_errors();
        assert_eq!(errors.get("lastname"), ["Last name must be 1 to 255 characters."]);
        assert_eq!(errors.get("email"), ["Enter a valid email address."]);
        assert_eq!(errors.get("phone"), ["Phone must be at most 20 characters."]);
        assert!(errors.get("firstname").is_empty());
    }

    #[test]
    fn view_exposes_exactly_the_public_fields() {
        let view = serde_json::to_value(MemberView::from(roger())).unwrap();
        let mut keys: Vec<_> = view.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["email", "firstname", "id", "joined_date", "lastname", "phone"]);

        let summary = serde_json::to_value(MemberSummary::from(roger())).unwrap();
        assert_eq!(summary.as_object().unwrap().len(), 4);
    }
}
