use crate::error::{ProfileError, ProfileErrorExt};
use club_derive::api_model;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};
use surrealdb::types::SurrealValue;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Surface {
    Clay,
    Grass,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub member: i64,
    pub bio: String,
    pub skill_level: SkillLevel,
    pub favorite_surface: Option<Surface>,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct ProfileRecord {
    pub(crate) key: i64,
    pub(crate) member: i64,
    pub(crate) bio: String,
    pub(crate) skill_level: String,
    pub(crate) favorite_surface: Option<String>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = ProfileError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let context = format!("Profile {}", record.key);
        Ok(Self {
            id: record.key,
            member: record.member,
            bio: record.bio,
            skill_level: SkillLevel::from_str(&record.skill_level).context(context.clone())?,
            favorite_surface: record
                .favorite_surface
                .as_deref()
                .map(Surface::from_str)
                .transpose()
                .context(context)?,
        })
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone)]
pub struct NewProfile {
    /// Member id; each member has at most one profile
    pub member: i64,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skill_level: SkillLevel,
    #[serde(default)]
    pub favorite_surface: Option<Surface>,
}

/// Partial update; omitted fields keep their current value.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default)]
pub struct ProfilePatch {
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub member: Option<i64>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub skill_level: Option<SkillLevel>,
    /// `null` clears the surface
    #[serde(default, deserialize_with = "club_kernel::prelude::nullable")]
    #[schema(value_type = Option<Surface>)]
    pub favorite_surface: Option<Option<Surface>>,
}

impl ProfilePatch {
    #[must_use]
    pub fn apply(self, profile: &Profile) -> NewProfile {
        NewProfile {
            member: self.member.unwrap_or(profile.member),
            bio: self.bio.unwrap_or_else(|| profile.bio.clone()),
            skill_level: self.skill_level.unwrap_or(profile.skill_level),
            favorite_surface: self.favorite_surface.unwrap_or(profile.favorite_surface),
        }
    }
}

/// Profile as returned by every endpoint.
#[api_model]
pub struct ProfileView {
    pub id: i64,
    /// Member id
    pub member: i64,
    pub bio: String,
    pub skill_level: SkillLevel,
    pub favorite_surface: Option<Surface>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            member: profile.member,
            bio: profile.bio,
            skill_level: profile.skill_level,
            favorite_surface: profile.favorite_surface,
        }
    }
}

#[api_model]
pub struct ProfileList {
    pub profiles: Vec<ProfileView>,
}

#[api_model]
pub struct ProfileDetail {
    pub profile: ProfileView,
}

#[api_model]
pub struct ProfileSaved {
    pub success: bool,
    pub profile: ProfileView,
}

impl ProfileSaved {
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self { success: true, profile: profile.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_level_defaults_to_beginner() {
        let draft: NewProfile = serde_json::from_str(r#"{"member": 4}"#).unwrap();
        assert_eq!(draft.skill_level, SkillLevel::Beginner);
        assert_eq!(draft.favorite_surface, None);
        assert_eq!(draft.bio, "");
    }

    #[test]
    fn enums_store_as_lowercase_names() {
        assert_eq!(SkillLevel::Professional.as_ref(), "professional");
        assert_eq!(Surface::from_str("clay").unwrap(), Surface::Clay);
        assert!(Surface::from_str("carpet").is_err());
        assert!(serde_json::from_str::<NewProfile>(r#"{"member": 1, "skill_level": "expert"}"#).is_err());
    }

    #[test]
    fn stored_records_with_unknown_levels_are_rejected() {
        let record = ProfileRecord {
            key: 1,
            member: 1,
            bio: String::new(),
            skill_level: "legend".to_owned(),
            favorite_surface: None,
        };
        assert!(matches!(Profile::try_from(record), Err(ProfileError::Stored { .. })));
    }

    #[test]
    fn null_clears_the_surface() {
        let profile = Profile {
            id: 1,
            member: 2,
            bio: "Lefty".to_owned(),
            skill_level: SkillLevel::Advanced,
            favorite_surface: Some(Surface::Grass),
        };
        let patch: ProfilePatch = serde_json::from_str(r#"{"favorite_surface": null}"#).unwrap();
        let draft = patch.apply(&profile);
        assert_eq!(draft.favorite_surface, None);
        assert_eq!(draft.skill_level, SkillLevel::Advanced);
    }
}
