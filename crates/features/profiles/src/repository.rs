use crate::error::{ProfileError, ProfileErrorExt};
use crate::model::{NewProfile, Profile, ProfileRecord};
use club_database::{Database, violates_unique_index};
use club_kernel::domain::constants::{MEMBER_TABLE, PROFILE_TABLE};
use club_kernel::prelude::{ClubEvent, Entity, EventBus, FieldErrors, announce};
use club_kernel::relations;
use tracing::{info, instrument};

const FIELDS: &str = "id.id() AS key, member, bio, skill_level, favorite_surface";
const PROFILE_TAKEN: &str = "This member already has a profile.";
const MEMBER_INDEX: &str = "profile_member";

/// Member profiles; a member has at most one.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: Database,
    events: EventBus,
}

impl ProfileRepository {
    #[must_use]
    pub const fn new(db: Database, events: EventBus) -> Self {
        Self { db, events }
    }

    /// All profiles by id.
    pub async fn list(&self) -> Result<Vec<Profile>, ProfileError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {PROFILE_TABLE}"))
            .await
            .context("Listing profiles")?
            .take::<Vec<ProfileRecord>>(0)
            .context("Reading profiles")?;

        let mut profiles = records.into_iter().map(Profile::try_from).collect::<Result<Vec<_>, _>>()?;
        profiles.sort_by_key(|profile| profile.id);
        Ok(profiles)
    }

    /// # Errors
    /// [`ProfileError::NotFound`] when no profile has this id.
    pub async fn get(&self, id: i64) -> Result<Profile, ProfileError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {PROFILE_TABLE}:{id}"))
            .await
            .context(format!("Loading profile {id}"))?
            .take::<Vec<ProfileRecord>>(0)
            .context(format!("Reading profile {id}"))?;

        records.into_iter().next().ok_or(ProfileError::NotFound { id })?.try_into()
    }

    /// `"{firstname} {lastname} profile"`.
    pub async fn label(&self, profile: &Profile) -> Result<String, ProfileError> {
        let name = relations::member_name(&self.db, profile.member).await?;
        Ok(format!("{} profile", name.unwrap_or_else(|| format!("Member {}", profile.member))))
    }

    #[instrument(skip_all, fields(member = draft.member))]
    pub async fn create(&self, draft: NewProfile) -> Result<Profile, ProfileError> {
        let draft = NewProfile { bio: draft.bio.trim().to_owned(), ..draft };
        self.check(&draft, None).await?;

        let id = self.db.next_id(PROFILE_TABLE).await.context("Allocating profile id")?;
        self.write(&format!("CREATE {PROFILE_TABLE}:{id}"), draft)
            .await
            .map_err(|error| write_failed(error, format!("Creating profile {id}")))?;

        let profile = self.get(id).await?;
        info!(profile = id, member = profile.member, "Profile created");
        announce(&self.events, ClubEvent::created(Entity::Profile, id, self.label(&profile).await?));
        Ok(profile)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: NewProfile) -> Result<Profile, ProfileError> {
        self.get(id).await?;
        let draft = NewProfile { bio: draft.bio.trim().to_owned(), ..draft };
        self.check(&draft, Some(id)).await?;

        self.write(&format!("UPDATE {PROFILE_TABLE}:{id}"), draft)
            .await
            .map_err(|error| write_failed(error, format!("Updating profile {id}")))?;

        let profile = self.get(id).await?;
        info!(profile = id, "Profile updated");
        announce(&self.events, ClubEvent::updated(Entity::Profile, id, self.label(&profile).await?));
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(Profile, String), ProfileError> {
        let profile = self.get(id).await?;
        let label = self.label(&profile).await?;

        self.db
            .query(format!("DELETE {PROFILE_TABLE}:{id}"))
            .await
            .context(format!("Deleting profile {id}"))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Deleting profile {id}"))?;

        info!(profile = id, "Profile deleted");
        announce(&self.events, ClubEvent::deleted(Entity::Profile, id, label.clone()));
        Ok((profile, label))
    }

    async fn write(&self, target: &str, draft: NewProfile) -> Result<(), surrealdb::Error> {
        self.db
            .query(format!(
                "{target} SET member = $member, bio = $bio, skill_level = $skill_level, \
                 favorite_surface = $favorite_surface"
            ))
            .bind(("member", draft.member))
            .bind(("bio", draft.bio))
            .bind(("skill_level", draft.skill_level.to_string()))
            .bind(("favorite_surface", draft.favorite_surface.map(|surface| surface.to_string())))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    async fn check(&self, draft: &NewProfile, current: Option<i64>) -> Result<(), ProfileError> {
        let member = draft.member;
        if !relations::exists(&self.db, MEMBER_TABLE, member).await? {
            let errors = FieldErrors::single("member", format!("{} {member} does not exist.", Entity::Member));
            return Err(ProfileError::Invalid { errors });
        }

        let owners = self
            .db
            .query(format!("SELECT VALUE id.id() FROM {PROFILE_TABLE} WHERE member = $member"))
            .bind(("member", member))
            .await
            .context(format!("Looking up profile of member {member}"))?
            .take::<Vec<i64>>(0)
            .context(format!("Reading profile of member {member}"))?;
        if owners.into_iter().any(|owner| Some(owner) != current) {
            return Err(ProfileError::Invalid { errors: FieldErrors::single("member", PROFILE_TAKEN) });
        }
        Ok(())
    }
}

/// Maps a write that lost the race for a member to the check's message.
fn write_failed(error: surrealdb::Error, context: String) -> ProfileError {
    if violates_unique_index(&error, MEMBER_INDEX) {
        return ProfileError::Invalid { errors: FieldErrors::single("member", PROFILE_TAKEN) };
    }
    ProfileError::Surreal { source: error, context: Some(context.into()) }
}
