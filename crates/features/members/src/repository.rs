use crate::error::{MemberError, MemberErrorExt};
use crate::model::{Member, MemberRecord, NewMember};
use club_kernel::domain::constants::{MEMBER_TABLE, TEAM_TABLE};
use club_database::{Database, violates_unique_index};
use club_kernel::prelude::{ClubEvent, Entity, EventBus, FieldErrors, announce};
use club_kernel::relations;
use club_kernel::validation::today;
use tracing::{info, instrument};

const FIELDS: &str = "id.id() AS key, firstname, lastname, email, phone, joined_date, team, tournaments";
const EMAIL_TAKEN: &str = "This email is already in use.";
const EMAIL_INDEX: &str = "member_email";

/// Member records and the rules guarding them.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: Database,
    events: EventBus,
}

impl MemberRepository {
    #[must_use]
    pub const fn new(db: Database, events: EventBus) -> Self {
        Self { db, events }
    }

    /// All members by last name, then first name.
    pub async fn list(&self) -> Result<Vec<Member>, MemberError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {MEMBER_TABLE} ORDER BY lastname, firstname"))
            .await
            .context("Listing members")?
            .take::<Vec<MemberRecord>>(0)
            .context("Reading members")?;

        Ok(records.into_iter().map(Member::from).collect())
    }

    pub async fn find(&self, id: i64) -> Result<Option<Member>, MemberError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {MEMBER_TABLE}:{id}"))
            .await
            .context(format!("Loading member {id}"))?
            .take::<Vec<MemberRecord>>(0)
            .context(format!("Reading member {id}"))?;

        Ok(records.into_iter().next().map(Member::from))
    }

    /// # Errors
    /// [`MemberError::NotFound`] when no member has this id.
    pub async fn get(&self, id: i64) -> Result<Member, MemberError> {
        self.find(id).await?.ok_or(MemberError::NotFound { id })
    }

    /// Creates a member joining today.
    ///
    /// # Errors
    /// [`MemberError::Invalid`] when a field rule fails, the email is taken or
    /// the team does not exist.
    #[instrument(skip_all, fields(email = %draft.email))]
    pub async fn create(&self, draft: NewMember) -> Result<Member, MemberError> {
        let draft = draft.trimmed();
        self.check(&draft, None).await?;

        let id = self.db.next_id(MEMBER_TABLE).await.context("Allocating member id")?;
        self.db
            .query(format!(
                "CREATE {MEMBER_TABLE}:{id} SET firstname = $firstname, lastname = $lastname, \
                 email = $email, phone = $phone, joined_date = $joined_date, team = $team, tournaments = []"
            ))
            .bind(("firstname", draft.firstname))
            .bind(("lastname", draft.lastname))
            .bind(("email", draft.email))
            .bind(("phone", draft.phone))
            .bind(("joined_date", today()))
            .bind(("team", draft.team))
            .await
            .and_then(|response| response.check().map_err(surrealdb::Error::from))
            .map_err(|error| write_failed(error, format!("Creating member {id}")))?;

        let member = self.get(id).await?;
        info!(member = id, "Member created");
        announce(&self.events, ClubEvent::created(Entity::Member, id, member.display_name()));
        Ok(member)
    }

    /// Replaces the editable fields of a member. `joined_date` and the
    /// tournament entries are left as they are.
    ///
    /// # Errors
    /// [`MemberError::NotFound`] for an unknown id, [`MemberError::Invalid`] as for
    /// [`create`](Self::create); keeping one's own email is allowed.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: NewMember) -> Result<Member, MemberError> {
        self.get(id).await?;
        let draft = draft.trimmed();
        self.check(&draft, Some(id)).await?;

        self.db
            .query(format!(
                "UPDATE {MEMBER_TABLE}:{id} SET firstname = $firstname, lastname = $lastname, \
                 email = $email, phone = $phone, team = $team"
            ))
            .bind(("firstname", draft.firstname))
            .bind(("lastname", draft.lastname))
            .bind(("email", draft.email))
            .bind(("phone", draft.phone))
            .bind(("team", draft.team))
            .await
            .and_then(|response| response.check().map_err(surrealdb::Error::from))
            .map_err(|error| write_failed(error, format!("Updating member {id}")))?;

        let member = self.get(id).await?;
        info!(member = id, "Member updated");
        announce(&self.events, ClubEvent::updated(Entity::Member, id, member.display_name()));
        Ok(member)
    }

    /// Deletes a member with its profile and matches. Returns the deleted member.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Member, MemberError> {
        let member = self.get(id).await?;
        relations::delete_member(&self.db, id).await?;

        announce(&self.events, ClubEvent::deleted(Entity::Member, id, member.display_name()));
        Ok(member)
    }

    /// Deletes every member. Returns how many were removed.
    pub async fn delete_all(&self) -> Result<usize, MemberError> {
        let members = self.list().await?;
        for member in &members {
            self.delete(member.id).await?;
        }
        Ok(members.len())
    }

    pub async fn count(&self) -> Result<usize, MemberError> {
        let ids = self
            .db
            .query(format!("SELECT VALUE id.id() FROM {MEMBER_TABLE}"))
            .await
            .context("Counting members")?
            .take::<Vec<i64>>(0)
            .context("Reading member count")?;
        Ok(ids.len())
    }

    /// Whether another member than `except` already uses `email`.
    pub async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool, MemberError> {
        let owners = self
            .db
            .query(format!("SELECT VALUE id.id() FROM {MEMBER_TABLE} WHERE email = $email"))
            .bind(("email", email.to_owned()))
            .await
            .context("Looking up email owner")?
            .take::<Vec<i64>>(0)
            .context("Reading email owner")?;

        Ok(owners.into_iter().any(|owner| Some(owner) != except))
    }

    async fn check(&self, draft: &NewMember, current: Option<i64>) -> Result<(), MemberError> {
        let mut errors = draft.rule_errors();

        if errors.get("email").is_empty() && self.email_taken(&draft.email, current).await? {
            errors.add("email", EMAIL_TAKEN);
        }
        if let Some(team) = draft.team
            && !relations::exists(&self.db, TEAM_TABLE, team).await?
        {
            errors.add("team", format!("{} {team} does not exist.", Entity::Team));
        }

        errors.into_result().map_err(|errors| MemberError::Invalid { errors })
    }
}

/// A concurrent write may take the email between [`MemberRepository::check`]
/// and the write; the unique index rejects it and the caller gets the same
/// message as from the check.
fn write_failed(error: surrealdb::Error, context: String) -> MemberError {
    if violates_unique_index(&error, EMAIL_INDEX) {
        return MemberError::Invalid { errors: FieldErrors::single("email", EMAIL_TAKEN) };
    }
    MemberError::Surreal { source: error, context: Some(context.into()) }
}
