use crate::error::{TeamError, TeamErrorExt};
use crate::model::{NewTeam, Team, TeamRecord, TeamView};
use club_kernel::domain::constants::TEAM_TABLE;
use club_kernel::prelude::{ClubEvent, Database, Entity, EventBus, announce};
use club_kernel::relations;
use club_kernel::validation::today;
use tracing::{info, instrument};

const FIELDS: &str = "id.id() AS key, name, description, created_date";

/// Team records.
#[derive(Debug, Clone)]
pub struct TeamRepository {
    db: Database,
    events: EventBus,
}

impl TeamRepository {
    #[must_use]
    pub const fn new(db: Database, events: EventBus) -> Self {
        Self { db, events }
    }

    /// All teams by name.
    pub async fn list(&self) -> Result<Vec<Team>, TeamError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {TEAM_TABLE} ORDER BY name"))
            .await
            .context("Listing teams")?
            .take::<Vec<TeamRecord>>(0)
            .context("Reading teams")?;

        Ok(records.into_iter().map(Team::from).collect())
    }

    /// # Errors
    /// [`TeamError::NotFound`] when no team has this id.
    pub async fn get(&self, id: i64) -> Result<Team, TeamError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {TEAM_TABLE}:{id}"))
            .await
            .context(format!("Loading team {id}"))?
            .take::<Vec<TeamRecord>>(0)
            .context(format!("Reading team {id}"))?;

        records.into_iter().next().map(Team::from).ok_or(TeamError::NotFound { id })
    }

    /// The team with the ids of its members.
    pub async fn view(&self, team: Team) -> Result<TeamView, TeamError> {
        let members = relations::team_members(&self.db, team.id).await?;
        Ok(TeamView::new(team, members))
    }

    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create(&self, draft: NewTeam) -> Result<Team, TeamError> {
        let draft = draft.trimmed();
        draft.rule_errors().into_result().map_err(|errors| TeamError::Invalid { errors })?;

        let id = self.db.next_id(TEAM_TABLE).await.context("Allocating team id")?;
        self.db
            .query(format!(
                "CREATE {TEAM_TABLE}:{id} SET name = $name, description = $description, created_date = $created_date"
            ))
            .bind(("name", draft.name))
            .bind(("description", draft.description))
            .bind(("created_date", today()))
            .await
            .context(format!("Creating team {id}"))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Creating team {id}"))?;

        let team = self.get(id).await?;
        info!(team = id, "Team created");
        announce(&self.events, ClubEvent::created(Entity::Team, id, team.name.clone()));
        Ok(team)
    }

    /// Replaces name and description; `created_date` never changes.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: NewTeam) -> Result<Team, TeamError> {
        self.get(id).await?;
        let draft = draft.trimmed();
        draft.rule_errors().into_result().map_err(|errors| TeamError::Invalid { errors })?;

        self.db
            .query(format!("UPDATE {TEAM_TABLE}:{id} SET name = $name, description = $description"))
            .bind(("name", draft.name))
            .bind(("description", draft.description))
            .await
            .context(format!("Updating team {id}"))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Updating team {id}"))?;

        let team = self.get(id).await?;
        info!(team = id, "Team updated");
        announce(&self.events, ClubEvent::updated(Entity::Team, id, team.name.clone()));
        Ok(team)
    }

    /// Deletes a team together with its members. Returns the team and the
    /// ids of the members removed with it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(Team, Vec<i64>), TeamError> {
        let team = self.get(id).await?;
        let members = relations::delete_team(&self.db, id).await?;

        announce(&self.events, ClubEvent::deleted(Entity::Team, id, team.name.clone()));
        Ok((team, members))
    }
}
