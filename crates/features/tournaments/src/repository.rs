use crate::error::{TournamentError, TournamentErrorExt};
use crate::model::{NewTournament, Tournament, TournamentRecord, TournamentView};
use club_kernel::domain::constants::{MEMBER_TABLE, TOURNAMENT_TABLE};
use club_kernel::prelude::{ClubEvent, Database, Entity, EventBus, FieldErrors, announce};
use club_kernel::relations;
use tracing::{info, instrument};

const FIELDS: &str = "id.id() AS key, name, location, start_date, end_date";

/// Tournament records and their entrants.
#[derive(Debug, Clone)]
pub struct TournamentRepository {
    db: Database,
    events: EventBus,
}

impl TournamentRepository {
    #[must_use]
    pub const fn new(db: Database, events: EventBus) -> Self {
        Self { db, events }
    }

    /// All tournaments by start date, then name.
    pub async fn list(&self) -> Result<Vec<Tournament>, TournamentError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {TOURNAMENT_TABLE} ORDER BY start_date, name"))
            .await
            .context("Listing tournaments")?
            .take::<Vec<TournamentRecord>>(0)
            .context("Reading tournaments")?;

        Ok(records.into_iter().map(Tournament::from).collect())
    }

    /// # Errors
    /// [`TournamentError::NotFound`] when no tournament has this id.
    pub async fn get(&self, id: i64) -> Result<Tournament, TournamentError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {TOURNAMENT_TABLE}:{id}"))
            .await
            .context(format!("Loading tournament {id}"))?
            .take::<Vec<TournamentRecord>>(0)
            .context(format!("Reading tournament {id}"))?;

        records.into_iter().next().map(Tournament::from).ok_or(TournamentError::NotFound { id })
    }

    /// The tournament with the ids of its entrants.
    pub async fn view(&self, tournament: Tournament) -> Result<TournamentView, TournamentError> {
        let entrants = relations::tournament_entrants(&self.db, tournament.id).await?;
        Ok(TournamentView::new(tournament, entrants))
    }

    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create(&self, draft: NewTournament) -> Result<Tournament, TournamentError> {
        let draft = draft.trimmed();
        draft.rule_errors().into_result().map_err(|errors| TournamentError::Invalid { errors })?;

        let id = self.db.next_id(TOURNAMENT_TABLE).await.context("Allocating tournament id")?;
        self.db
            .query(format!(
                "CREATE {TOURNAMENT_TABLE}:{id} SET name = $name, location = $location, \
                 start_date = $start_date, end_date = $end_date"
            ))
            .bind(("name", draft.name))
            .bind(("location", draft.location))
            .bind(("start_date", draft.start_date))
            .bind(("end_date", draft.end_date))
            .await
            .context(format!("Creating tournament {id}"))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Creating tournament {id}"))?;

        let tournament = self.get(id).await?;
        info!(tournament = id, "Tournament created");
        announce(&self.events, ClubEvent::created(Entity::Tournament, id, tournament.name.clone()));
        Ok(tournament)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: NewTournament) -> Result<Tournament, TournamentError> {
        self.get(id).await?;
        let draft = draft.trimmed();
        draft.rule_errors().into_result().map_err(|errors| TournamentError::Invalid { errors })?;

        self.db
            .query(format!(
                "UPDATE {TOURNAMENT_TABLE}:{id} SET name = $name, location = $location, \
                 start_date = $start_date, end_date = $end_date"
            ))
            .bind(("name", draft.name))
            .bind(("location", draft.location))
            .bind(("start_date", draft.start_date))
            .bind(("end_date", draft.end_date))
            .await
            .context(format!("Updating tournament {id}"))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Updating tournament {id}"))?;

        let tournament = self.get(id).await?;
        info!(tournament = id, "Tournament updated");
        announce(&self.events, ClubEvent::updated(Entity::Tournament, id, tournament.name.clone()));
        Ok(tournament)
    }

    /// Deletes a tournament and withdraws every entrant.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Tournament, TournamentError> {
        let tournament = self.get(id).await?;
        relations::delete_tournament(&self.db, id).await?;

        announce(&self.events, ClubEvent::deleted(Entity::Tournament, id, tournament.name.clone()));
        Ok(tournament)
    }

    /// Enters a member. Entering twice is a no-op.
    ///
    /// # Errors
    /// [`TournamentError::NotFound`] for an unknown tournament,
    /// [`TournamentError::Invalid`] for an unknown member.
    #[instrument(skip(self))]
    pub async fn register(&self, id: i64, member: i64) -> Result<Tournament, TournamentError> {
        self.set_entry(id, member, "tournaments = array::union(tournaments, [$tournament])").await?;
        info!(tournament = id, member, "Member registered");
        self.announce_entries(id).await
    }

    /// Withdraws a member. Withdrawing a member who is not entered is a no-op.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, id: i64, member: i64) -> Result<Tournament, TournamentError> {
        self.set_entry(id, member, "tournaments -= $tournament").await?;
        info!(tournament = id, member, "Member withdrawn");
        self.announce_entries(id).await
    }

    async fn set_entry(&self, id: i64, member: i64, change: &str) -> Result<(), TournamentError> {
        self.get(id).await?;
        if !relations::exists(&self.db, MEMBER_TABLE, member).await? {
            let errors = FieldErrors::single("member", format!("{} {member} does not exist.", Entity::Member));
            return Err(TournamentError::Invalid { errors });
        }

        self.db
            .query(format!("UPDATE {MEMBER_TABLE}:{member} SET {change}"))
            .bind(("tournament", id))
            .await
            .context(format!("Changing entries of tournament {id}"))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Changing entries of tournament {id}"))?;
        Ok(())
    }

    async fn announce_entries(&self, id: i64) -> Result<Tournament, TournamentError> {
        let tournament = self.get(id).await?;
        announce(&self.events, ClubEvent::updated(Entity::Tournament, id, tournament.name.clone()));
        Ok(tournament)
    }
}
