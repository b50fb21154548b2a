use crate::error::{MatchError, MatchErrorExt};
use crate::model::{Match, MatchRecord, NewMatch};
use club_kernel::domain::constants::{MATCH_TABLE, MEMBER_TABLE};
use club_kernel::prelude::{ClubEvent, Database, Entity, EventBus, announce};
use club_kernel::relations;
use tracing::{info, instrument};

const FIELDS: &str =
    "id.id() AS key, date, location, player1, player2, player1_score, player2_score, winner, completed";

/// Matches between two members.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    db: Database,
    events: EventBus,
}

impl MatchRepository {
    #[must_use]
    pub const fn new(db: Database, events: EventBus) -> Self {
        Self { db, events }
    }

    /// Most recent first; matches on the same day by id.
    pub async fn list(&self) -> Result<Vec<Match>, MatchError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {MATCH_TABLE}"))
            .await
            .context("Listing matches")?
            .take::<Vec<MatchRecord>>(0)
            .context("Reading matches")?;

        let mut matches: Vec<Match> = records.into_iter().map(Match::from).collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(matches)
    }

    /// # Errors
    /// [`MatchError::NotFound`] when no match has this id.
    pub async fn get(&self, id: i64) -> Result<Match, MatchError> {
        let records = self
            .db
            .query(format!("SELECT {FIELDS} FROM {MATCH_TABLE}:{id}"))
            .await
            .context(format!("Loading match {id}"))?
            .take::<Vec<MatchRecord>>(0)
            .context(format!("Reading match {id}"))?;

        records.into_iter().next().map(Match::from).ok_or(MatchError::NotFound { id })
    }

    /// `"{player1} vs {player2} ({date})"`.
    pub async fn label(&self, tennis_match: &Match) -> Result<String, MatchError> {
        let first = self.player_name(tennis_match.player1).await?;
        let second = self.player_name(tennis_match.player2).await?;
        Ok(format!("{first} vs {second} ({})", tennis_match.date))
    }

    async fn player_name(&self, id: i64) -> Result<String, MatchError> {
        let name = relations::member_name(&self.db, id).await?;
        Ok(name.unwrap_or_else(|| format!("Member {id}")))
    }

    /// # Errors
    /// [`MatchError::Invalid`] when a field rule fails, both players are the
    /// same member, the winner is not playing or a member does not exist.
    #[instrument(skip_all, fields(player1 = draft.player1, player2 = draft.player2))]
    pub async fn create(&self, draft: NewMatch) -> Result<Match, MatchError> {
        let draft = draft.trimmed();
        self.check(&draft).await?;

        let id = self.db.next_id(MATCH_TABLE).await.context("Allocating match id")?;
        self.write(&format!("CREATE {MATCH_TABLE}:{id}"), draft).await.context(format!("Creating match {id}"))?;

        let tennis_match = self.get(id).await?;
        info!(tennis_match = id, "Match created");
        announce(&self.events, ClubEvent::created(Entity::Match, id, self.label(&tennis_match).await?));
        Ok(tennis_match)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: NewMatch) -> Result<Match, MatchError> {
        self.get(id).await?;
        let draft = draft.trimmed();
        self.check(&draft).await?;

        self.write(&format!("UPDATE {MATCH_TABLE}:{id}"), draft).await.context(format!("Updating match {id}"))?;

        let tennis_match = self.get(id).await?;
        info!(tennis_match = id, "Match updated");
        announce(&self.events, ClubEvent::updated(Entity::Match, id, self.label(&tennis_match).await?));
        Ok(tennis_match)
    }

    /// Returns the deleted match and its label.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(Match, String), MatchError> {
        let tennis_match = self.get(id).await?;
        let label = self.label(&tennis_match).await?;

        self.db
            .query(format!("DELETE {MATCH_TABLE}:{id}"))
            .await
            .context(format!("Deleting match {id}"))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Deleting match {id}"))?;

        info!(tennis_match = id, "Match deleted");
        announce(&self.events, ClubEvent::deleted(Entity::Match, id, label.clone()));
        Ok((tennis_match, label))
    }

    async fn write(&self, target: &str, draft: NewMatch) -> Result<(), surrealdb::Error> {
        self.db
            .query(format!(
                "{target} SET date = $date, location = $location, player1 = $player1, player2 = $player2, \
                 player1_score = $player1_score, player2_score = $player2_score, winner = $winner, \
                 completed = $completed"
            ))
            .bind(("date", draft.date))
            .bind(("location", draft.location))
            .bind(("player1", draft.player1))
            .bind(("player2", draft.player2))
            .bind(("player1_score", draft.player1_score))
            .bind(("player2_score", draft.player2_score))
            .bind(("winner", draft.winner))
            .bind(("completed", draft.completed))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    async fn check(&self, draft: &NewMatch) -> Result<(), MatchError> {
        let mut errors = draft.rule_errors();

        for (field, member) in draft.members() {
            if errors.get(field).is_empty() && !relations::exists(&self.db, MEMBER_TABLE, member).await? {
                errors.add(field, format!("{} {member} does not exist.", Entity::Member));
            }
        }

        errors.into_result().map_err(|errors| MatchError::Invalid { errors })
    }
}
