//! Deletes that reach across slices.
//!
//! Members are referenced by profiles (`member`), matches (`player1`,
//! `player2`, `winner`) and own a set of tournament ids; teams own members.
//! Each function runs its statements in a single transaction.

use club_database::{Database, DatabaseError, DatabaseErrorExt};
use club_domain::constants::{MATCH_TABLE, MEMBER_TABLE, PROFILE_TABLE, TEAM_TABLE, TOURNAMENT_TABLE};
use surrealdb::types::SurrealValue;
use tracing::info;

#[derive(Debug, SurrealValue)]
struct MemberName {
    firstname: String,
    lastname: String,
}

/// Statements removing every member listed in `$members` and what depends on them.
fn member_cascade() -> String {
    format!(
        "DELETE {PROFILE_TABLE} WHERE member IN $members;
        DELETE {MATCH_TABLE} WHERE player1 IN $members OR player2 IN $members;
        UPDATE {MATCH_TABLE} SET winner = NONE WHERE winner IN $members;
        DELETE {MEMBER_TABLE} WHERE id.id() IN $members;"
    )
}

/// Deletes a member with its profile and matches, and clears it as a recorded winner.
///
/// # Errors
/// [`DatabaseError::Surreal`] when the transaction fails; nothing is deleted then.
pub async fn delete_member(db: &Database, id: i64) -> Result<(), DatabaseError> {
    let query = format!(
        "BEGIN TRANSACTION;
        LET $members = [$member];
        {}
        COMMIT TRANSACTION;",
        member_cascade()
    );

    db.query(query)
        .bind(("member", id))
        .await
        .context(format!("Deleting member {id}"))?
        .check()
        .map_err(surrealdb::Error::from)
        .context(format!("Deleting member {id}"))?;

    info!(member = id, "Member deleted with its profile and matches");
    Ok(())
}

/// Deletes a team and every member on it, with each member's dependents.
///
/// Returns the ids of the deleted members.
///
/// # Errors
/// [`DatabaseError::Surreal`] when the transaction fails; nothing is deleted then.
pub async fn delete_team(db: &Database, id: i64) -> Result<Vec<i64>, DatabaseError> {
    let members = team_members(db, id).await?;
    let query = format!(
        "BEGIN TRANSACTION;
        LET $members = (SELECT VALUE id.id() FROM {MEMBER_TABLE} WHERE team = $team);
        {}
        DELETE {TEAM_TABLE}:{id};
        COMMIT TRANSACTION;",
        member_cascade()
    );

    db.query(query)
        .bind(("team", id))
        .await
        .context(format!("Deleting team {id}"))?
        .check()
        .map_err(surrealdb::Error::from)
        .context(format!("Deleting team {id}"))?;

    info!(team = id, members = members.len(), "Team deleted with its members");
    Ok(members)
}

/// Deletes a tournament and drops it from every member's tournament set.
///
/// # Errors
/// [`DatabaseError::Surreal`] when the transaction fails; nothing is deleted then.
pub async fn delete_tournament(db: &Database, id: i64) -> Result<(), DatabaseError> {
    let query = format!(
        "BEGIN TRANSACTION;
        UPDATE {MEMBER_TABLE} SET tournaments -= $tournament WHERE tournaments CONTAINS $tournament;
        DELETE {TOURNAMENT_TABLE}:{id};
        COMMIT TRANSACTION;"
    );

    db.query(query)
        .bind(("tournament", id))
        .await
        .context(format!("Deleting tournament {id}"))?
        .check()
        .map_err(surrealdb::Error::from)
        .context(format!("Deleting tournament {id}"))?;

    info!(tournament = id, "Tournament deleted and withdrawn from member entries");
    Ok(())
}

/// Ids of the members on a team, ascending.
///
/// # Errors
/// [`DatabaseError::Surreal`] when the query fails.
pub async fn team_members(db: &Database, team: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut ids = db
        .query(format!("SELECT VALUE id.id() FROM {MEMBER_TABLE} WHERE team = $team"))
        .bind(("team", team))
        .await
        .context(format!("Listing members of team {team}"))?
        .take::<Vec<i64>>(0)
        .context(format!("Reading members of team {team}"))?;
    ids.sort_unstable();
    Ok(ids)
}

/// Ids of the members entered in a tournament, ascending.
///
/// # Errors
/// [`DatabaseError::Surreal`] when the query fails.
pub async fn tournament_entrants(db: &Database, tournament: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut ids = db
        .query(format!("SELECT VALUE id.id() FROM {MEMBER_TABLE} WHERE tournaments CONTAINS $tournament"))
        .bind(("tournament", tournament))
        .await
        .context(format!("Listing entrants of tournament {tournament}"))?
        .take::<Vec<i64>>(0)
        .context(format!("Reading entrants of tournament {tournament}"))?;
    ids.sort_unstable();
    Ok(ids)
}

/// Whether `table:id` exists. Record ids start at 1, so `id <= 0` never does.
///
/// # Errors
/// [`DatabaseError::Surreal`] when the query fails.
pub async fn exists(db: &Database, table: &str, id: i64) -> Result<bool, DatabaseError> {
    if id <= 0 {
        return Ok(false);
    }
    let found = db
        .query(format!("SELECT VALUE id.id() FROM {table}:{id}"))
        .await
        .context(format!("Looking up {table}:{id}"))?
        .take::<Vec<i64>>(0)
        .context(format!("Reading {table}:{id}"))?;
    Ok(!found.is_empty())
}

/// `"{firstname} {lastname}"` of a member, `None` when it does not exist.
///
/// # Errors
/// [`DatabaseError::Surreal`] when the query fails.
pub async fn member_name(db: &Database, id: i64) -> Result<Option<String>, DatabaseError> {
    if id <= 0 {
        return Ok(None);
    }
    let names = db
        .query(format!("SELECT firstname, lastname FROM {MEMBER_TABLE}:{id}"))
        .await
        .context(format!("Loading name of member {id}"))?
        .take::<Vec<MemberName>>(0)
        .context(format!("Reading name of member {id}"))?;
    Ok(names.into_iter().next().map(|name| format!("{} {}", name.firstname, name.lastname)))
}
