use club_derive::api_model;
use club_kernel::validation::{FieldErrors, validate_date};
use surrealdb::types::SurrealValue;
use validator::Validate;

const SAME_PLAYER: &str = "A player cannot play against themselves.";
const WINNER_NOT_PLAYING: &str = "The winner must be one of the two players.";

/// A match between two members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: i64,
    pub date: String,
    pub location: String,
    pub player1: i64,
    pub player2: i64,
    pub player1_score: Option<i64>,
    pub player2_score: Option<i64>,
    pub winner: Option<i64>,
    pub completed: bool,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct MatchRecord {
    pub(crate) key: i64,
    pub(crate) date: String,
    pub(crate) location: String,
    pub(crate) player1: i64,
    pub(crate) player2: i64,
    pub(crate) player1_score: Option<i64>,
    pub(crate) player2_score: Option<i64>,
    pub(crate) winner: Option<i64>,
    pub(crate) completed: bool,
}

impl From<MatchRecord> for Match {
    fn from(record: MatchRecord) -> Self {
        Self {
            id: record.key,
            date: record.date,
            location: record.location,
            player1: record.player1,
            player2: record.player2,
            player1_score: record.player1_score,
            player2_score: record.player2_score,
            winner: record.winner,
            completed: record.completed,
        }
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Validate)]
pub struct NewMatch {
    /// ISO date (`YYYY-MM-DD`)
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(length(min = 1, max = 255, message = "Location must be 1 to 255 characters."))]
    pub location: String,
    /// Member id
    pub player1: i64,
    /// Member id
    pub player2: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Scores cannot be negative."))]
    pub player1_score: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Scores cannot be negative."))]
    pub player2_score: Option<i64>,
    /// Member id; must be `player1` or `player2`
    #[serde(default)]
    pub winner: Option<i64>,
    #[serde(default)]
    pub completed: bool,
}

impl NewMatch {
    pub(crate) fn trimmed(self) -> Self {
        Self { date: self.date.trim().to_owned(), location: self.location.trim().to_owned(), ..self }
    }

    /// Field rules plus the player constraints.
    pub(crate) fn rule_errors(&self) -> FieldErrors {
        let mut errors = self.validate().map_or_else(FieldErrors::from, |()| FieldErrors::new());
        if self.player1 == self.player2 {
            errors.add("player2", SAME_PLAYER);
        }
        if let Some(winner) = self.winner
            && winner != self.player1
            && winner != self.player2
        {
            errors.add("winner", WINNER_NOT_PLAYING);
        }
        errors
    }

    /// Every member this match references.
    pub(crate) fn members(&self) -> Vec<(&'static str, i64)> {
        let mut members = vec![("player1", self.player1), ("player2", self.player2)];
        members.extend(self.winner.map(|winner| ("winner", winner)));
        members
    }
}

/// Partial update; omitted fields keep their current value.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default)]
pub struct MatchPatch {
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub player1: Option<i64>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub player2: Option<i64>,
    /// `null` clears the score
    #[serde(default, deserialize_with = "club_kernel::prelude::nullable")]
    #[schema(value_type = Option<i64>)]
    pub player1_score: Option<Option<i64>>,
    /// `null` clears the score
    #[serde(default, deserialize_with = "club_kernel::prelude::nullable")]
    #[schema(value_type = Option<i64>)]
    pub player2_score: Option<Option<i64>>,
    /// `null` clears the winner
    #[serde(default, deserialize_with = "club_kernel::prelude::nullable")]
    #[schema(value_type = Option<i64>)]
    pub winner: Option<Option<i64>>,
    #[serde(default, deserialize_with = "club_kernel::prelude::present")]
    pub completed: Option<bool>,
}

impl MatchPatch {
    #[must_use]
    pub fn apply(self, current: &Match) -> NewMatch {
        NewMatch {
            date: self.date.unwrap_or_else(|| current.date.clone()),
            location: self.location.unwrap_or_else(|| current.location.clone()),
            player1: self.player1.unwrap_or(current.player1),
            player2: self.player2.unwrap_or(current.player2),
            player1_score: self.player1_score.unwrap_or(current.player1_score),
            player2_score: self.player2_score.unwrap_or(current.player2_score),
            winner: self.winner.unwrap_or(current.winner),
            completed: self.completed.unwrap_or(current.completed),
        }
    }
}

/// Match as returned by every endpoint.
#[api_model]
pub struct MatchView {
    pub id: i64,
    pub date: String,
    pub location: String,
    pub player1: i64,
    pub player2: i64,
    pub player1_score: Option<i64>,
    pub player2_score: Option<i64>,
    pub winner: Option<i64>,
    pub completed: bool,
}

impl From<Match> for MatchView {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            date: m.date,
            location: m.location,
            player1: m.player1,
            player2: m.player2,
            player1_score: m.player1_score,
            player2_score: m.player2_score,
            winner: m.winner,
            completed: m.completed,
        }
    }
}

#[api_model]
pub struct MatchList {
    pub matches: Vec<MatchView>,
}

#[api_model]
pub struct MatchDetail {
    #[serde(rename = "match")]
    pub tennis_match: MatchView,
}

#[api_model]
pub struct MatchSaved {
    pub success: bool,
    #[serde(rename = "match")]
    pub tennis_match: MatchView,
}

impl MatchSaved {
    #[must_use]
    pub fn new(tennis_match: Match) -> Self {
        Self { success: true, tennis_match: tennis_match.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewMatch {
        NewMatch {
            date: "2024-06-01".to_owned(),
            location: "Centre Court".to_owned(),
            player1: 1,
            player2: 2,
            player1_score: Some(6),
            player2_score: Some(4),
            winner: Some(1),
            completed: true,
        }
    }

    #[test]
    fn a_valid_match_has_no_errors() {
        assert!(draft().rule_errors().is_empty());
        assert_eq!(draft().members(), [("player1", 1), ("player2", 2), ("winner", 1)]);
    }

    #[test]
    fn players_must_differ() {
        let same = NewMatch { player2: 1, ..draft() };
        assert_eq!(same.rule_errors().get("player2"), [SAME_PLAYER]);
    }

    #[test]
    fn winner_must_be_playing() {
        let outsider = NewMatch { winner: Some(3), ..draft() };
        assert_eq!(outsider.rule_errors().get("winner"), [WINNER_NOT_PLAYING]);

        let undecided = NewMatch { winner: None, ..draft() };
        assert!(undecided.rule_errors().is_empty());
    }

    #[test]
    fn scores_are_non_negative() {
        let negative = NewMatch { player2_score: Some(-1), ..draft() };
        assert_eq!(negative.rule_errors().get("player2_score"), ["Scores cannot be negative."]);
    }

    #[test]
    fn detail_uses_the_match_key() {
        let body = serde_json::to_value(MatchSaved::new(Match {
            id: 7,
            date: "2024-06-01".to_owned(),
            location: "Court 2".to_owned(),
            player1: 1,
            player2: 2,
            player1_score: None,
            player2_score: None,
            winner: None,
            completed: false,
        }))
        .unwrap();
        assert_eq!(body["match"]["id"], 7);
        assert_eq!(body["match"]["winner"], serde_json::Value::Null);
    }
}
