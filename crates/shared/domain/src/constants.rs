//! Shared names: OpenAPI tags and database tables.

pub const SYSTEM_TAG: &str = "System";
pub const MEMBERS_TAG: &str = "Members";
pub const TEAMS_TAG: &str = "Teams";
pub const TOURNAMENTS_TAG: &str = "Tournaments";
pub const PROFILES_TAG: &str = "Profiles";
pub const MATCHES_TAG: &str = "Matches";
pub const ACTIVITY_TAG: &str = "Activity";

pub const MEMBER_TABLE: &str = "member";
pub const TEAM_TABLE: &str = "team";
pub const TOURNAMENT_TABLE: &str = "tournament";
pub const PROFILE_TABLE: &str = "profile";
pub const MATCH_TABLE: &str = "tennis_match";

/// ISO-8601 calendar date, the only date format accepted and emitted.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
