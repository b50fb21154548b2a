//! Everyday imports for slice crates.

pub use crate::events::announce;
pub use crate::server::error::{ApiError, ApiErrorExt, ErrorResponse};
pub use crate::server::json::{nullable, parse_json, present};
pub use crate::server::response::{DeleteResponse, DeletedRecord};
pub use crate::server::state::{ApiState, ApiStateError};
pub use crate::validation::{FieldErrors, parse_id};
pub use club_database::{Database, DatabaseError, Migration};
pub use club_domain::config::ApiConfig;
pub use club_domain::events::{Action, ClubEvent, Entity};
pub use club_domain::registry::{FeatureSlice, InitializedSlice};
pub use club_event_bus::EventBus;
