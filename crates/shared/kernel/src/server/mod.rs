pub mod error;
mod health;
pub mod json;
pub mod response;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiErrorExt, ErrorResponse};
pub use response::{DeleteResponse, DeletedRecord};
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
