//! Plumbing shared by every feature slice.
//!
//! * [`config::load_config`] reads the layered server configuration.
//! * [`server`] holds the API state, the HTTP error type and the health route.
//! * [`validation`] turns field rule failures into user-facing messages.
//! * [`relations`] owns the delete cascades that cross slice boundaries.
//!
//! Slices usually start from the prelude:
//!
//! ```rust
//! use club_kernel::prelude::*;
//!
//! let error = ApiError::not_found(Entity::Member);
//! assert_eq!(error.to_string(), "Member not found");
//! ```

pub mod config;
pub mod events;
pub mod prelude;
pub mod relations;
pub mod server;
pub mod validation;

pub use club_domain as domain;
