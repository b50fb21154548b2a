//! # Domain
//!
//! Plain data shared by every club crate, with `serde` as the only dependency.
//! No I/O, networking or persistence lives here.

pub mod config;
pub mod constants;
pub mod events;
pub mod registry;
