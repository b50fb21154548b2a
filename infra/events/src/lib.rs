//! # Event Bus
//!
//! Typed fan-out messaging between feature slices.
//!
//! Every event type gets its own `tokio` broadcast channel, created on first
//! use. Publishing never blocks and succeeds even when nobody listens, so a
//! slice can announce changes without knowing who records them.
//!
//! # Example
//!
//! ```rust
//! use club_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct MemberCreated { id: i64 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<MemberCreated>()?;
//!
//!     bus.publish(MemberCreated { id: 42 })?;
//!     assert_eq!(rx.next_event().await.map(|e| e.id), Some(42));
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
