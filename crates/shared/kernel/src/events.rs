//! Announcing record changes on the bus.

use club_domain::events::ClubEvent;
use club_event_bus::EventBus;
use tracing::{trace, warn};

/// Publishes a change. A failed publish is logged and never fails the write
/// that caused it.
pub fn announce(events: &EventBus, event: ClubEvent) {
    let message = event.message();
    match events.publish(event) {
        Ok(subscribers) => trace!(subscribers, %message, "Change announced"),
        Err(error) => warn!(%error, %message, "Change could not be announced"),
    }
}
