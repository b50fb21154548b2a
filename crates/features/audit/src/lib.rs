//! Audit feature slice.
//!
//! Listens to every [`ClubEvent`] on the bus and keeps the latest
//! confirmations in a bounded trail served at `GET /api/activity/`.

mod api;
mod error;
mod trail;

pub use crate::error::{AuditError, AuditErrorExt};
pub use crate::trail::{Activity, ActivityTrail};

use club_event_bus::EventReceiverExt;
use club_kernel::domain::config::AuditConfig;
use club_kernel::prelude::{ApiState, ClubEvent, EventBus, InitializedSlice};
use tracing::{debug, info};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[club_derive::club_slice]
pub struct Audit {
    trail: ActivityTrail,
}

impl Audit {
    #[must_use]
    pub fn trail(&self) -> &ActivityTrail {
        &self.trail
    }
}

/// Subscribes the trail to record changes.
///
/// # Errors
/// [`AuditError::Internal`] outside a Tokio runtime, [`AuditError::Subscribe`]
/// when the bus refuses the subscription.
pub fn init(config: &AuditConfig, events: &EventBus) -> Result<InitializedSlice, AuditError> {
    let runtime = tokio::runtime::Handle::try_current().map_err(|e| AuditError::Internal {
        message: e.to_string().into(),
        context: Some("Starting the activity listener".into()),
    })?;
    let mut receiver = events
        .subscribe_with_capacity::<ClubEvent>(config.capacity.max(16))
        .context("Subscribing to record changes")?;

    let trail = ActivityTrail::new(config.capacity);
    let recorder = trail.clone();
    runtime.spawn(async move {
        while let Some(event) = receiver.next_event().await {
            recorder.record(&event);
        }
        debug!("Event bus closed; activity listener stopped");
    });

    info!(capacity = config.capacity, "Audit slice initialized");
    Ok(InitializedSlice::new(Audit::new(AuditInner { trail })))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(api::list_activity))
}
