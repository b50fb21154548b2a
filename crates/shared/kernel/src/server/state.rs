//! State shared by every club route.
//!
//! Handlers receive [`ApiState`] and reach their slice with
//! [`ApiState::try_get_slice`]; a slice missing from the registry is a
//! wiring mistake and surfaces as a 500.

use club_database::Database;
use club_domain::config::ApiConfig;
use club_domain::registry::{FeatureSlice, InitializedSlice};
use club_event_bus::EventBus;
use fxhash::FxHashMap;
use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[club_derive::club_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("State missing feature slice{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Configuration, the club database, the change bus and the slices
/// (members, teams, tournaments, profiles, matches, audit) keyed by type.
#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub database: Database,
    pub events: EventBus,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Cheap to clone; every clone shares the same registry.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    /// # Errors
    /// [`ApiStateError::MissingSlice`] naming `T` when the server never
    /// registered it.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.inner
            .slices
            .get(&TypeId::of::<T>())
            .and_then(InitializedSlice::downcast_ref::<T>)
            .ok_or_else(|| ApiStateError::MissingSlice { message: type_name::<T>().into(), context: None })
    }

    #[must_use]
    pub fn slice_count(&self) -> usize {
        self.inner.slices.len()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Collects the parts of an [`ApiState`]. Config and database are required;
/// a fresh bus is used when none is given.
#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    database: Option<Database>,
    events: Option<EventBus>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn db(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// The bus the slices announce changes on; the audit slice must share it.
    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Registering the same slice type twice keeps the later one.
    #[must_use]
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.insert(slice.id, slice);
        self
    }

    #[must_use]
    pub fn register_slices(self, slices: impl IntoIterator<Item = InitializedSlice>) -> Self {
        slices.into_iter().fold(self, Self::register_slice)
    }

    /// # Errors
    /// [`ApiStateError::Validation`] when the config or database is missing.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = required(self.config, "ApiConfig")?;
        let database = required(self.database, "Database")?;

        Ok(ApiState {
            inner: Arc::new(ApiStateInner {
                config,
                database,
                events: self.events.unwrap_or_default(),
                slices: self.slices,
            }),
        })
    }
}

fn required<T>(part: Option<T>, name: &'static str) -> Result<T, ApiStateError> {
    part.ok_or_else(|| ApiStateError::Validation { message: format!("{name} not provided").into(), context: None })
}
