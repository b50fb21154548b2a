use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_CAPACITY: usize = 128;

/// Anything that can travel over the [`EventBus`].
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

type Sender<T> = broadcast::Sender<Arc<T>>;

/// Shared registry of broadcast channels, one per event type.
///
/// Clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `T` events.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to `T` events. `capacity` sizes the channel when this call
    /// creates it and is ignored for an existing channel.
    ///
    /// # Errors
    /// [`EventBusError::InvalidCapacity`] for a zero capacity.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: std::any::type_name::<T>().into(),
                context: Some("Capacity must be greater than zero".into()),
            });
        }
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event and returns how many subscribers received it.
    ///
    /// Publishing without subscribers is not an error and returns `Ok(0)`.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Like [`EventBus::publish`] for an already shared event.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(event).unwrap_or(0);
        trace!(event = std::any::type_name::<T>(), delivered, "Event published");
        Ok(delivered)
    }

    /// Number of live subscribers for `T`.
    #[must_use]
    pub fn subscriber_count<T: Event>(&self) -> usize {
        self.channels
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|sender| sender.downcast_ref::<Sender<T>>())
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn sender<T: Event>(&self, capacity: usize) -> Result<Sender<T>, EventBusError> {
        let key = TypeId::of::<T>();

        if let Some(sender) = self.channels.read().get(&key) {
            return downcast::<T>(sender.as_ref());
        }

        let mut channels = self.channels.write();
        let sender = channels.entry(key).or_insert_with(|| {
            trace!(event = std::any::type_name::<T>(), capacity, "Creating event channel");
            Box::new(broadcast::channel::<Arc<T>>(capacity).0)
        });
        downcast::<T>(sender.as_ref())
    }
}

fn downcast<T: Event>(sender: &(dyn Any + Send + Sync)) -> Result<Sender<T>, EventBusError> {
    sender.downcast_ref::<Sender<T>>().cloned().ok_or_else(|| EventBusError::TypeMismatch {
        message: std::any::type_name::<T>().into(),
        context: Some("Unexpected sender type".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;

    #[test]
    fn publish_without_subscribers_delivers_nothing() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Ping).unwrap(), 0);
        assert_eq!(bus.subscriber_count::<Ping>(), 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let bus = EventBus::new();
        assert!(matches!(
            bus.subscribe_with_capacity::<Ping>(0),
            Err(EventBusError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn subscribers_are_counted() {
        let bus = EventBus::new();
        let first = bus.subscribe::<Ping>().unwrap();
        let _second = bus.clone().subscribe::<Ping>().unwrap();
        assert_eq!(bus.subscriber_count::<Ping>(), 2);

        drop(first);
        assert_eq!(bus.publish(Ping).unwrap(), 1);
    }
}
