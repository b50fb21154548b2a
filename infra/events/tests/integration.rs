use club_event_bus::{EventBus, EventReceiverExt};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Changed(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Removed(usize);

#[tokio::test]
async fn events_reach_every_subscriber() {
    let bus = EventBus::new();
    let mut first = bus.subscribe::<Changed>().unwrap();
    let mut second = bus.subscribe::<Changed>().unwrap();

    assert_eq!(bus.publish(Changed(7)).unwrap(), 2);

    assert_eq!(*first.next_event().await.unwrap(), Changed(7));
    assert_eq!(*second.next_event().await.unwrap(), Changed(7));
}

#[tokio::test]
async fn event_types_are_isolated() {
    let bus = EventBus::new();
    let mut changed = bus.subscribe::<Changed>().unwrap();
    let mut removed = bus.subscribe::<Removed>().unwrap();

    bus.publish(Removed(3)).unwrap();
    bus.publish(Changed(4)).unwrap();

    assert_eq!(changed.next_event().await.unwrap().0, 4);
    assert_eq!(removed.next_event().await.unwrap().0, 3);
}

#[tokio::test]
async fn lagging_subscriber_resumes_at_the_retained_tail() {
    let bus = EventBus::new();
    let capacity = 2;
    let mut rx = bus.subscribe_with_capacity::<Changed>(capacity).unwrap();

    let total = 50;
    for i in 0..total {
        bus.publish(Changed(i)).unwrap();
    }

    let first = rx.next_event().await.unwrap();
    assert!(first.0 >= total - capacity, "expected the retained tail, got {}", first.0);

    let second = rx.next_event().await.unwrap();
    assert_eq!(second.0, first.0 + 1);
}

#[tokio::test]
async fn spawned_listener_receives_published_events() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<Changed>().unwrap();

    let listener = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(event) = rx.next_event().await {
            seen.push(event.0);
            if seen.len() == 3 {
                break;
            }
        }
        seen
    });

    for i in 1..=3 {
        bus.publish(Changed(i)).unwrap();
    }

    let seen = tokio::time::timeout(Duration::from_secs(1), listener).await.unwrap().unwrap();
    assert_eq!(seen, vec![1, 2, 3]);
}
