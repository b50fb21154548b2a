use chrono::{SecondsFormat, Utc};
use club_derive::api_model;
use club_kernel::prelude::ClubEvent;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One recorded change.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Activity {
    /// UTC, RFC 3339 to the second
    pub timestamp: String,
    /// e.g. `Member Roger Federer created successfully!`
    pub message: String,
}

impl Activity {
    #[must_use]
    pub fn now(message: impl Into<String>) -> Self {
        Self { timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true), message: message.into() }
    }
}

/// Bounded record of the latest changes, newest first.
#[derive(Debug, Clone)]
pub struct ActivityTrail {
    entries: Arc<Mutex<VecDeque<Activity>>>,
    capacity: usize,
}

impl ActivityTrail {
    /// A trail keeping at most `capacity` entries; zero keeps nothing.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))), capacity }
    }

    pub fn record(&self, event: &ClubEvent) {
        self.push(Activity::now(event.message()));
    }

    pub fn push(&self, activity: Activity) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        entries.truncate(self.capacity - 1);
        entries.push_front(activity);
    }

    #[must_use]
    pub fn recent(&self) -> Vec<Activity> {
        self.entries.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use club_kernel::prelude::Entity;

    fn entry(message: &str) -> Activity {
        Activity { timestamp: "2024-06-01T10:00:00Z".to_owned(), message: message.to_owned() }
    }

    #[test]
    fn newest_entry_comes_first() {
        let trail = ActivityTrail::new(10);
        trail.push(entry("first"));
        trail.push(entry("second"));

        let messages: Vec<_> = trail.recent().into_iter().map(|a| a.message).collect();
        assert_eq!(messages, ["second", "first"]);
    }

    #[test]
    fn oldest_entries_fall_off() {
        let trail = ActivityTrail::new(2);
        for message in ["a", "b", "c"] {
            trail.push(entry(message));
        }

        let messages: Vec<_> = trail.recent().into_iter().map(|a| a.message).collect();
        assert_eq!(messages, ["c", "b"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let trail = ActivityTrail::new(0);
        trail.push(entry("dropped"));
        assert!(trail.is_empty());
    }

    #[test]
    fn events_become_confirmation_messages() {
        let trail = ActivityTrail::new(5);
        trail.record(&ClubEvent::deleted(Entity::Team, 3, "Aces"));

        let [activity] = trail.recent().try_into().unwrap();
        assert_eq!(activity.message, "Team Aces deleted successfully!");
        assert!(activity.timestamp.ends_with('Z'), "{}", activity.timestamp);
    }
}
