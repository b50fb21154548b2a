use club_domain::events::{Action, ClubEvent, Entity};

#[test]
fn messages_follow_the_confirmation_format() {
    let created = ClubEvent::created(Entity::Member, 1, "Roger Federer");
    assert_eq!(created.message(), "Member Roger Federer created successfully!");

    let deleted = ClubEvent::deleted(Entity::Team, 4, "Aces");
    assert_eq!(deleted.action, Action::Deleted);
    assert_eq!(deleted.message(), "Team Aces deleted successfully!");

    let updated = ClubEvent::updated(Entity::Profile, 2, "Naomi Osaka profile");
    assert_eq!(updated.message(), "Profile Naomi Osaka profile updated successfully!");
}

#[test]
fn events_serialize_in_snake_case() {
    let event = ClubEvent::created(Entity::Match, 9, "Serena Williams vs Simona Halep (2024-06-01)");
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["action"], "created");
    assert_eq!(value["entity"], "match");
    assert_eq!(value["id"], 9);
}
