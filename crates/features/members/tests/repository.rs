use club_kernel::prelude::{Database, EventBus};
use club_members::{MemberError, MemberRepository, NewMember, seed};

async fn repository() -> MemberRepository {
    let db = Database::builder().url("mem://").session("club_test", "members").init().await.unwrap();
    db.migrate(club_members::MIGRATIONS).await.unwrap();
    MemberRepository::new(db, EventBus::new())
}

fn draft(first: &str, last: &str, email: &str) -> NewMember {
    NewMember {
        firstname: first.to_owned(),
        lastname: last.to_owned(),
        email: email.to_owned(),
        ..NewMember::default()
    }
}

#[tokio::test]
async fn create_assigns_ids_and_join_date() {
    let members = repository().await;

    let serena = members.create(draft("Serena", "Williams", "serena@tennis.com")).await.unwrap();
    let roger = members.create(draft("Roger", "Federer", "roger@tennis.com")).await.unwrap();

    assert_eq!((serena.id, roger.id), (1, 2));
    assert_eq!(serena.joined_date, club_kernel::validation::today());
    assert!(serena.tournaments.is_empty());
    assert_eq!(serena.team, None);
}

#[tokio::test]
async fn list_orders_by_last_then_first_name() {
    let members = repository().await;
    members.create(draft("Venus", "Williams", "venus@tennis.com")).await.unwrap();
    members.create(draft("Serena", "Williams", "serena@tennis.com")).await.unwrap();
    members.create(draft("Roger", "Federer", "roger@tennis.com")).await.unwrap();

    let names: Vec<_> = members.list().await.unwrap().iter().map(|m| m.display_name()).collect();
    assert_eq!(names, ["Roger Federer", "Serena Williams", "Venus Williams"]);
}

#[tokio::test]
async fn duplicate_email_is_rejected_on_create() {
    let members = repository().await;
    members.create(draft("Serena", "Williams", "serena@tennis.com")).await.unwrap();

    let error = members.create(draft("Venus", "Williams", "serena@tennis.com")).await.unwrap_err();
    let MemberError::Invalid { errors } = error else { panic!("unexpected {error:?}") };
    assert_eq!(errors.get("email"), ["This email is already in use."]);
    assert_eq!(members.count().await.unwrap(), 1);
}

#[tokio::test]
async fn update_checks_email_against_other_members_only() {
    let members = repository().await;
    let serena = members.create(draft("Serena", "Williams", "serena@tennis.com")).await.unwrap();
    members.create(draft("Roger", "Federer", "roger@tennis.com")).await.unwrap();

    let kept = members
        .update(serena.id, NewMember { phone: "555-0101".to_owned(), ..draft("Serena", "Williams", "serena@tennis.com") })
        .await
        .unwrap();
    assert_eq!(kept.phone, "555-0101");

    let error = members.update(serena.id, draft("Serena", "Williams", "roger@tennis.com")).await.unwrap_err();
    assert_eq!(error.to_string(), "This email is already in use.");
}

#[tokio::test]
async fn joined_date_survives_updates() {
    let members = repository().await;
    let serena = members.create(draft("Serena", "Williams", "serena@tennis.com")).await.unwrap();

    let updated = members.update(serena.id, draft("Serena J.", "Williams", "sjw@tennis.com")).await.unwrap();
    assert_eq!(updated.firstname, "Serena J.");
    assert_eq!(updated.joined_date, serena.joined_date);
}

#[tokio::test]
async fn unknown_team_is_rejected() {
    let members = repository().await;

    let error = members
        .create(NewMember { team: Some(9), ..draft("Serena", "Williams", "serena@tennis.com") })
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Team 9 does not exist.");

    for team in [0, -1] {
        let error = members
            .create(NewMember { team: Some(team), ..draft("Serena", "Williams", "serena@tennis.com") })
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), format!("Team {team} does not exist."));
    }
}

#[tokio::test]
async fn racing_creates_with_one_email_keep_a_single_member() {
    let members = repository().await;

    let (first, second) = tokio::join!(
        members.create(draft("Serena", "Williams", "williams@tennis.com")),
        members.create(draft("Venus", "Williams", "williams@tennis.com")),
    );

    let mut created = 0;
    for result in [first, second] {
        match result {
            Ok(_) => created += 1,
            Err(MemberError::Invalid { errors }) => {
                assert_eq!(errors.get("email"), ["This email is already in use."]);
            },
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(members.count().await.unwrap(), 1);
}

#[tokio::test]
async fn missing_members_are_not_found() {
    let members = repository().await;

    assert!(members.find(4).await.unwrap().is_none());
    assert!(matches!(members.delete(4).await, Err(MemberError::NotFound { id: 4 })));
}

#[tokio::test]
async fn seeding_replaces_members_unless_kept() {
    let members = repository().await;
    members.create(draft("Club", "Captain", "captain@tennis.com")).await.unwrap();

    let report = seed::seed(&members, true).await.unwrap();
    assert_eq!((report.removed, report.created.len(), report.total), (0, 8, 9));

    let again = seed::seed(&members, true).await.unwrap();
    assert!(again.created.is_empty());

    let fresh = seed::seed(&members, false).await.unwrap();
    assert_eq!((fresh.removed, fresh.total), (9, 8));
    assert!(!members.email_taken("captain@tennis.com", None).await.unwrap());
}
