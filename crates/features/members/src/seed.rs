//! Demo members.

use crate::error::MemberError;
use crate::model::{Member, NewMember};
use crate::repository::MemberRepository;
use tracing::info;

/// `(firstname, lastname, phone)`; emails are `first.last@tennis.com`.
const DEMO_MEMBERS: [(&str, &str, &str); 8] = [
    ("Serena", "Williams", "555-0101"),
    ("Roger", "Federer", "555-0102"),
    ("Rafael", "Nadal", "555-0103"),
    ("Naomi", "Osaka", "555-0104"),
    ("Novak", "Djokovic", "555-0105"),
    ("Simona", "Halep", "555-0106"),
    ("Andy", "Murray", "555-0107"),
    ("Maria", "Sharapova", "555-0108"),
];

/// Outcome of [`seed`].
#[derive(Debug, Default, Clone)]
pub struct SeedReport {
    /// Members deleted before seeding.
    pub removed: usize,
    pub created: Vec<Member>,
    /// Members in the table afterwards.
    pub total: usize,
}

/// The demo member drafts, in creation order.
#[must_use]
pub fn demo_members() -> Vec<NewMember> {
    DEMO_MEMBERS
        .iter()
        .map(|(first, last, phone)| NewMember {
            firstname: (*first).to_owned(),
            lastname: (*last).to_owned(),
            email: format!("{}.{}@tennis.com", first.to_lowercase(), last.to_lowercase()),
            phone: (*phone).to_owned(),
            team: None,
        })
        .collect()
}

/// Replaces every member with the demo members.
///
/// With `keep`, existing members stay and demo members whose email is
/// already taken are skipped.
///
/// # Errors
/// Any repository failure; members created before it stay in place.
pub async fn seed(repository: &MemberRepository, keep: bool) -> Result<SeedReport, MemberError> {
    let mut report = SeedReport::default();

    if !keep {
        info!("Clearing existing members");
        report.removed = repository.delete_all().await?;
    }

    for draft in demo_members() {
        if keep && repository.email_taken(&draft.email, None).await? {
            info!(email = %draft.email, "Demo member already present");
            continue;
        }
        let member = repository.create(draft).await?;
        info!(member = member.id, name = %member.display_name(), "Created demo member");
        report.created.push(member);
    }

    report.total = repository.count().await?;
    info!(created = report.created.len(), total = report.total, "Demo members seeded");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_emails_follow_the_names() {
        let drafts = demo_members();
        assert_eq!(drafts.len(), 8);
        assert_eq!(drafts[0].email, "serena.williams@tennis.com");
        assert_eq!(drafts[7].email, "maria.sharapova@tennis.com");
        assert_eq!(drafts[7].phone, "555-0108");
        assert!(drafts.iter().all(|draft| draft.rule_errors().is_empty()));
    }
}
