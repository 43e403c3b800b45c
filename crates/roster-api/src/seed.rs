//! Sample data loaded at startup when enabled

use roster_core::auditing::AuditContext;
use roster_core::entities::Member;
use roster_core::traits::{CrudRepository, MemberRepository, RepoResult};
use tracing::{info, instrument};

/// Number of sample members
pub const SAMPLE_MEMBERS: i32 = 100;

/// Insert `member 0` .. `member 99`, aged by their index, into an empty
/// member table. Returns how many rows were inserted.
#[instrument(skip(members, audit))]
pub async fn seed_sample_members(
    members: &dyn MemberRepository,
    audit: &AuditContext,
) -> RepoResult<usize> {
    let existing = members.count().await?;
    if existing > 0 {
        info!(existing, "Member table not empty, skipping sample data");
        return Ok(0);
    }

    let samples = (0..SAMPLE_MEMBERS)
        .map(|i| Member::new(format!("member {i}"), i))
        .collect();
    let saved = members.save_all(samples, audit).await?;

    info!(count = saved.len(), "Inserted sample members");
    Ok(saved.len())
}
