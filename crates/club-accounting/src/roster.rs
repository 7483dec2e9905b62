use club_domain::{Insert, Member, MemberFilter, Query, Retrieve, Update};

use crate::{dues::DuesRecord, Context, LedgerError};

/// Add a new member to the club.
pub async fn register<DB>(
    db: &DB,
    ctx: &Context,
    name: &str,
    surname: &str,
) -> Result<Member, LedgerError>
where
    DB: Insert<Member> + Sync,
{
    if name.trim().is_empty() || surname.trim().is_empty() {
        return Err(LedgerError::validation("name and surname are required"));
    }
    let member = db.insert(Member::new(name, surname, ctx.now())).await?;
    tracing::info!(member = member.id, name = %member.full_name(), "registered member");
    Ok(member)
}

/// Correct the name of a member. Dues and insurance stay as they are.
pub async fn rename<DB>(db: &DB, id: u32, name: &str, surname: &str) -> Result<Member, LedgerError>
where
    DB: Retrieve<Member, Key = u32> + Update<Member> + Sync,
{
    if name.trim().is_empty() || surname.trim().is_empty() {
        return Err(LedgerError::validation("name and surname are required"));
    }
    let member = db
        .retrieve(id)
        .await
        .map_err(LedgerError::lookup("member", id))?;
    let member = db
        .update(Member {
            name: name.trim().to_string(),
            surname: surname.trim().to_string(),
            ..member
        })
        .await?;
    tracing::info!(member = member.id, name = %member.full_name(), "renamed member");
    Ok(member)
}

pub async fn set_active<DB>(db: &DB, id: u32, active: bool) -> Result<Member, LedgerError>
where
    DB: Retrieve<Member, Key = u32> + Update<Member> + Sync,
{
    let member = db
        .retrieve(id)
        .await
        .map_err(LedgerError::lookup("member", id))?;
    if member.active == active {
        return Ok(member);
    }
    let member = db.update(Member { active, ..member }).await?;
    tracing::info!(member = member.id, active, "changed member status");
    Ok(member)
}

/// Flip the active flag of a member.
pub async fn toggle_active<DB>(db: &DB, id: u32) -> Result<Member, LedgerError>
where
    DB: Retrieve<Member, Key = u32> + Update<Member> + Sync,
{
    let member = db
        .retrieve(id)
        .await
        .map_err(LedgerError::lookup("member", id))?;
    set_active(db, id, !member.active).await
}

/// Stored debtor flags go stale as days pass. Recompute them
/// for today and store the members whose status changed.
pub async fn refresh_debtors<DB>(db: &DB, ctx: &Context) -> Result<Vec<Member>, LedgerError>
where
    DB: Query<Member, Filter = MemberFilter> + Update<Member> + Sync,
{
    let today = ctx.today();
    let members = db.query(&MemberFilter::default()).await?;

    let mut changed = Vec::new();
    for member in members {
        let refreshed = member.clone().refresh_status(today);
        if refreshed != member {
            changed.push(db.update(refreshed).await?);
        }
    }
    tracing::info!(%today, changed = changed.len(), "refreshed debtor status");
    Ok(changed)
}
