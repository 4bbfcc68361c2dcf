//! Access control predicates.
//!
//! Every predicate answers "may this actor perform this operation" as a plain
//! boolean over a caller-resolved [`MembershipSnapshot`]. `None` stands for
//! "no membership record found" and always denies. Predicates never error;
//! the HTTP layer decides whether a denial surfaces as 403 or is masked as
//! 404 to avoid leaking cross-team existence.

use uuid::Uuid;

use crate::models::membership::MembershipSnapshot;

/// Ownership context of an entry: the team it belongs to and its author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub team_id: Uuid,
    pub creator_id: Uuid,
}

fn is_member_of(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    matches!(actor, Some(m) if m.team_id == team_id)
}

fn is_admin_of(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    matches!(actor, Some(m) if m.team_id == team_id && m.is_admin)
}

/// List or view any of a team's entries: membership is sufficient.
pub fn can_list_entries(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    is_member_of(actor, team_id)
}

/// View a single entry: membership in the entry's team.
pub fn can_view_entry(actor: Option<&MembershipSnapshot>, entry: EntryRef) -> bool {
    is_member_of(actor, entry.team_id)
}

/// Submit a new entry: membership is sufficient.
pub fn can_create_entry(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    is_member_of(actor, team_id)
}

/// Mutate an entry: its creator, or any admin of its team.
pub fn can_update_entry(actor: Option<&MembershipSnapshot>, entry: EntryRef) -> bool {
    match actor {
        Some(m) if m.team_id == entry.team_id => m.is_admin || m.user_id == entry.creator_id,
        _ => false,
    }
}

/// Soft-delete follows the update rule.
pub fn can_soft_delete_entry(actor: Option<&MembershipSnapshot>, entry: EntryRef) -> bool {
    can_update_entry(actor, entry)
}

/// Restore follows the update rule.
pub fn can_restore_entry(actor: Option<&MembershipSnapshot>, entry: EntryRef) -> bool {
    can_update_entry(actor, entry)
}

/// Permanent deletion requires admin; authorship alone is not enough.
pub fn can_hard_delete_entry(actor: Option<&MembershipSnapshot>, entry: EntryRef) -> bool {
    is_admin_of(actor, entry.team_id)
}

/// Rename the team or change its settings: admin only.
pub fn can_update_team(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    is_admin_of(actor, team_id)
}

/// Generate or view the invite link: admin only.
pub fn can_manage_invites(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    is_admin_of(actor, team_id)
}

/// Promote a member to admin.
///
/// The actor must be an admin; the target must already be a member of the
/// same team and not already an admin.
pub fn can_promote_member(
    actor: Option<&MembershipSnapshot>,
    target: Option<&MembershipSnapshot>,
    team_id: Uuid,
) -> bool {
    if !is_admin_of(actor, team_id) {
        return false;
    }
    matches!(target, Some(t) if t.team_id == team_id && !t.is_admin)
}

/// Demote an admin back to member.
///
/// The actor must be an admin; the target must be an admin of the same team.
/// The founder can never be demoted, by anyone.
pub fn can_demote_admin(
    actor: Option<&MembershipSnapshot>,
    target: Option<&MembershipSnapshot>,
    team_id: Uuid,
) -> bool {
    if !is_admin_of(actor, team_id) {
        return false;
    }
    matches!(target, Some(t) if t.team_id == team_id && t.is_admin && !t.is_founder)
}

/// Leave the team: any member except the founder.
pub fn can_leave_team(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    matches!(actor, Some(m) if m.team_id == team_id && !m.is_founder)
}

/// Dissolve the team: admin only.
pub fn can_delete_team(actor: Option<&MembershipSnapshot>, team_id: Uuid) -> bool {
    is_admin_of(actor, team_id)
}
