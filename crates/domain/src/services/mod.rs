//! Domain services.
//!
//! Both services here are pure: they compute over caller-supplied values,
//! hold no state, and perform no I/O.

pub mod access;
pub mod priority;

pub use access::{
    can_create_entry, can_delete_team, can_demote_admin, can_hard_delete_entry, can_leave_team,
    can_list_entries, can_manage_invites, can_promote_member, can_restore_entry,
    can_soft_delete_entry, can_update_entry, can_update_team, can_view_entry, EntryRef,
};
pub use priority::{compute_priority, PriorityInput};
