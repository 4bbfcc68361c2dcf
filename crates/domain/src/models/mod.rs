//! Domain models.

pub mod entry;
pub mod membership;
pub mod team;
pub mod user;

pub use entry::{
    CreateEntryRequest, Effort, Entry, EntryResponse, ListEntriesQuery, UpdateEntryRequest,
};
pub use membership::{MemberWithDetails, Membership, MembershipSnapshot, UpdateMemberRoleRequest};
pub use team::{
    CreateTeamRequest, InviteLinkResponse, JoinTeamRequest, Team, TeamResponse, UpdateTeamRequest,
};
pub use user::{User, UserInfo};
