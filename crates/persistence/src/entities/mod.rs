//! Entity definitions: database row mappings.

pub mod entry;
pub mod membership;
pub mod team;
pub mod user;

pub use entry::{EffortDb, EntryEntity, EntryWithAuthorEntity};
pub use membership::{MemberWithDetailsEntity, MembershipEntity, MembershipSnapshotEntity};
pub use team::TeamEntity;
pub use user::{UserCredentialsEntity, UserEntity};
