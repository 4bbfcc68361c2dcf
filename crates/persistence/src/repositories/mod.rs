//! Repositories: database access per aggregate.

pub mod entry;
pub mod membership;
pub mod team;
pub mod user;

pub use entry::EntryRepository;
pub use membership::MembershipRepository;
pub use team::TeamRepository;
pub use user::UserRepository;
