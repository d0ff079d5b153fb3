//! Re-exports of all entities.

pub use super::proposals::Entity as Proposals;
