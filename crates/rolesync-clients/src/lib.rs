//! # rolesync-clients
//!
//! REST implementations of the collaborator ports defined in `rolesync-core`:
//! [`NotionClient`] for the membership database and [`DiscordClient`] for the
//! chat platform.

pub mod discord;
pub mod error;
pub mod notion;

pub use discord::DiscordClient;
pub use notion::NotionClient;
