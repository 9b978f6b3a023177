//! # rolesync-core
//!
//! Domain layer containing platform entities, the membership record model,
//! collaborator ports, and inbound change events.
//! This crate has zero dependencies on infrastructure (HTTP clients, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    DatabasePage, GuildMember, MembershipRecord, PageBatch, PropertyItem, PropertyValue,
    RecordSchema, RelationRef, RichText, Role, SelectOption,
};
pub use error::DomainError;
pub use events::ChangeEvent;
pub use traits::{ChatPlatform, MembershipDatabase, RepoResult};
pub use value_objects::{PageId, Snowflake, SnowflakeParseError};
