//! Collaborator traits (ports)
//!
//! The domain layer defines what it needs from the membership database and the
//! chat platform; the infrastructure layer provides the implementations.
//! Implementations map "does not exist" responses to the not-found family of
//! [`DomainError`] so callers can tell them apart from hard failures.

use async_trait::async_trait;

use crate::entities::{DatabasePage, GuildMember, PageBatch, PropertyItem, Role};
use crate::error::DomainError;
use crate::value_objects::{PageId, Snowflake};

/// Result type for port operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Membership Database
// ============================================================================

#[async_trait]
pub trait MembershipDatabase: Send + Sync {
    /// Query one page of a database, continuing from `start_cursor`
    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> RepoResult<PageBatch>;

    /// Fetch a page with all its properties
    async fn retrieve_page(&self, page_id: &PageId) -> RepoResult<DatabasePage>;

    /// Fetch the items of a single property by schema id
    async fn retrieve_property_item(
        &self,
        page_id: &PageId,
        property_id: &str,
    ) -> RepoResult<Vec<PropertyItem>>;
}

// ============================================================================
// Chat Platform
// ============================================================================

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Id of the bot's own user
    async fn current_user_id(&self) -> RepoResult<Snowflake>;

    /// List all roles in a guild
    async fn list_roles(&self, guild_id: Snowflake) -> RepoResult<Vec<Role>>;

    /// List guild members ordered by user id, starting after `after`
    async fn list_members(
        &self,
        guild_id: Snowflake,
        after: Option<Snowflake>,
        limit: u16,
    ) -> RepoResult<Vec<GuildMember>>;

    /// Search members whose username or nickname starts with `query`
    async fn search_members(
        &self,
        guild_id: Snowflake,
        query: &str,
        limit: u16,
    ) -> RepoResult<Vec<GuildMember>>;

    /// Fetch one member
    async fn get_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GuildMember>>;

    /// Replace a member's whole role list in one call
    async fn replace_member_roles(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> RepoResult<GuildMember>;

    /// Grant a single role
    async fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()>;
}
