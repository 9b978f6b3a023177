//! In-memory port implementations
//!
//! Both fakes record every call so tests can assert on exactly which remote
//! operations the engine performed.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use rolesync_core::{
    ChatPlatform, DatabasePage, DomainError, GuildMember, MembershipDatabase, PageBatch, PageId,
    PropertyItem, PropertyValue, RepoResult, Role, Snowflake,
};

// ============================================================================
// Membership Database
// ============================================================================

/// A recorded database call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseCall {
    Query { cursor: Option<String> },
    RetrievePage(PageId),
    RetrieveProperty { page_id: PageId, property_id: String },
}

/// Membership database backed by a list of records and a map of team pages
#[derive(Debug, Default)]
pub struct FakeDatabase {
    database_id: String,
    records: Mutex<Vec<DatabasePage>>,
    pages: Mutex<HashMap<PageId, DatabasePage>>,
    calls: Mutex<Vec<DatabaseCall>>,
    property_failure: Mutex<Option<DomainError>>,
}

impl FakeDatabase {
    pub fn new(database_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            ..Self::default()
        }
    }

    /// Append a record to the members database
    pub fn add_record(&self, page: DatabasePage) {
        self.records.lock().push(page);
    }

    /// Insert or replace a standalone page (team pages)
    pub fn put_page(&self, page: DatabasePage) {
        self.pages.lock().insert(page.id.clone(), page);
    }

    /// Make the next property item lookup fail with `err`
    pub fn fail_next_property_item(&self, err: DomainError) {
        *self.property_failure.lock() = Some(err);
    }

    pub fn calls(&self) -> Vec<DatabaseCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: DatabaseCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl MembershipDatabase for FakeDatabase {
    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> RepoResult<PageBatch> {
        self.record(DatabaseCall::Query {
            cursor: start_cursor.map(str::to_string),
        });
        if database_id != self.database_id {
            return Err(DomainError::DatabaseNotFound(database_id.to_string()));
        }

        let records = self.records.lock();
        let start = start_cursor
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0)
            .min(records.len());
        let end = (start + page_size.max(1) as usize).min(records.len());
        let has_more = end < records.len();

        Ok(PageBatch {
            results: records[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn retrieve_page(&self, page_id: &PageId) -> RepoResult<DatabasePage> {
        self.record(DatabaseCall::RetrievePage(page_id.clone()));
        self.pages
            .lock()
            .get(page_id)
            .cloned()
            .ok_or_else(|| DomainError::PageNotFound(page_id.clone()))
    }

    async fn retrieve_property_item(
        &self,
        page_id: &PageId,
        property_id: &str,
    ) -> RepoResult<Vec<PropertyItem>> {
        self.record(DatabaseCall::RetrieveProperty {
            page_id: page_id.clone(),
            property_id: property_id.to_string(),
        });
        if let Some(err) = self.property_failure.lock().take() {
            return Err(err);
        }

        let pages = self.pages.lock();
        let page = pages
            .get(page_id)
            .ok_or_else(|| DomainError::PageNotFound(page_id.clone()))?;
        let value = page
            .properties
            .values()
            .find(|value| value.id() == Some(property_id))
            .ok_or_else(|| DomainError::PropertyNotFound {
                page_id: page_id.clone(),
                property_id: property_id.to_string(),
            })?;

        Ok(match value {
            PropertyValue::Title { title, .. } => title
                .iter()
                .map(|segment| PropertyItem::Title {
                    title: segment.clone(),
                })
                .collect(),
            _ => vec![PropertyItem::Other],
        })
    }
}

// ============================================================================
// Chat Platform
// ============================================================================

/// A recorded platform call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    CurrentUser,
    ListRoles,
    ListMembers { after: Option<Snowflake> },
    Search(String),
    GetMember(Snowflake),
    ReplaceRoles { user_id: Snowflake, role_ids: Vec<Snowflake> },
    AddRole { user_id: Snowflake, role_id: Snowflake },
}

impl PlatformCall {
    /// Whether the call changes guild state
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::ReplaceRoles { .. } | Self::AddRole { .. })
    }
}

/// One guild held in memory, members ordered by user id
#[derive(Debug)]
pub struct FakePlatform {
    guild_id: Snowflake,
    bot_user_id: Snowflake,
    roles: Vec<Role>,
    members: Mutex<BTreeMap<Snowflake, GuildMember>>,
    calls: Mutex<Vec<PlatformCall>>,
}

impl FakePlatform {
    pub fn new(guild_id: Snowflake, bot_user_id: Snowflake, roles: Vec<Role>) -> Self {
        Self {
            guild_id,
            bot_user_id,
            roles,
            members: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn add_member(&self, member: GuildMember) {
        self.members.lock().insert(member.user_id, member);
    }

    /// Current role list of a member, as the guild sees it
    pub fn roles_of(&self, user_id: Snowflake) -> Vec<Snowflake> {
        self.members
            .lock()
            .get(&user_id)
            .map(|m| m.role_ids.clone())
            .unwrap_or_default()
    }

    /// Change a member's roles behind the engine's back
    pub fn set_roles(&self, user_id: Snowflake, role_ids: Vec<Snowflake>) {
        if let Some(member) = self.members.lock().get_mut(&user_id) {
            member.set_roles(role_ids);
        }
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().clone()
    }

    pub fn mutations(&self) -> Vec<PlatformCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    pub fn searches(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::Search(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().push(call);
    }

    fn check_guild(&self, guild_id: Snowflake) -> RepoResult<()> {
        if guild_id == self.guild_id {
            Ok(())
        } else {
            Err(DomainError::GuildNotFound(guild_id))
        }
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn current_user_id(&self) -> RepoResult<Snowflake> {
        self.record(PlatformCall::CurrentUser);
        Ok(self.bot_user_id)
    }

    async fn list_roles(&self, guild_id: Snowflake) -> RepoResult<Vec<Role>> {
        self.record(PlatformCall::ListRoles);
        self.check_guild(guild_id)?;
        Ok(self.roles.clone())
    }

    async fn list_members(
        &self,
        guild_id: Snowflake,
        after: Option<Snowflake>,
        limit: u16,
    ) -> RepoResult<Vec<GuildMember>> {
        self.record(PlatformCall::ListMembers { after });
        self.check_guild(guild_id)?;
        Ok(self
            .members
            .lock()
            .values()
            .filter(|m| after.is_none_or(|after| m.user_id > after))
            .take(usize::from(limit))
            .cloned()
            .collect())
    }

    async fn search_members(
        &self,
        guild_id: Snowflake,
        query: &str,
        limit: u16,
    ) -> RepoResult<Vec<GuildMember>> {
        self.record(PlatformCall::Search(query.to_string()));
        self.check_guild(guild_id)?;
        let query = query.to_lowercase();
        Ok(self
            .members
            .lock()
            .values()
            .filter(|m| {
                m.username_key().starts_with(&query)
                    || m.nickname
                        .as_deref()
                        .is_some_and(|nick| nick.to_lowercase().starts_with(&query))
            })
            .take(usize::from(limit))
            .cloned()
            .collect())
    }

    async fn get_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GuildMember>> {
        self.record(PlatformCall::GetMember(user_id));
        self.check_guild(guild_id)?;
        Ok(self.members.lock().get(&user_id).cloned())
    }

    async fn replace_member_roles(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> RepoResult<GuildMember> {
        self.record(PlatformCall::ReplaceRoles {
            user_id,
            role_ids: role_ids.to_vec(),
        });
        self.check_guild(guild_id)?;
        let mut members = self.members.lock();
        let member = members
            .get_mut(&user_id)
            .ok_or(DomainError::MemberNotFound(user_id))?;
        member.set_roles(role_ids.to_vec());
        Ok(member.clone())
    }

    async fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()> {
        self.record(PlatformCall::AddRole { user_id, role_id });
        self.check_guild(guild_id)?;
        self.members
            .lock()
            .get_mut(&user_id)
            .ok_or(DomainError::MemberNotFound(user_id))?
            .add_role(role_id);
        Ok(())
    }
}
