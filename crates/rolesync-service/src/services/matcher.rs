//! Member matcher - membership record to guild member

use std::collections::HashMap;

use parking_lot::RwLock;
use rolesync_core::{GuildMember, MembershipRecord};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Normalize a raw chat handle into a roster key.
///
/// Trims whitespace, drops one leading `@`, and case-folds. Returns `None`
/// when nothing is left.
pub fn normalize_handle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let handle = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_lowercase())
    }
}

/// In-memory guild roster keyed by case-folded username
#[derive(Debug, Default)]
pub struct MemberRoster {
    members: RwLock<HashMap<String, GuildMember>>,
}

impl MemberRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot
    pub fn replace(&self, members: impl IntoIterator<Item = GuildMember>) {
        let members = members
            .into_iter()
            .map(|member| (member.username_key(), member))
            .collect();
        *self.members.write() = members;
    }

    pub fn insert(&self, member: GuildMember) {
        self.members.write().insert(member.username_key(), member);
    }

    /// Look up a member by normalized handle
    pub fn get(&self, key: &str) -> Option<GuildMember> {
        self.members.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }
}

/// Member matcher
pub struct MemberMatcher<'a> {
    ctx: &'a ServiceContext,
    roster: &'a MemberRoster,
}

impl<'a> MemberMatcher<'a> {
    pub fn new(ctx: &'a ServiceContext, roster: &'a MemberRoster) -> Self {
        Self { ctx, roster }
    }

    /// Find the guild member a record's handle points at
    #[instrument(skip(self, record), fields(record = %record.reference()))]
    pub async fn find(&self, record: &MembershipRecord) -> ServiceResult<Option<GuildMember>> {
        let Some(handle) = record.handle.as_deref().and_then(normalize_handle) else {
            warn!(record = %record.reference(), "Record has no chat handle");
            return Ok(None);
        };

        if let Some(member) = self.roster.get(&handle) {
            return Ok(Some(member));
        }

        let found = self
            .ctx
            .platform()
            .search_members(self.ctx.guild_id(), &handle, 1)
            .await?;
        self.ctx.throttle().pause().await;

        match found.into_iter().next() {
            Some(member) if member.username_key() == handle => {
                debug!(user_id = %member.user_id, "Member found by search");
                self.roster.insert(member.clone());
                Ok(Some(member))
            }
            _ => {
                warn!(handle = %handle, "Could not find member");
                Ok(None)
            }
        }
    }
}
