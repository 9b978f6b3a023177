//! Reconciler - applies one record's target roles to its member
//!
//! The write is a single role-list replacement. Roles the bot cannot or should
//! not manage are carried over from the member's current list:
//! - roles positioned at or above the bot's highest role
//! - integration-managed roles
//! - roles missing from the startup snapshot, whose position is unknown

use std::collections::HashSet;

use rolesync_core::{DomainError, GuildMember, MembershipRecord, Snowflake};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::matcher::{MemberMatcher, MemberRoster};
use super::resolver::{RecordResolver, TargetRoleSet};
use super::role_cache::RoleNameCache;
use super::team_name::TeamNameResolver;

/// Reconciler
pub struct Reconciler<'a> {
    ctx: &'a ServiceContext,
    roles: &'a RoleNameCache,
    teams: &'a TeamNameResolver,
    roster: &'a MemberRoster,
    bot_user_id: Snowflake,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        ctx: &'a ServiceContext,
        roles: &'a RoleNameCache,
        teams: &'a TeamNameResolver,
        roster: &'a MemberRoster,
        bot_user_id: Snowflake,
    ) -> Self {
        Self {
            ctx,
            roles,
            teams,
            roster,
            bot_user_id,
        }
    }

    /// Reconcile one record, returning the matched member
    #[instrument(skip(self, record), fields(record = %record.reference()))]
    pub async fn reconcile(
        &self,
        record: &MembershipRecord,
        dry_run: bool,
    ) -> ServiceResult<Option<GuildMember>> {
        let Some(member) = MemberMatcher::new(self.ctx, self.roster).find(record).await? else {
            return Ok(None);
        };

        let target = RecordResolver::new(self.ctx, self.roles, self.teams)
            .resolve(record)
            .await?;

        info!(
            user_id = %member.user_id,
            member = %member.display_name(),
            dry_run,
            "Reconciling member"
        );
        for role_id in target.iter() {
            info!(role_id = %role_id, role = %self.roles.name_of(role_id), "Target role");
        }

        if !dry_run {
            self.apply(&member, &target).await?;
        }

        Ok(Some(member))
    }

    /// Highest role position held by the bot's own member
    pub async fn bot_height(&self) -> ServiceResult<i32> {
        let guild_id = self.ctx.guild_id();
        let bot = self
            .ctx
            .platform()
            .get_member(guild_id, self.bot_user_id)
            .await?
            .ok_or(DomainError::MemberNotFound(self.bot_user_id))?;

        bot.role_ids
            .iter()
            .filter_map(|id| self.roles.position_of(*id))
            .max()
            .ok_or(ServiceError::BotHasNoRoles)
    }

    /// Roles from `current` that survive any rewrite
    pub fn preserved_roles(&self, current: &[Snowflake], bot_height: i32) -> Vec<Snowflake> {
        current
            .iter()
            .copied()
            .filter(|id| match self.roles.get(*id) {
                Some(role) => role.managed || role.is_at_or_above(bot_height),
                None => true,
            })
            .collect()
    }

    async fn apply(&self, member: &GuildMember, target: &TargetRoleSet) -> ServiceResult<()> {
        let guild_id = self.ctx.guild_id();
        let bot_height = self.bot_height().await?;

        let current = self
            .ctx
            .platform()
            .get_member(guild_id, member.user_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member.user_id))?;

        let mut desired = target.clone();
        for role_id in self.preserved_roles(&current.role_ids, bot_height) {
            desired.insert(role_id);
        }

        let unchanged = desired.iter().collect::<HashSet<_>>()
            == current.role_ids.iter().copied().collect::<HashSet<_>>();
        if unchanged {
            info!(user_id = %member.user_id, "Roles already up to date");
            return Ok(());
        }

        self.ctx
            .platform()
            .replace_member_roles(guild_id, member.user_id, desired.as_slice())
            .await?;
        info!(
            user_id = %member.user_id,
            roles = desired.len(),
            "Member roles replaced"
        );
        self.ctx.throttle().pause().await;

        Ok(())
    }
}
