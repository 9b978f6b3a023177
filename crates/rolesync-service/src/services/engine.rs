//! Sync engine - owns the caches and exposes both entry points
//!
//! Built once at startup from a role snapshot, a roster listing, and the bot's
//! own user id. Shared behind an `Arc` by the webhook listener and the sweep
//! scheduler.

use std::sync::atomic::{AtomicBool, Ordering};

use rolesync_core::{GuildMember, MembershipRecord, Snowflake};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::dto::SweepReport;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::matcher::MemberRoster;
use super::reconciler::Reconciler;
use super::role_cache::RoleNameCache;
use super::sweep::{fetch_all_members, SweepDriver};
use super::team_name::TeamNameResolver;
use super::webhook::WebhookAdapter;

pub struct SyncEngine {
    ctx: ServiceContext,
    roles: RoleNameCache,
    teams: TeamNameResolver,
    roster: MemberRoster,
    bot_user_id: Snowflake,
    sweeping: AtomicBool,
}

/// Clears the sweep flag when a sweep ends, including on error
struct SweepGuard<'a>(&'a AtomicBool);

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    /// Take the startup snapshots and build the engine
    #[instrument(skip(ctx))]
    pub async fn start(ctx: ServiceContext) -> ServiceResult<Self> {
        let guild_id = ctx.guild_id();
        let settings = ctx.settings();

        let roles = RoleNameCache::from_roles(ctx.platform().list_roles(guild_id).await?);
        for (label, role_id) in [
            ("inactive", settings.inactive_role_id),
            ("technical lead", settings.technical_lead_role_id),
        ] {
            if roles.get(role_id).is_none() {
                warn!(role_id = %role_id, role = label, "Configured role is not in the guild");
            }
        }

        let bot_user_id = ctx.platform().current_user_id().await?;

        let roster = MemberRoster::new();
        roster.replace(fetch_all_members(&ctx).await?);

        let teams = TeamNameResolver::new(settings.schema.team_name.clone());

        info!(
            guild_id = %guild_id,
            roles = roles.len(),
            members = roster.len(),
            bot_user_id = %bot_user_id,
            "Sync engine started"
        );

        Ok(Self {
            ctx,
            roles,
            teams,
            roster,
            bot_user_id,
            sweeping: AtomicBool::new(false),
        })
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    pub fn roles(&self) -> &RoleNameCache {
        &self.roles
    }

    pub fn team_names(&self) -> &TeamNameResolver {
        &self.teams
    }

    pub fn roster(&self) -> &MemberRoster {
        &self.roster
    }

    pub fn bot_user_id(&self) -> Snowflake {
        self.bot_user_id
    }

    /// Whether a full sweep is currently running
    pub fn is_sweeping(&self) -> bool {
        self.sweeping.load(Ordering::Acquire)
    }

    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(
            &self.ctx,
            &self.roles,
            &self.teams,
            &self.roster,
            self.bot_user_id,
        )
    }

    /// Reconcile a single decoded record
    pub async fn reconcile(
        &self,
        record: &MembershipRecord,
        dry_run: bool,
    ) -> ServiceResult<Option<GuildMember>> {
        self.reconciler().reconcile(record, dry_run).await
    }

    /// Run a full sweep; rejected while another one is running
    pub async fn sweep_all(&self, dry_run: bool) -> ServiceResult<SweepReport> {
        if self
            .sweeping
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ServiceError::SweepInProgress);
        }
        let _guard = SweepGuard(&self.sweeping);

        SweepDriver::new(&self.ctx, &self.roster, self.reconciler())
            .run(dry_run)
            .await
    }

    /// Handle one change notification payload
    pub async fn handle_webhook(&self, payload: &Value) -> ServiceResult<Option<GuildMember>> {
        WebhookAdapter::new(&self.ctx, self.reconciler())
            .handle(payload)
            .await
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("guild_id", &self.ctx.guild_id())
            .field("roles", &self.roles.len())
            .field("members", &self.roster.len())
            .field("bot_user_id", &self.bot_user_id)
            .field("sweeping", &self.is_sweeping())
            .finish()
    }
}
