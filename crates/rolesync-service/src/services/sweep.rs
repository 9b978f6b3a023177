//! Sweep driver - full two-pass reconciliation
//!
//! Pass one walks every database record and reconciles it. Pass two walks
//! every guild member and demotes the ones no record matched.

use std::collections::HashSet;

use rolesync_core::{GuildMember, MembershipRecord, Snowflake};
use tracing::{info, instrument};

use crate::dto::SweepReport;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::matcher::MemberRoster;
use super::reconciler::Reconciler;

/// List every guild member, paging by user id
pub async fn fetch_all_members(ctx: &ServiceContext) -> ServiceResult<Vec<GuildMember>> {
    let limit = ctx.settings().member_page_size.max(1);
    let mut members = Vec::new();
    let mut after: Option<Snowflake> = None;

    loop {
        let page = ctx
            .platform()
            .list_members(ctx.guild_id(), after, limit)
            .await?;
        let count = page.len();
        after = page.last().map(|member| member.user_id);
        members.extend(page);

        if count < usize::from(limit) || after.is_none() {
            break;
        }
    }

    Ok(members)
}

/// Sweep driver
pub struct SweepDriver<'a> {
    ctx: &'a ServiceContext,
    roster: &'a MemberRoster,
    reconciler: Reconciler<'a>,
}

impl<'a> SweepDriver<'a> {
    pub fn new(
        ctx: &'a ServiceContext,
        roster: &'a MemberRoster,
        reconciler: Reconciler<'a>,
    ) -> Self {
        Self {
            ctx,
            roster,
            reconciler,
        }
    }

    /// Run both passes
    #[instrument(skip(self))]
    pub async fn run(&self, dry_run: bool) -> ServiceResult<SweepReport> {
        let mut report = SweepReport::begin(dry_run);
        info!(dry_run, "Full sweep started");

        let processed = self.reconcile_records(dry_run, &mut report).await?;
        report.matched = processed.len();

        self.mark_unseen(&processed, dry_run, &mut report).await?;

        let report = report.finish();
        info!(
            records = report.records,
            matched = report.matched,
            unseen = report.unseen,
            marked_inactive = report.marked_inactive,
            duration_ms = report.duration_ms(),
            "Full sweep finished"
        );
        Ok(report)
    }

    /// Pass one: reconcile every record, collecting matched user ids
    async fn reconcile_records(
        &self,
        dry_run: bool,
        report: &mut SweepReport,
    ) -> ServiceResult<HashSet<Snowflake>> {
        let settings = self.ctx.settings();
        let mut processed = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let batch = self
                .ctx
                .database()
                .query_database(
                    &settings.members_database_id,
                    cursor.as_deref(),
                    settings.database_page_size,
                )
                .await?;
            self.ctx.throttle().pause().await;

            for page in &batch.results {
                report.records += 1;
                let record = MembershipRecord::from_page(page, &settings.schema)?;
                if let Some(member) = self.reconciler.reconcile(&record, dry_run).await? {
                    processed.insert(member.user_id);
                }
            }

            match batch.continuation() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }

        Ok(processed)
    }

    /// Pass two: grant the inactive role to every member pass one did not see
    async fn mark_unseen(
        &self,
        processed: &HashSet<Snowflake>,
        dry_run: bool,
        report: &mut SweepReport,
    ) -> ServiceResult<()> {
        let guild_id = self.ctx.guild_id();
        let inactive_role_id = self.ctx.settings().inactive_role_id;
        let mut members = fetch_all_members(self.ctx).await?;

        info!(count = members.len(), "Checking members without a record");
        for member in &mut members {
            if processed.contains(&member.user_id) {
                continue;
            }
            report.unseen += 1;
            info!(
                user_id = %member.user_id,
                member = %member.display_name(),
                username = %member.username,
                "Member has no record"
            );

            if !dry_run && !member.has_role(inactive_role_id) {
                self.ctx
                    .platform()
                    .add_member_role(guild_id, member.user_id, inactive_role_id)
                    .await?;
                member.add_role(inactive_role_id);
                report.marked_inactive += 1;
                self.ctx.throttle().pause().await;
            }
        }

        self.roster.replace(members);
        Ok(())
    }
}
