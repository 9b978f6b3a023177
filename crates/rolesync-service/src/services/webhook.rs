//! Webhook adapter - single-record incremental update

use rolesync_core::{ChangeEvent, GuildMember, MembershipRecord};
use serde_json::Value;
use tracing::{instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::reconciler::Reconciler;

/// Webhook adapter
pub struct WebhookAdapter<'a> {
    ctx: &'a ServiceContext,
    reconciler: Reconciler<'a>,
}

impl<'a> WebhookAdapter<'a> {
    pub fn new(ctx: &'a ServiceContext, reconciler: Reconciler<'a>) -> Self {
        Self { ctx, reconciler }
    }

    /// Reconcile the record carried by a change notification.
    ///
    /// Payloads without a page are logged and dropped. Always applies changes
    /// and never runs the inactive pass.
    #[instrument(skip_all)]
    pub async fn handle(&self, payload: &Value) -> ServiceResult<Option<GuildMember>> {
        let page = match ChangeEvent::from_value(payload).and_then(ChangeEvent::into_page) {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Could not parse change notification");
                return Ok(None);
            }
        };

        let record = MembershipRecord::from_page(&page, &self.ctx.settings().schema)?;
        self.reconciler.reconcile(&record, false).await
    }
}
