//! Record resolver - membership record to target role set

use rolesync_core::{MembershipRecord, Snowflake};
use tracing::{instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::role_cache::RoleNameCache;
use super::team_name::TeamNameResolver;

/// Status value that contributes no role
pub const ACTIVE_STATUS: &str = "Active";

/// Position label that contributes no role
pub const INDIVIDUAL_CONTRIBUTOR: &str = "Individual Contributor";

const TEAM_SUFFIX: &str = " Team";

/// Strip one trailing `" Team"`, so "Robotics Team" maps to the "Robotics" role
pub fn strip_team_suffix(name: &str) -> &str {
    name.strip_suffix(TEAM_SUFFIX).unwrap_or(name)
}

/// Role ids in first-insertion order without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetRoleSet(Vec<Snowflake>);

impl TargetRoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role; returns false if it was already present
    pub fn insert(&mut self, role_id: Snowflake) -> bool {
        if self.0.contains(&role_id) {
            return false;
        }
        self.0.push(role_id);
        true
    }

    pub fn contains(&self, role_id: Snowflake) -> bool {
        self.0.contains(&role_id)
    }

    pub fn as_slice(&self) -> &[Snowflake] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Snowflake> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Snowflake> {
        self.0
    }
}

impl FromIterator<Snowflake> for TargetRoleSet {
    fn from_iter<I: IntoIterator<Item = Snowflake>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Record resolver
pub struct RecordResolver<'a> {
    ctx: &'a ServiceContext,
    roles: &'a RoleNameCache,
    teams: &'a TeamNameResolver,
}

impl<'a> RecordResolver<'a> {
    pub fn new(
        ctx: &'a ServiceContext,
        roles: &'a RoleNameCache,
        teams: &'a TeamNameResolver,
    ) -> Self {
        Self { ctx, roles, teams }
    }

    /// Compute the roles a record should produce
    #[instrument(skip(self, record), fields(record = %record.reference()))]
    pub async fn resolve(&self, record: &MembershipRecord) -> ServiceResult<TargetRoleSet> {
        let mut target = TargetRoleSet::new();

        if let Some(role_id) = self.status_role(record.status.as_deref()) {
            target.insert(role_id);
        }

        for team in &record.teams {
            let team_name = self.teams.resolve(self.ctx.database(), team).await?;
            if let Some(role_id) = self.lookup(strip_team_suffix(&team_name)) {
                target.insert(role_id);
            }
        }

        for role_id in self.position_roles(&record.positions) {
            target.insert(role_id);
        }

        Ok(target)
    }

    /// Non-"Active" statuses name their own role
    pub fn status_role(&self, status: Option<&str>) -> Option<Snowflake> {
        match status {
            None | Some(ACTIVE_STATUS) => None,
            Some(status) => self.lookup(status),
        }
    }

    /// Roles contributed by club positions, in label order
    pub fn position_roles(&self, positions: &[String]) -> Vec<Snowflake> {
        let settings = self.ctx.settings();
        let mut roles = Vec::new();

        for label in positions {
            if label == INDIVIDUAL_CONTRIBUTOR {
                continue;
            }
            if settings.technical_lead_pattern.is_match(label) {
                roles.push(settings.technical_lead_role_id);
            }
            if let Some(role_id) = self.lookup(strip_team_suffix(label)) {
                roles.push(role_id);
            }
        }

        roles
    }

    fn lookup(&self, name: &str) -> Option<Snowflake> {
        let role = self.roles.lookup(name).map(|role| role.id);
        if role.is_none() {
            warn!(role = %name, "Could not find role with name");
        }
        role
    }
}
