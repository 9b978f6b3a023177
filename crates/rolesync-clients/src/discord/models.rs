//! Wire models for the chat platform API and their entity mappers

use rolesync_core::{DomainError, GuildMember, Role, Snowflake};
use serde::{Deserialize, Serialize};

/// Role object as returned by the platform
#[derive(Debug, Clone, Deserialize)]
pub struct RoleModel {
    pub id: Snowflake,
    pub name: String,
    pub position: i32,
    #[serde(default)]
    pub managed: bool,
}

/// User object (only the fields the service reads)
#[derive(Debug, Clone, Deserialize)]
pub struct UserModel {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Guild member object
#[derive(Debug, Clone, Deserialize)]
pub struct MemberModel {
    #[serde(default)]
    pub user: Option<UserModel>,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// Body of a member role-list replacement
#[derive(Debug, Serialize)]
pub struct MemberRolesUpdate<'a> {
    pub roles: &'a [Snowflake],
}

/// Convert RoleModel to Role entity
impl From<RoleModel> for Role {
    fn from(model: RoleModel) -> Self {
        Role {
            id: model.id,
            name: model.name,
            position: model.position,
            managed: model.managed,
        }
    }
}

/// Convert MemberModel to GuildMember entity
impl TryFrom<MemberModel> for GuildMember {
    type Error = DomainError;

    fn try_from(model: MemberModel) -> Result<Self, Self::Error> {
        let user = model
            .user
            .ok_or_else(|| DomainError::InvalidPayload("member object without user".to_string()))?;

        Ok(GuildMember {
            user_id: user.id,
            username: user.username,
            global_name: user.global_name,
            nickname: model.nick,
            role_ids: model.roles,
            bot: user.bot,
        })
    }
}

/// Convert a page of member models, failing on the first malformed one
pub fn members_from_models(models: Vec<MemberModel>) -> Result<Vec<GuildMember>, DomainError> {
    models.into_iter().map(GuildMember::try_from).collect()
}
