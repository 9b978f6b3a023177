//! REST implementation of ChatPlatform

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rolesync_common::DiscordConfig;
use rolesync_core::{ChatPlatform, DomainError, GuildMember, RepoResult, Role, Snowflake};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use super::models::{members_from_models, MemberModel, MemberRolesUpdate, RoleModel, UserModel};
use crate::error::{map_status_error, map_transport_error};

const SERVICE: &str = "discord";
const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";
const AUDIT_REASON: &str = "Membership sync";

/// Chat platform client authenticated as a bot
pub struct DiscordClient {
    http: Client,
    base_url: String,
    current_user: Mutex<Option<Snowflake>>,
}

impl DiscordClient {
    /// Create a client from configuration
    pub fn new(config: &DiscordConfig) -> RepoResult<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bot {}", config.token))
            .map_err(|e| DomainError::InternalError(format!("invalid bot token: {e}")))?;
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(map_transport_error)?;

        Ok(Self::with_client(http, &config.api_base_url))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            current_user: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<F>(&self, request: RequestBuilder, not_found: F) -> RepoResult<Response>
    where
        F: FnOnce() -> DomainError,
    {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Platform request failed");
        Err(map_status_error(SERVICE, status, &body, not_found))
    }

    async fn fetch<T, F>(&self, request: RequestBuilder, not_found: F) -> RepoResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> DomainError,
    {
        self.execute(request, not_found)
            .await?
            .json::<T>()
            .await
            .map_err(map_transport_error)
    }
}

#[async_trait]
impl ChatPlatform for DiscordClient {
    #[instrument(skip(self))]
    async fn current_user_id(&self) -> RepoResult<Snowflake> {
        let cached = *self.current_user.lock();
        if let Some(id) = cached {
            return Ok(id);
        }

        let request = self.http.get(self.url("/users/@me"));
        let user: UserModel = self
            .fetch(request, || {
                DomainError::InternalError("current user not found".to_string())
            })
            .await?;

        *self.current_user.lock() = Some(user.id);
        Ok(user.id)
    }

    #[instrument(skip(self))]
    async fn list_roles(&self, guild_id: Snowflake) -> RepoResult<Vec<Role>> {
        let request = self.http.get(self.url(&format!("/guilds/{guild_id}/roles")));
        let roles: Vec<RoleModel> = self
            .fetch(request, || DomainError::GuildNotFound(guild_id))
            .await?;

        Ok(roles.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_members(
        &self,
        guild_id: Snowflake,
        after: Option<Snowflake>,
        limit: u16,
    ) -> RepoResult<Vec<GuildMember>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let request = self
            .http
            .get(self.url(&format!("/guilds/{guild_id}/members")))
            .query(&query);
        let members: Vec<MemberModel> = self
            .fetch(request, || DomainError::GuildNotFound(guild_id))
            .await?;

        members_from_models(members)
    }

    #[instrument(skip(self))]
    async fn search_members(
        &self,
        guild_id: Snowflake,
        query: &str,
        limit: u16,
    ) -> RepoResult<Vec<GuildMember>> {
        let request = self
            .http
            .get(self.url(&format!("/guilds/{guild_id}/members/search")))
            .query(&[("query", query.to_string()), ("limit", limit.to_string())]);
        let members: Vec<MemberModel> = self
            .fetch(request, || DomainError::GuildNotFound(guild_id))
            .await?;

        members_from_models(members)
    }

    #[instrument(skip(self))]
    async fn get_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GuildMember>> {
        let request = self
            .http
            .get(self.url(&format!("/guilds/{guild_id}/members/{user_id}")));

        match self
            .fetch::<MemberModel, _>(request, || DomainError::MemberNotFound(user_id))
            .await
        {
            Ok(model) => GuildMember::try_from(model).map(Some),
            Err(DomainError::MemberNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn replace_member_roles(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> RepoResult<GuildMember> {
        let request = self
            .http
            .patch(self.url(&format!("/guilds/{guild_id}/members/{user_id}")))
            .header(AUDIT_LOG_REASON, AUDIT_REASON)
            .json(&MemberRolesUpdate { roles: role_ids });
        let response = self
            .execute(request, || DomainError::MemberNotFound(user_id))
            .await?;

        // No body when nothing changed
        if response.status() == StatusCode::NO_CONTENT {
            return self
                .get_member(guild_id, user_id)
                .await?
                .ok_or(DomainError::MemberNotFound(user_id));
        }

        let model: MemberModel = response.json().await.map_err(map_transport_error)?;
        GuildMember::try_from(model)
    }

    #[instrument(skip(self))]
    async fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()> {
        let request = self
            .http
            .put(self.url(&format!(
                "/guilds/{guild_id}/members/{user_id}/roles/{role_id}"
            )))
            .header(AUDIT_LOG_REASON, AUDIT_REASON);

        self.execute(request, || DomainError::MemberNotFound(user_id))
            .await?;
        Ok(())
    }
}
