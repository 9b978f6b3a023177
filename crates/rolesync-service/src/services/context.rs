//! Service context - dependency container for the engine
//!
//! Holds both collaborator ports, the pacing throttle, and the settings the
//! reconciliation rules read.

use std::sync::Arc;

use regex::Regex;
use rolesync_common::AppConfig;
use rolesync_core::{ChatPlatform, MembershipDatabase, RecordSchema, Snowflake};

use super::error::{ServiceError, ServiceResult};
use super::throttle::Throttle;

/// Settings consumed by the reconciliation rules
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub guild_id: Snowflake,
    pub members_database_id: String,
    pub schema: RecordSchema,
    pub inactive_role_id: Snowflake,
    pub technical_lead_role_id: Snowflake,
    pub technical_lead_pattern: Regex,
    pub database_page_size: u32,
    pub member_page_size: u16,
}

impl SyncSettings {
    /// Build settings with defaults for everything but the identifiers
    pub fn new(
        guild_id: Snowflake,
        members_database_id: impl Into<String>,
        inactive_role_id: Snowflake,
        technical_lead_role_id: Snowflake,
        technical_lead_pattern: &str,
    ) -> ServiceResult<Self> {
        Ok(Self {
            guild_id,
            members_database_id: members_database_id.into(),
            schema: RecordSchema::default(),
            inactive_role_id,
            technical_lead_role_id,
            technical_lead_pattern: compile_pattern(technical_lead_pattern)?,
            database_page_size: 100,
            member_page_size: 1000,
        })
    }

    /// Derive settings from the loaded application configuration
    pub fn from_config(config: &AppConfig) -> ServiceResult<Self> {
        Ok(Self {
            guild_id: config.discord.guild_id,
            members_database_id: config.notion.members_database_id.clone(),
            schema: config.properties.clone(),
            inactive_role_id: config.roles.inactive_role_id,
            technical_lead_role_id: config.roles.technical_lead_role_id,
            technical_lead_pattern: compile_pattern(&config.roles.technical_lead_pattern)?,
            database_page_size: config.sync.database_page_size,
            member_page_size: config.sync.member_page_size,
        })
    }

    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_page_sizes(mut self, database_page_size: u32, member_page_size: u16) -> Self {
        self.database_page_size = database_page_size;
        self.member_page_size = member_page_size;
        self
    }
}

fn compile_pattern(pattern: &str) -> ServiceResult<Regex> {
    Regex::new(pattern).map_err(|e| ServiceError::InvalidPattern(e.to_string()))
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    database: Arc<dyn MembershipDatabase>,
    platform: Arc<dyn ChatPlatform>,
    throttle: Throttle,
    settings: Arc<SyncSettings>,
}

impl ServiceContext {
    pub fn new(
        database: Arc<dyn MembershipDatabase>,
        platform: Arc<dyn ChatPlatform>,
        throttle: Throttle,
        settings: SyncSettings,
    ) -> Self {
        Self {
            database,
            platform,
            throttle,
            settings: Arc::new(settings),
        }
    }

    /// Get the membership database port
    pub fn database(&self) -> &dyn MembershipDatabase {
        self.database.as_ref()
    }

    /// Get the chat platform port
    pub fn platform(&self) -> &dyn ChatPlatform {
        self.platform.as_ref()
    }

    pub fn throttle(&self) -> Throttle {
        self.throttle
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Shorthand for the configured guild
    pub fn guild_id(&self) -> Snowflake {
        self.settings.guild_id
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("database", &"dyn MembershipDatabase")
            .field("platform", &"dyn ChatPlatform")
            .field("throttle", &self.throttle)
            .field("settings", &self.settings)
            .finish()
    }
}
