//! Reconciliation services
//!
//! Leaf components first: role and team-name caches, the record resolver and
//! member matcher, then the reconciler and the two entry points built on it
//! (full sweep and webhook).

pub mod context;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod reconciler;
pub mod resolver;
pub mod role_cache;
pub mod sweep;
pub mod team_name;
pub mod throttle;
pub mod webhook;

pub use context::{ServiceContext, SyncSettings};
pub use engine::SyncEngine;
pub use error::{ServiceError, ServiceResult};
pub use matcher::{normalize_handle, MemberMatcher, MemberRoster};
pub use reconciler::Reconciler;
pub use resolver::{strip_team_suffix, RecordResolver, TargetRoleSet};
pub use role_cache::RoleNameCache;
pub use sweep::SweepDriver;
pub use team_name::TeamNameResolver;
pub use throttle::Throttle;
pub use webhook::WebhookAdapter;
