//! Role name cache
//!
//! One snapshot of the guild's role list, indexed by display name and by id.
//! Never refreshed while the process runs.

use std::collections::HashMap;

use rolesync_core::{Role, Snowflake};

#[derive(Debug, Clone, Default)]
pub struct RoleNameCache {
    by_name: HashMap<String, Role>,
    by_id: HashMap<Snowflake, Role>,
}

impl RoleNameCache {
    /// Build the cache from a role listing.
    ///
    /// When two roles share a name the higher-positioned one wins.
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: Vec<Role> = roles.into_iter().collect();
        roles.sort_by_key(|role| role.position);

        let mut cache = Self::default();
        for role in roles {
            cache.by_name.insert(role.name.clone(), role.clone());
            cache.by_id.insert(role.id, role);
        }
        cache
    }

    /// Find a role by exact display name
    pub fn lookup(&self, name: &str) -> Option<&Role> {
        self.by_name.get(name)
    }

    pub fn get(&self, id: Snowflake) -> Option<&Role> {
        self.by_id.get(&id)
    }

    /// Position of a role, if it was part of the snapshot
    pub fn position_of(&self, id: Snowflake) -> Option<i32> {
        self.by_id.get(&id).map(|role| role.position)
    }

    /// Display name for log lines, falling back to the id
    pub fn name_of(&self, id: Snowflake) -> String {
        self.by_id
            .get(&id)
            .map_or_else(|| id.to_string(), |role| role.name.clone())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
