//! Team name resolver
//!
//! Team relations only carry page ids. The display name lives in the team
//! page's title property, whose schema id is discovered from the first full
//! page fetch and then reused for the cheaper property-item endpoint.

use parking_lot::Mutex;
use rolesync_core::{DomainError, MembershipDatabase, PageId, PropertyItem};
use tracing::{debug, instrument};

use super::error::ServiceResult;

#[derive(Debug)]
pub struct TeamNameResolver {
    /// Name of the title property on team pages
    property_name: String,
    property_id: Mutex<Option<String>>,
}

impl TeamNameResolver {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            property_id: Mutex::new(None),
        }
    }

    /// Currently cached schema id of the name property
    pub fn cached_property_id(&self) -> Option<String> {
        self.property_id.lock().clone()
    }

    /// Resolve a team page to its display name
    #[instrument(skip(self, database), fields(team = %team))]
    pub async fn resolve(
        &self,
        database: &dyn MembershipDatabase,
        team: &PageId,
    ) -> ServiceResult<String> {
        if let Some(name) = self.resolve_cached(database, team).await? {
            return Ok(name);
        }

        let page = database.retrieve_page(team).await?;
        let property = page.property(&self.property_name)?;
        let name = property.as_title(&self.property_name)?;
        if name.is_empty() {
            return Err(DomainError::MalformedProperty(format!(
                "team page {team} has an empty {}",
                self.property_name
            ))
            .into());
        }

        if let Some(id) = property.id() {
            *self.property_id.lock() = Some(id.to_string());
        }

        Ok(name)
    }

    /// Fast path through the cached property id.
    ///
    /// `Ok(None)` means fall through to the full page fetch.
    async fn resolve_cached(
        &self,
        database: &dyn MembershipDatabase,
        team: &PageId,
    ) -> ServiceResult<Option<String>> {
        let Some(property_id) = self.cached_property_id() else {
            return Ok(None);
        };

        let items = match database.retrieve_property_item(team, &property_id).await {
            Ok(items) => items,
            Err(e) if e.is_not_found() => {
                debug!(property_id = %property_id, error = %e, "Cached name property missed");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut name = String::new();
        for item in &items {
            match item {
                PropertyItem::Title { title } => name.push_str(&title.plain_text),
                PropertyItem::Other => {
                    return Err(DomainError::PropertyTypeMismatch {
                        name: self.property_name.clone(),
                        expected: "title",
                        found: "other",
                    }
                    .into())
                }
            }
        }

        Ok(Some(name).filter(|name| !name.is_empty()))
    }
}
