use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Tag mapping in the order the provider returned it.
pub type Tags = IndexMap<String, String>;

#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Lists every resource of `kind`. Never mutates provider state.
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>>;

    async fn delete(&self, resource: &Resource, api_version: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: ResourceKind,
    pub resource_type: String,
    pub tags: Option<Tags>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Disk,
    Generic,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Disk => "disk",
            ResourceKind::Generic => "resource",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
