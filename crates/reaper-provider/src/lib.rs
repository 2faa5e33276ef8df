mod azure;
mod error;
mod provider;

pub use azure::{AuthFile, AzureProvider};
pub use error::{Error, Result};
pub use provider::{InventoryProvider, Resource, ResourceKind, Tags};
