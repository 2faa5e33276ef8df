use crate::provider::{InventoryProvider, Resource, ResourceKind, Tags};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reaper_config::constants;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Service principal credentials in the Azure SDK auth file format
/// (`az ad sp create-for-rbac --sdk-auth`).
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFile {
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
    pub tenant_id: String,

    #[serde(default = "default_active_directory_endpoint")]
    pub active_directory_endpoint_url: String,

    #[serde(default = "default_resource_manager_endpoint")]
    pub resource_manager_endpoint_url: String,
}

fn default_active_directory_endpoint() -> String {
    constants::DEFAULT_ACTIVE_DIRECTORY_ENDPOINT.to_string()
}

fn default_resource_manager_endpoint() -> String {
    constants::DEFAULT_RESOURCE_MANAGER_ENDPOINT.to_string()
}

impl AuthFile {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content).map_err(|source| Error::AuthFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub struct AzureProvider {
    client: reqwest::Client,
    access_token: String,
    subscription_id: String,
    management_endpoint: String,
}

impl AzureProvider {
    pub async fn from_auth_file(path: &Path) -> Result<Self> {
        let auth = AuthFile::load(path).await?;
        Self::new(auth).await
    }

    pub async fn new(auth: AuthFile) -> Result<Self> {
        let client = reqwest::Client::new();
        let access_token = acquire_token(&client, &auth).await?;

        info!(
            "Authenticated against Azure subscription {}",
            auth.subscription_id
        );

        Ok(Self {
            client,
            access_token,
            subscription_id: auth.subscription_id,
            management_endpoint: auth
                .resource_manager_endpoint_url
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn list_url(&self, kind: ResourceKind) -> String {
        let (path, api_version) = match kind {
            ResourceKind::Image => (
                "providers/Microsoft.Compute/images",
                constants::COMPUTE_API_VERSION,
            ),
            ResourceKind::Disk => (
                "providers/Microsoft.Compute/disks",
                constants::COMPUTE_API_VERSION,
            ),
            ResourceKind::Generic => ("resources", constants::RESOURCE_API_VERSION),
        };

        format!(
            "{}/subscriptions/{}/{}?api-version={}",
            self.management_endpoint, self.subscription_id, path, api_version
        )
    }
}

#[async_trait]
impl InventoryProvider for AzureProvider {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        let mut next = Some(self.list_url(kind));

        while let Some(url) = next.take() {
            debug!("Fetching {} page {}", kind, url);

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .send()
                .await?;
            let page: Page = error_for_status(response).await?.json().await?;

            resources.extend(page.value.into_iter().map(|r| r.into_resource(kind)));
            next = page.next_link;
        }

        Ok(resources)
    }

    async fn delete(&self, resource: &Resource, api_version: &str) -> Result<()> {
        let url = format!(
            "{}{}?api-version={}",
            self.management_endpoint, resource.id, api_version
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        error_for_status(response).await?;

        Ok(())
    }
}

async fn acquire_token(client: &reqwest::Client, auth: &AuthFile) -> Result<String> {
    let url = format!(
        "{}/{}/oauth2/token",
        auth.active_directory_endpoint_url.trim_end_matches('/'),
        auth.tenant_id
    );

    let response = client
        .post(&url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", auth.client_id.as_str()),
            ("client_secret", auth.client_secret.as_str()),
            ("resource", auth.resource_manager_endpoint_url.as_str()),
        ])
        .send()
        .await?;

    let token: TokenResponse = error_for_status(response).await?.json().await?;
    Ok(token.access_token)
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();

    Err(Error::Api {
        status: status.as_u16(),
        url,
        body,
    })
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    #[serde(default)]
    value: Vec<ArmResource>,
    next_link: Option<String>,
}

#[derive(Deserialize)]
struct ArmResource {
    id: String,
    name: String,
    #[serde(rename = "type", default)]
    resource_type: String,
    #[serde(default)]
    tags: Option<Tags>,
    #[serde(default)]
    properties: Option<ArmProperties>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArmProperties {
    time_created: Option<DateTime<Utc>>,
}

impl ArmResource {
    fn into_resource(self, kind: ResourceKind) -> Resource {
        Resource {
            id: self.id,
            name: self.name,
            kind,
            resource_type: self.resource_type,
            tags: self.tags,
            created_at: self.properties.and_then(|p| p.time_created),
        }
    }
}
