use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use reqwest::{
    header::{HeaderMap, HeaderName, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client, ClientBuilder, StatusCode,
};

use super::{GithubClient, PackageVersion};

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_API_VERSION: &str = "2022-11-28";

pub struct GithubClientImpl {
    client: Client,
    base_url: String,
}

impl GithubClientImpl {
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    pub fn with_base_url(token: impl AsRef<str>, base_url: impl Into<String>) -> Result<Self> {
        let client = ClientBuilder::new()
            .default_headers(default_headers(token.as_ref())?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GithubClient for GithubClientImpl {
    async fn list_package_versions(
        &self,
        user: &str,
        package_name: &str,
    ) -> Result<Vec<PackageVersion>> {
        let url = versions_url(&self.base_url, user, package_name);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request")?;
        expect_status(response.status(), StatusCode::OK, "Can't load versions")?;

        let versions: Vec<PackageVersion> = response
            .json()
            .await
            .context("Failed to parse reply as json")?;

        Ok(versions
            .into_iter()
            .filter(PackageVersion::is_container)
            .collect())
    }

    async fn delete_package_version(
        &self,
        user: &str,
        package_name: &str,
        version_id: u64,
    ) -> Result<()> {
        let url = version_url(&self.base_url, user, package_name, version_id);
        log::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to send request")?;
        expect_status(
            response.status(),
            StatusCode::NO_CONTENT,
            &format!("Can't delete version {}", version_id),
        )
    }
}

fn versions_url(base_url: &str, user: &str, package_name: &str) -> String {
    // The package name contains a slash and has to fit into a single path segment.
    format!(
        "{base_url}/users/{user}/packages/container/{package}/versions",
        package = urlencoding::encode(package_name),
    )
}

fn version_url(base_url: &str, user: &str, package_name: &str, version_id: u64) -> String {
    format!("{}/{}", versions_url(base_url, user, package_name), version_id)
}

fn default_headers(token: &str) -> Result<HeaderMap> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    log::debug!("{}: {}", USER_AGENT.as_str(), user_agent);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, "application/vnd.github+json".try_into()?);
    headers.insert(AUTHORIZATION, format!("Bearer {}", token).try_into()?);
    headers.insert(
        HeaderName::from_static("x-github-api-version"),
        GITHUB_API_VERSION.try_into()?,
    );
    headers.insert(USER_AGENT, user_agent.try_into()?);
    Ok(headers)
}

fn expect_status(actual: StatusCode, expected: StatusCode, action: &str) -> Result<()> {
    if actual != expected {
        return Err(anyhow!(
            "{}. Expected {}, got {}",
            action,
            expected.as_u16(),
            actual.as_u16(),
        ));
    }

    Ok(())
}
