use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

mod api;
mod client;

pub use api::*;
pub use client::GithubClientImpl;

/// The subset of the GitHub packages API needed to clean up container versions of a user.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GithubClient: Send + Sync {
    /// Fetch all versions of a container package. Versions of other package types are dropped.
    async fn list_package_versions(
        &self,
        user: &str,
        package_name: &str,
    ) -> Result<Vec<PackageVersion>>;

    /// Permanently delete a single package version.
    async fn delete_package_version(
        &self,
        user: &str,
        package_name: &str,
        version_id: u64,
    ) -> Result<()>;
}
