use anyhow::{Context, Result};

use crate::github::{GithubClient, PackageVersion};

/// Everything a garbage collection run needs besides the client.
#[derive(Debug, Clone)]
pub struct GcConfig {
    pub user: String,
    pub package_name: String,
    /// Tag of the image built for the pull request (image tag + PR suffix).
    pub pr_container_tag: String,
    /// Also delete the versions tagged with `pr_container_tag`.
    pub delete_pr_container: bool,
    pub dry_run: bool,
}

pub fn untagged(versions: &[PackageVersion]) -> Vec<&PackageVersion> {
    versions.iter().filter(|v| v.tags().is_empty()).collect()
}

pub fn tagged_with<'a>(versions: &'a [PackageVersion], tag: &str) -> Vec<&'a PackageVersion> {
    versions
        .iter()
        .filter(|v| v.tags().iter().any(|t| t == tag))
        .collect()
}

pub async fn collect_garbage(client: &impl GithubClient, config: &GcConfig) -> Result<()> {
    let versions = client
        .list_package_versions(&config.user, &config.package_name)
        .await
        .context(format!(
            "Failed to get versions of {}/{}",
            config.user, config.package_name,
        ))?;
    let untagged_versions = untagged(&versions);

    for line in summary(config, untagged_versions.len(), versions.len()) {
        log::info!("{}", line);
    }

    delete_versions(client, config, "untagged", &untagged_versions).await?;

    if !config.delete_pr_container {
        return Ok(());
    }

    log::info!(
        "PR is closed, trying to delete container with tag '{}'",
        config.pr_container_tag,
    );
    let pr_versions = tagged_with(&versions, &config.pr_container_tag);
    if !pr_versions.is_empty() {
        log::info!("Container with tag '{}' found!", config.pr_container_tag);
        delete_versions(client, config, "pr", &pr_versions).await?;
    }

    Ok(())
}

/// Log every container version of the package without touching any of them.
pub async fn list_versions(client: &impl GithubClient, config: &GcConfig) -> Result<()> {
    let versions = client
        .list_package_versions(&config.user, &config.package_name)
        .await
        .context(format!(
            "Failed to get versions of {}/{}",
            config.user, config.package_name,
        ))?;

    log::info!(
        "{} versions of {}/{}",
        versions.len(),
        config.user,
        config.package_name,
    );
    for version in &versions {
        log::info!("{}", describe(version));
    }

    Ok(())
}

fn summary(config: &GcConfig, untagged_count: usize, total_count: usize) -> Vec<String> {
    vec![
        "Running container GC".to_string(),
        format!("PR container tag: {}", config.pr_container_tag),
        format!("Delete pr container: {}", config.delete_pr_container),
        format!("Total number of untagged containers: {}", untagged_count),
        format!("Total number of containers: {}", total_count),
        // Separates the banner from the deletions.
        String::new(),
    ]
}

fn describe(version: &PackageVersion) -> String {
    let tags = match version.tags() {
        [] => "<untagged>".to_string(),
        tags => tags.join(", "),
    };
    format!("{} (id: {}) tags: {}", version.name, version.id, tags)
}

async fn delete_versions(
    client: &impl GithubClient,
    config: &GcConfig,
    kind: &str,
    versions: &[&PackageVersion],
) -> Result<()> {
    let dry_run_suffix = match config.dry_run {
        true => " (DRY RUN)",
        false => "",
    };

    for version in versions {
        log::info!(
            "Deleting {} container {} (id: {}){}",
            kind,
            version.name,
            version.id,
            dry_run_suffix,
        );

        if config.dry_run {
            continue;
        }

        client
            .delete_package_version(&config.user, &config.package_name, version.id)
            .await
            .context(format!(
                "Failed to delete {}/{}:{}",
                config.user, config.package_name, version.name,
            ))?;
    }

    Ok(())
}
