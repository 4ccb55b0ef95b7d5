use std::{env, process};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Target;
use gc::GcConfig;
use github::GithubClientImpl;

mod gc;
mod github;

const USER: &str = "ingobecker";
const PACKAGE_NAME: &str = "reset_ctrl/reset-ctrl";

/// Delete untagged versions of the container package and, once its pull request is closed,
/// the version built for it.
#[derive(Parser)]
#[clap(version)]
struct Args {
    /// GitHub token allowed to read and delete packages
    #[clap(long, env = "CONTAINER_PAT", hide_env_values = true)]
    token: String,

    /// Base tag of the image
    #[clap(long, env = "IMAGE_TAG", required_unless_present = "list")]
    image_tag: Option<String>,

    /// Suffix appended to the image tag to form the tag of the pull request container
    #[clap(long, env = "IMAGE_TAG_PR", required_unless_present = "list")]
    image_tag_pr: Option<String>,

    /// Delete the pull request container. Only the literal value "true" enables this.
    #[clap(long, env = "DELETE_PR_CONTAINER", default_value = "false")]
    delete_pr_container: String,

    /// Only print all versions of the package, don't delete anything
    #[clap(long)]
    list: bool,

    /// Don't delete anything but only print what would be deleted
    #[clap(long, short = 'n')]
    dry_run: bool,

    /// Make logging more verbose.
    /// You can also specify the log level via the RUST_LOG env variable.
    #[clap(long, short)]
    verbose: bool,
}

impl Args {
    fn gc_config(&self) -> GcConfig {
        GcConfig {
            user: USER.to_string(),
            package_name: PACKAGE_NAME.to_string(),
            pr_container_tag: format!(
                "{}{}",
                self.image_tag.as_deref().unwrap_or_default(),
                self.image_tag_pr.as_deref().unwrap_or_default(),
            ),
            delete_pr_container: self.delete_pr_container == "true",
            dry_run: self.dry_run,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if env::var("RUST_LOG").is_err() {
        let level = match args.verbose {
            true => "debug",
            false => "info",
        };
        env::set_var("RUST_LOG", format!("{}={}", module_path!(), level));
    }
    env_logger::Builder::from_default_env()
        .target(Target::Stdout)
        .init();

    log::info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );

    if let Err(error) = run(args).await {
        log::error!("{:?}", error);
        let logged = log::log_enabled!(log::Level::Error);
        if let Some(diagnostic) = fallback_diagnostic(&error, logged) {
            eprintln!("{}", diagnostic);
        }
        process::exit(1);
    }
}

/// The abort reason has to reach the operator even when RUST_LOG filters out this crate.
fn fallback_diagnostic(error: &anyhow::Error, logged: bool) -> Option<String> {
    match logged {
        true => None,
        false => Some(format!("Error: {:?}", error)),
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.gc_config();
    log::debug!("With config {:?}", config);

    let client = GithubClientImpl::new(&args.token).context("Failed to create github client")?;

    if args.list {
        return gc::list_versions(&client, &config)
            .await
            .context("Listing container versions failed");
    }

    gc::collect_garbage(&client, &config)
        .await
        .context("Container GC failed")
}
