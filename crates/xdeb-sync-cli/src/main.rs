mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xdeb_sync::{Feedback, FeedbackSink, PackageListManifest};
use xdeb_sync_http::{build_client, load_manifest};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "xdeb-sync")]
#[command(about = "Mirror APT and custom package lists into a local tree")]
struct Cli {
    /// Architecture whose providers manifest is used
    #[arg(long, global = true)]
    arch: Option<String>,
    /// Root directory of the synced tree
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync package lists from remote providers into the local tree
    Sync {
        /// Providers to sync (all when omitted)
        providers: Vec<String>,
    },
    /// List the providers available in the manifest
    Providers,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(arch) = &self.arch {
            config.architecture = arch.clone();
        }
        if let Some(root) = &self.root {
            config.root = Some(root.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
    }
}

async fn fetch_manifest(
    client: &reqwest::Client,
    config: &AppConfig,
    root: &std::path::Path,
    feedback: &dyn FeedbackSink,
) -> Result<PackageListManifest> {
    let manifest = load_manifest(client, root, &config.manifest_url(), feedback)
        .await
        .context("failed to sync providers manifest")?;
    Ok(manifest)
}

async fn execute(cli: Cli, feedback: Arc<dyn FeedbackSink>) -> Result<()> {
    let mut config = config::load_config(feedback.as_ref());
    cli.apply_to(&mut config);

    let root = config
        .root_dir()
        .context("could not determine a root directory; pass --root")?;
    let client = build_client(config.client_options())?;
    let manifest = fetch_manifest(&client, &config, &root, feedback.as_ref()).await?;

    match cli.command {
        Command::Sync { providers } => {
            commands::sync::run(&client, &manifest, &root, &providers, feedback).await
        }
        Command::Providers => commands::providers::run(&manifest),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let feedback = commands::sync::stderr_sink();

    match execute(cli, Arc::clone(&feedback)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            feedback.emit(Feedback::error(format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "xdeb-sync", "sync", "debian", "ubuntu", "--arch", "aarch64", "--root", "/srv/xdeb",
            "--timeout", "5",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.architecture, "aarch64");
        assert_eq!(config.root_dir(), Some(PathBuf::from("/srv/xdeb")));
        assert_eq!(config.timeout_secs, 5);
        match cli.command {
            Command::Sync { providers } => assert_eq!(providers, vec!["debian", "ubuntu"]),
            Command::Providers => panic!("expected sync"),
        }
    }

    #[test]
    fn sync_without_providers_selects_all() {
        let cli = Cli::try_parse_from(["xdeb-sync", "sync"]).unwrap();
        assert!(matches!(cli.command, Command::Sync { ref providers } if providers.is_empty()));
    }

    #[test]
    fn missing_flags_keep_config() {
        let cli = Cli::try_parse_from(["xdeb-sync", "providers"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
