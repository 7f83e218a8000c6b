//! Command line facade for the ICPAC scraper.
//!
//! The GeoNode adapter and the HDX catalog client are supplied by the
//! deployment binary, which only has to call [`main_with`]:
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     icpac_cli::main_with(GeoNodeToHdxFactory::default(), HdxCatalog::from_env()?)
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use icpac_core::config::{resolve_user_agent, resolve_verify_ssl, DownloadConfig, EntryPoint};
use icpac_core::progress::TracingReporter;
use icpac_core::traits::{AdapterFactory, Catalog};
use icpac_core::{RunOptions, RunSummary, ScraperService};

/// Synchronize ICPAC GeoNode layers to HDX.
#[derive(Parser, Debug)]
#[command(name = "hdx-scraper-icpac", version, about)]
pub struct Config {
    /// Use the legacy entry point: project configuration from
    /// config/project_configuration.yml and no write access check
    #[arg(long)]
    pub legacy: bool,

    /// Project configuration file (defaults to the entry point's location)
    #[arg(long, value_name = "PATH")]
    pub project_config: Option<PathBuf>,

    /// User agent YAML file (defaults to ~/.useragents.yaml)
    #[arg(long, value_name = "PATH")]
    pub user_agent_config: Option<PathBuf>,

    /// Whether to verify TLS certificates; overrides VERIFYSSL
    #[arg(long, value_name = "VALUE")]
    pub verify_ssl: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

impl Config {
    pub fn entry_point(&self) -> EntryPoint {
        if self.legacy {
            EntryPoint::Legacy
        } else {
            EntryPoint::Current
        }
    }

    /// Resolves the run options from the flags and the process environment.
    pub fn run_options(&self) -> anyhow::Result<RunOptions> {
        let verify_ssl_env = std::env::var("VERIFYSSL").ok();
        let user_agent_env = std::env::var("USER_AGENT").ok();
        let preprefix_env = std::env::var("PREPREFIX").ok();
        let home = std::env::var_os("HOME").map(PathBuf::from);

        self.resolve_run_options(
            verify_ssl_env.as_deref(),
            user_agent_env.as_deref(),
            preprefix_env.as_deref(),
            home.as_deref(),
        )
    }

    fn resolve_run_options(
        &self,
        verify_ssl_env: Option<&str>,
        user_agent_env: Option<&str>,
        preprefix_env: Option<&str>,
        home: Option<&Path>,
    ) -> anyhow::Result<RunOptions> {
        let entry_point = self.entry_point();

        let user_agent_file = self
            .user_agent_config
            .clone()
            .or_else(|| home.map(|h| entry_point.user_agent_file(h)));
        let user_agent = resolve_user_agent(
            user_agent_env,
            preprefix_env,
            user_agent_file.as_deref(),
        )
        .context("Failed to resolve user agent")?;

        let download = DownloadConfig {
            verify_ssl: resolve_verify_ssl(self.verify_ssl.as_deref(), verify_ssl_env),
            user_agent,
            ..DownloadConfig::default()
        };

        let mut options = RunOptions::new(entry_point).with_download(download);
        if let Some(path) = &self.project_config {
            options = options.with_project_config(path);
        }
        Ok(options)
    }
}

pub fn init_tracing(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(())
}

/// Runs the scraper once with the given flags.
pub async fn facade<F, C>(config: &Config, factory: F, catalog: C) -> anyhow::Result<RunSummary>
where
    F: AdapterFactory,
    C: Catalog,
{
    let options = config.run_options()?;
    let service = ScraperService::new(factory, catalog);

    let summary = service
        .run_with_progress(&options, &TracingReporter)
        .await
        .context("ICPAC scraper run failed")?;

    info!("Source GeoNode:  {}", summary.base_url);
    info!("Datasets on HDX: {}", summary.current.len());
    Ok(summary)
}

/// Process entry: loads `.env`, parses the command line, sets up logging
/// and runs the scraper to completion.
///
/// Any error is returned to the caller, whose `main` turns it into a
/// non-zero exit status.
pub fn main_with<F, C>(factory: F, catalog: C) -> anyhow::Result<()>
where
    F: AdapterFactory,
    C: Catalog,
{
    dotenv().ok();

    let config = Config::parse();
    init_tracing(config.log_level)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(facade(&config, factory, catalog))?;
    Ok(())
}
