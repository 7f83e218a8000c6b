//! Scraper service: one run of the ICPAC GeoNode to HDX synchronization.
//!
//! # Architecture
//!
//! The [`ScraperService`] is generic over two traits:
//! - [`AdapterFactory`] - builds the GeoNode-to-HDX adapter for the run
//! - [`Catalog`] - the HDX catalog the policy writes to
//!
//! A run always performs the same two adapter calls, in order: generate and
//! create every dataset, then delete the datasets that were not generated.
//! The second call never happens if the first one failed.

use std::collections::BTreeSet;

use crate::config::{ProjectConfig, RunOptions, StaticDatasetConfig, LOOKUP, VERSION};
use crate::download::Download;
use crate::policy::IcpacPolicy;
use crate::progress::{ProgressReporter, ScrapeEvent, SilentReporter};
use crate::traits::{AdapterFactory, Catalog, GeoNodeAdapter};
use crate::{AppError, Metadata};

/// GeoNode layer counts are not used to name or filter datasets.
const USE_COUNT: bool = false;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// GeoNode the datasets were generated from.
    pub base_url: String,
    /// Names of the datasets that make up the current state on HDX.
    pub current: BTreeSet<String>,
}

/// Service running the ICPAC scraper.
///
/// # Type Parameters
///
/// * `F` - Factory for the GeoNode adapter
/// * `C` - HDX catalog implementation
///
/// # Example
///
/// ```ignore
/// use icpac_core::config::{EntryPoint, RunOptions};
/// use icpac_core::scraper::ScraperService;
///
/// let service = ScraperService::new(geonode_factory, hdx_catalog);
/// let summary = service.run(&RunOptions::new(EntryPoint::Current)).await?;
/// println!("{} datasets on HDX", summary.current.len());
/// ```
pub struct ScraperService<F, C>
where
    F: AdapterFactory,
    C: Catalog,
{
    factory: F,
    catalog: C,
}

impl<F, C> ScraperService<F, C>
where
    F: AdapterFactory,
    C: Catalog,
{
    pub fn new(factory: F, catalog: C) -> Self {
        Self { factory, catalog }
    }

    /// Runs the scraper once.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project configuration cannot be loaded
    /// - The HDX user cannot write to the ICPAC organisation
    /// - The download session cannot be opened
    /// - Any adapter or catalog call fails
    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary, AppError> {
        self.run_with_progress(options, &SilentReporter).await
    }

    /// Same as [`run`](Self::run), but emits progress events through the
    /// provided reporter.
    pub async fn run_with_progress<R: ProgressReporter>(
        &self,
        options: &RunOptions,
        reporter: &R,
    ) -> Result<RunSummary, AppError> {
        reporter.report(ScrapeEvent::RunStarted {
            lookup: LOOKUP,
            version: VERSION,
        });

        let project = ProjectConfig::load(&options.project_config)?;
        let static_config = StaticDatasetConfig::packaged()?;
        let metadata = Metadata::icpac();

        if options.entry_point.checks_write_access() {
            self.catalog.check_write_access(&metadata.orgid).await?;
        }

        if !options.download.verify_ssl {
            reporter.report(ScrapeEvent::SslVerificationDisabled);
        }

        // Lives until the end of the run; dropped on every return path.
        let downloader = Download::new(options.download.clone())?;
        let adapter = self.factory.create(&project.base_url, &downloader)?;
        let policy = IcpacPolicy::new(&self.catalog, &static_config, reporter);

        let current = adapter
            .generate_datasets_and_showcases(&metadata, &policy, USE_COUNT)
            .await?;
        reporter.report(ScrapeEvent::DatasetsGenerated {
            count: current.len(),
        });

        adapter
            .delete_other_datasets(&current, &metadata, &policy)
            .await?;
        reporter.report(ScrapeEvent::RunCompleted {
            kept: current.len(),
        });

        Ok(RunSummary {
            base_url: project.base_url,
            current,
        })
    }
}
