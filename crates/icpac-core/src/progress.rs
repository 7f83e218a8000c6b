//! Progress reporting for scraper runs.
//!
//! Run milestones are emitted as [`ScrapeEvent`]s through a
//! [`ProgressReporter`], keeping the orchestration free of output concerns.

/// Events emitted during a scraper run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent<'a> {
    /// Run starting.
    RunStarted {
        /// Scraper identifier.
        lookup: &'a str,
        /// Scraper version.
        version: &'a str,
    },

    /// Certificate verification is switched off for this run.
    SslVerificationDisabled,

    /// The adapter finished generating datasets.
    DatasetsGenerated {
        /// Number of datasets that make up the current state.
        count: usize,
    },

    /// A stale dataset and its showcases are about to be deleted.
    DeletingDataset {
        /// Title of the dataset.
        title: &'a str,
    },

    /// Run completed.
    RunCompleted {
        /// Number of datasets kept on HDX.
        kept: usize,
    },
}

/// Trait for reporting run progress.
///
/// The default implementation does nothing (silent mode).
///
/// # Example
///
/// ```
/// use icpac_core::progress::{ProgressReporter, ScrapeEvent};
///
/// struct DeletionCounter(std::sync::atomic::AtomicUsize);
///
/// impl ProgressReporter for DeletionCounter {
///     fn report(&self, event: ScrapeEvent<'_>) {
///         if let ScrapeEvent::DeletingDataset { .. } = event {
///             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         }
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ScrapeEvent<'_>) {
        let _ = event;
    }
}

/// A no-op reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// A reporter that logs events using the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ScrapeEvent<'_>) {
        use tracing::info;

        match event {
            ScrapeEvent::RunStarted { lookup, version } => {
                info!("##### {} version {} ####", lookup, version);
            }
            ScrapeEvent::SslVerificationDisabled => {
                info!("SSL certificate verification is disabled!");
            }
            ScrapeEvent::DatasetsGenerated { count } => {
                info!("Generated {} dataset(s) from GeoNode", count);
            }
            ScrapeEvent::DeletingDataset { title } => {
                info!("Deleting {} and any associated showcases", title);
            }
            ScrapeEvent::RunCompleted { kept } => {
                info!("Run complete: {} dataset(s) on HDX", kept);
            }
        }
    }
}
