//! ICPAC Core - Domain types, catalog policy and run orchestration for the
//! ICPAC GeoNode to HDX scraper.

pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod naming;
pub mod policy;
pub mod progress;
pub mod scraper;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::{DownloadConfig, EntryPoint, ProjectConfig, RunOptions, StaticDatasetConfig};
pub use error::AppError;
pub use models::{CreateOptions, Dataset, Metadata, Showcase};
pub use naming::process_dataset_name;
pub use scraper::{RunSummary, ScraperService};
