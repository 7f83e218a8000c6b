//! Trait definitions for external collaborators.
//!
//! The GeoNode-to-HDX adapter and the HDX catalog client live outside this
//! workspace. These traits describe the slice of them the scraper uses,
//! enabling:
//!
//! - **Testability**: In-memory fakes for unit tests
//! - **Decoupling**: The deletion and creation policy does not depend on a
//!   particular HDX client
//!
//! # Example
//!
//! ```
//! use icpac_core::traits::Catalog;
//! use icpac_core::{AppError, CreateOptions, Dataset};
//!
//! async fn republish<C: Catalog>(catalog: &C, dataset: &Dataset) -> Result<(), AppError> {
//!     catalog.create_dataset(dataset, &CreateOptions::default()).await
//! }
//! ```

use std::collections::BTreeSet;
use std::future::Future;

use crate::download::Download;
use crate::{AppError, CreateOptions, Dataset, Metadata, Showcase};

/// The HDX catalog.
pub trait Catalog: Send + Sync {
    /// Fails unless the configured HDX user may write to the organisation.
    fn check_write_access(&self, org_id: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Creates the dataset, or updates it if a dataset with the same name
    /// already exists.
    fn create_dataset(
        &self,
        dataset: &Dataset,
        options: &CreateOptions,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Creates or updates a showcase.
    fn create_showcase(&self, showcase: &Showcase) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Links a showcase to a dataset.
    fn add_showcase_dataset(
        &self,
        showcase: &Showcase,
        dataset: &Dataset,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Lists the showcases linked to a dataset.
    fn dataset_showcases(
        &self,
        dataset: &Dataset,
    ) -> impl Future<Output = Result<Vec<Showcase>, AppError>> + Send;

    fn delete_showcase(&self, showcase: &Showcase) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Deletes a dataset. HDX refuses while showcases still reference it.
    fn delete_dataset(&self, dataset: &Dataset) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Scraper-specific decisions the adapter defers to.
pub trait ScraperPolicy: Send + Sync {
    /// Maps a generated dataset name to its HDX name.
    fn process_dataset_name(&self, name: &str) -> String;

    /// Publishes a freshly generated dataset and its showcase.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The generated, not yet saved dataset
    /// * `showcase` - The showcase generated for it
    /// * `options` - Creation options chosen by the adapter, passed through
    fn create_dataset_showcase(
        &self,
        dataset: Dataset,
        showcase: Showcase,
        options: CreateOptions,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Called for each dataset on HDX that the latest generation no longer
    /// produces.
    fn delete_from_hdx(&self, dataset: &Dataset) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// The GeoNode-to-HDX adapter.
pub trait GeoNodeAdapter: Send + Sync {
    /// Reads every layer from GeoNode, turns each into a dataset and
    /// showcase carrying `metadata`, and hands them to the policy.
    ///
    /// # Returns
    ///
    /// The names of the datasets that now make up the current state.
    fn generate_datasets_and_showcases<P: ScraperPolicy>(
        &self,
        metadata: &Metadata,
        policy: &P,
        use_count: bool,
    ) -> impl Future<Output = Result<BTreeSet<String>, AppError>> + Send;

    /// Calls [`ScraperPolicy::delete_from_hdx`] for every dataset owned by
    /// `metadata.orgid` and updated by `metadata.updated_by_script` whose
    /// name is not in `current`.
    fn delete_other_datasets<P: ScraperPolicy>(
        &self,
        current: &BTreeSet<String>,
        metadata: &Metadata,
        policy: &P,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Factory for GeoNode adapters.
///
/// Separate from GeoNodeAdapter so that construction can borrow the
/// download session of the run.
pub trait AdapterFactory: Send + Sync {
    type Adapter: GeoNodeAdapter;

    /// Creates an adapter for the GeoNode at `base_url`.
    fn create(&self, base_url: &str, downloader: &Download) -> Result<Self::Adapter, AppError>;
}
