//! How ICPAC datasets are published to and removed from HDX.

use crate::config::StaticDatasetConfig;
use crate::naming::process_dataset_name;
use crate::progress::{ProgressReporter, ScrapeEvent};
use crate::traits::{Catalog, ScraperPolicy};
use crate::{AppError, CreateOptions, Dataset, Showcase};

/// Creates a dataset and its showcase on HDX.
///
/// The static dataset fields are filled in, the dataset is saved with its
/// resource list replacing whatever HDX held before (without HXL
/// re-processing), then the showcase is saved and linked to it.
///
/// # Errors
///
/// The first failing catalog call is returned and the remaining steps are
/// skipped.
pub async fn create_dataset_showcase<C: Catalog>(
    catalog: &C,
    static_config: &StaticDatasetConfig,
    mut dataset: Dataset,
    showcase: Showcase,
    mut options: CreateOptions,
) -> Result<(), AppError> {
    dataset.update_from_static(static_config);

    options.remove_additional_resources = true;
    options.hxl_update = false;
    catalog.create_dataset(&dataset, &options).await?;

    catalog.create_showcase(&showcase).await?;
    catalog.add_showcase_dataset(&showcase, &dataset).await?;
    Ok(())
}

/// Deletes a stale dataset together with its showcases.
///
/// Datasets under the `igad-` prefix belong to the upstream ingestion and
/// are left alone without reporting anything. Otherwise showcases go first,
/// since HDX will not delete a dataset that showcases still point at.
///
/// # Errors
///
/// Failures are returned as-is. Showcases already deleted stay deleted.
pub async fn delete_from_hdx<C: Catalog, R: ProgressReporter>(
    catalog: &C,
    reporter: &R,
    dataset: &Dataset,
) -> Result<(), AppError> {
    if dataset.is_protected() {
        return Ok(());
    }

    reporter.report(ScrapeEvent::DeletingDataset {
        title: &dataset.title,
    });
    for showcase in catalog.dataset_showcases(dataset).await? {
        catalog.delete_showcase(&showcase).await?;
    }
    catalog.delete_dataset(dataset).await
}

/// The [`ScraperPolicy`] used for ICPAC.
pub struct IcpacPolicy<'a, C, R> {
    catalog: &'a C,
    static_config: &'a StaticDatasetConfig,
    reporter: &'a R,
}

impl<'a, C, R> IcpacPolicy<'a, C, R>
where
    C: Catalog,
    R: ProgressReporter,
{
    pub fn new(catalog: &'a C, static_config: &'a StaticDatasetConfig, reporter: &'a R) -> Self {
        Self {
            catalog,
            static_config,
            reporter,
        }
    }
}

impl<C, R> ScraperPolicy for IcpacPolicy<'_, C, R>
where
    C: Catalog,
    R: ProgressReporter,
{
    fn process_dataset_name(&self, name: &str) -> String {
        process_dataset_name(name)
    }

    async fn create_dataset_showcase(
        &self,
        dataset: Dataset,
        showcase: Showcase,
        options: CreateOptions,
    ) -> Result<(), AppError> {
        create_dataset_showcase(self.catalog, self.static_config, dataset, showcase, options).await
    }

    async fn delete_from_hdx(&self, dataset: &Dataset) -> Result<(), AppError> {
        delete_from_hdx(self.catalog, self.reporter, dataset).await
    }
}
