//! In-memory fakes of the external collaborators, for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use crate::download::Download;
use crate::progress::{ProgressReporter, ScrapeEvent};
use crate::traits::{AdapterFactory, Catalog, GeoNodeAdapter, ScraperPolicy};
use crate::{AppError, CreateOptions, Dataset, Metadata, Showcase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    CheckWriteAccess(String),
    CreateDataset(String),
    CreateShowcase(String),
    AddShowcaseDataset { showcase: String, dataset: String },
    ListShowcases(String),
    DeleteShowcase(String),
    DeleteDataset(String),
}

#[derive(Default)]
struct CatalogState {
    calls: Vec<CatalogCall>,
    datasets: BTreeMap<String, (Dataset, CreateOptions)>,
    showcases: BTreeMap<String, Vec<Showcase>>,
    failing_on: Option<&'static str>,
}

/// Catalog fake recording every call. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl RecordingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(self, dataset: Dataset, showcases: Vec<Showcase>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.showcases.insert(dataset.name.clone(), showcases);
            state
                .datasets
                .insert(dataset.name.clone(), (dataset, CreateOptions::default()));
        }
        self
    }

    /// Makes the named operation fail, e.g. `"delete_dataset"`.
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.state.lock().unwrap().failing_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.state.lock().unwrap().datasets.keys().cloned().collect()
    }

    pub fn saved(&self, name: &str) -> Option<(Dataset, CreateOptions)> {
        self.state.lock().unwrap().datasets.get(name).cloned()
    }

    pub fn showcase_names(&self, dataset: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .showcases
            .get(dataset)
            .map(|s| s.iter().map(|s| s.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Datasets HDX would return for an organisation query.
    pub fn datasets_owned_by(&self, org_id: &str) -> Vec<Dataset> {
        self.state
            .lock()
            .unwrap()
            .datasets
            .values()
            .map(|(d, _)| d.clone())
            .filter(|d| d.get("owner_org").and_then(|v| v.as_str()) == Some(org_id))
            .collect()
    }

    fn record(&self, call: CatalogCall, operation: &str) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing_on == Some(operation) {
            return Err(AppError::CatalogError(format!("{operation} failed")));
        }
        Ok(())
    }
}

impl Catalog for RecordingCatalog {
    async fn check_write_access(&self, org_id: &str) -> Result<(), AppError> {
        self.record(
            CatalogCall::CheckWriteAccess(org_id.to_string()),
            "check_write_access",
        )
    }

    async fn create_dataset(&self, dataset: &Dataset, options: &CreateOptions) -> Result<(), AppError> {
        self.record(
            CatalogCall::CreateDataset(dataset.name.clone()),
            "create_dataset",
        )?;
        self.state
            .lock()
            .unwrap()
            .datasets
            .insert(dataset.name.clone(), (dataset.clone(), options.clone()));
        Ok(())
    }

    async fn create_showcase(&self, showcase: &Showcase) -> Result<(), AppError> {
        self.record(
            CatalogCall::CreateShowcase(showcase.name.clone()),
            "create_showcase",
        )
    }

    async fn add_showcase_dataset(&self, showcase: &Showcase, dataset: &Dataset) -> Result<(), AppError> {
        self.record(
            CatalogCall::AddShowcaseDataset {
                showcase: showcase.name.clone(),
                dataset: dataset.name.clone(),
            },
            "add_showcase_dataset",
        )?;
        let mut state = self.state.lock().unwrap();
        let linked = state.showcases.entry(dataset.name.clone()).or_default();
        if !linked.iter().any(|s| s.name == showcase.name) {
            linked.push(showcase.clone());
        }
        Ok(())
    }

    async fn dataset_showcases(&self, dataset: &Dataset) -> Result<Vec<Showcase>, AppError> {
        self.record(
            CatalogCall::ListShowcases(dataset.name.clone()),
            "dataset_showcases",
        )?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .showcases
            .get(&dataset.name)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_showcase(&self, showcase: &Showcase) -> Result<(), AppError> {
        self.record(
            CatalogCall::DeleteShowcase(showcase.name.clone()),
            "delete_showcase",
        )?;
        for linked in self.state.lock().unwrap().showcases.values_mut() {
            linked.retain(|s| s.name != showcase.name);
        }
        Ok(())
    }

    async fn delete_dataset(&self, dataset: &Dataset) -> Result<(), AppError> {
        self.record(
            CatalogCall::DeleteDataset(dataset.name.clone()),
            "delete_dataset",
        )?;
        let mut state = self.state.lock().unwrap();
        if state
            .showcases
            .get(&dataset.name)
            .is_some_and(|s| !s.is_empty())
        {
            return Err(AppError::CatalogError(format!(
                "{} is still referenced by showcases",
                dataset.name
            )));
        }
        state.showcases.remove(&dataset.name);
        state.datasets.remove(&dataset.name);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    RunStarted(String),
    SslVerificationDisabled,
    DatasetsGenerated(usize),
    DeletingDataset(String),
    RunCompleted(usize),
}

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ScrapeEvent<'_>) {
        let recorded = match event {
            ScrapeEvent::RunStarted { version, .. } => RecordedEvent::RunStarted(version.to_string()),
            ScrapeEvent::SslVerificationDisabled => RecordedEvent::SslVerificationDisabled,
            ScrapeEvent::DatasetsGenerated { count } => RecordedEvent::DatasetsGenerated(count),
            ScrapeEvent::DeletingDataset { title } => {
                RecordedEvent::DeletingDataset(title.to_string())
            }
            ScrapeEvent::RunCompleted { kept } => RecordedEvent::RunCompleted(kept),
        };
        self.events.lock().unwrap().push(recorded);
    }
}

/// A GeoNode layer as the fake adapter sees it: raw name and title.
pub type Layer = (&'static str, &'static str);

/// Adapter fake turning a fixed list of layers into datasets and reading
/// the stale candidates back from a [`RecordingCatalog`].
pub struct FakeAdapter {
    layers: Vec<Layer>,
    catalog: RecordingCatalog,
    fail_generate: bool,
}

impl GeoNodeAdapter for FakeAdapter {
    async fn generate_datasets_and_showcases<P: ScraperPolicy>(
        &self,
        metadata: &Metadata,
        policy: &P,
        _use_count: bool,
    ) -> Result<BTreeSet<String>, AppError> {
        if self.fail_generate {
            return Err(AppError::AdapterError("GeoNode unreachable".to_string()));
        }

        let mut current = BTreeSet::new();
        for (raw_name, title) in &self.layers {
            let name = policy.process_dataset_name(raw_name);
            let mut dataset = Dataset::new(name.clone(), *title);
            dataset.set("maintainer", metadata.maintainerid.as_str());
            dataset.set("owner_org", metadata.orgid.as_str());
            dataset.set("updated_by_script", metadata.updated_by_script.as_str());
            let showcase = Showcase::new(format!("{name}-showcase"), *title);

            policy
                .create_dataset_showcase(dataset, showcase, CreateOptions::default())
                .await?;
            current.insert(name);
        }
        Ok(current)
    }

    async fn delete_other_datasets<P: ScraperPolicy>(
        &self,
        current: &BTreeSet<String>,
        metadata: &Metadata,
        policy: &P,
    ) -> Result<(), AppError> {
        for dataset in self.catalog.datasets_owned_by(&metadata.orgid) {
            if !current.contains(&dataset.name) {
                policy.delete_from_hdx(&dataset).await?;
            }
        }
        Ok(())
    }
}

/// Factory fake; remembers the base URL and session settings it was given.
#[derive(Clone)]
pub struct FakeFactory {
    layers: Vec<Layer>,
    catalog: RecordingCatalog,
    fail_generate: bool,
    seen: Arc<Mutex<Option<(String, bool)>>>,
}

impl FakeFactory {
    pub fn new(catalog: RecordingCatalog, layers: Vec<Layer>) -> Self {
        Self {
            layers,
            catalog,
            fail_generate: false,
            seen: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing_generate(mut self) -> Self {
        self.fail_generate = true;
        self
    }

    /// `(base_url, verify_ssl)` of the last adapter created.
    pub fn seen(&self) -> Option<(String, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

impl AdapterFactory for FakeFactory {
    type Adapter = FakeAdapter;

    fn create(&self, base_url: &str, downloader: &Download) -> Result<FakeAdapter, AppError> {
        *self.seen.lock().unwrap() = Some((base_url.to_string(), downloader.verify_ssl()));
        Ok(FakeAdapter {
            layers: self.layers.clone(),
            catalog: self.catalog.clone(),
            fail_generate: self.fail_generate,
        })
    }
}
