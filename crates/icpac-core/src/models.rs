//! Catalog records exchanged with the GeoNode adapter and the HDX catalog.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::StaticDatasetConfig;

/// Name prefix of datasets owned by the upstream IGAD ingestion.
///
/// Those datasets live in the same organisation on HDX but are never
/// deleted by this scraper.
pub const PROTECTED_PREFIX: &str = "igad-";

/// HDX user id recorded as maintainer of every generated dataset.
pub const MAINTAINER_ID: &str = "196196be-6037-4488-8b71-d786adf4c081";

/// HDX organisation id owning every generated dataset.
pub const ORG_ID: &str = "04436cdf-24da-4826-b5b8-67cba9962423";

/// Label stamped on datasets so HDX knows which job last touched them.
pub const UPDATED_BY_SCRIPT: &str = "HDX Scraper: ICPAC";

/// A dataset (catalog entry) on HDX.
///
/// `name` is the slug HDX uses as the unique key and is what joins the
/// output of one run to the catalog state left by the previous run.
/// All remaining package fields (notes, tags, resources, license, ...) are
/// carried in `extras`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            extras: Map::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extras.insert(key.into(), value.into());
    }

    /// Whether the dataset belongs to the upstream IGAD ingestion.
    pub fn is_protected(&self) -> bool {
        self.name.starts_with(PROTECTED_PREFIX)
    }

    /// Fills in the fixed descriptive fields shared by every ICPAC dataset.
    ///
    /// Fields the generator already set are left alone; `name` and `title`
    /// are never taken from the static document.
    pub fn update_from_static(&mut self, config: &StaticDatasetConfig) {
        for (key, value) in config.fields() {
            if key == "name" || key == "title" {
                continue;
            }
            self.extras
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

/// A showcase promoting one or more datasets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Showcase {
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Showcase {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            extras: Map::new(),
        }
    }
}

/// Attribution applied to every dataset produced in a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub maintainerid: String,
    pub orgid: String,
    pub updated_by_script: String,
}

impl Metadata {
    /// The attribution used for the ICPAC organisation on HDX.
    pub fn icpac() -> Self {
        Self {
            maintainerid: MAINTAINER_ID.to_string(),
            orgid: ORG_ID.to_string(),
            updated_by_script: UPDATED_BY_SCRIPT.to_string(),
        }
    }
}

/// Options forwarded to the catalog when a dataset is created or updated.
///
/// `extras` carries whatever the adapter passes through (batch ids and the
/// like) untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateOptions {
    /// Drop resources on HDX that are not part of this run's resource list.
    pub remove_additional_resources: bool,
    /// Trigger HXL re-processing of the resources after the update.
    pub hxl_update: bool,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            remove_additional_resources: false,
            hxl_update: true,
            extras: Map::new(),
        }
    }
}
