//! Dataset name normalization.

/// Organisation slug GeoNode layers are named with.
pub const ORGANISATION_SLUG: &str = "igad-climate-prediction-and-application-center";

/// Short form used in HDX dataset names.
pub const ORGANISATION_ABBREVIATION: &str = "icpac";

/// Maps a generated dataset name to the name it is published under on HDX.
///
/// Every occurrence of the long organisation slug becomes `icpac`. The
/// result no longer contains the slug, so applying it again is a no-op.
pub fn process_dataset_name(name: &str) -> String {
    name.replace(ORGANISATION_SLUG, ORGANISATION_ABBREVIATION)
}
