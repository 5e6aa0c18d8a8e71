//! JSON catalogue loader.
//!
//! The bundled catalogue is compiled into the binary. Deployments may point
//! `catalogue_path` at a replacement file with the same shape.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use tracing::info;

use crate::domain::{
    CatalogueValidationError, DEFAULT_FEATURED_COUNT, Restaurant, RestaurantCatalogue,
    RestaurantDraft,
};

const BUNDLED_CATALOGUE: &str = include_str!("../../data/restaurants.json");

/// Errors raised while loading catalogue data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueLoadError {
    #[error("failed to read catalogue file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalogue JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("restaurant #{index} is invalid: {source}")]
    Restaurant {
        index: usize,
        #[source]
        source: CatalogueValidationError,
    },
    #[error("catalogue is invalid: {0}")]
    Catalogue(#[source] CatalogueValidationError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogueFileDto {
    featured_count: Option<usize>,
    restaurants: Vec<RestaurantDraft>,
}

/// Load the catalogue from `path` when given, otherwise the bundled data.
pub fn load_catalogue(path: Option<&Path>) -> Result<RestaurantCatalogue, CatalogueLoadError> {
    let catalogue = match path {
        Some(path) => parse_catalogue(&read_file(path)?)?,
        None => parse_catalogue(BUNDLED_CATALOGUE)?,
    };
    info!(
        source = path.map_or_else(|| "bundled".to_owned(), |p| p.display().to_string()),
        restaurants = catalogue.all().len(),
        featured = catalogue.featured().len(),
        "restaurant catalogue loaded"
    );
    Ok(catalogue)
}

/// Parse and validate catalogue JSON.
pub fn parse_catalogue(json: &str) -> Result<RestaurantCatalogue, CatalogueLoadError> {
    let file: CatalogueFileDto = serde_json::from_str(json)?;
    let restaurants = file
        .restaurants
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            Restaurant::new(draft)
                .map_err(|source| CatalogueLoadError::Restaurant { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    RestaurantCatalogue::new(
        restaurants,
        file.featured_count.unwrap_or(DEFAULT_FEATURED_COUNT),
    )
    .map_err(CatalogueLoadError::Catalogue)
}

fn read_file(path: &Path) -> Result<String, CatalogueLoadError> {
    let read_error = |source| CatalogueLoadError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "catalogue path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(Path::new(file_name)).map_err(read_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RestaurantId;
    use rstest::rstest;
    use std::io::Write as _;

    const MINIMAL: &str = r#"{
        "restaurants": [{
            "name": "Joe's Pizza",
            "image": "https://example.com/joe.jpg",
            "location": "Cambridge",
            "neighborhood": "Central Square",
            "rating": 4.1,
            "priceRange": "$",
            "cuisine": "Pizza",
            "dealText": "Free slice",
            "dealDescription": "Buy one slice, get one free",
            "deals": [{
                "dealTitle": "Free slice",
                "dealDescription": "Buy one slice, get one free",
                "potentialSavings": { "average": "$3", "upTo": "$4" },
                "offerPerCustomerLimit": 1
            }]
        }]
    }"#;

    #[rstest]
    fn bundled_catalogue_loads() {
        let catalogue = load_catalogue(None).expect("bundled catalogue is valid");
        assert_eq!(catalogue.featured().len(), DEFAULT_FEATURED_COUNT);
        assert!(catalogue.find(&RestaurantId::from_name("Source")).is_some());
    }

    #[rstest]
    fn missing_featured_count_uses_default() {
        let catalogue = parse_catalogue(MINIMAL).expect("minimal catalogue parses");
        assert_eq!(catalogue.featured().len(), 1);
        assert!(catalogue.find(&RestaurantId::from_name("Joe's Pizza")).is_some());
    }

    #[rstest]
    fn override_file_is_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(MINIMAL.as_bytes()).expect("write catalogue");

        let catalogue = load_catalogue(Some(file.path())).expect("override loads");
        assert_eq!(catalogue.all().len(), 1);
    }

    #[rstest]
    fn missing_override_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let error = load_catalogue(Some(&path)).expect_err("missing file fails");
        assert!(matches!(error, CatalogueLoadError::Read { .. }));
        assert!(error.to_string().contains("absent.json"));
    }

    #[rstest]
    fn invalid_restaurant_reports_its_index() {
        let broken = MINIMAL.replace("\"rating\": 4.1", "\"rating\": 7.5");
        let error = parse_catalogue(&broken).expect_err("rating out of range");
        assert!(matches!(
            error,
            CatalogueLoadError::Restaurant { index: 0, .. }
        ));
    }

    #[rstest]
    fn empty_catalogue_is_rejected() {
        let error = parse_catalogue(r#"{ "restaurants": [] }"#).expect_err("empty fails");
        assert!(matches!(
            error,
            CatalogueLoadError::Catalogue(CatalogueValidationError::EmptyCatalogue)
        ));
    }
}
