//! CSV country to region mapping source.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use exposure_core::CountryRegionMap;
use serde::Deserialize;
use tracing::info;

use crate::error::{FileError, FileResult};

#[derive(Debug, Deserialize)]
struct CountryRegionRow {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Region")]
    region: String,
}

/// Reads a `Country,Region` mapping file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a column is missing, or a
/// country is mapped to two different regions.
pub fn read_country_region(path: impl AsRef<Path>) -> FileResult<CountryRegionMap> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FileError::io(path, e))?;
    let map = read_country_region_from_reader(file)?;
    info!(path = %path.display(), countries = map.len(), "loaded country/region mapping");
    Ok(map)
}

/// Reads a `Country,Region` mapping from any reader.
///
/// # Errors
///
/// See [`read_country_region`].
pub fn read_country_region_from_reader<R: Read>(reader: R) -> FileResult<CountryRegionMap> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in ["Country", "Region"] {
        if !headers.iter().any(|h| h == column) {
            return Err(FileError::missing_column(column));
        }
    }

    let mut map = CountryRegionMap::default();
    for (idx, row) in reader.deserialize::<CountryRegionRow>().enumerate() {
        let row = row?;
        map.insert(row.country, row.region)
            .map_err(|e| FileError::parse(idx + 1, "Country", e.to_string()))?;
    }
    Ok(map)
}
