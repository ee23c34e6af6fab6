//! Country to region lookup table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ExposureError, ExposureResult};

/// Mapping from country code to region name.
///
/// Each country maps to exactly one region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRegionMap {
    regions: BTreeMap<String, String>,
}

impl CountryRegionMap {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(country, region)` pairs.
    ///
    /// Keys and values are trimmed. A country repeated with the same region is
    /// accepted once.
    ///
    /// # Errors
    ///
    /// Returns [`ExposureError::DuplicateCountry`] when a country is listed
    /// with two different regions, or [`ExposureError::InvalidInput`] for a
    /// blank country.
    pub fn from_pairs<I, C, R>(pairs: I) -> ExposureResult<Self>
    where
        I: IntoIterator<Item = (C, R)>,
        C: Into<String>,
        R: Into<String>,
    {
        let mut map = Self::new();
        for (country, region) in pairs {
            map.insert(country, region)?;
        }
        Ok(map)
    }

    /// Adds one mapping.
    ///
    /// # Errors
    ///
    /// See [`CountryRegionMap::from_pairs`].
    pub fn insert(
        &mut self,
        country: impl Into<String>,
        region: impl Into<String>,
    ) -> ExposureResult<()> {
        let country = country.into().trim().to_string();
        let region = region.into().trim().to_string();
        if country.is_empty() {
            return Err(ExposureError::invalid_input("blank country in mapping"));
        }

        match self.regions.get(&country) {
            Some(existing) if *existing != region => Err(ExposureError::DuplicateCountry {
                country,
                first: existing.clone(),
                second: region,
            }),
            Some(_) => Ok(()),
            None => {
                self.regions.insert(country, region);
                Ok(())
            }
        }
    }

    /// Returns the region for a country.
    #[must_use]
    pub fn region(&self, country: &str) -> Option<&str> {
        self.regions.get(country).map(String::as_str)
    }

    /// Returns true if the country is mapped.
    #[must_use]
    pub fn contains(&self, country: &str) -> bool {
        self.regions.contains_key(country)
    }

    /// Iterates `(country, region)` pairs in country order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.regions.iter().map(|(c, r)| (c.as_str(), r.as_str()))
    }

    /// Number of mapped countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
