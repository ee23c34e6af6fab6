//! CLI command implementations.

pub mod config;
pub mod country_region;
pub mod exposure;
pub mod positions;
pub mod volatility;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use country_region::CountryRegionArgs;
pub use exposure::ExposureArgs;
pub use positions::PositionsArgs;
pub use volatility::VolatilityArgs;

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

use exposure_core::{Diagnostic, PositionRecord};
use exposure_ext_file::{read_positions, subfund_names};

use crate::error::{CliError, CliResult};
use crate::output::print_warning;
use crate::settings::RunConfig;

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Loads a position file with the run configuration's file options.
pub fn load_positions(path: &Path, settings: &RunConfig) -> anyhow::Result<Vec<PositionRecord>> {
    let options = settings.position_options()?;
    let records = read_positions(path, &options)
        .with_context(|| format!("Failed to read positions from {}", path.display()))?;

    for name in subfund_names(&records) {
        info!(subfund = %name, "loaded sub-fund");
    }
    Ok(records)
}

/// Prints diagnostics as warnings unless quiet.
pub fn report_diagnostics(diagnostics: &[Diagnostic], quiet: bool) {
    if quiet {
        return;
    }
    for diagnostic in diagnostics {
        print_warning(&diagnostic.to_string());
    }
}
