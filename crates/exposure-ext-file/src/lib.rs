//! # Exposure Ext File
//!
//! File-based inputs and outputs for exposure analytics.
//!
//! This crate provides the readers and writers used for EOD runs:
//! - CSV position source
//! - CSV country to region mapping
//! - NAV history from CSV or spreadsheet (`xlsx` feature)
//! - CSV exposure table writer
//!
//! All readers return `exposure-core` records; parsing errors carry the data
//! line and column that failed.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod country_region;
pub mod error;
mod nav;
mod positions;
mod writer;

pub use country_region::*;
pub use error::{FileError, FileResult};
pub use nav::*;
pub use positions::{
    anonymize_subfund_names, read_positions, read_positions_from_reader, subfund_names,
    PositionFileOptions, DEFAULT_POSITION_DATE_FORMAT, POSITION_COLUMNS,
};
pub use writer::*;
