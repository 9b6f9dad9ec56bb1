//! CMIP5 Data Reference Syntax: file names, sampling classification, and
//! directory checks.

pub mod directory;
pub mod filename;
pub mod sampling;

pub use directory::{DirectoryPattern, list_files};
pub use filename::{DatePrecision, DrsName, dates_from_filename};
pub use sampling::{is_instant, is_instant_file};
