//! Reports module: complaints against advertisements and the staff
//! review queue.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{ReportError, ReportResult};
pub use manager::ReportManager;
pub use models::{NewReport, Report, ReportId};
