//! Applicant records and batch loading

mod data;
pub mod loader;

pub use data::{ApplicantRecord, Country};
pub use loader::{load_applicants, load_applicants_from_reader};
