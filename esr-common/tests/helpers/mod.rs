//! Test Helper Utilities
//!
//! Shared fixtures for esr-common integration tests

pub mod survey_fixture;
pub mod survey_workbook;

pub use survey_fixture::{survey_csv, Respondent};
pub use survey_workbook::survey_xlsx;
