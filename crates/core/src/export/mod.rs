//! Spreadsheet export model.

pub mod workbook;

pub use workbook::{Cell, MISSING, Sheet, Workbook};
