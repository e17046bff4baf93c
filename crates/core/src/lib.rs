//! Core financial statement logic for Balanza.
//!
//! This crate contains pure computation with ZERO network or database dependencies.
//! Every statement is derived from balance snapshots the caller has already fetched.
//!
//! # Modules
//!
//! - `ledger` - Account balances, roles, snapshots and subtype grouping
//! - `reports` - Balance sheet, income statement, cash flow, funds, ratios, trial balance
//! - `export` - Spreadsheet workbook model

pub mod export;
pub mod ledger;
pub mod reports;
