//! Weapon DPS simulator and stat ranker — library entry point.
//!
//! Exposes config, parser, model, catalog, compare, rank, and report
//! for use by the CLI and tests.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod model;
pub mod parser;
pub mod rank;
pub mod report;
pub mod util;
