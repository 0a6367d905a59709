//! Command-line front end for shipment ingestion.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
