//! Command-line front end for scene aggregation.

pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
