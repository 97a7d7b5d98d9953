//! `sitetheme` command-line driver.
//!
//! Runs the theme engine against a site directory or URL: configuration,
//! logging, command dispatch and report printing live here, theme logic lives
//! in the `engine` crate.

pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod report;
