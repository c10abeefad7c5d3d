//! Mirror Library
//!
//! This library provides the download, extraction and record-keeping
//! functionality behind the `mirror` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
