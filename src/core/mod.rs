pub mod archive;
pub mod config;
pub mod download;
pub mod mirror;
pub mod store;
