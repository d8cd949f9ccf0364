// ABOUTME: Library module for postgis-provisioner
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod error;
pub mod postgres;
pub mod provision;

pub use error::ProvisionError;
