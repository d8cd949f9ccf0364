// ABOUTME: Extension provisioning module
// ABOUTME: Exports the engine seam, target helpers, and the provisioner itself

pub mod engine;
pub mod provisioner;
pub mod targets;

pub use engine::ExtensionEngine;
pub use provisioner::{default_extensions, ExtensionSpec, ProvisionSummary, Provisioner};
pub use targets::{strip_build_metadata, target_databases};
