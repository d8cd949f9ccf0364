// ABOUTME: PostgreSQL utilities module
// ABOUTME: Exports session setup, SQL rendering, catalog queries, and the live engine

pub mod connection;
pub mod engine;
pub mod extensions;
pub mod sql;

pub use connection::connect;
pub use engine::PgEngine;
pub use extensions::{get_installed_extensions, installed_version, Extension};
