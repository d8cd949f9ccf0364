// ABOUTME: Command implementations for each entry point
// ABOUTME: Exports init (first boot), update (maintenance), and status (read-only report)

pub mod init;
pub mod status;
pub mod update;

pub use init::init;
pub use status::status;
pub use update::update;
