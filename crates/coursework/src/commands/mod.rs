//! Subcommand implementations.

pub mod build;
pub mod correct;
pub mod init;
pub mod solutions;
pub mod stubs;
