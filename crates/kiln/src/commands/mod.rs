//! CLI command implementations.

pub mod batch;
pub mod dev;
pub mod export;
pub mod init;
pub mod list;
pub mod serve;
