// Library root: re-exports all modules so integration tests and the binary
// can reach the analyzer's public API.

pub mod analysis;
pub mod app;
pub mod comp;
pub mod config;
pub mod remote;
