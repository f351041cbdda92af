// Shared modules for the protocol inspector
pub mod config;
pub mod fork_info;
pub mod shared;
pub mod utils;
