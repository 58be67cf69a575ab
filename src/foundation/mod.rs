pub mod config;
pub mod core;
pub mod error;

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod config_tests;
