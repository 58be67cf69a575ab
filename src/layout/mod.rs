//! Caption wrapping, sizing and placement.

pub mod engine;
pub mod wrap;

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
