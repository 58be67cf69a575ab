//! Caption typography: font loading, measuring, and shaping.

pub mod engine;
pub mod font;
pub mod measure;

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
