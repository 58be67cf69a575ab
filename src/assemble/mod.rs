//! Page normalization and document assembly.

pub mod document;
pub mod resample;

#[cfg(test)]
#[path = "../../tests/unit/assemble/document.rs"]
mod tests;
