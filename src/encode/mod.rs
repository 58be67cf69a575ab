pub mod pdf;

#[cfg(test)]
#[path = "../../tests/unit/encode/pdf.rs"]
mod tests;
