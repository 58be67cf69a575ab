use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PageError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PageError::precondition("x")
            .to_string()
            .contains("precondition failed:")
    );
    assert!(PageError::layout("x").to_string().contains("layout error:"));
    assert!(PageError::render("x").to_string().contains("render error:"));
    assert!(PageError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn assembly_error_names_the_ordinal() {
    let err = PageError::assembly(7, "size mismatch");
    let msg = err.to_string();
    assert!(msg.contains("page 7"));
    assert!(msg.contains("size mismatch"));
    assert!(matches!(err, PageError::Assembly { ordinal: 7, .. }));
}

#[test]
fn only_precondition_is_flagged_as_precondition() {
    assert!(PageError::precondition("no key").is_precondition());
    assert!(!PageError::validation("x").is_precondition());
    assert!(!PageError::Cancelled { completed: 2 }.is_precondition());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PageError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
