use super::font::CaptionFont;
use super::measure::{FixedAdvanceMeasure, TextMeasure};

#[test]
fn fixed_advance_scales_with_size_and_length() {
    let mut m = FixedAdvanceMeasure {
        advance_em: 0.5,
        line_height_em: 1.25,
    };
    assert_eq!(m.line_width("abcd", 10.0).unwrap(), 20.0);
    assert_eq!(m.line_width("abcd", 20.0).unwrap(), 40.0);
    assert_eq!(m.line_width("", 20.0).unwrap(), 0.0);
    assert_eq!(m.line_height(16.0).unwrap(), 20.0);
}

#[test]
fn non_positive_sizes_are_rejected() {
    let mut m = FixedAdvanceMeasure::default();
    assert!(m.line_width("x", 0.0).is_err());
    assert!(m.line_height(f32::NAN).is_err());
}

#[test]
fn load_first_reports_precondition_when_nothing_loads() {
    let err = CaptionFont::load_first(&["/definitely/missing/font.ttf"]).unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn garbage_bytes_are_not_a_font() {
    assert!(CaptionFont::from_bytes(b"not a font".to_vec()).is_err());
}

#[test]
fn candidates_put_the_preferred_path_first() {
    let preferred = std::path::Path::new("/opt/fonts/Caption.ttf");
    let list = CaptionFont::candidates(Some(preferred));
    assert_eq!(list[0], preferred);
    assert!(list.len() > 1);
    assert_eq!(
        CaptionFont::candidates(None).len(),
        super::font::DEFAULT_FONT_CANDIDATES.len()
    );
}
