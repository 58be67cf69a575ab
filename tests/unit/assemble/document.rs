use super::document::*;
use super::resample::{fit_to_page, resize_exact};
use crate::foundation::core::{PageSize, SurfaceSize};

fn blank(w: u32, h: u32) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]))
}

fn small_page() -> PageSize {
    PageSize::new(40, 60).unwrap()
}

#[test]
fn empty_input_is_a_zero_page_document() {
    let doc = PageAssembler::new(small_page()).assemble(Vec::new()).unwrap();
    assert!(doc.is_empty());
    assert!(!doc.has_cover());
}

#[test]
fn pages_are_numbered_from_one_and_cover_is_zero() {
    let asm = PageAssembler::new(small_page());
    let doc = asm
        .assemble_with_cover(Some(blank(40, 60)), vec![blank(40, 60), blank(40, 60)])
        .unwrap();
    let ordinals: Vec<usize> = doc.pages().iter().map(|p| p.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
    assert!(doc.has_cover());
    assert_eq!(doc.page_size(), small_page());
}

#[test]
fn mismatched_page_fails_whole_document_naming_its_ordinal() {
    let asm = PageAssembler::new(small_page());
    let err = asm
        .assemble(vec![blank(40, 60), blank(40, 61), blank(1, 1)])
        .unwrap_err();
    assert!(matches!(err, crate::PageError::Assembly { ordinal: 2, .. }));
    assert!(err.to_string().contains("40x61"));
}

#[test]
fn bad_cover_reports_ordinal_zero() {
    let err = PageAssembler::new(small_page())
        .assemble_with_cover(Some(blank(5, 5)), vec![blank(40, 60)])
        .unwrap_err();
    assert!(matches!(err, crate::PageError::Assembly { ordinal: 0, .. }));
}

#[test]
fn two_step_resample_lands_on_the_page_size() {
    let working = SurfaceSize::new(30, 40).unwrap();
    let page = SurfaceSize::new(20, 28).unwrap();
    let out = fit_to_page(&blank(64, 64), working, page);
    assert_eq!(SurfaceSize::of(&out), page);
    // A flat image stays flat through both filters.
    assert!(out.pixels().all(|p| {
        let [r, g, b, _] = p.0;
        (r as i32 - 10).abs() <= 1 && (g as i32 - 20).abs() <= 1 && (b as i32 - 30).abs() <= 1
    }));
}

#[test]
fn resize_to_same_size_is_a_copy() {
    let img = blank(7, 9);
    assert_eq!(resize_exact(&img, SurfaceSize::of(&img)), img);
}
