use super::pdf::{encode_pdf, ensure_parent_dir};
use crate::assemble::document::PageAssembler;
use crate::foundation::core::PageSize;

fn count_occurrences(hay: &[u8], needle: &[u8]) -> usize {
    hay.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn one_pdf_page_per_document_page() {
    let size = PageSize::new(20, 30).unwrap();
    let img = image::RgbaImage::from_pixel(20, 30, image::Rgba([200, 10, 10, 255]));
    let doc = PageAssembler::new(size)
        .assemble_with_cover(Some(img.clone()), vec![img.clone(), img])
        .unwrap();

    let bytes = encode_pdf(&doc).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let page_objects =
        count_occurrences(&bytes, b"/Type /Page") - count_occurrences(&bytes, b"/Type /Pages");
    assert_eq!(page_objects, 3);
    assert_eq!(count_occurrences(&bytes, b"/Count 3"), 1);
    assert_eq!(count_occurrences(&bytes, b"/Subtype /Image"), 3);
}

#[test]
fn empty_document_still_encodes() {
    let doc = PageAssembler::new(PageSize::A4_PORTRAIT)
        .assemble(Vec::new())
        .unwrap();
    let bytes = encode_pdf(&doc).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(count_occurrences(&bytes, b"/Count 0"), 1);
}

#[test]
fn parent_dirs_are_created() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_pdf")
        .join("nested")
        .join("deeper");
    let _ = std::fs::remove_dir_all(&dir);
    ensure_parent_dir(&dir.join("book.pdf")).unwrap();
    assert!(dir.is_dir());
    ensure_parent_dir(std::path::Path::new("book.pdf")).unwrap();
}
