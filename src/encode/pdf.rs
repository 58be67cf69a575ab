use std::path::Path;

use anyhow::Context as _;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::assemble::document::Document;
use crate::foundation::error::{PageError, PageResult};

/// Serializes `doc` as a PDF: one page per image, each image stretched over
/// the full media box, Flate-compressed RGB.
pub fn encode_pdf(doc: &Document) -> PageResult<Vec<u8>> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let size = doc.page_size();
    let (w_pt, h_pt) = (size.width_pt as f32, size.height_pt as f32);

    let mut page_ids = Vec::with_capacity(doc.len());
    for page in doc.pages() {
        let page_id = alloc();
        let content_id = alloc();
        let image_id = alloc();
        page_ids.push(page_id);

        let (w, h) = page.image.dimensions();
        let rgb: Vec<u8> = page
            .image
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb, 6);

        let (w, h) = (to_i32(w, page.ordinal)?, to_i32(h, page.ordinal)?);
        {
            let mut xobj = pdf.image_xobject(image_id, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
        }

        let mut content = Content::new();
        content.save_state();
        content.transform([w_pt, 0.0, 0.0, h_pt, 0.0, 0.0]);
        content.x_object(Name(b"Im1"));
        content.restore_state();
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_id, &compressed)
            .filter(Filter::FlateDecode);

        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, w_pt, h_pt))
            .parent(pages_id)
            .contents(content_id);
        pdf_page
            .resources()
            .x_objects()
            .pair(Name(b"Im1"), image_id);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    Ok(pdf.finish())
}

/// Encodes and writes `doc`, creating parent directories.
#[tracing::instrument(skip(doc), fields(pages = doc.len()))]
pub fn write_pdf(doc: &Document, path: &Path) -> PageResult<()> {
    let bytes = encode_pdf(doc)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "document written");
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> PageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn to_i32(v: u32, ordinal: usize) -> PageResult<i32> {
    i32::try_from(v).map_err(|_| {
        PageError::encode(format!("page {ordinal} image dimension {v} exceeds PDF limits"))
    })
}
