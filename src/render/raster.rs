use crate::foundation::core::{Rgba8, SurfaceSize};
use crate::foundation::error::{PageError, PageResult};

/// Copy of `img` with color channels multiplied by alpha.
pub fn premultiplied_bytes(img: &image::RgbaImage) -> Vec<u8> {
    let mut out = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut out);
    out
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Inverse of [`premultiplied_bytes`]; fully transparent pixels come back as zero.
pub fn unpremultiplied_image(rgba8_premul: Vec<u8>, size: SurfaceSize) -> PageResult<image::RgbaImage> {
    let mut data = rgba8_premul;
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
    image::RgbaImage::from_raw(size.width, size.height, data)
        .ok_or_else(|| PageError::render("pixel buffer does not match surface size"))
}

/// Uniform surface, used for placeholders.
pub fn flat_fill(size: SurfaceSize, color: Rgba8) -> image::RgbaImage {
    image::RgbaImage::from_pixel(
        size.width,
        size.height,
        image::Rgba([color.r, color.g, color.b, color.a]),
    )
}

/// vello_cpu surfaces are addressed with u16 dimensions.
pub fn surface_dims_u16(size: SurfaceSize) -> PageResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| PageError::render(format!("surface width {} exceeds u16", size.width)))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| PageError::render(format!("surface height {} exceeds u16", size.height)))?;
    Ok((w, h))
}
