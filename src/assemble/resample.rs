use image::imageops::FilterType;

use crate::foundation::core::SurfaceSize;

/// Lanczos3 resize to `working`, then to `page`. Steps whose target equals
/// the current size are skipped.
pub fn fit_to_page(
    img: &image::RgbaImage,
    working: SurfaceSize,
    page: SurfaceSize,
) -> image::RgbaImage {
    let normalized = resize_exact(img, working);
    resize_exact(&normalized, page)
}

pub fn resize_exact(img: &image::RgbaImage, to: SurfaceSize) -> image::RgbaImage {
    if SurfaceSize::of(img) == to {
        return img.clone();
    }
    image::imageops::resize(img, to.width, to.height, FilterType::Lanczos3)
}
