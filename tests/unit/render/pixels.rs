use super::blur::blur_rgba8_premul;
use super::composite::{over, over_in_place};
use super::raster::{flat_fill, premultiplied_bytes, surface_dims_u16, unpremultiplied_image};
use crate::foundation::core::{Rgba8, SurfaceSize};

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_softens_a_hard_edge() {
    let (w, h) = (9u32, 1u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    for px in src.chunks_exact_mut(4).skip(5) {
        px.copy_from_slice(&[255, 255, 255, 255]);
    }
    let out = blur_rgba8_premul(&src, w, h, 2, 1.0).unwrap();
    let alpha: Vec<u8> = out.chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alpha[0], 0);
    assert_eq!(alpha[8], 255);
    assert!(alpha[4] > 0 && alpha[4] < 255);
    assert!(alpha.windows(2).all(|p| p[0] <= p[1]));
}

#[test]
fn blur_rejects_mismatched_buffer() {
    assert!(blur_rgba8_premul(&[0u8; 12], 2, 2, 1, 1.0).is_err());
}

#[test]
fn over_transparent_src_is_noop_and_opaque_src_replaces() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
    assert_eq!(over(dst, [1, 2, 3, 255]), [1, 2, 3, 255]);
}

#[test]
fn over_half_white_on_black_is_mid_grey() {
    let out = over([0, 0, 0, 255], [128, 128, 128, 128]);
    assert_eq!(out, [128, 128, 128, 255]);
}

#[test]
fn over_in_place_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
}

#[test]
fn premultiply_roundtrip_keeps_opaque_pixels() {
    let size = SurfaceSize::new(2, 1).unwrap();
    let img = image::RgbaImage::from_raw(2, 1, vec![200, 100, 50, 255, 90, 60, 30, 0]).unwrap();
    let premul = premultiplied_bytes(&img);
    assert_eq!(&premul[4..], &[0, 0, 0, 0]);
    let back = unpremultiplied_image(premul, size).unwrap();
    assert_eq!(back.get_pixel(0, 0).0, [200, 100, 50, 255]);
}

#[test]
fn flat_fill_and_u16_limits() {
    let size = SurfaceSize::new(3, 2).unwrap();
    let img = flat_fill(size, Rgba8::rgb(220, 220, 220));
    assert!(img.pixels().all(|p| p.0 == [220, 220, 220, 255]));
    assert_eq!(surface_dims_u16(size).unwrap(), (3, 2));
    assert!(surface_dims_u16(SurfaceSize::new(70_000, 1).unwrap()).is_err());
}
