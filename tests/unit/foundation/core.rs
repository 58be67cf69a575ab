use super::*;

#[test]
fn surface_size_rejects_zero() {
    assert!(SurfaceSize::new(0, 10).is_err());
    assert!(SurfaceSize::new(10, 0).is_err());
    let s = SurfaceSize::new(3, 4).unwrap();
    assert_eq!(s.bounds(), PixelBox::new(0, 0, 3, 4));
    assert_eq!(s.to_string(), "3x4");
}

#[test]
fn pixel_box_translate_keeps_size() {
    let b = PixelBox::new(10, 20, 110, 70);
    let moved = b.translate(-5, 30);
    assert_eq!(moved.width(), b.width());
    assert_eq!(moved.height(), b.height());
    assert_eq!(moved, PixelBox::new(5, 50, 105, 100));
    assert_eq!(b.with_top(0).top, 0);
    assert_eq!(b.with_top(0).height(), 50);
}

#[test]
fn pixel_box_containment_and_intersection() {
    let outer = PixelBox::new(0, 0, 100, 100);
    assert!(outer.contains_box(PixelBox::new(10, 10, 100, 100)));
    assert!(!outer.contains_box(PixelBox::new(-1, 10, 50, 50)));

    let clipped = PixelBox::new(80, 90, 140, 120).intersect(outer);
    assert_eq!(clipped, PixelBox::new(80, 90, 100, 100));

    let disjoint = PixelBox::new(200, 200, 300, 300).intersect(outer);
    assert!(disjoint.is_empty());
}

#[test]
fn page_size_parse_named_and_explicit() {
    assert_eq!(PageSize::parse("A4").unwrap(), PageSize::A4_PORTRAIT);
    assert_eq!(PageSize::parse("letter").unwrap(), PageSize::US_LETTER);
    assert_eq!(
        PageSize::parse("640x960").unwrap(),
        PageSize {
            width_pt: 640,
            height_pt: 960
        }
    );
    assert!(PageSize::parse("wide").is_err());
    assert!(PageSize::parse("0x10").is_err());
    assert_eq!(PageSize::A4_PORTRAIT.pixels(), SurfaceSize { width: 595, height: 842 });
}

#[test]
fn rgba8_premul_matches_rounding() {
    assert_eq!(Rgba8::rgb(10, 20, 30).premul(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::rgba(255, 255, 255, 0).premul(), [0, 0, 0, 0]);
    assert_eq!(
        Rgba8::rgba(100, 50, 200, 128).premul(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}
