use super::*;

#[test]
fn from_premul_rejects_length_mismatch() {
    assert!(Canvas::from_premul(2, 2, vec![0u8; 15]).is_err());
    assert!(Canvas::from_premul(2, 2, vec![0u8; 16]).is_ok());
}

#[test]
fn pixel_bounds_are_checked() {
    let c = Canvas::transparent(3, 2);
    assert_eq!(c.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(c.pixel(3, 0), None);
    assert_eq!(c.pixel(0, 2), None);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100u8, 50u8, 128u8];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![100, 50, 25, 128]);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px.iter().zip([200u8, 100, 50, 128]) {
        assert!(got.abs_diff(want) <= 1, "got {got}, want {want}");
    }
}

#[test]
fn opaque_pixels_survive_rgba_image_conversion() {
    let img = image::RgbaImage::from_raw(1, 1, vec![12, 34, 56, 255]).unwrap();
    let canvas = Canvas::from_rgba_image(img.clone());
    assert_eq!(canvas.pixel(0, 0), Some([12, 34, 56, 255]));
    assert_eq!(canvas.to_rgba_image().unwrap(), img);
}
