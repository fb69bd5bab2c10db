use image::{Rgba, RgbaImage};
use paintpad::import::{crop_to_aspect, fit_to_view, load_image};
use std::fs;

#[test]
fn crop_then_fit_fills_the_view_exactly() {
    // A wide source loses its excess width in the crop, after which both
    // scaling corrections settle on the exact view size.
    let src = RgbaImage::from_pixel(1600, 600, Rgba([5, 6, 7, 255]));
    let cropped = crop_to_aspect(&src, 800, 600);
    assert_eq!(cropped.dimensions(), (800, 600));
    assert_eq!(fit_to_view(&cropped, 800, 600).dimensions(), (800, 600));
}

#[test]
fn aspect_matched_source_scales_straight_up() {
    let src = RgbaImage::from_pixel(400, 300, Rgba([5, 6, 7, 255]));
    let cropped = crop_to_aspect(&src, 800, 600);
    assert_eq!(cropped.dimensions(), (400, 300));
    assert_eq!(fit_to_view(&cropped, 800, 600).dimensions(), (800, 600));
}

#[test]
fn load_rejects_a_file_that_is_not_an_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("not-an-image.png");
    fs::write(&path, b"plain text").expect("write");
    assert!(load_image(&path).is_err());
}

#[test]
fn load_roundtrips_a_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("photo.png");
    let img = RgbaImage::from_pixel(12, 8, Rgba([200, 100, 50, 255]));
    img.save(&path).expect("save");
    assert_eq!(load_image(&path).expect("load"), img);
}
