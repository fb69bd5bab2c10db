//! Pixel-level shape rasterization onto the canvas surface.
//!
//! Strokes are rendered by stamping round dabs along the shape's outline,
//! which gives the round join/cap look for every stroke width. All writes
//! are alpha-blended and clipped at the surface bounds, so out-of-view
//! coordinates degrade to partial or empty draws rather than failing.

use crate::canvas::model::Color;
use image::RgbaImage;

pub fn filled_surface(width: u32, height: u32, background: Color) -> RgbaImage {
    RgbaImage::from_pixel(
        width.max(1),
        height.max(1),
        image::Rgba(background.to_rgba_array()),
    )
}

fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Color) {
    if color.a == 0 {
        return;
    }
    let dst = img.get_pixel(x, y).0;
    let src_a = color.a as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    let blend = |src: u8, dst: u8| {
        let src_f = src as f32 / 255.0;
        let dst_f = dst as f32 / 255.0;
        ((src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    img.put_pixel(
        x,
        y,
        image::Rgba([
            blend(color.r, dst[0]),
            blend(color.g, dst[1]),
            blend(color.b, dst[2]),
            (out_a * 255.0) as u8,
        ]),
    );
}

/// Stamp a single filled round dab centered at `center`.
pub fn draw_dab(img: &mut RgbaImage, center: (f32, f32), radius: f32, color: Color) {
    if radius <= 0.0 {
        return;
    }
    let radius_sq = radius * radius;
    let width = img.width() as i32;
    let height = img.height() as i32;
    let min_x = (center.0 - radius).floor().max(0.0) as i32;
    let max_x = (center.0 + radius).ceil().min((width - 1) as f32) as i32;
    let min_y = (center.1 - radius).floor().max(0.0) as i32;
    let max_y = (center.1 + radius).ceil().min((height - 1) as f32) as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - center.0;
            let dy = y as f32 + 0.5 - center.1;
            if dx * dx + dy * dy <= radius_sq {
                blend_pixel(img, x as u32, y as u32, color);
            }
        }
    }
}

pub fn draw_segment(
    img: &mut RgbaImage,
    start: (f32, f32),
    end: (f32, f32),
    color: Color,
    thickness: f32,
) {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
    let radius = (thickness / 2.0).max(0.75);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        draw_dab(img, (start.0 + dx * t, start.1 + dy * t), radius, color);
    }
}

/// A single point renders as one dab, so a tap leaves a visible dot.
pub fn draw_polyline(img: &mut RgbaImage, points: &[(f32, f32)], color: Color, thickness: f32) {
    match points {
        [] => {}
        [point] => draw_dab(img, *point, (thickness / 2.0).max(0.75), color),
        _ => {
            for pair in points.windows(2) {
                draw_segment(img, pair[0], pair[1], color, thickness);
            }
        }
    }
}

pub fn draw_rect_outline(
    img: &mut RgbaImage,
    min: (f32, f32),
    max: (f32, f32),
    color: Color,
    thickness: f32,
) {
    draw_segment(img, (min.0, min.1), (max.0, min.1), color, thickness);
    draw_segment(img, (max.0, min.1), (max.0, max.1), color, thickness);
    draw_segment(img, (max.0, max.1), (min.0, max.1), color, thickness);
    draw_segment(img, (min.0, max.1), (min.0, min.1), color, thickness);
}

pub fn draw_circle_outline(
    img: &mut RgbaImage,
    center: (f32, f32),
    radius: f32,
    color: Color,
    thickness: f32,
) {
    if radius <= 0.0 {
        draw_dab(img, center, (thickness / 2.0).max(0.75), color);
        return;
    }
    let circumference = std::f32::consts::TAU * radius;
    let steps = circumference.max(12.0) as usize;
    let dab = (thickness / 2.0).max(0.75);
    for step in 0..=steps {
        let t = (step as f32 / steps as f32) * std::f32::consts::TAU;
        let x = center.0 + radius * t.cos();
        let y = center.1 + radius * t.sin();
        draw_dab(img, (x, y), dab, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::Color;

    const INK: Color = Color::rgba(10, 20, 30, 255);

    fn blank(w: u32, h: u32) -> RgbaImage {
        filled_surface(w, h, Color::WHITE)
    }

    fn inked(img: &RgbaImage, x: u32, y: u32) -> bool {
        img.get_pixel(x, y).0 != [255, 255, 255, 255]
    }

    #[test]
    fn dab_covers_its_center_pixel() {
        let mut img = blank(20, 20);
        draw_dab(&mut img, (10.0, 10.0), 2.0, INK);
        assert!(inked(&img, 10, 10));
        assert!(!inked(&img, 0, 0));
    }

    #[test]
    fn out_of_bounds_geometry_is_clipped_not_fatal() {
        let mut img = blank(8, 8);
        draw_segment(&mut img, (-50.0, -50.0), (100.0, 100.0), INK, 3.0);
        draw_circle_outline(&mut img, (-20.0, -20.0), 5.0, INK, 3.0);
        // The diagonal segment must still touch the in-bounds part.
        assert!(inked(&img, 4, 4));
    }

    #[test]
    fn single_point_polyline_renders_a_dot() {
        let mut img = blank(16, 16);
        draw_polyline(&mut img, &[(8.0, 8.0)], INK, 4.0);
        assert!(inked(&img, 8, 8));
    }

    #[test]
    fn empty_polyline_is_a_no_op() {
        let mut img = blank(16, 16);
        let before = img.clone();
        draw_polyline(&mut img, &[], INK, 4.0);
        assert_eq!(img, before);
    }

    #[test]
    fn rect_outline_leaves_interior_untouched() {
        let mut img = blank(40, 40);
        draw_rect_outline(&mut img, (5.0, 5.0), (35.0, 35.0), INK, 1.0);
        assert!(inked(&img, 5, 20));
        assert!(inked(&img, 20, 5));
        assert!(!inked(&img, 20, 20));
    }

    #[test]
    fn circle_outline_hits_ring_but_not_center() {
        let mut img = blank(60, 60);
        draw_circle_outline(&mut img, (30.0, 30.0), 15.0, INK, 2.0);
        assert!(inked(&img, 45, 30));
        assert!(inked(&img, 30, 45));
        assert!(!inked(&img, 30, 30));
    }
}
