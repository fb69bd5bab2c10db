//! Image import for the drawing background: decode, optional aspect crop,
//! and the fit-to-view scaling step.

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::Path;

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("decode image {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Center-crop the source to the view's aspect ratio. Mirrors the fixed
/// aspect constraint of the crop step that runs before scaling.
pub fn crop_to_aspect(src: &RgbaImage, view_w: u32, view_h: u32) -> RgbaImage {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 || view_w == 0 || view_h == 0 {
        return src.clone();
    }
    // Compare src_w/src_h with view_w/view_h without leaving integers.
    let lhs = src_w as u64 * view_h as u64;
    let rhs = view_w as u64 * src_h as u64;
    let (crop_w, crop_h) = if lhs > rhs {
        // Source is wider than the view: trim width.
        (((src_h as u64 * view_w as u64) / view_h as u64).max(1) as u32, src_h)
    } else if lhs < rhs {
        (src_w, ((src_w as u64 * view_h as u64) / view_w as u64).max(1) as u32)
    } else {
        return src.clone();
    };
    let x = (src_w - crop_w) / 2;
    let y = (src_h - crop_h) / 2;
    imageops::crop_imm(src, x, y, crop_w, crop_h).to_image()
}

/// Scale the source to "fit" the view with a two-step heuristic:
///
/// - A square source is scaled to `view_h` square, always keyed off height.
/// - Otherwise an oversized source is first height-corrected to `view_h`,
///   then width-corrected to `view_w` if it still overflows. An undersized
///   source gets the symmetric scale-up treatment.
///
/// The two corrections run sequentially and unconditionally, so certain
/// input ratios come out non-aspect-preserving and can even overshoot the
/// view. Callers must not rely on the result matching the view size.
pub fn fit_to_view(src: &RgbaImage, view_w: u32, view_h: u32) -> RgbaImage {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 || view_w == 0 || view_h == 0 {
        return src.clone();
    }

    let mut dst_w = src_w;
    let mut dst_h = src_h;
    let mut out = src.clone();
    tracing::debug!(src_w, src_h, view_w, view_h, "scaling imported image");

    if dst_w > view_w || dst_h > view_h {
        if src_w == src_h {
            dst_w = view_h;
            dst_h = view_h;
            out = imageops::resize(&out, dst_w, dst_h, FilterType::Triangle);
        } else {
            if dst_h > view_h {
                dst_h = view_h;
                dst_w = (src_w as u64 * dst_h as u64 / src_h as u64).max(1) as u32;
                out = imageops::resize(&out, dst_w, dst_h, FilterType::Triangle);
            }
            if dst_w > view_w {
                dst_w = view_w;
                dst_h = (dst_w as u64 * src_h as u64 / src_w as u64).max(1) as u32;
                out = imageops::resize(&out, dst_w, dst_h, FilterType::Triangle);
            }
        }
    }

    if dst_w < view_w || dst_h < view_h {
        if src_w == src_h {
            dst_w = view_h;
            dst_h = view_h;
            out = imageops::resize(&out, dst_w, dst_h, FilterType::Triangle);
        } else {
            if dst_h < view_h {
                dst_h = view_h;
                dst_w = (src_w as u64 * dst_h as u64 / src_h as u64).max(1) as u32;
                out = imageops::resize(&out, dst_w, dst_h, FilterType::Triangle);
            }
            if dst_w < view_w {
                dst_w = view_w;
                dst_h = (dst_w as u64 * src_h as u64 / src_w as u64).max(1) as u32;
                out = imageops::resize(&out, dst_w, dst_h, FilterType::Triangle);
            }
        }
    }

    tracing::debug!(dst_w = out.width(), dst_h = out.height(), "scaled imported image");
    out
}
