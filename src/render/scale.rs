use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

// ---------------------------------------------------------------------------
// Scaling primitives
// ---------------------------------------------------------------------------

/// Longest edge of the bounded preview written to the scratch slot.
pub const PREVIEW_MAX_EDGE: u32 = 500;

/// Interpolation for steady display, scaled from the full source.
pub const HIGH_FILTER: FilterType = FilterType::Lanczos3;

/// Interpolation for the cheap path used while resizing.
pub const LOW_FILTER: FilterType = FilterType::Nearest;

/// Scale factor that fits `img_w` x `img_h` inside the box without cropping.
pub fn fit_scale(img_w: f64, img_h: f64, box_w: f64, box_h: f64) -> f64 {
    (box_w / img_w).min(box_h / img_h)
}

/// Largest extent that fits the box while keeping the source aspect ratio.
/// Upscaling past source resolution is allowed: this is fit-to-viewport,
/// not shrink-to-fit.
pub fn fit_extent(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let scale = fit_scale(
        src_w.max(1) as f64,
        src_h.max(1) as f64,
        box_w.max(1) as f64,
        box_h.max(1) as f64,
    );
    let w = (src_w as f64 * scale).round() as u32;
    let h = (src_h as f64 * scale).round() as u32;
    (w.max(1), h.max(1))
}

/// Resample `img` to fit the box, returning display-ready RGBA pixels.
pub fn scale_to_fit(img: &DynamicImage, box_w: u32, box_h: u32, filter: FilterType) -> RgbaImage {
    let (w, h) = fit_extent(img.width(), img.height(), box_w, box_h);
    img.resize_exact(w, h, filter).to_rgba8()
}

/// Shrink `img` so its longest edge is at most [`PREVIEW_MAX_EDGE`]. Never
/// upscales; a small source passes through at its own size.
pub fn make_preview(img: &DynamicImage) -> DynamicImage {
    img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_extent_downscales_to_box() {
        assert_eq!(fit_extent(800, 600, 400, 300), (400, 300));
        assert_eq!(fit_extent(1000, 500, 400, 300), (400, 200));
    }

    #[test]
    fn fit_extent_upscales_small_sources() {
        assert_eq!(fit_extent(100, 50, 400, 300), (400, 200));
    }

    #[test]
    fn fit_extent_never_collapses_to_zero() {
        let (w, h) = fit_extent(10_000, 10, 20, 20);
        assert!(w >= 1 && h >= 1);
        let (w, h) = fit_extent(640, 480, 0, 0);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn scale_to_fit_preserves_aspect() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(640, 480));
        let scaled = scale_to_fit(&img, 320, 320, LOW_FILTER);
        assert_eq!((scaled.width(), scaled.height()), (320, 240));
    }

    #[test]
    fn preview_is_bounded_and_never_upscaled() {
        let big = DynamicImage::ImageRgb8(image::RgbImage::new(2000, 1000));
        let preview = make_preview(&big);
        assert_eq!((preview.width(), preview.height()), (500, 250));

        let small = DynamicImage::ImageRgb8(image::RgbImage::new(120, 80));
        let preview = make_preview(&small);
        assert_eq!((preview.width(), preview.height()), (120, 80));
    }
}
