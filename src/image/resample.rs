//! 空间缩放

use crate::config::{ResampleFilter, ResizePolicy};
use image::{DynamicImage, RgbImage, imageops};

/// 根据缩放策略计算目标尺寸
///
/// `Fit` 等比缩放且从不放大；`Exact` 直接返回固定尺寸。
pub fn target_dimensions(policy: ResizePolicy, width: u32, height: u32) -> (u32, u32) {
    match policy {
        ResizePolicy::Exact { width, height } => (width, height),
        ResizePolicy::Fit { max_width, max_height } => {
            if width == 0 || height == 0 {
                return (width, height);
            }

            let scale = (max_width as f64 / width as f64)
                .min(max_height as f64 / height as f64)
                .min(1.0);

            if scale >= 1.0 {
                return (width, height);
            }

            // 加一个极小量，避免 240.0 被算成 239.999...
            let scaled = |v: u32| ((v as f64 * scale + 1e-9).floor() as u32).max(1);
            (scaled(width), scaled(height))
        }
    }
}

/// 把一帧转换为 RGB 并缩放到目标尺寸
///
/// 尺寸已经一致时不做重采样。
pub fn resize_frame(image: &DynamicImage, target: (u32, u32), filter: ResampleFilter) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == target {
        return rgb;
    }

    tracing::debug!(
        "缩放 {}x{} -> {}x{} ({:?})",
        rgb.width(),
        rgb.height(),
        target.0,
        target.1,
        filter
    );
    imageops::resize(&rgb, target.0, target.1, filter.filter_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const FIT_240: ResizePolicy = ResizePolicy::Fit { max_width: 240, max_height: 240 };

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(target_dimensions(FIT_240, 100, 50), (100, 50));
        assert_eq!(target_dimensions(FIT_240, 240, 240), (240, 240));
    }

    #[test]
    fn test_fit_scales_proportionally() {
        assert_eq!(target_dimensions(FIT_240, 480, 240), (240, 120));
        assert_eq!(target_dimensions(FIT_240, 240, 480), (120, 240));
        assert_eq!(target_dimensions(FIT_240, 300, 200), (240, 160));
    }

    #[test]
    fn test_fit_floors() {
        // 1000x333 -> scale 0.24 -> 240x79.92
        assert_eq!(target_dimensions(FIT_240, 1000, 333), (240, 79));
    }

    #[test]
    fn test_fit_keeps_one_pixel() {
        assert_eq!(target_dimensions(FIT_240, 10_000, 1), (240, 1));
    }

    #[test]
    fn test_exact_ignores_aspect() {
        let policy = ResizePolicy::Exact { width: 120, height: 120 };
        assert_eq!(target_dimensions(policy, 480, 240), (120, 120));
        assert_eq!(target_dimensions(policy, 20, 10), (120, 120));
    }

    #[test]
    fn test_resize_frame() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([10, 20, 30])));

        let same = resize_frame(&src, (8, 4), ResampleFilter::Lanczos3);
        assert_eq!(same.dimensions(), (8, 4));
        assert_eq!(same.get_pixel(3, 2), &Rgb([10, 20, 30]));

        let small = resize_frame(&src, (4, 2), ResampleFilter::Nearest);
        assert_eq!(small.dimensions(), (4, 2));
        assert_eq!(small.get_pixel(1, 1), &Rgb([10, 20, 30]));
    }
}
