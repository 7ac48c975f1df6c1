//! 帧与动画数据结构

use crate::config::PixelByteOrder;
use crate::error::{ConvertError, Result};
use crate::image::rgb565::encode_pixel;
use image::RgbImage;

/// 缩放后的一帧 RGB888 图像
#[derive(Debug, Clone)]
pub struct Frame {
    /// 行优先的像素数据
    pub pixels: RgbImage,
    /// 帧延迟（毫秒），静态图片为 0
    pub delay_ms: u32,
}

impl Frame {
    pub fn new(pixels: RgbImage, delay_ms: u32) -> Self {
        Self { pixels, delay_ms }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// 编码为 RGB565
    pub fn encode(&self, order: PixelByteOrder) -> EncodedFrame {
        let packed_pixels = self
            .pixels
            .pixels()
            .map(|p| encode_pixel(p, order))
            .collect();

        EncodedFrame {
            width: self.width(),
            height: self.height(),
            delay_ms: self.delay_ms,
            packed_pixels,
        }
    }
}

/// 编码后的一帧 RGB565 数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    pub width: u32,
    pub height: u32,
    pub delay_ms: u32,
    /// 行优先 (y 外层, x 内层)
    pub packed_pixels: Vec<u16>,
}

impl EncodedFrame {
    /// 像素个数
    pub fn pixel_count(&self) -> usize {
        self.packed_pixels.len()
    }

    /// 在单片机 Flash 中占用的字节数
    pub fn byte_size(&self) -> usize {
        self.packed_pixels.len() * 2
    }
}

/// 编码后的动画，所有帧尺寸一致
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<EncodedFrame>,
    /// 是否循环播放（目前总是 true）
    pub looping: bool,
}

impl Animation {
    /// 创建动画，校验帧非空且尺寸一致
    pub fn new(frames: Vec<EncodedFrame>) -> Result<Self> {
        let first = frames.first().ok_or(ConvertError::EmptyAnimation)?;
        let (expected_width, expected_height) = (first.width, first.height);

        if let Some((index, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.width != expected_width || f.height != expected_height)
        {
            return Err(ConvertError::FrameSizeMismatch {
                index,
                width: frame.width,
                height: frame.height,
                expected_width,
                expected_height,
            });
        }

        Ok(Self {
            frames,
            looping: true,
        })
    }

    pub fn frames(&self) -> &[EncodedFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// 统一的帧宽度
    pub fn width(&self) -> u32 {
        self.frames[0].width
    }

    /// 统一的帧高度
    pub fn height(&self) -> u32 {
        self.frames[0].height
    }

    /// 全部像素数据的字节数
    pub fn byte_size(&self) -> usize {
        self.frames.iter().map(EncodedFrame::byte_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn encoded(width: u32, height: u32) -> EncodedFrame {
        Frame::new(RgbImage::new(width, height), 100).encode(PixelByteOrder::Native)
    }

    #[test]
    fn test_encode_row_major() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 255, 0]));
        img.put_pixel(1, 1, Rgb([0, 0, 255]));

        let frame = Frame::new(img, 40).encode(PixelByteOrder::Native);
        assert_eq!(frame.packed_pixels, vec![0x0000, 0xF800, 0x07E0, 0x001F]);
        assert_eq!((frame.width, frame.height, frame.delay_ms), (2, 2, 40));
        assert_eq!(frame.byte_size(), 8);
    }

    #[test]
    fn test_encode_swapped() {
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        let frame = Frame::new(img, 0).encode(PixelByteOrder::Swapped);
        assert_eq!(frame.packed_pixels, vec![0x00F8]);
    }

    #[test]
    fn test_animation_requires_frames() {
        assert!(matches!(Animation::new(vec![]), Err(ConvertError::EmptyAnimation)));
    }

    #[test]
    fn test_animation_size_mismatch() {
        let result = Animation::new(vec![encoded(4, 4), encoded(4, 4), encoded(4, 3)]);
        assert!(matches!(
            result,
            Err(ConvertError::FrameSizeMismatch { index: 2, height: 3, .. })
        ));
    }

    #[test]
    fn test_animation_info() {
        let anim = Animation::new(vec![encoded(3, 2), encoded(3, 2)]).unwrap();
        assert_eq!(anim.frame_count(), 2);
        assert_eq!((anim.width(), anim.height()), (3, 2));
        assert_eq!(anim.byte_size(), 24);
        assert!(anim.looping);
    }
}
