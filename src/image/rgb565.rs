//! RGB888 → RGB565 颜色打包

use crate::config::PixelByteOrder;
use image::Rgb;

/// 24位颜色转16位颜色 (RRRRR GGGGGG BBBBB)
#[inline]
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (((r as u16) & 0xF8) << 8) | (((g as u16) & 0xFC) << 3) | ((b as u16) >> 3)
}

/// 交换高低字节
#[inline]
pub fn swap_bytes(value: u16) -> u16 {
    value.swap_bytes()
}

/// 按指定字节序打包一个像素
#[inline]
pub fn encode_pixel(pixel: &Rgb<u8>, order: PixelByteOrder) -> u16 {
    let [r, g, b] = pixel.0;
    let packed = pack_rgb565(r, g, b);
    match order {
        PixelByteOrder::Native => packed,
        PixelByteOrder::Swapped => swap_bytes(packed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colors() {
        assert_eq!(pack_rgb565(255, 255, 255), 0xFFFF);
        assert_eq!(pack_rgb565(0, 0, 0), 0x0000);
        assert_eq!(pack_rgb565(255, 0, 0), 0xF800);
        assert_eq!(pack_rgb565(0, 255, 0), 0x07E0);
        assert_eq!(pack_rgb565(0, 0, 255), 0x001F);
    }

    #[test]
    fn test_truncates_low_bits() {
        // 低位被直接截断，不做四舍五入
        assert_eq!(pack_rgb565(7, 3, 7), 0x0000);
        assert_eq!(pack_rgb565(8, 4, 8), 0x0821);
        assert_eq!(pack_rgb565(0x12, 0x34, 0x56), 0x11AA);
    }

    #[test]
    fn test_matches_formula_on_grid() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(51) {
                    let expected = ((r & 0xF8) << 8) | ((g & 0xFC) << 3) | (b >> 3);
                    assert_eq!(pack_rgb565(r as u8, g as u8, b as u8), expected);
                }
            }
        }
    }

    #[test]
    fn test_swap_bytes() {
        assert_eq!(swap_bytes(0xF800), 0x00F8);
        assert_eq!(swap_bytes(0x1234), 0x3412);
        for x in 0..=u16::MAX {
            assert_eq!(swap_bytes(swap_bytes(x)), x);
        }
    }

    #[test]
    fn test_encode_pixel_order() {
        let red = Rgb([255, 0, 0]);
        assert_eq!(encode_pixel(&red, PixelByteOrder::Native), 0xF800);
        assert_eq!(encode_pixel(&red, PixelByteOrder::Swapped), 0x00F8);
    }
}
