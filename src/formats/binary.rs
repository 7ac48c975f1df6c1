//! 原始 RGB565 二进制输出
//!
//! 所有帧首尾相接，每个像素按小端 u16 写出。
//! 配合 `PixelByteOrder::Swapped` 时，文件中即为大端字序。

use crate::error::Result;
use crate::image::Animation;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// 把动画的全部像素写入 writer
pub fn write_frames<W: Write>(writer: &mut W, animation: &Animation) -> Result<()> {
    for frame in animation.frames() {
        for &value in &frame.packed_pixels {
            writer.write_u16::<LittleEndian>(value)?;
        }
    }
    Ok(())
}

/// 生成完整的二进制数据
pub fn render(animation: &Animation) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(animation.byte_size());
    write_frames(&mut buf, animation)?;
    Ok(buf)
}
