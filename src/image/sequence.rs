//! 源图像解码、帧抽取与帧延迟

use crate::error::{ConvertError, Result};
use gif::streaming_decoder::{Block, Decoded, OutputBuffer, StreamingDecoder};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Delay, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// 未声明延迟时使用的默认帧延迟（毫秒）
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// 解码后、尚未缩放的一帧
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// 在源文件中的帧序号
    pub index: usize,
    pub image: DynamicImage,
    /// 容器中声明的帧延迟（毫秒）
    pub declared_delay_ms: Option<i64>,
}

/// 解码后的源帧序列，只保留被选中的帧
#[derive(Debug, Clone)]
pub struct SourceSequence {
    /// 源文件总帧数
    total: usize,
    frames: Vec<SourceFrame>,
    /// 容器是否带有帧时序 (GIF)
    timed: bool,
}

impl SourceSequence {
    pub fn new(total: usize, frames: Vec<SourceFrame>, timed: bool) -> Self {
        Self {
            total,
            frames,
            timed,
        }
    }

    /// 源帧总数
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_animated(&self) -> bool {
        self.timed
    }

    /// 被选中的帧，按源序号递增
    pub fn frames(&self) -> &[SourceFrame] {
        &self.frames
    }

    /// 被选中帧的源序号
    pub fn selected(&self) -> Vec<usize> {
        self.frames.iter().map(|f| f.index).collect()
    }

    /// 输出帧使用的延迟，静态图片为 0
    pub fn delay_of(&self, frame: &SourceFrame) -> u32 {
        if self.timed {
            frame_delay_ms(frame.declared_delay_ms)
        } else {
            0
        }
    }
}

/// 解码图像文件，只保留 `select_frames(总帧数, max_frames)` 选中的帧
///
/// GIF 逐帧解码（合成后的整幅画面及其延迟），其他格式按单张静态图片处理。
pub fn decode_source(path: &Path, max_frames: Option<usize>) -> Result<SourceSequence> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound(path.display().to_string()));
    }

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    tracing::debug!("识别为格式: {:?}", reader.format());

    if reader.format() == Some(ImageFormat::Gif) {
        let data = std::fs::read(path)?;
        return decode_gif(&data, max_frames);
    }

    let selected = select_frames(1, max_frames)?;
    let image = reader.decode()?;
    let frames = selected
        .into_iter()
        .map(|index| SourceFrame {
            index,
            image: image.clone(),
            declared_delay_ms: None,
        })
        .collect();
    Ok(SourceSequence::new(1, frames, false))
}

/// 解码 GIF 数据
///
/// 先扫描一遍得到总帧数和每帧是否带图形控制扩展，再逐帧合成，
/// 未选中的帧合成后立即丢弃。
fn decode_gif(data: &[u8], max_frames: Option<usize>) -> Result<SourceSequence> {
    let has_control = scan_control_extensions(data)?;
    let total = has_control.len();
    let selected = select_frames(total, max_frames)?;
    tracing::debug!("GIF 共 {} 帧, 选中 {:?}", total, selected);

    let decoder = GifDecoder::new(Cursor::new(data))?;
    let mut wanted = selected.iter().copied().peekable();
    let mut frames = Vec::with_capacity(selected.len());

    for (index, frame) in decoder.into_frames().enumerate() {
        let Some(&next) = wanted.peek() else {
            break;
        };
        // 后续帧依赖前面的画面合成，每帧都要解码
        let frame = frame?;
        if index != next {
            continue;
        }
        wanted.next();

        let declared_delay_ms = if has_control.get(index).copied().unwrap_or(true) {
            delay_to_ms(frame.delay())
        } else {
            None
        };
        frames.push(SourceFrame {
            index,
            image: DynamicImage::ImageRgba8(frame.into_buffer()),
            declared_delay_ms,
        });
    }

    if frames.is_empty() {
        return Err(ConvertError::EmptyAnimation);
    }

    Ok(SourceSequence::new(total, frames, true))
}

fn delay_to_ms(delay: Delay) -> Option<i64> {
    let (numer, denom) = delay.numer_denom_ms();
    (denom != 0).then(|| (numer / denom) as i64)
}

/// 扫描 GIF 的块结构，返回每个图像块之前是否出现过图形控制扩展 (0x21 0xF9)
///
/// 只解析块结构，不保留像素数据。
pub fn scan_control_extensions(data: &[u8]) -> Result<Vec<bool>> {
    let mut decoder = StreamingDecoder::new();
    let mut sink = OutputBuffer::None;
    let mut buf = data;
    let mut pending = false;
    let mut has_control = Vec::new();

    while !buf.is_empty() {
        let (consumed, decoded) = decoder.update(buf, &mut sink)?;
        buf = &buf[consumed..];

        match decoded {
            Decoded::SubBlock { ext, is_last: true }
                if ext.into_known() == Some(gif::Extension::Control) =>
            {
                pending = true;
            }
            Decoded::BlockStart(Block::Image) => {
                has_control.push(pending);
                pending = false;
            }
            Decoded::BlockStart(Block::Trailer) => break,
            Decoded::Nothing if consumed == 0 => break,
            _ => {}
        }
    }

    Ok(has_control)
}

/// 等间隔抽帧
///
/// 步长为 `max(1, total / max)`，依次选取 `0, 步长, 2*步长, ...`，最多 `max` 个。
/// `max` 为 `None` 时选取全部帧。
pub fn select_frames(total: usize, max: Option<usize>) -> Result<Vec<usize>> {
    let max = match max {
        Some(0) => {
            return Err(ConvertError::InvalidConfig("最大帧数必须至少为 1".to_string()));
        }
        Some(max) => max,
        None => total,
    };

    let stride = (total / max.max(1)).max(1);
    Ok((0..total).step_by(stride).take(max).collect())
}

/// 帧延迟：声明值有效（非负）时原样使用，否则为 100ms
pub fn frame_delay_ms(declared: Option<i64>) -> u32 {
    match declared {
        Some(ms) if ms >= 0 => ms.min(u32::MAX as i64) as u32,
        _ => DEFAULT_FRAME_DELAY_MS,
    }
}
