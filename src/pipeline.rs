//! 转换流水线: 解码 → 抽帧 → 缩放 → RGB565 编码 → 生成产物 → 一次性写入

use crate::config::{EncoderConfig, LayoutShape};
use crate::error::{ConvertError, Result};
use crate::formats::{ArtifactNames, render_artifact};
use crate::image::{Animation, Frame, decode_source, resize_frame, target_dimensions};
use image::GenericImageView;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 一次转换的结果摘要
#[derive(Debug, Clone)]
pub struct Summary {
    /// 源文件总帧数
    pub total_frames: usize,
    /// 选中的源帧序号
    pub selected: Vec<usize>,
    /// 输出尺寸
    pub width: u32,
    pub height: u32,
    /// 像素数据占用的字节数
    pub pixel_bytes: usize,
    /// 写入文件的字节数
    pub file_bytes: u64,
    /// 输出路径
    pub output: PathBuf,
}

impl Summary {
    /// 输出的帧数
    pub fn frame_count(&self) -> usize {
        self.selected.len()
    }

    /// 打印摘要
    pub fn report(&self) {
        info!("✅ 转换完成! 输出: {}", self.output.display());
        if self.frame_count() < self.total_frames {
            info!(
                "   帧数: {} (原始 {} 帧)",
                self.frame_count(),
                self.total_frames
            );
        } else {
            info!("   帧数: {}", self.frame_count());
        }
        info!("   尺寸: {}x{}", self.width, self.height);
        info!("   像素数据: {:.1} KB", self.pixel_bytes as f64 / 1024.0);
        info!("   文件大小: {:.1} KB", self.file_bytes as f64 / 1024.0);
    }
}

/// 执行一次完整转换
pub fn convert(config: &EncoderConfig, input: &Path, output: &Path) -> Result<Summary> {
    config.validate()?;

    // 静态图片只取第一帧
    let max_frames = match config.layout {
        LayoutShape::StillImage => Some(1),
        _ => config.max_frames,
    };

    info!("加载图像: {}", input.display());
    let source = decode_source(input, max_frames)?;
    if source.is_animated() {
        info!("找到 {} 帧", source.total());
    } else {
        info!("静态图片, 按单帧处理");
    }

    let selected = source.selected();
    if selected.len() < source.total() {
        info!("选取 {} 帧: {:?}", selected.len(), selected);
    }

    // 目标尺寸只按首帧计算一次，保证所有帧尺寸一致
    let first = source.frames().first().ok_or(ConvertError::EmptyAnimation)?;
    let (src_width, src_height) = first.image.dimensions();
    let target = target_dimensions(config.resize, src_width, src_height);
    info!(
        "目标尺寸: {}x{} (原始 {}x{})",
        target.0, target.1, src_width, src_height
    );

    let mut encoded = Vec::with_capacity(selected.len());
    for (idx, src) in source.frames().iter().enumerate() {
        info!(
            "处理第 {}/{} 帧 (原始第 {} 帧)...",
            idx + 1,
            selected.len(),
            src.index
        );
        let pixels = resize_frame(&src.image, target, config.filter);
        let frame = Frame::new(pixels, source.delay_of(src));
        debug!("帧 {} 延迟 {}ms", src.index, frame.delay_ms);
        encoded.push(frame.encode(config.byte_order));
    }

    let animation = Animation::new(encoded)?;

    let names = ArtifactNames {
        symbol: config.symbol_for(input),
        source_name: input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string(),
    };
    debug!("符号名: {}", names.symbol);

    let bytes = render_artifact(&animation, config, &names)?;
    std::fs::write(output, &bytes)?;
    debug!("已写入 {} 字节到 {:?}", bytes.len(), output);

    Ok(Summary {
        total_frames: source.total(),
        selected,
        width: animation.width(),
        height: animation.height(),
        pixel_bytes: animation.byte_size(),
        file_bytes: bytes.len() as u64,
        output: output.to_path_buf(),
    })
}
