//! 错误类型定义

use thiserror::Error;

/// 转换器错误类型
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("图片解码错误: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("GIF 解析错误: {0}")]
    GifDecode(#[from] gif::DecodingError),

    #[error("配置文件解析错误: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("文件未找到: {0}")]
    FileNotFound(String),

    #[error("无效的配置: {0}")]
    InvalidConfig(String),

    #[error("图像不包含任何帧")]
    EmptyAnimation,

    #[error("第 {index} 帧尺寸 {width}x{height} 与首帧 {expected_width}x{expected_height} 不一致")]
    FrameSizeMismatch {
        index: usize,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
