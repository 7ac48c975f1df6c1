//! 编码配置
//!
//! 原先分散在各个转换脚本里的默认参数统一收敛到 [`EncoderConfig`]。
//! 每个脚本对应一个 [`Preset`]，配置按 预设 → JSON 文件 → 命令行 的顺序逐层覆盖。

use crate::error::{ConvertError, Result};
use clap::ValueEnum;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 指针数组类预设使用的默认符号名
pub const DEFAULT_SYMBOL: &str = "spaceman";

/// 默认的显示区域边长（像素）
pub const DEFAULT_DISPLAY_SIZE: u32 = 240;

/// 缩小版预设的目标边长
pub const SMALL_SIZE: u32 = 120;

/// 精简版预设保留的最大帧数
pub const DEFAULT_MAX_FRAMES: usize = 5;

/// 空间缩放策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ResizePolicy {
    /// 等比缩放到边界内，从不放大
    Fit { max_width: u32, max_height: u32 },
    /// 强制缩放到固定尺寸，忽略宽高比
    Exact { width: u32, height: u32 },
}

/// 输出像素的字节序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PixelByteOrder {
    /// 按 RRRRRGGGGGGBBBBB 原样输出
    #[default]
    Native,
    /// 交换高低字节 (LovyanGFX 等驱动需要)
    Swapped,
}

/// 生成头文件的元数据形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum LayoutShape {
    /// 每帧一个 AnimationFrame 结构体，外加 Animation 聚合结构
    #[serde(rename = "struct")]
    #[value(name = "struct")]
    StructRecord,
    /// `#define` 常量加帧指针数组
    #[serde(rename = "define")]
    #[value(name = "define")]
    DefinePointerArray,
    /// 单张静态图片，附带宽高常量和绘制函数
    #[serde(rename = "still")]
    #[value(name = "still")]
    StillImage,
}

/// 输出文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// C/C++ 头文件
    #[default]
    Header,
    /// 原始 RGB565 二进制数据
    Binary,
}

impl OutputFormat {
    /// 默认输出文件扩展名
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Header => "h",
            OutputFormat::Binary => "bin",
        }
    }
}

/// 重采样滤波器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    #[default]
    Lanczos3,
    CatmullRom,
    Gaussian,
    Triangle,
    Nearest,
}

impl ResampleFilter {
    /// 转换为 image 库的滤波器类型
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::Nearest => FilterType::Nearest,
        }
    }
}

/// 转换预设，对应原来的各个转换脚本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// 静态图片，等比缩放到 240x240 以内
    Still,
    /// 完整动画，AnimationPlayer 结构体输出
    Animation,
    /// 全部帧，强制 240x240
    Gif,
    /// 最多 5 帧，强制 240x240
    #[default]
    Reduced,
    /// 最多 5 帧，强制 120x120，字节交换
    Small,
}

impl Preset {
    /// 获取预设对应的完整配置
    pub fn config(self) -> EncoderConfig {
        let display = ResizePolicy::Fit {
            max_width: DEFAULT_DISPLAY_SIZE,
            max_height: DEFAULT_DISPLAY_SIZE,
        };
        let exact = |size| ResizePolicy::Exact { width: size, height: size };

        match self {
            Preset::Still => EncoderConfig {
                resize: display,
                max_frames: None,
                symbol_name: None,
                byte_order: PixelByteOrder::Native,
                layout: LayoutShape::StillImage,
                format: OutputFormat::Header,
                filter: ResampleFilter::Lanczos3,
                values_per_line: 10,
            },
            Preset::Animation => EncoderConfig {
                resize: display,
                max_frames: None,
                symbol_name: None,
                byte_order: PixelByteOrder::Native,
                layout: LayoutShape::StructRecord,
                format: OutputFormat::Header,
                filter: ResampleFilter::Lanczos3,
                values_per_line: 10,
            },
            Preset::Gif => EncoderConfig {
                resize: exact(DEFAULT_DISPLAY_SIZE),
                max_frames: None,
                symbol_name: Some(DEFAULT_SYMBOL.to_string()),
                byte_order: PixelByteOrder::Native,
                layout: LayoutShape::DefinePointerArray,
                format: OutputFormat::Header,
                filter: ResampleFilter::Lanczos3,
                values_per_line: 12,
            },
            Preset::Reduced => EncoderConfig {
                max_frames: Some(DEFAULT_MAX_FRAMES),
                ..Preset::Gif.config()
            },
            Preset::Small => EncoderConfig {
                resize: exact(SMALL_SIZE),
                byte_order: PixelByteOrder::Swapped,
                ..Preset::Reduced.config()
            },
        }
    }
}

/// 编码器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// 空间缩放策略
    pub resize: ResizePolicy,
    /// 最多保留的帧数，`None` 表示保留全部
    pub max_frames: Option<usize>,
    /// 生成标识符的基础名称，`None` 时使用输入文件名
    pub symbol_name: Option<String>,
    /// 像素字节序
    pub byte_order: PixelByteOrder,
    /// 头文件元数据形态
    pub layout: LayoutShape,
    /// 输出格式
    pub format: OutputFormat,
    /// 重采样滤波器（所有帧共用）
    pub filter: ResampleFilter,
    /// 每行输出的像素个数
    pub values_per_line: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl EncoderConfig {
    /// 检查配置是否有效
    pub fn validate(&self) -> Result<()> {
        let (w, h) = match self.resize {
            ResizePolicy::Fit { max_width, max_height } => (max_width, max_height),
            ResizePolicy::Exact { width, height } => (width, height),
        };
        if w == 0 || h == 0 {
            return Err(ConvertError::InvalidConfig(format!(
                "目标尺寸必须大于 0: {}x{}",
                w, h
            )));
        }

        if self.max_frames == Some(0) {
            return Err(ConvertError::InvalidConfig("最大帧数必须至少为 1".to_string()));
        }

        if self.values_per_line == 0 {
            return Err(ConvertError::InvalidConfig("每行像素个数必须至少为 1".to_string()));
        }

        Ok(())
    }

    /// 应用一层覆盖配置
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(resize) = overrides.resize {
            self.resize = resize;
        }
        if overrides.all_frames {
            self.max_frames = None;
        } else if let Some(max) = overrides.max_frames {
            self.max_frames = Some(max);
        }
        if let Some(ref name) = overrides.symbol_name {
            self.symbol_name = Some(name.clone());
        }
        if let Some(order) = overrides.byte_order {
            self.byte_order = order;
        }
        if let Some(layout) = overrides.layout {
            self.layout = layout;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(filter) = overrides.filter {
            self.filter = filter;
        }
        if let Some(n) = overrides.values_per_line {
            self.values_per_line = n;
        }
    }

    /// 计算最终使用的 C 标识符
    pub fn symbol_for(&self, input: &Path) -> String {
        match self.symbol_name {
            Some(ref name) => sanitize_identifier(name),
            None => {
                let stem = input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("");
                sanitize_identifier(stem)
            }
        }
    }
}

/// 一层可选的配置覆盖（JSON 文件或命令行）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub preset: Option<Preset>,
    pub resize: Option<ResizePolicy>,
    pub max_frames: Option<usize>,
    pub all_frames: bool,
    pub symbol_name: Option<String>,
    pub byte_order: Option<PixelByteOrder>,
    pub layout: Option<LayoutShape>,
    pub format: Option<OutputFormat>,
    pub filter: Option<ResampleFilter>,
    pub values_per_line: Option<usize>,
}

impl ConfigOverrides {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConvertError::FileNotFound(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path)?;
        let overrides = serde_json::from_str(&text)?;
        tracing::debug!("已加载配置文件: {:?}", path);
        Ok(overrides)
    }
}

/// 按 预设 → 文件 → 命令行 的顺序合成最终配置
pub fn resolve(file: Option<&ConfigOverrides>, cli: &ConfigOverrides) -> Result<EncoderConfig> {
    let preset = cli
        .preset
        .or_else(|| file.and_then(|f| f.preset))
        .unwrap_or_default();

    let mut config = preset.config();
    if let Some(file) = file {
        config.apply(file);
    }
    config.apply(cli);
    config.validate()?;

    tracing::debug!("使用预设 {:?}, 最终配置: {:?}", preset, config);
    Ok(config)
}

/// 把任意字符串转换为合法的 C 标识符
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.is_empty() {
        ident.push_str("image");
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    ident
}
