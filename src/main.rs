//! img2header - 图片/GIF 动画转 RGB565 C 头文件工具
//!
//! 把静态图片或 GIF 动画转换为可直接烧录到单片机 Flash 的像素数组。
//! 支持的输出形态：
//! - `define`: `#define` 常量 + 帧指针数组
//! - `struct`: AnimationPlayer 使用的 AnimationFrame/Animation 结构体
//! - `still`: 单张图片 + TFT_eSPI 绘制函数
//!
//! 原来的几个转换脚本以预设 (`--preset`) 的形式保留。

mod config;
mod error;
mod formats;
mod image;
mod pipeline;

use anyhow::Context;
use clap::Parser;
use config::{
    ConfigOverrides, LayoutShape, OutputFormat, PixelByteOrder, Preset, ResampleFilter,
    ResizePolicy,
};
use pipeline::Summary;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// 未指定输出路径时使用的文件名
const DEFAULT_OUTPUT: &str = "animation.h";

/// 命令行参数
#[derive(Parser, Debug)]
#[command(version, about = "把图片/GIF 动画转换为 RGB565 C 头文件", long_about = None)]
struct Cli {
    /// 输入图片或 GIF 动画
    input: PathBuf,

    /// 输出文件路径 (默认 animation.h，静态图片为 <文件名>.h)
    output: Option<PathBuf>,

    /// 生成标识符的基础名称
    name: Option<String>,

    /// 最多保留的帧数
    #[arg(value_name = "MAX_FRAMES")]
    frames: Option<usize>,

    /// 目标正方形边长（像素）
    size: Option<u32>,

    /// 转换预设，对应原来的各个转换脚本
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// 等比缩放到 WxH 以内，从不放大
    #[arg(long, value_name = "WxH", value_parser = parse_dimensions, conflicts_with_all = ["exact", "size"])]
    fit: Option<(u32, u32)>,

    /// 强制缩放到 WxH
    #[arg(long, value_name = "WxH", value_parser = parse_dimensions, conflicts_with = "size")]
    exact: Option<(u32, u32)>,

    /// 最多保留的帧数
    #[arg(long, conflicts_with_all = ["all_frames", "frames"])]
    max_frames: Option<usize>,

    /// 保留全部帧
    #[arg(long)]
    all_frames: bool,

    /// 头文件元数据形态
    #[arg(long, value_enum)]
    layout: Option<LayoutShape>,

    /// 输出格式
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// 重采样滤波器
    #[arg(long, value_enum)]
    filter: Option<ResampleFilter>,

    /// 交换每个像素的高低字节
    #[arg(long, conflicts_with = "no_swap_bytes")]
    swap_bytes: bool,

    /// 不交换字节（覆盖预设）
    #[arg(long)]
    no_swap_bytes: bool,

    /// 每行输出的像素个数
    #[arg(long)]
    values_per_line: Option<usize>,

    /// JSON 配置文件
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// 命令行给出的配置覆盖
    fn overrides(&self) -> ConfigOverrides {
        let resize = if let Some((width, height)) = self.exact {
            Some(ResizePolicy::Exact { width, height })
        } else if let Some((max_width, max_height)) = self.fit {
            Some(ResizePolicy::Fit { max_width, max_height })
        } else {
            self.size.map(|s| ResizePolicy::Exact { width: s, height: s })
        };

        let byte_order = if self.swap_bytes {
            Some(PixelByteOrder::Swapped)
        } else if self.no_swap_bytes {
            Some(PixelByteOrder::Native)
        } else {
            None
        };

        ConfigOverrides {
            preset: self.preset,
            resize,
            max_frames: self.max_frames.or(self.frames),
            all_frames: self.all_frames,
            symbol_name: self.name.clone(),
            byte_order,
            layout: self.layout,
            format: self.format,
            filter: self.filter,
            values_per_line: self.values_per_line,
        }
    }
}

/// 解析 `WxH` 或单个边长
fn parse_dimensions(s: &str) -> Result<(u32, u32), String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("无效的尺寸: {}", s))
    };

    let (w, h) = match s.split_once(['x', 'X']) {
        Some((w, h)) => (parse(w)?, parse(h)?),
        None => {
            let v = parse(s)?;
            (v, v)
        }
    };

    if w == 0 || h == 0 {
        return Err(format!("尺寸必须大于 0: {}", s));
    }
    Ok((w, h))
}

/// 未指定输出路径时的默认路径
fn default_output(input: &Path, config: &config::EncoderConfig) -> PathBuf {
    let path = match config.layout {
        LayoutShape::StillImage => {
            let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
            PathBuf::from(format!("{}.h", stem))
        }
        _ => PathBuf::from(DEFAULT_OUTPUT),
    };
    path.with_extension(config.format.extension())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stdout().is_terminal())
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<Summary> {
    let file = cli
        .config
        .as_deref()
        .map(ConfigOverrides::load)
        .transpose()
        .context("无法加载配置文件")?;

    let config = config::resolve(file.as_ref(), &cli.overrides()).context("配置无效")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input, &config));

    pipeline::convert(&config, &cli.input, &output)
        .with_context(|| format!("转换 {} 失败", cli.input.display()))
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // 参数错误输出到 stdout 并返回 1，--help/--version 返回 0
            print!("{}", e);
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    // 输入不存在时直接退出，不创建任何输出文件
    if !cli.input.exists() {
        error!("❌ 错误: 文件未找到: {}", cli.input.display());
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(summary) => {
            summary.report();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// 应用程序名称
pub const APP_NAME: &str = "img2header";

/// 应用程序版本（从 Cargo.toml 读取）
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_info() {
        assert_eq!(APP_NAME, "img2header");
        assert!(!APP_VERSION.is_empty());
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("240x240"), Ok((240, 240)));
        assert_eq!(parse_dimensions("320X170"), Ok((320, 170)));
        assert_eq!(parse_dimensions("120"), Ok((120, 120)));
        assert!(parse_dimensions("0x10").is_err());
        assert!(parse_dimensions("axb").is_err());
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["img2header", "in.gif", "out.h", "rocket", "3", "64"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.symbol_name.as_deref(), Some("rocket"));
        assert_eq!(overrides.max_frames, Some(3));
        assert_eq!(overrides.resize, Some(ResizePolicy::Exact { width: 64, height: 64 }));
        assert_eq!(cli.output, Some(PathBuf::from("out.h")));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "img2header",
            "in.gif",
            "--preset",
            "small",
            "--fit",
            "320x170",
            "--layout",
            "struct",
            "--no-swap-bytes",
            "--filter",
            "catmull-rom",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.preset, Some(Preset::Small));
        assert_eq!(
            overrides.resize,
            Some(ResizePolicy::Fit { max_width: 320, max_height: 170 })
        );
        assert_eq!(overrides.layout, Some(LayoutShape::StructRecord));
        assert_eq!(overrides.byte_order, Some(PixelByteOrder::Native));
        assert_eq!(overrides.filter, Some(ResampleFilter::CatmullRom));
    }

    #[test]
    fn test_missing_input_argument() {
        assert!(Cli::try_parse_from(["img2header"]).is_err());
    }

    #[test]
    fn test_default_output() {
        let still = Preset::Still.config();
        assert_eq!(default_output(Path::new("art/logo.png"), &still), PathBuf::from("logo.h"));

        let mut reduced = Preset::Reduced.config();
        assert_eq!(default_output(Path::new("a.gif"), &reduced), PathBuf::from("animation.h"));

        reduced.format = OutputFormat::Binary;
        assert_eq!(default_output(Path::new("a.gif"), &reduced), PathBuf::from("animation.bin"));
    }
}
