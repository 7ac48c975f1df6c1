//! 输出文件格式模块

pub mod binary;
pub mod header;

pub use header::HeaderWriter;

use crate::config::{EncoderConfig, OutputFormat};
use crate::error::Result;
use crate::image::Animation;

/// 生成产物所需的命名信息
#[derive(Debug, Clone)]
pub struct ArtifactNames {
    /// C 标识符基础名称
    pub symbol: String,
    /// 源文件名
    pub source_name: String,
}

/// 按配置把动画渲染为完整的输出内容
///
/// 产物先完整地在内存中生成，再由调用方一次性写入磁盘。
pub fn render_artifact(
    animation: &Animation,
    config: &EncoderConfig,
    names: &ArtifactNames,
) -> Result<Vec<u8>> {
    match config.format {
        OutputFormat::Header => {
            let writer =
                HeaderWriter::new(&names.symbol, &names.source_name, config.values_per_line);
            Ok(writer.render(animation, config.layout)?.into_bytes())
        }
        OutputFormat::Binary => binary::render(animation),
    }
}
