//! C/C++ 头文件生成
//!
//! 三种元数据形态：
//! - `DefinePointerArray`: `#define` 帧数/宽/高 + `const uint16_t*` 帧指针数组
//! - `StructRecord`: 每帧一个 `AnimationFrame`，外加 `Animation` 聚合结构 (AnimationPlayer.h)
//! - `StillImage`: 单张图片，宽高常量加 `draw_<name>()` 绘制函数 (TFT_eSPI)

use crate::config::LayoutShape;
use crate::error::{ConvertError, Result};
use crate::image::{Animation, EncodedFrame};

/// 头文件生成器
pub struct HeaderWriter<'a> {
    /// C 标识符基础名称
    symbol: &'a str,
    /// 源文件名（写入注释）
    source_name: &'a str,
    /// 每行像素个数
    values_per_line: usize,
}

impl<'a> HeaderWriter<'a> {
    pub fn new(symbol: &'a str, source_name: &'a str, values_per_line: usize) -> Self {
        Self {
            symbol,
            source_name,
            values_per_line: values_per_line.max(1),
        }
    }

    /// include guard 名称
    pub fn guard(&self, layout: LayoutShape) -> String {
        let upper = self.symbol.to_uppercase();
        match layout {
            LayoutShape::DefinePointerArray => format!("{}_GIF_H", upper),
            LayoutShape::StructRecord => format!("{}_ANIMATION_H", upper),
            LayoutShape::StillImage => format!("{}_H", upper),
        }
    }

    /// 生成完整的头文件文本
    pub fn render(&self, animation: &Animation, layout: LayoutShape) -> Result<String> {
        match layout {
            LayoutShape::DefinePointerArray => Ok(self.render_define(animation)),
            LayoutShape::StructRecord => Ok(self.render_struct(animation)),
            LayoutShape::StillImage => {
                if animation.frame_count() != 1 {
                    return Err(ConvertError::InvalidConfig(format!(
                        "静态图片输出只能包含 1 帧，实际为 {} 帧",
                        animation.frame_count()
                    )));
                }
                Ok(self.render_still(&animation.frames()[0]))
            }
        }
    }

    fn render_define(&self, animation: &Animation) -> String {
        let name = self.symbol;
        let upper = name.to_uppercase();
        let guard = self.guard(LayoutShape::DefinePointerArray);
        let count = animation.frame_count();
        let (width, height) = (animation.width(), animation.height());

        let mut out = String::new();
        out.push_str(&format!("#ifndef {}\n", guard));
        out.push_str(&format!("#define {}\n\n", guard));
        out.push_str("#include <Arduino.h>\n\n");
        out.push_str(&format!("#define {}_FRAME_COUNT {}\n", upper, count));
        out.push_str(&format!("#define {}_WIDTH {}\n", upper, width));
        out.push_str(&format!("#define {}_HEIGHT {}\n\n", upper, height));

        for (idx, frame) in animation.frames().iter().enumerate() {
            out.push_str(&format!(
                "const uint16_t {}_frame_{}[{}] PROGMEM = {{\n",
                name,
                idx,
                frame.pixel_count()
            ));
            self.write_values(&mut out, &frame.packed_pixels);
            out.push_str("};\n\n");
        }

        out.push_str(&format!("const uint16_t* {}_frames[{}] = {{\n", name, count));
        let pointers: Vec<String> = (0..count)
            .map(|idx| format!("  {}_frame_{}", name, idx))
            .collect();
        out.push_str(&pointers.join(",\n"));
        out.push_str("\n};\n\n");

        out.push_str(&format!("#endif // {}\n", guard));
        out
    }

    fn render_struct(&self, animation: &Animation) -> String {
        let name = self.symbol;
        let guard = self.guard(LayoutShape::StructRecord);
        let count = animation.frame_count();

        let mut out = String::new();
        out.push_str(&format!("// Auto-generated from {}\n", self.source_name));
        out.push_str(&format!("// Frame count: {}\n\n", count));
        out.push_str(&format!("#ifndef {}\n", guard));
        out.push_str(&format!("#define {}\n\n", guard));
        out.push_str("#include \"AnimationPlayer.h\"\n\n");

        for (idx, frame) in animation.frames().iter().enumerate() {
            out.push_str(&format!(
                "// Frame {} - {}x{}, {}ms\n",
                idx, frame.width, frame.height, frame.delay_ms
            ));
            out.push_str(&format!(
                "const uint16_t {}_frame_{}_data[] PROGMEM = {{\n",
                name, idx
            ));
            self.write_values(&mut out, &frame.packed_pixels);
            out.push_str("};\n\n");

            out.push_str(&format!("const AnimationFrame {}_frame_{} = {{\n", name, idx));
            out.push_str(&format!("  .data = {}_frame_{}_data,\n", name, idx));
            out.push_str(&format!("  .width = {},\n", frame.width));
            out.push_str(&format!("  .height = {},\n", frame.height));
            out.push_str(&format!("  .delay_ms = {}\n", frame.delay_ms));
            out.push_str("};\n\n");
        }

        out.push_str(&format!("const AnimationFrame* {}_frames[] = {{\n", name));
        for idx in 0..count {
            out.push_str(&format!("  &{}_frame_{},\n", name, idx));
        }
        out.push_str("};\n\n");

        out.push_str(&format!("const Animation {}_animation = {{\n", name));
        out.push_str(&format!("  .frames = {}_frames,\n", name));
        out.push_str(&format!("  .frameCount = {},\n", count));
        out.push_str(&format!("  .loop = {}\n", animation.looping));
        out.push_str("};\n\n");

        out.push_str(&format!("#endif // {}\n", guard));
        out
    }

    fn render_still(&self, frame: &EncodedFrame) -> String {
        let name = self.symbol;
        let guard = self.guard(LayoutShape::StillImage);

        let mut out = String::new();
        out.push_str(&format!("// Auto-generated from {}\n", self.source_name));
        out.push_str(&format!("// Size: {}x{}\n\n", frame.width, frame.height));
        out.push_str(&format!("#ifndef {}\n", guard));
        out.push_str(&format!("#define {}\n\n", guard));
        out.push_str("#include <Arduino.h>\n\n");

        out.push_str(&format!("const uint16_t {}_data[] PROGMEM = {{\n", name));
        self.write_values(&mut out, &frame.packed_pixels);
        out.push_str("};\n\n");

        out.push_str(&format!("const uint16_t {}_width = {};\n", name, frame.width));
        out.push_str(&format!("const uint16_t {}_height = {};\n\n", name, frame.height));

        out.push_str(&format!("// Helper function to draw {}\n", name));
        out.push_str(&format!("// Usage: draw_{}(display, x, y);\n", name));
        out.push_str(&format!(
            "inline void draw_{}(TFT_eSPI* tft, int16_t x, int16_t y) {{\n",
            name
        ));
        out.push_str(&format!(
            "  tft->pushImage(x, y, {0}_width, {0}_height, {0}_data);\n",
            name
        ));
        out.push_str("}\n\n");

        out.push_str(&format!("#endif // {}\n", guard));
        out
    }

    /// 写入像素数组内容：`0x%04X`，逗号分隔，每行固定个数，末尾元素后不加逗号
    fn write_values(&self, out: &mut String, values: &[u16]) {
        let lines: Vec<String> = values
            .chunks(self.values_per_line)
            .map(|chunk| {
                let items: Vec<String> = chunk.iter().map(|v| format!("0x{:04X}", v)).collect();
                format!("  {}", items.join(", "))
            })
            .collect();

        if !lines.is_empty() {
            out.push_str(&lines.join(",\n"));
            out.push('\n');
        }
    }
}
