//! # TextRenderer 模块
//!
//! 文字绘制的薄封装：优先使用加载的 TTF 字体（支持中文），字体缺失时
//! 退回 macroquad 内置字体，此时只有 ASCII 字形可用。

use macroquad::prelude::*;
use tracing::{info, warn};

/// 文字绘制器
#[derive(Default)]
pub struct TextRenderer {
    font: Option<Font>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self { font: None }
    }

    /// 加载 TTF 字体，失败时保持内置字体
    pub async fn load_font(&mut self, path: &str) -> Result<(), String> {
        let font = load_ttf_font(path).await.map_err(|e| {
            warn!(path, error = %e, "字体加载失败，退回内置字体（仅 ASCII）");
            format!("字体 {} 加载失败: {}", path, e)
        })?;
        self.font = Some(font);
        info!(path, "字体就绪");
        Ok(())
    }

    /// 是否已加载自定义字体
    pub fn has_custom_font(&self) -> bool {
        self.font.is_some()
    }

    /// 绘制一行文本
    pub fn draw_text(&self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        match &self.font {
            Some(font) => draw_text_ex(
                text,
                x,
                y,
                TextParams {
                    font: Some(font),
                    font_size: font_size as u16,
                    color,
                    ..Default::default()
                },
            ),
            None => draw_text(text, x, y, font_size, color),
        };
    }

    /// 绘制水平居中的一行文本，返回其宽度
    pub fn draw_text_centered(&self, text: &str, y: f32, font_size: f32, color: Color) -> f32 {
        let width = self.measure_text(text, font_size).width;
        self.draw_text(text, (screen_width() - width) / 2.0, y, font_size, color);
        width
    }

    /// 测量文本尺寸
    pub fn measure_text(&self, text: &str, font_size: f32) -> TextDimensions {
        match &self.font {
            Some(font) => measure_text(text, Some(font), font_size as u16, 1.0),
            // 内置字体测不准中文，按半角 0.5 em / 全角 1 em 估算
            None => {
                let ems: f32 = text
                    .chars()
                    .map(|c| if c.is_ascii() { 0.5 } else { 1.0 })
                    .sum();
                TextDimensions {
                    width: ems * font_size,
                    height: font_size,
                    offset_y: font_size * 0.8,
                }
            }
        }
    }
}
