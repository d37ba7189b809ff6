//! # Render 模块
//!
//! 渲染系统与两套帧驱动的视觉组件。
//!
//! ## 绘制层顺序
//!
//! 1. 粒子层（雨滴、雪花，位于内容后方）
//! 2. 幻灯片图片（或占位图）
//! 3. 打字文本 + 光标
//! 4. 覆盖层（加载进度、调试信息）

use macroquad::prelude::*;

pub mod particles;
mod text_renderer;
pub mod typewriter;

pub use text_renderer::TextRenderer;

/// 占位图背景色（深蓝灰）
const PLACEHOLDER_BG: Color = Color::new(0.118, 0.161, 0.231, 1.0);

/// 占位图文字颜色（灰蓝）
const PLACEHOLDER_FG: Color = Color::new(0.392, 0.455, 0.545, 1.0);

/// 进度条填充色（淡紫）
const PROGRESS_FILL: Color = Color::new(0.506, 0.549, 0.973, 1.0);

/// 打字文本字号
const TYPED_FONT_SIZE: f32 = 32.0;

/// 渲染器
///
/// 持有文本渲染器，提供幻灯片、占位图、打字文本与加载进度的绘制。
pub struct Renderer {
    /// 文本渲染器
    pub text_renderer: TextRenderer,
}

impl Renderer {
    /// 创建新的渲染器
    pub fn new() -> Self {
        Self {
            text_renderer: TextRenderer::new(),
        }
    }

    /// 异步初始化（加载字体）
    pub async fn init(&mut self, font_path: &str) -> Result<(), String> {
        self.text_renderer.load_font(font_path).await
    }

    /// 绘制幻灯片图片（Cover 模式铺满屏幕，带透明度）
    pub fn draw_slide(&self, texture: &Texture2D, alpha: f32) {
        let (dest_w, dest_h, x, y) = calculate_draw_rect(texture, DrawMode::Cover);
        let color = Color::new(1.0, 1.0, 1.0, alpha.clamp(0.0, 1.0));
        draw_texture_ex(
            texture,
            x,
            y,
            color,
            DrawTextureParams {
                dest_size: Some(vec2(dest_w, dest_h)),
                ..Default::default()
            },
        );
    }

    /// 绘制占位图（没有任何图片可用时）
    pub fn draw_placeholder(&self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let screen_w = screen_width();
        let screen_h = screen_height();

        let panel_w = screen_w * 0.6;
        let panel_h = screen_h * 0.6;
        let x = (screen_w - panel_w) / 2.0;
        let y = (screen_h - panel_h) / 2.0;

        let mut bg = PLACEHOLDER_BG;
        bg.a *= alpha;
        draw_rectangle(x, y, panel_w, panel_h, bg);

        let mut fg = PLACEHOLDER_FG;
        fg.a *= alpha;
        self.text_renderer
            .draw_text_centered("等待图片加载...", y + panel_h / 2.0, 24.0, fg);
    }

    /// 绘制打字文本与方块光标
    pub fn draw_typed_line(&self, text: &str, cursor_on: bool, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let y = screen_height() * 0.85;
        let color = Color::new(1.0, 1.0, 1.0, alpha);

        let size = self.text_renderer.measure_text(text, TYPED_FONT_SIZE);
        let x = (screen_width() - size.width) / 2.0;
        self.text_renderer
            .draw_text(text, x, y, TYPED_FONT_SIZE, color);

        if cursor_on {
            let cursor_w = TYPED_FONT_SIZE * 0.12;
            let cursor_h = TYPED_FONT_SIZE * 0.9;
            draw_rectangle(
                x + size.width + 4.0,
                y - cursor_h * 0.85,
                cursor_w,
                cursor_h,
                color,
            );
        }
    }

    /// 绘制加载进度界面（进度条 + 百分比 + 状态行）
    pub fn draw_loading_screen(&self, percent: u32, status: &str, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let screen_w = screen_width();
        let screen_h = screen_height();

        let bar_w = screen_w * 0.4;
        let bar_h = 8.0;
        let bar_x = (screen_w - bar_w) / 2.0;
        let bar_y = screen_h / 2.0;

        // 进度条底槽与填充（宽度按百分比）
        draw_rectangle(
            bar_x,
            bar_y,
            bar_w,
            bar_h,
            Color::new(1.0, 1.0, 1.0, 0.15 * alpha),
        );
        let mut fill = PROGRESS_FILL;
        fill.a *= alpha;
        let fill_w = bar_w * (percent.min(100) as f32 / 100.0);
        draw_rectangle(bar_x, bar_y, fill_w, bar_h, fill);

        let text_color = Color::new(1.0, 1.0, 1.0, alpha);
        self.text_renderer.draw_text_centered(
            &format!("{}%", percent.min(100)),
            bar_y + 36.0,
            24.0,
            text_color,
        );

        if !status.is_empty() {
            let mut dim = text_color;
            dim.a *= 0.7;
            self.text_renderer
                .draw_text_centered(status, bar_y + 64.0, 18.0, dim);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// 纹理适配屏幕的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// 等比放大到铺满屏幕，超出部分裁掉
    Cover,
    /// 等比缩放到完整可见，四周可能留边
    Contain,
}

/// 按适配方式求目标矩形，返回 (宽, 高, x, y)
fn calculate_draw_rect(texture: &Texture2D, mode: DrawMode) -> (f32, f32, f32, f32) {
    let screen_w = screen_width();
    let screen_h = screen_height();
    let tex_w = texture.width();
    let tex_h = texture.height();

    let scale = match mode {
        DrawMode::Cover => (screen_w / tex_w).max(screen_h / tex_h),
        DrawMode::Contain => (screen_w / tex_w).min(screen_h / tex_h),
    };

    let dest_w = tex_w * scale;
    let dest_h = tex_h * scale;
    let x = (screen_w - dest_w) / 2.0;
    let y = (screen_h - dest_h) / 2.0;
    (dest_w, dest_h, x, y)
}
