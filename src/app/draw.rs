//! 渲染逻辑

use macroquad::prelude::*;

use super::AppState;
use crate::state::AppPhase;

/// 页面底色（深蓝黑）
const BACKDROP: Color = Color::new(0.059, 0.071, 0.102, 1.0);

/// 渲染函数（每帧调用）
pub fn draw(app: &mut AppState) {
    clear_background(BACKDROP);

    // 粒子位于内容后方
    app.particles.draw();

    match app.phase {
        AppPhase::Loading => {
            let (percent, status) = match app.loader {
                Some(ref loader) => (loader.progress().percent(), loader.status().to_string()),
                None => (0, String::new()),
            };
            app.renderer
                .draw_loading_screen(percent, &status, app.overlay_alpha);
        }
        AppPhase::Displaying => {
            let alpha = app.controller.image_alpha() * app.content_alpha;

            let texture = match (&app.current_image, app.assets.as_mut()) {
                (Some(path), Some(assets)) => assets.texture(path),
                _ => None,
            };
            match texture {
                Some(texture) => app.renderer.draw_slide(&texture, alpha),
                None => app.renderer.draw_placeholder(alpha),
            }

            app.renderer.draw_typed_line(
                app.typist.visible_text(),
                app.typist.cursor_visible(),
                app.content_alpha,
            );

            if app.run_state.paused {
                app.renderer.text_renderer.draw_text_centered(
                    "已暂停",
                    40.0,
                    24.0,
                    Color::new(1.0, 1.0, 1.0, 0.6),
                );
            }
        }
    }

    // 显示调试信息
    if app.run_state.debug_mode {
        draw_debug_info(app);
    }
}

/// 绘制调试信息
fn draw_debug_info(app: &AppState) {
    let fps = get_fps();
    let texture_count = app.assets.as_ref().map_or(0, |a| a.texture_count());

    draw_rectangle(5.0, 5.0, 320.0, 150.0, Color::new(0.0, 0.0, 0.0, 0.85));

    let lines: Vec<(String, Color)> = vec![
        (format!("FPS: {}", fps), GREEN),
        (format!("阶段: {:?}", app.phase), GREEN),
        (
            format!(
                "雪花: {} / {} | 雨滴: {}",
                app.particles.snowflake_count(),
                app.particles.snowflake_target(),
                app.particles.raindrop_count()
            ),
            WHITE,
        ),
        (format!("纹理: {}", texture_count), WHITE),
        (
            format!(
                "音频: {} | 暂停: {}",
                if app.audio_manager.is_active() {
                    "播放中"
                } else {
                    "未激活"
                },
                app.run_state.paused
            ),
            WHITE,
        ),
        (
            format!(
                "文本: \"{}\" (队列 {})",
                app.typist.visible_text(),
                app.typist.queued()
            ),
            Color::new(0.7, 0.7, 0.7, 1.0),
        ),
    ];

    for (i, (line, color)) in lines.iter().enumerate() {
        let y = 25.0 + i as f32 * 22.0;
        app.renderer
            .text_renderer
            .draw_text(line, 10.0, y, 16.0, *color);
    }
}
