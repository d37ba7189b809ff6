//! 更新逻辑（每帧调用）

use macroquad::prelude::*;
use tracing::{debug, info};

use super::{AppState, RevealPhase, update_loading};
use crate::slideshow::SlideshowAction;
use crate::state::AppPhase;

/// 揭幕内容淡入时长（秒）
const CONTENT_FADE_SECONDS: f32 = 0.5;

/// 更新入口（每帧调用）
pub fn update(app: &mut AppState) {
    let dt = get_frame_time();
    let frame = app.input_manager.poll();

    // 切换调试模式（全局可用）
    if frame.toggle_debug {
        app.run_state.toggle_debug();
        debug!(enabled = app.run_state.debug_mode, "切换调试模式");
    }

    if frame.quit {
        app.run_state.stop();
    }

    match app.phase {
        AppPhase::Loading => update_loading(app, dt, &frame),
        AppPhase::Displaying => update_displaying(app, dt, &frame),
    }
}

/// 展示阶段的每帧更新
fn update_displaying(app: &mut AppState, dt: f32, frame: &crate::input::InputFrame) {
    // 揭幕：主内容淡入
    if let RevealPhase::ContentFadeIn { timer } = app.reveal {
        let timer = timer + dt;
        app.content_alpha = (timer / CONTENT_FADE_SECONDS).clamp(0.0, 1.0);
        app.reveal = if timer >= CONTENT_FADE_SECONDS {
            RevealPhase::Done
        } else {
            RevealPhase::ContentFadeIn { timer }
        };
    }

    // 暂停切换：音频、粒子、轮换必须一起停一起走
    if frame.toggle_pause {
        toggle_paused(app);
    }

    if !app.run_state.paused {
        // 浏览器自动播放策略的本地对应：首个用户手势才启动音乐，
        // 失败后后续手势继续重试
        if frame.gesture && !app.audio_manager.is_active() && app.audio_manager.has_track() {
            app.audio_manager.activate();
        }

        if let Some((x, y)) = frame.clicked_at {
            app.particles.spawn_raindrops(x, y);
        }
    }

    // 视口尺寸防抖后才重排粒子
    if let Some((width, height)) = app
        .resize_debouncer
        .update(dt, screen_width(), screen_height())
    {
        debug!(width, height, "视口尺寸生效");
        app.particles.resize(width, height);
    }

    app.particles.update(dt);
    app.typist.update(dt);

    let actions = app.controller.update(dt);
    apply_actions(app, actions);
}

/// 执行编排器产出的动作
pub(super) fn apply_actions(app: &mut AppState, actions: Vec<SlideshowAction>) {
    for action in actions {
        match action {
            SlideshowAction::ShowImage { path } => {
                if let Some(path) = path.as_deref()
                    && let Some(assets) = app.assets.as_mut()
                {
                    assets.ensure_uploaded(path);
                }
                app.current_image = path;
                // 占位图无需等待，缓存命中时纹理也已就绪
                app.controller.confirm_image_ready();
            }
            SlideshowAction::Prefetch { path } => {
                if let Some(ref mut assets) = app.assets {
                    assets.ensure_uploaded(&path);
                }
            }
            SlideshowAction::TypeText { text } => {
                app.typist.type_text(text);
            }
        }
    }
}

/// 暂停 / 恢复的统一入口
pub fn toggle_paused(app: &mut AppState) {
    if app.run_state.paused {
        app.run_state.paused = false;
        app.controller.resume();
        app.particles.resume();
        app.audio_manager.resume_playback();
        info!("已恢复");
    } else {
        app.run_state.paused = true;
        app.controller.pause();
        app.particles.pause();
        app.audio_manager.pause_playback();
        info!("已暂停");
    }
}
